//! Model types owned by the store.

pub mod project;
pub mod shot;

pub use project::{Project, ProjectSummary, StatusProjection};
pub use shot::{GridPanel, Interval, Keyframe, NineGridData, Shot};
