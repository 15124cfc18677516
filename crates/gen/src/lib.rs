//! Generation-service contracts and clients.
//!
//! Image, video, and panel-planning generation are black-box operations
//! behind the traits in [`traits`]; [`http`] implements them against the
//! remote generation gateway, and [`error`] carries the failure taxonomy
//! the pipeline's state machines branch on.

pub mod contracts;
pub mod error;
pub mod http;
pub mod imageops;
pub mod traits;

pub use contracts::{
    ImageRequest, PanelPlanRequest, PlannedPanel, TransitionMode, VideoRequest,
};
pub use error::GenError;
pub use traits::{ImageFetcher, ImageGenerator, PanelPlanner, VideoGenerator};
