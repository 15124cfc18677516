//! Render-event records and the in-process progress bus.

pub mod bus;
pub mod record;

pub use bus::ProgressBus;
pub use record::{RenderEvent, RenderKind, RenderOutcome};
