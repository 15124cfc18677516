//! Service traits implemented by the HTTP client and by test doubles.

use async_trait::async_trait;
use shotflow_core::types::ImageRef;

use crate::contracts::{ImageRequest, PanelPlanRequest, PlannedPanel, VideoRequest};
use crate::error::GenError;

/// Generates a single still image from a prompt and conditioning images.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageRef, GenError>;
}

/// Generates a video clip from one or two anchor images.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Returns the URL of the generated clip.
    async fn generate_video(&self, request: &VideoRequest) -> Result<String, GenError>;
}

/// Plans the nine camera-angle panels for a grid decomposition via a
/// structured-output text generation call.
#[async_trait]
pub trait PanelPlanner: Send + Sync {
    /// The returned list is not yet validated for count; callers enforce
    /// the exactly-nine contract.
    async fn plan_panels(&self, request: &PanelPlanRequest) -> Result<Vec<PlannedPanel>, GenError>;
}

/// Fetches the raw bytes behind an image reference (for panel cropping).
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_image(&self, image: &ImageRef) -> Result<Vec<u8>, GenError>;
}
