//! HTTP client for the remote generation gateway.
//!
//! One [`GatewayClient`] serves all three operations. Failures are folded
//! into the [`GenError`] taxonomy from the HTTP status class and response
//! body; the planner endpoint returns model text that may arrive wrapped
//! in a markdown code fence, which is stripped before JSON parsing.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use shotflow_core::types::ImageRef;

use crate::contracts::{ImageRequest, PanelPlanRequest, PlannedPanel, VideoRequest};
use crate::error::GenError;
use crate::traits::{ImageFetcher, ImageGenerator, PanelPlanner, VideoGenerator};

/// Client for the generation gateway's JSON API.
pub struct GatewayClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GatewayClient {
    /// Create a client targeting `base_url` (e.g. `https://gateway.example.com`).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// POST a JSON body and decode a JSON response, classifying failures.
    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, GenError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body_text));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| GenError::Parse(e.to_string()))
    }
}

/// Fold an HTTP failure into the taxonomy.
///
/// 401/403 are authorization failures; 429 and 503 are overload; 400/422
/// bodies mentioning safety blocking are content rejection; everything
/// else is transport.
fn classify_failure(status: StatusCode, body: &str) -> GenError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GenError::Unauthorized(format!("{status}: {body}"))
        }
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            GenError::Overloaded(format!("{status}: {body}"))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
            if looks_like_content_rejection(body) =>
        {
            GenError::ContentRejected(body.to_string())
        }
        _ => GenError::Transport(format!("{status}: {body}")),
    }
}

/// Heuristic over gateway error bodies for safety-filter rejections.
fn looks_like_content_rejection(body: &str) -> bool {
    let lower = body.to_lowercase();
    ["safety", "blocked", "policy", "prohibited"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Strip a surrounding markdown code fence from model output, if present.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ImageResponse {
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    video_url: String,
}

/// The planner endpoint relays the model's structured-output text.
#[derive(Debug, Deserialize)]
struct PlannerResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct PlannerRequestBody<'a> {
    prompt: String,
    response_format: &'a str,
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl ImageGenerator for GatewayClient {
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageRef, GenError> {
        tracing::debug!(
            reference_count = request.reference_images.len(),
            aspect_ratio = %request.aspect_ratio,
            "Submitting image generation",
        );
        let response: ImageResponse = self.post_json("/v1/images", request).await?;
        Ok(response.image_url)
    }
}

#[async_trait::async_trait]
impl VideoGenerator for GatewayClient {
    async fn generate_video(&self, request: &VideoRequest) -> Result<String, GenError> {
        tracing::debug!(
            mode = ?request.mode(),
            model = request.model.id(),
            "Submitting video generation",
        );
        let response: VideoResponse = self.post_json("/v1/videos", request).await?;
        Ok(response.video_url)
    }
}

#[async_trait::async_trait]
impl PanelPlanner for GatewayClient {
    async fn plan_panels(&self, request: &PanelPlanRequest) -> Result<Vec<PlannedPanel>, GenError> {
        let body = PlannerRequestBody {
            prompt: build_planner_prompt(request),
            response_format: "json",
        };
        let response: PlannerResponse = self.post_json("/v1/planner", &body).await?;
        let text = strip_code_fence(&response.text);
        serde_json::from_str(text).map_err(|e| GenError::Parse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ImageFetcher for GatewayClient {
    async fn fetch_image(&self, image: &ImageRef) -> Result<Vec<u8>, GenError> {
        let response = self
            .client
            .get(image.as_str())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| GenError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Prompt for the nine-panel planning call.
///
/// Descriptions are requested in English regardless of project language;
/// the downstream image model composes more reliably from English.
fn build_planner_prompt(request: &PanelPlanRequest) -> String {
    format!(
        r#"Decompose one film shot into exactly 9 alternative camera setups.

Shot action: {action}
Scene: {scene}
Visual style: {style}

Return ONLY a JSON array of 9 objects, ordered left-to-right then
top-to-bottom, each with this shape:
{{"index": 0, "shot_size": "close-up", "camera_angle": "low angle", "description": "..."}}

Rules:
- index runs 0 through 8 with no gaps.
- shot_size is one of: extreme close-up, close-up, medium, full, wide.
- description is a single English sentence describing the framing.
"#,
        action = request.action_summary,
        scene = request.scene_context,
        style = request.style_phrase,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
