#![allow(dead_code)]

//! Shared test app construction and request helpers.
//!
//! Mirrors the router construction in `main.rs` so integration tests
//! exercise the same middleware stack (CORS, request ID, timeout,
//! tracing, panic recovery) that production uses, with the generation
//! gateway replaced by in-process stubs.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use shotflow_api::config::ServerConfig;
use shotflow_api::router::build_app_router;
use shotflow_api::state::AppState;
use shotflow_core::types::ImageRef;
use shotflow_gen::{
    GenError, ImageFetcher, ImageGenerator, ImageRequest, PanelPlanRequest, PanelPlanner,
    PlannedPanel, VideoGenerator, VideoRequest,
};
use shotflow_pipeline::credentials::NoopCredentialHandler;

/// Build a test `ServerConfig` with safe defaults and a unique snapshot
/// directory under the system temp dir.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        snapshot_dir: std::env::temp_dir().join(format!("shotflow-test-{}", uuid::Uuid::new_v4())),
        gateway_url: "http://gateway.invalid".to_string(),
        gateway_api_key: String::new(),
        batch_delay_ms: 0,
    }
}

/// Build the full application router backed by the given gateway stub.
pub fn build_test_app(stub: Arc<StubGateway>) -> Router {
    let config = Arc::new(test_config());
    let state = AppState::build(
        Arc::clone(&config),
        stub.clone(),
        stub.clone(),
        stub.clone(),
        stub,
        Arc::new(NoopCredentialHandler),
    );
    build_app_router(state, &config)
}

/// Build the app with a default (always succeeding) gateway stub.
pub fn test_app() -> Router {
    build_test_app(Arc::new(StubGateway::default()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_bytes(app: Router, uri: &str, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/octet-stream")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status and return the decoded body in one step.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Project fixtures
// ---------------------------------------------------------------------------

/// Standard two-shot project creation body.
pub fn project_body() -> serde_json::Value {
    serde_json::json!({
        "title": "Harbor",
        "language": "en",
        "visual_style": "cinematic",
        "script": {
            "characters": [{
                "id": "ch-1",
                "name": "Mara",
                "gender": "female",
                "age": "34",
                "personality": "guarded",
                "reference_image": "img://mara-base",
                "variations": []
            }],
            "scenes": [{
                "id": "sc-1",
                "location": "harbor pier",
                "time_of_day": "dusk",
                "atmosphere": "rain",
                "reference_image": "img://scene-pier"
            }],
            "target_duration_secs": 60.0,
            "language": "en",
            "visual_style": "cinematic"
        },
        "shots": [
            {
                "id": "shot-1",
                "scene_id": "sc-1",
                "action_summary": "A door opens onto the pier",
                "camera_movement": "pan left",
                "character_ids": ["ch-1"]
            },
            {
                "id": "shot-2",
                "scene_id": "sc-1",
                "action_summary": "She steps out",
                "camera_movement": "static"
            }
        ]
    })
}

/// Create the standard project and return its id.
pub async fn create_project(app: &Router) -> String {
    let response = post_json(app.clone(), "/api/v1/projects", project_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Image fixtures
// ---------------------------------------------------------------------------

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A 90x90 composite with nine distinguishable cells.
pub fn composite_png() -> Vec<u8> {
    let mut img = image::RgbImage::new(90, 90);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let cell = (y / 30) * 3 + (x / 30);
        *pixel = image::Rgb([cell as u8 * 20, 0, 0]);
    }
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

// ---------------------------------------------------------------------------
// StubGateway
// ---------------------------------------------------------------------------

/// In-process stand-in for the generation gateway.
///
/// Succeeds by default; failures can be queued per operation.
#[derive(Default)]
pub struct StubGateway {
    image_failures: Mutex<VecDeque<GenError>>,
    video_failures: Mutex<VecDeque<GenError>>,
    planner_panel_counts: Mutex<VecDeque<usize>>,
    image_counter: AtomicU32,
}

impl StubGateway {
    pub fn fail_next_image(&self, err: GenError) {
        self.image_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_next_video(&self, err: GenError) {
        self.video_failures.lock().unwrap().push_back(err);
    }

    /// Make the next planning call return `count` panels.
    pub fn plan_panel_count(&self, count: usize) {
        self.planner_panel_counts.lock().unwrap().push_back(count);
    }
}

#[async_trait]
impl ImageGenerator for StubGateway {
    async fn generate_image(&self, _request: &ImageRequest) -> Result<ImageRef, GenError> {
        if let Some(err) = self.image_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let n = self.image_counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("img://stub-{n}"))
    }
}

#[async_trait]
impl VideoGenerator for StubGateway {
    async fn generate_video(&self, _request: &VideoRequest) -> Result<String, GenError> {
        if let Some(err) = self.video_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok("vid://stub".to_string())
    }
}

#[async_trait]
impl PanelPlanner for StubGateway {
    async fn plan_panels(&self, _request: &PanelPlanRequest) -> Result<Vec<PlannedPanel>, GenError> {
        let count = self
            .planner_panel_counts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(9);
        Ok((0..count)
            .map(|i| PlannedPanel {
                index: i as u8,
                shot_size: "medium".to_string(),
                camera_angle: "eye level".to_string(),
                description: format!("panel {i}"),
            })
            .collect())
    }
}

#[async_trait]
impl ImageFetcher for StubGateway {
    async fn fetch_image(&self, _image: &ImageRef) -> Result<Vec<u8>, GenError> {
        Ok(composite_png())
    }
}
