//! Shared test doubles and store seeding for pipeline tests.
//!
//! The stubs queue per-call results; with an empty queue they succeed
//! with generated placeholder URLs. `StubImages` additionally records the
//! observed status of a watched keyframe at call time, which is how tests
//! assert that the `Generating` transition is committed before the
//! network call resolves.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shotflow_core::camera::{CameraMovement, FrameRole};
use shotflow_core::script::{Character, Scene, ScriptData, Variation};
use shotflow_core::status::GenStatus;
use shotflow_core::style::VisualStyle;
use shotflow_core::types::{ImageRef, ProjectId};
use shotflow_events::bus::ProgressBus;
use shotflow_gen::{
    GenError, ImageFetcher, ImageGenerator, ImageRequest, PanelPlanRequest, PanelPlanner,
    PlannedPanel, VideoGenerator, VideoRequest,
};
use shotflow_store::models::{Keyframe, Project, Shot};
use shotflow_store::ProjectStore;
use tokio::sync::Notify;

use crate::batch::BatchOrchestrator;
use crate::credentials::CredentialHandler;
use crate::keyframes::KeyframeService;
use crate::ninegrid::NineGridService;
use crate::pacer::Pacer;
use crate::video::VideoService;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub(crate) struct TestHarness {
    pub store: Arc<ProjectStore>,
    pub project_id: ProjectId,
    pub images: Arc<StubImages>,
    pub videos: Arc<StubVideos>,
    pub planner: Arc<StubPlanner>,
    pub fetcher: Arc<StubFetcher>,
    pub credentials: Arc<StubCredentials>,
    pub bus: Arc<ProgressBus>,
}

impl TestHarness {
    /// Seed a project with three shots: shot-1 and shot-2 untouched,
    /// shot-3 with a completed start frame.
    pub async fn new() -> Self {
        let store = Arc::new(ProjectStore::new());
        let mut project = Project::new("Harbor", "en", VisualStyle::Cinematic);
        project.script = Some(sample_script());

        let mut shot_1 = Shot::new(
            "shot-1",
            "sc-1",
            "A door opens onto the pier",
            CameraMovement::PanLeft,
        );
        shot_1.character_ids = vec!["ch-1".to_string()];

        let shot_2 = Shot::new("shot-2", "sc-1", "She steps out", CameraMovement::Static);

        let mut shot_3 = Shot::new("shot-3", "sc-1", "The fog closes in", CameraMovement::ZoomOut);
        shot_3.set_frame(
            FrameRole::Start,
            Keyframe::new_completed("shot-3", FrameRole::Start, "The fog closes in", "img://s3"),
        );

        project.shots = vec![shot_1, shot_2, shot_3];
        let project_id = project.id;
        store.insert(project).await;

        let images = Arc::new(StubImages::new(Arc::clone(&store), project_id));
        Self {
            store,
            project_id,
            images,
            videos: Arc::new(StubVideos::default()),
            planner: Arc::new(StubPlanner::default()),
            fetcher: Arc::new(StubFetcher::default()),
            credentials: Arc::new(StubCredentials::new(false)),
            bus: Arc::new(ProgressBus::default()),
        }
    }

    pub fn with_credentials_handled(mut self) -> Self {
        self.credentials = Arc::new(StubCredentials::new(true));
        self
    }

    pub fn keyframes(&self) -> KeyframeService {
        KeyframeService::new(
            Arc::clone(&self.store),
            self.images.clone() as Arc<dyn ImageGenerator>,
            self.credentials.clone() as Arc<dyn CredentialHandler>,
            Arc::clone(&self.bus),
        )
    }

    pub fn video(&self) -> VideoService {
        VideoService::new(
            Arc::clone(&self.store),
            self.videos.clone() as Arc<dyn VideoGenerator>,
            self.credentials.clone() as Arc<dyn CredentialHandler>,
            Arc::clone(&self.bus),
        )
    }

    pub fn batch(&self, pacer: Arc<dyn Pacer>) -> BatchOrchestrator {
        BatchOrchestrator::new(
            Arc::clone(&self.store),
            Arc::new(self.keyframes()),
            pacer,
            Arc::clone(&self.bus),
        )
    }

    pub fn ninegrid(&self) -> NineGridService {
        NineGridService::new(
            Arc::clone(&self.store),
            self.planner.clone() as Arc<dyn PanelPlanner>,
            self.images.clone() as Arc<dyn ImageGenerator>,
            self.fetcher.clone() as Arc<dyn ImageFetcher>,
            Arc::new(self.keyframes()),
            self.credentials.clone() as Arc<dyn CredentialHandler>,
            Arc::clone(&self.bus),
        )
    }
}

fn sample_script() -> ScriptData {
    ScriptData {
        characters: vec![Character {
            id: "ch-1".to_string(),
            name: "Mara".to_string(),
            gender: "female".to_string(),
            age: "34".to_string(),
            personality: "guarded".to_string(),
            reference_image: Some("img://mara-base".to_string()),
            variations: vec![Variation {
                id: "var-1".to_string(),
                name: "storm coat".to_string(),
                reference_image: Some("img://mara-coat".to_string()),
            }],
        }],
        scenes: vec![Scene {
            id: "sc-1".to_string(),
            location: "harbor pier".to_string(),
            time_of_day: "dusk".to_string(),
            atmosphere: "rain".to_string(),
            reference_image: Some("img://scene-pier".to_string()),
        }],
        target_duration_secs: Some(60.0),
        language: "en".to_string(),
        visual_style: "cinematic".to_string(),
        art_direction: None,
    }
}

// ---------------------------------------------------------------------------
// Image fixtures
// ---------------------------------------------------------------------------

/// A small valid PNG.
pub(crate) fn png_bytes() -> Vec<u8> {
    use std::io::Cursor;
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A 90x90 composite whose nine 30x30 cells carry distinct red levels.
pub(crate) fn composite_png() -> Vec<u8> {
    use std::io::Cursor;
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
// StubImages
// ---------------------------------------------------------------------------

pub(crate) struct StubImages {
    store: Arc<ProjectStore>,
    project_id: ProjectId,
    watched: Mutex<(String, FrameRole)>,
    results: Mutex<VecDeque<Result<ImageRef, GenError>>>,
    requests: Mutex<Vec<ImageRequest>>,
    observed: Mutex<Vec<GenStatus>>,
    auto_counter: AtomicU32,
    block_next: AtomicBool,
    is_blocked: AtomicBool,
    blocked: Notify,
    release: Notify,
}

impl StubImages {
    fn new(store: Arc<ProjectStore>, project_id: ProjectId) -> Self {
        Self {
            store,
            project_id,
            watched: Mutex::new(("shot-1".to_string(), FrameRole::Start)),
            results: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            observed: Mutex::new(Vec::new()),
            auto_counter: AtomicU32::new(0),
            block_next: AtomicBool::new(false),
            is_blocked: AtomicBool::new(false),
            blocked: Notify::new(),
            release: Notify::new(),
        }
    }

    pub fn push_ok(&self, image_url: &str) {
        self.results
            .lock()
            .unwrap()
            .push_back(Ok(image_url.to_string()));
    }

    pub fn push_err(&self, err: GenError) {
        self.results.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn observed_statuses(&self) -> Vec<GenStatus> {
        self.observed.lock().unwrap().clone()
    }

    /// Block the next call until [`unblock`](Self::unblock).
    pub fn block_next(&self) {
        self.block_next.store(true, Ordering::SeqCst);
    }

    pub async fn wait_until_blocked(&self) {
        while !self.is_blocked.load(Ordering::SeqCst) {
            let notified = self.blocked.notified();
            if self.is_blocked.load(Ordering::SeqCst) {
                break;
            }
            notified.await;
        }
    }

    pub fn unblock(&self) {
        self.release.notify_waiters();
    }
}

#[async_trait]
impl ImageGenerator for StubImages {
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageRef, GenError> {
        self.requests.lock().unwrap().push(request.clone());

        // Record the watched keyframe's status as seen mid-call.
        let (shot_id, role) = self.watched.lock().unwrap().clone();
        if let Ok(shot) = self.store.get_shot(self.project_id, &shot_id).await {
            if let Some(frame) = shot.frame(role) {
                self.observed.lock().unwrap().push(frame.status);
            }
        }

        if self.block_next.swap(false, Ordering::SeqCst) {
            self.is_blocked.store(true, Ordering::SeqCst);
            self.blocked.notify_waiters();
            self.release.notified().await;
            self.is_blocked.store(false, Ordering::SeqCst);
        }

        match self.results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => {
                let n = self.auto_counter.fetch_add(1, Ordering::SeqCst);
                Ok(format!("img://auto-{n}"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// StubVideos
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct StubVideos {
    results: Mutex<VecDeque<Result<String, GenError>>>,
    requests: Mutex<Vec<VideoRequest>>,
}

impl StubVideos {
    pub fn push_err(&self, err: GenError) {
        self.results.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<VideoRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoGenerator for StubVideos {
    async fn generate_video(&self, request: &VideoRequest) -> Result<String, GenError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok("vid://auto".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// StubPlanner
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct StubPlanner {
    results: Mutex<VecDeque<Result<Vec<PlannedPanel>, GenError>>>,
    requests: Mutex<Vec<PanelPlanRequest>>,
}

impl StubPlanner {
    pub fn push_panels(&self, count: usize) {
        let panels = (0..count)
            .map(|i| PlannedPanel {
                index: i as u8,
                shot_size: "medium".to_string(),
                camera_angle: "eye level".to_string(),
                description: format!("panel {i}"),
            })
            .collect();
        self.results.lock().unwrap().push_back(Ok(panels));
    }

    pub fn push_err(&self, err: GenError) {
        self.results.lock().unwrap().push_back(Err(err));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PanelPlanner for StubPlanner {
    async fn plan_panels(&self, request: &PanelPlanRequest) -> Result<Vec<PlannedPanel>, GenError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => {
                let panels = (0..9)
                    .map(|i| PlannedPanel {
                        index: i as u8,
                        shot_size: "medium".to_string(),
                        camera_angle: "eye level".to_string(),
                        description: format!("panel {i}"),
                    })
                    .collect();
                Ok(panels)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// StubFetcher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct StubFetcher {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl StubFetcher {
    pub fn serve(&self, bytes: Vec<u8>) {
        *self.bytes.lock().unwrap() = Some(bytes);
    }
}

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch_image(&self, image: &ImageRef) -> Result<Vec<u8>, GenError> {
        self.bytes
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| GenError::Transport(format!("no fixture for {image}")))
    }
}

// ---------------------------------------------------------------------------
// StubCredentials
// ---------------------------------------------------------------------------

pub(crate) struct StubCredentials {
    handled: bool,
    seen: Mutex<Vec<String>>,
}

impl StubCredentials {
    pub fn new(handled: bool) -> Self {
        Self {
            handled,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CredentialHandler for StubCredentials {
    async fn handle_unauthorized(&self, detail: &str) -> bool {
        self.seen.lock().unwrap().push(detail.to_string());
        self.handled
    }
}

// ---------------------------------------------------------------------------
// NoopPacer
// ---------------------------------------------------------------------------

/// Pacer that never pauses (keeps batch tests fast).
pub(crate) struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self, _completed_calls: usize) {}
}
