use std::sync::Arc;

use shotflow_events::ProgressBus;
use shotflow_gen::{ImageFetcher, ImageGenerator, PanelPlanner, VideoGenerator};
use shotflow_pipeline::batch::BatchOrchestrator;
use shotflow_pipeline::credentials::CredentialHandler;
use shotflow_pipeline::keyframes::KeyframeService;
use shotflow_pipeline::ninegrid::NineGridService;
use shotflow_pipeline::pacer::{FixedInterval, Pacer};
use shotflow_pipeline::video::VideoService;
use shotflow_store::ProjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable (everything is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<ProjectStore>,
    pub keyframes: Arc<KeyframeService>,
    pub video: Arc<VideoService>,
    pub batch: Arc<BatchOrchestrator>,
    pub ninegrid: Arc<NineGridService>,
    pub bus: Arc<ProgressBus>,
}

impl AppState {
    /// Wire the full service graph over a fresh store.
    ///
    /// The generation clients and credential handler are injected so the
    /// binary can pass the gateway client while tests pass stubs.
    pub fn build(
        config: Arc<ServerConfig>,
        images: Arc<dyn ImageGenerator>,
        videos: Arc<dyn VideoGenerator>,
        planner: Arc<dyn PanelPlanner>,
        fetcher: Arc<dyn ImageFetcher>,
        credentials: Arc<dyn CredentialHandler>,
    ) -> Self {
        let store = Arc::new(ProjectStore::new());
        let bus = Arc::new(ProgressBus::default());

        let keyframes = Arc::new(KeyframeService::new(
            Arc::clone(&store),
            Arc::clone(&images),
            Arc::clone(&credentials),
            Arc::clone(&bus),
        ));
        let video = Arc::new(VideoService::new(
            Arc::clone(&store),
            videos,
            Arc::clone(&credentials),
            Arc::clone(&bus),
        ));
        let pacer: Arc<dyn Pacer> = Arc::new(FixedInterval::new(config.batch_delay()));
        let batch = Arc::new(BatchOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&keyframes),
            pacer,
            Arc::clone(&bus),
        ));
        let ninegrid = Arc::new(NineGridService::new(
            Arc::clone(&store),
            planner,
            images,
            fetcher,
            Arc::clone(&keyframes),
            credentials,
            Arc::clone(&bus),
        ));

        Self {
            config,
            store,
            keyframes,
            video,
            batch,
            ninegrid,
            bus,
        }
    }
}
