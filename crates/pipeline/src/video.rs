//! Video interval lifecycle: absent -> pending -> generating ->
//! completed/failed, regenerate re-enters generating.
//!
//! Generation requires the shot's start keyframe to be completed. The
//! end keyframe is optional: its presence on this shot alone selects
//! dual-image transition mode; absence selects single-image animation.
//! Mode is never inferred from any other shot's data.

use std::sync::Arc;

use shotflow_core::camera::FrameRole;
use shotflow_core::error::CoreError;
use shotflow_core::prompt;
use shotflow_core::status::GenStatus;
use shotflow_core::types::ProjectId;
use shotflow_events::bus::{ProgressBus, ProgressEvent};
use shotflow_events::{RenderEvent, RenderKind};
use shotflow_gen::{GenError, VideoGenerator, VideoRequest};
use shotflow_store::models::Interval;
use shotflow_store::ProjectStore;

use crate::credentials::{self, CredentialHandler};
use crate::error::{PipelineError, PipelineResult};

/// Drives one shot's video generation.
pub struct VideoService {
    store: Arc<ProjectStore>,
    videos: Arc<dyn VideoGenerator>,
    credentials: Arc<dyn CredentialHandler>,
    bus: Arc<ProgressBus>,
}

impl VideoService {
    pub fn new(
        store: Arc<ProjectStore>,
        videos: Arc<dyn VideoGenerator>,
        credentials: Arc<dyn CredentialHandler>,
        bus: Arc<ProgressBus>,
    ) -> Self {
        Self {
            store,
            videos,
            credentials,
            bus,
        }
    }

    /// Generate (or regenerate) the shot's video clip.
    pub async fn generate(&self, project_id: ProjectId, shot_id: &str) -> PipelineResult<Interval> {
        let project = self.store.get(project_id).await?;
        let shot = self.store.get_shot(project_id, shot_id).await?;

        // Precondition: completed start keyframe. Rejected without any
        // state change.
        let Some(start_image) = shot
            .frame(FrameRole::Start)
            .filter(|f| f.is_completed())
            .and_then(|f| f.image_url.clone())
        else {
            return Err(CoreError::Validation(
                "The start keyframe must be completed before video generation".to_string(),
            )
            .into());
        };
        let start_frame_id = shot
            .frame(FrameRole::Start)
            .map(|f| f.id.clone())
            .unwrap_or_default();

        let end_frame = shot.frame(FrameRole::End).filter(|f| f.is_completed());
        let end_image = end_frame.and_then(|f| f.image_url.clone());
        let end_frame_id = end_frame.map(|f| f.id.clone());

        let video_prompt = prompt::build_video_prompt(
            &shot.action_summary,
            &shot.camera_movement,
            shot.video_model,
            &project.language,
        );

        // Commit Generating before the network call; capture the clip
        // settings the request should carry.
        let (duration_secs, motion_strength) = self
            .store
            .update_shot(project_id, shot_id, |shot| match &mut shot.interval {
                Some(interval) => {
                    interval.status = GenStatus::Generating;
                    interval.video_prompt = video_prompt.clone();
                    interval.start_frame_id = start_frame_id.clone();
                    interval.end_frame_id = end_frame_id.clone();
                    interval.video_url = None;
                    (interval.duration_secs, interval.motion_strength)
                }
                None => {
                    let mut interval = Interval::new_pending(
                        &shot.id,
                        start_frame_id.clone(),
                        end_frame_id.clone(),
                        video_prompt.clone(),
                    );
                    interval.status = GenStatus::Generating;
                    let settings = (interval.duration_secs, interval.motion_strength);
                    shot.interval = Some(interval);
                    settings
                }
            })
            .await?;

        let request = VideoRequest {
            prompt: video_prompt,
            start_image,
            end_image,
            model: shot.video_model,
            duration_secs,
            motion_strength,
        };
        tracing::info!(
            project_id = %project_id,
            shot_id,
            mode = ?request.mode(),
            model = shot.video_model.id(),
            "Video generation started",
        );

        match self.videos.generate_video(&request).await {
            Ok(video_url) => {
                let interval = self
                    .store
                    .update_shot(project_id, shot_id, |shot| {
                        shot.interval.as_mut().map(|interval| {
                            interval.status = GenStatus::Completed;
                            interval.video_url = Some(video_url.clone());
                            interval.clone()
                        })
                    })
                    .await?
                    .ok_or_else(|| {
                        PipelineError::Core(CoreError::Internal(format!(
                            "Interval for shot {shot_id} vanished while generating"
                        )))
                    })?;

                let event = RenderEvent::succeeded(shot_id, RenderKind::Video);
                self.store.append_render_event(project_id, event.clone()).await?;
                self.bus.publish(ProgressEvent::Render { project_id, event });
                tracing::info!(project_id = %project_id, shot_id, "Video generation completed");
                Ok(interval)
            }
            Err(err) => Err(self.fail(project_id, shot_id, err).await?),
        }
    }

    async fn fail(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        err: GenError,
    ) -> PipelineResult<PipelineError> {
        let message = err.user_message();
        self.store
            .update_shot(project_id, shot_id, |shot| {
                if let Some(interval) = shot.interval.as_mut() {
                    interval.status = GenStatus::Failed;
                    interval.video_url = None;
                }
            })
            .await?;

        let event = RenderEvent::failed(shot_id, RenderKind::Video, &message);
        self.store.append_render_event(project_id, event.clone()).await?;
        self.bus.publish(ProgressEvent::Render { project_id, event });

        tracing::warn!(project_id = %project_id, shot_id, error = %err, "Video generation failed");
        Ok(credentials::escalate(err, message, self.credentials.as_ref()).await)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shotflow_core::camera::FrameRole;
    use shotflow_events::RenderOutcome;
    use shotflow_gen::TransitionMode;
    use shotflow_store::models::Keyframe;

    use crate::testsupport::TestHarness;

    async fn complete_start_frame(harness: &TestHarness, shot_id: &str) {
        harness
            .store
            .update_shot(harness.project_id, shot_id, |shot| {
                shot.set_frame(
                    FrameRole::Start,
                    Keyframe::new_completed(shot_id, FrameRole::Start, "base", "img://start"),
                );
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejects_generation_without_completed_start_frame() {
        let harness = TestHarness::new().await;

        let err = harness
            .video()
            .generate(harness.project_id, "shot-1")
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Core(CoreError::Validation(_)));

        // No state change: the interval was never created.
        let shot = harness.store.get_shot(harness.project_id, "shot-1").await.unwrap();
        assert!(shot.interval.is_none());
        assert!(harness.videos.requests().is_empty());
    }

    #[tokio::test]
    async fn single_image_mode_without_end_frame() {
        let harness = TestHarness::new().await;
        complete_start_frame(&harness, "shot-1").await;

        let interval = harness
            .video()
            .generate(harness.project_id, "shot-1")
            .await
            .unwrap();

        assert_eq!(interval.status, GenStatus::Completed);
        assert_eq!(interval.video_url.as_deref(), Some("vid://auto"));
        assert!(interval.end_frame_id.is_none());

        let requests = harness.videos.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].mode(), TransitionMode::SingleImage);
    }

    #[tokio::test]
    async fn dual_image_mode_with_completed_end_frame() {
        let harness = TestHarness::new().await;
        complete_start_frame(&harness, "shot-1").await;
        harness
            .store
            .update_shot(harness.project_id, "shot-1", |shot| {
                shot.set_frame(
                    FrameRole::End,
                    Keyframe::new_completed("shot-1", FrameRole::End, "base", "img://end"),
                );
            })
            .await
            .unwrap();

        harness
            .video()
            .generate(harness.project_id, "shot-1")
            .await
            .unwrap();

        let requests = harness.videos.requests();
        assert_eq!(requests[0].mode(), TransitionMode::DualImage);
        assert_eq!(requests[0].end_image.as_deref(), Some("img://end"));
    }

    #[tokio::test]
    async fn failed_end_frame_does_not_select_dual_mode() {
        let harness = TestHarness::new().await;
        complete_start_frame(&harness, "shot-1").await;
        harness
            .store
            .update_shot(harness.project_id, "shot-1", |shot| {
                let mut frame = Keyframe::new_pending("shot-1", FrameRole::End, "base");
                frame.status = GenStatus::Failed;
                shot.set_frame(FrameRole::End, frame);
            })
            .await
            .unwrap();

        harness
            .video()
            .generate(harness.project_id, "shot-1")
            .await
            .unwrap();

        assert_eq!(harness.videos.requests()[0].mode(), TransitionMode::SingleImage);
    }

    #[tokio::test]
    async fn failure_marks_interval_failed_and_records_event() {
        let harness = TestHarness::new().await;
        complete_start_frame(&harness, "shot-1").await;
        harness.videos.push_err(GenError::Overloaded("busy".to_string()));

        let err = harness
            .video()
            .generate(harness.project_id, "shot-1")
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Generation { .. });

        let shot = harness.store.get_shot(harness.project_id, "shot-1").await.unwrap();
        let interval = shot.interval.unwrap();
        assert_eq!(interval.status, GenStatus::Failed);
        assert!(interval.video_url.is_none());

        let project = harness.store.get(harness.project_id).await.unwrap();
        assert_eq!(project.render_log.len(), 1);
        assert_eq!(project.render_log[0].outcome, RenderOutcome::Failed);
    }

    #[tokio::test]
    async fn regenerate_reenters_generating_and_replaces_clip() {
        let harness = TestHarness::new().await;
        complete_start_frame(&harness, "shot-1").await;
        let service = harness.video();

        let first = service.generate(harness.project_id, "shot-1").await.unwrap();
        let second = service.generate(harness.project_id, "shot-1").await.unwrap();

        // The interval is mutated in place, never duplicated.
        assert_eq!(first.id, second.id);
        assert_eq!(second.status, GenStatus::Completed);
    }
}
