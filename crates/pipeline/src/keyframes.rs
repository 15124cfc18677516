//! Keyframe lifecycle: absent -> pending -> generating -> completed/failed.
//!
//! `generate` re-enters `Generating` from completed or failed frames;
//! `upload` jumps straight to `Completed`. The `Generating` transition is
//! committed before the image call is awaited so it is visible to
//! readers while the call is in flight. Base narrative text is recovered
//! from an existing frame's prompt before re-layering, keeping prompt
//! assembly idempotent across regenerations.

use std::sync::Arc;

use shotflow_core::camera::FrameRole;
use shotflow_core::error::CoreError;
use shotflow_core::prompt;
use shotflow_core::refs;
use shotflow_core::status::GenStatus;
use shotflow_core::types::{ImageRef, ProjectId};
use shotflow_events::bus::{ProgressBus, ProgressEvent};
use shotflow_events::{RenderEvent, RenderKind};
use shotflow_gen::imageops;
use shotflow_gen::{GenError, ImageGenerator, ImageRequest};
use shotflow_store::models::Keyframe;
use shotflow_store::ProjectStore;

use crate::credentials::CredentialHandler;
use crate::error::{PipelineError, PipelineResult};
use crate::inflight::InflightGuard;

/// Drives keyframe generation, manual upload, and prompt editing.
pub struct KeyframeService {
    store: Arc<ProjectStore>,
    images: Arc<dyn ImageGenerator>,
    credentials: Arc<dyn CredentialHandler>,
    bus: Arc<ProgressBus>,
    inflight: InflightGuard,
}

impl KeyframeService {
    pub fn new(
        store: Arc<ProjectStore>,
        images: Arc<dyn ImageGenerator>,
        credentials: Arc<dyn CredentialHandler>,
        bus: Arc<ProgressBus>,
    ) -> Self {
        Self {
            store,
            images,
            credentials,
            bus,
            inflight: InflightGuard::new(),
        }
    }

    /// Generate (or regenerate) the keyframe filling `role`.
    ///
    /// Refuses a second call for the same (shot, role) while one is in
    /// flight. On service failure the frame is left `Failed`, a render
    /// event is recorded, and the classified error is returned.
    pub async fn generate(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        role: FrameRole,
    ) -> PipelineResult<Keyframe> {
        let _inflight = self.inflight.acquire(project_id, shot_id, role)?;

        let project = self.store.get(project_id).await?;
        let shot = self.store.get_shot(project_id, shot_id).await?;

        // Recover the base narrative rather than re-layering an already
        // assembled prompt.
        let base = match shot.frame(role) {
            Some(frame) => prompt::extract_base_prompt(&frame.visual_prompt).to_string(),
            None => shot.action_summary.clone(),
        };
        let art_direction = project.script.as_ref().and_then(|s| s.art_direction.as_ref());
        let visual_prompt = prompt::build_keyframe_prompt(
            &base,
            art_direction,
            &project.visual_style,
            &shot.camera_movement,
            role,
        );
        let references = refs::resolve_references(
            project.script.as_ref(),
            &shot.scene_id,
            &shot.character_ids,
            &shot.variation_selections,
        );

        // Commit the Generating transition before the network call so it
        // is visible while the call is in flight.
        self.store
            .update_shot(project_id, shot_id, |shot| match shot.frame_mut(role) {
                Some(frame) => {
                    frame.visual_prompt = visual_prompt.clone();
                    frame.status = GenStatus::Generating;
                    frame.image_url = None;
                }
                None => {
                    let mut frame = Keyframe::new_pending(&shot.id, role, visual_prompt.clone());
                    frame.status = GenStatus::Generating;
                    shot.set_frame(role, frame);
                }
            })
            .await?;

        tracing::info!(
            project_id = %project_id,
            shot_id,
            role = %role,
            reference_count = references.len(),
            "Keyframe generation started",
        );

        let request = ImageRequest::new(visual_prompt, references);
        match self.images.generate_image(&request).await {
            Ok(image_url) => self.complete(project_id, shot_id, role, image_url).await,
            Err(err) => Err(self.fail(project_id, shot_id, role, err).await?),
        }
    }

    /// Manually upload a keyframe image, bypassing generation.
    ///
    /// Non-image payloads are rejected with a validation error and no
    /// state change.
    pub async fn upload(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        role: FrameRole,
        bytes: &[u8],
    ) -> PipelineResult<Keyframe> {
        if !imageops::is_supported_image(bytes) {
            return Err(CoreError::Validation(
                "Uploaded content is not a supported image (png, jpeg, or webp)".to_string(),
            )
            .into());
        }
        let image_url = imageops::data_uri(bytes).map_err(|e| PipelineError::Generation {
            message: e.user_message(),
        })?;
        tracing::info!(project_id = %project_id, shot_id, role = %role, "Keyframe image uploaded");
        self.adopt_image(project_id, shot_id, role, image_url).await
    }

    /// Install an already-available image as the completed keyframe,
    /// keeping an existing prompt (or the shot's action summary if the
    /// frame never existed).
    pub async fn adopt_image(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        role: FrameRole,
        image_url: ImageRef,
    ) -> PipelineResult<Keyframe> {
        let frame = self
            .store
            .update_shot(project_id, shot_id, |shot| match shot.frame_mut(role) {
                Some(frame) => {
                    frame.status = GenStatus::Completed;
                    frame.image_url = Some(image_url.clone());
                    frame.clone()
                }
                None => {
                    let frame = Keyframe::new_completed(
                        &shot.id,
                        role,
                        shot.action_summary.clone(),
                        image_url.clone(),
                    );
                    shot.set_frame(role, frame.clone());
                    frame
                }
            })
            .await?;
        Ok(frame)
    }

    /// Edit a keyframe's prompt. Pure data mutation: no status change,
    /// no network call.
    pub async fn edit_prompt(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        role: FrameRole,
        new_text: String,
    ) -> PipelineResult<Keyframe> {
        self.store
            .update_shot(project_id, shot_id, |shot| {
                shot.frame_mut(role).map(|frame| {
                    frame.visual_prompt = new_text.clone();
                    frame.clone()
                })
            })
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Keyframe",
                    id: format!("{shot_id}/{role}"),
                }
                .into()
            })
    }

    // ---- private helpers ----

    async fn complete(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        role: FrameRole,
        image_url: ImageRef,
    ) -> PipelineResult<Keyframe> {
        let frame = self
            .store
            .update_shot(project_id, shot_id, |shot| {
                shot.frame_mut(role).map(|frame| {
                    frame.status = GenStatus::Completed;
                    frame.image_url = Some(image_url.clone());
                    frame.clone()
                })
            })
            .await?
            .ok_or_else(|| {
                PipelineError::Core(CoreError::Internal(format!(
                    "Keyframe for shot {shot_id} vanished while generating"
                )))
            })?;

        let event = RenderEvent::succeeded(shot_id, render_kind(role));
        self.store.append_render_event(project_id, event.clone()).await?;
        self.bus.publish(ProgressEvent::Render { project_id, event });

        tracing::info!(project_id = %project_id, shot_id, role = %role, "Keyframe generation completed");
        Ok(frame)
    }

    /// Transition the frame to `Failed`, record the attempt, and classify
    /// the error for the caller.
    async fn fail(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        role: FrameRole,
        err: GenError,
    ) -> PipelineResult<PipelineError> {
        let message = err.user_message();
        self.store
            .update_shot(project_id, shot_id, |shot| {
                if let Some(frame) = shot.frame_mut(role) {
                    frame.status = GenStatus::Failed;
                    frame.image_url = None;
                }
            })
            .await?;

        let event = RenderEvent::failed(shot_id, render_kind(role), &message);
        self.store.append_render_event(project_id, event.clone()).await?;
        self.bus.publish(ProgressEvent::Render { project_id, event });

        tracing::warn!(
            project_id = %project_id,
            shot_id,
            role = %role,
            error = %err,
            "Keyframe generation failed",
        );

        Ok(crate::credentials::escalate(err, message, self.credentials.as_ref()).await)
    }
}

/// Render-log kind for a frame role.
fn render_kind(role: FrameRole) -> RenderKind {
    match role {
        FrameRole::Start => RenderKind::StartFrame,
        FrameRole::End => RenderKind::EndFrame,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
