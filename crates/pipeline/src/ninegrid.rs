//! Nine-grid decomposition: plan nine camera-angle panels, render them
//! as one 3x3 composite, then adopt a panel (or the whole image) as the
//! shot's start keyframe.
//!
//! Phase 1 (`plan_panels`) must yield exactly nine panels or the
//! decomposition fails without issuing the render call. Phase 2
//! (`render_grid`) makes the single composite image call. Selection
//! crops the chosen cell and feeds it through the keyframe upload path.

use std::sync::Arc;

use shotflow_core::camera::FrameRole;
use shotflow_core::error::CoreError;
use shotflow_core::ninegrid as grid;
use shotflow_core::refs;
use shotflow_core::status::GenStatus;
use shotflow_core::types::ProjectId;
use shotflow_events::bus::{ProgressBus, ProgressEvent};
use shotflow_events::{RenderEvent, RenderKind};
use shotflow_gen::imageops;
use shotflow_gen::{
    GenError, ImageFetcher, ImageGenerator, ImageRequest, PanelPlanRequest, PanelPlanner,
};
use shotflow_store::models::{GridPanel, Keyframe, NineGridData};
use shotflow_store::ProjectStore;

use crate::credentials::{self, CredentialHandler};
use crate::error::{PipelineError, PipelineResult};
use crate::keyframes::KeyframeService;

/// Drives the two-phase nine-grid decomposition and panel adoption.
pub struct NineGridService {
    store: Arc<ProjectStore>,
    planner: Arc<dyn PanelPlanner>,
    images: Arc<dyn ImageGenerator>,
    fetcher: Arc<dyn ImageFetcher>,
    keyframes: Arc<KeyframeService>,
    credentials: Arc<dyn CredentialHandler>,
    bus: Arc<ProgressBus>,
}

impl NineGridService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<ProjectStore>,
        planner: Arc<dyn PanelPlanner>,
        images: Arc<dyn ImageGenerator>,
        fetcher: Arc<dyn ImageFetcher>,
        keyframes: Arc<KeyframeService>,
        credentials: Arc<dyn CredentialHandler>,
        bus: Arc<ProgressBus>,
    ) -> Self {
        Self {
            store,
            planner,
            images,
            fetcher,
            keyframes,
            credentials,
            bus,
        }
    }

    /// Phase 1: plan the nine panels via a structured-output text call.
    ///
    /// A response with the wrong panel count (or no parseable panels at
    /// all) fails the decomposition; the render call is never issued.
    pub async fn plan_panels(
        &self,
        project_id: ProjectId,
        shot_id: &str,
    ) -> PipelineResult<NineGridData> {
        let project = self.store.get(project_id).await?;
        let shot = self.store.get_shot(project_id, shot_id).await?;

        let scene_context = project
            .script
            .as_ref()
            .and_then(|s| s.scene(&shot.scene_id))
            .map(|scene| format!("{}, {}, {}", scene.location, scene.time_of_day, scene.atmosphere))
            .unwrap_or_else(|| "unspecified scene".to_string());
        let request = PanelPlanRequest {
            action_summary: shot.action_summary.clone(),
            scene_context,
            style_phrase: project.visual_style.phrase().to_string(),
        };

        // Create or reset the decomposition and enter Generating.
        self.store
            .update_shot(project_id, shot_id, |shot| {
                let grid_data = shot
                    .nine_grid
                    .get_or_insert_with(|| NineGridData::new_pending(&shot.id));
                grid_data.status = GenStatus::Generating;
                grid_data.panels.clear();
                grid_data.image_url = None;
            })
            .await?;

        tracing::info!(project_id = %project_id, shot_id, "Nine-grid planning started");

        let panels = match self.planner.plan_panels(&request).await {
            Ok(panels) => panels,
            Err(err) => return Err(self.fail(project_id, shot_id, RenderKind::NineGridPlan, err).await?),
        };

        if let Err(err) = grid::validate_panel_count(panels.len()) {
            let message = err.to_string();
            self.mark_failed(project_id, shot_id).await?;
            let event = RenderEvent::failed(shot_id, RenderKind::NineGridPlan, &message);
            self.store.append_render_event(project_id, event.clone()).await?;
            self.bus.publish(ProgressEvent::Render { project_id, event });
            tracing::warn!(project_id = %project_id, shot_id, %message, "Nine-grid plan rejected");
            return Err(PipelineError::Generation { message });
        }

        let grid_data = self
            .store
            .update_shot(project_id, shot_id, |shot| {
                shot.nine_grid.as_mut().map(|grid_data| {
                    // Positions are authoritative: the composite is
                    // rendered row-major in response order.
                    grid_data.panels = panels
                        .iter()
                        .enumerate()
                        .map(|(i, p)| GridPanel {
                            index: i as u8,
                            shot_size: p.shot_size.clone(),
                            camera_angle: p.camera_angle.clone(),
                            description: p.description.clone(),
                        })
                        .collect();
                    grid_data.clone()
                })
            })
            .await?
            .ok_or_else(|| {
                PipelineError::Core(CoreError::Internal(format!(
                    "Nine-grid for shot {shot_id} vanished while planning"
                )))
            })?;

        let event = RenderEvent::succeeded(shot_id, RenderKind::NineGridPlan);
        self.store.append_render_event(project_id, event.clone()).await?;
        self.bus.publish(ProgressEvent::Render { project_id, event });
        tracing::info!(project_id = %project_id, shot_id, "Nine-grid planning completed");
        Ok(grid_data)
    }

    /// Phase 2: render the planned panels as one 3x3 composite image.
    pub async fn render_grid(
        &self,
        project_id: ProjectId,
        shot_id: &str,
    ) -> PipelineResult<NineGridData> {
        let project = self.store.get(project_id).await?;
        let shot = self.store.get_shot(project_id, shot_id).await?;

        let panels = shot
            .nine_grid
            .as_ref()
            .map(|g| g.panels.clone())
            .unwrap_or_default();
        if grid::validate_panel_count(panels.len()).is_err() {
            return Err(CoreError::Validation(
                "Plan the nine panels before rendering the grid".to_string(),
            )
            .into());
        }

        let prompt = build_grid_prompt(&panels, project.visual_style.phrase());
        let references = refs::resolve_references(
            project.script.as_ref(),
            &shot.scene_id,
            &shot.character_ids,
            &shot.variation_selections,
        );

        self.store
            .update_shot(project_id, shot_id, |shot| {
                if let Some(grid_data) = shot.nine_grid.as_mut() {
                    grid_data.status = GenStatus::Generating;
                    grid_data.image_url = None;
                }
            })
            .await?;

        tracing::info!(project_id = %project_id, shot_id, "Nine-grid render started");

        let request = ImageRequest::new(prompt, references);
        match self.images.generate_image(&request).await {
            Ok(image_url) => {
                let grid_data = self
                    .store
                    .update_shot(project_id, shot_id, |shot| {
                        shot.nine_grid.as_mut().map(|grid_data| {
                            grid_data.status = GenStatus::Completed;
                            grid_data.image_url = Some(image_url.clone());
                            grid_data.clone()
                        })
                    })
                    .await?
                    .ok_or_else(|| {
                        PipelineError::Core(CoreError::Internal(format!(
                            "Nine-grid for shot {shot_id} vanished while rendering"
                        )))
                    })?;

                let event = RenderEvent::succeeded(shot_id, RenderKind::NineGridImage);
                self.store.append_render_event(project_id, event.clone()).await?;
                self.bus.publish(ProgressEvent::Render { project_id, event });
                tracing::info!(project_id = %project_id, shot_id, "Nine-grid render completed");
                Ok(grid_data)
            }
            Err(err) => {
                Err(self.fail(project_id, shot_id, RenderKind::NineGridImage, err).await?)
            }
        }
    }

    /// Crop the selected panel out of the composite and adopt it as the
    /// shot's start keyframe via the upload path.
    pub async fn select_panel(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        panel_index: usize,
    ) -> PipelineResult<Keyframe> {
        grid::validate_panel_index(panel_index).map_err(PipelineError::Core)?;
        let image_url = self.completed_composite(project_id, shot_id).await?;

        let composite = self
            .fetcher
            .fetch_image(&image_url)
            .await
            .map_err(|e| PipelineError::Generation {
                message: e.user_message(),
            })?;
        let panel = imageops::crop_panel(&composite, panel_index).map_err(|e| {
            PipelineError::Generation {
                message: e.user_message(),
            }
        })?;

        tracing::info!(project_id = %project_id, shot_id, panel_index, "Nine-grid panel selected");
        self.keyframes
            .upload(project_id, shot_id, FrameRole::Start, &panel)
            .await
    }

    /// Adopt the whole composite as the shot's start keyframe.
    pub async fn use_whole_image(
        &self,
        project_id: ProjectId,
        shot_id: &str,
    ) -> PipelineResult<Keyframe> {
        let image_url = self.completed_composite(project_id, shot_id).await?;
        tracing::info!(project_id = %project_id, shot_id, "Nine-grid whole image adopted");
        self.keyframes
            .adopt_image(project_id, shot_id, FrameRole::Start, image_url)
            .await
    }

    /// Discard the current decomposition and restart planning.
    pub async fn regenerate(
        &self,
        project_id: ProjectId,
        shot_id: &str,
    ) -> PipelineResult<NineGridData> {
        self.store
            .update_shot(project_id, shot_id, |shot| shot.nine_grid = None)
            .await?;
        self.plan_panels(project_id, shot_id).await
    }

    // ---- private helpers ----

    async fn completed_composite(
        &self,
        project_id: ProjectId,
        shot_id: &str,
    ) -> PipelineResult<String> {
        let shot = self.store.get_shot(project_id, shot_id).await?;
        shot.nine_grid
            .as_ref()
            .filter(|g| g.status.is_completed())
            .and_then(|g| g.image_url.clone())
            .ok_or_else(|| {
                CoreError::Validation(
                    "The nine-grid image has not been rendered yet".to_string(),
                )
                .into()
            })
    }

    async fn mark_failed(&self, project_id: ProjectId, shot_id: &str) -> PipelineResult<()> {
        self.store
            .update_shot(project_id, shot_id, |shot| {
                if let Some(grid_data) = shot.nine_grid.as_mut() {
                    grid_data.status = GenStatus::Failed;
                }
            })
            .await?;
        Ok(())
    }

    async fn fail(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        kind: RenderKind,
        err: GenError,
    ) -> PipelineResult<PipelineError> {
        let message = err.user_message();
        self.mark_failed(project_id, shot_id).await?;

        let event = RenderEvent::failed(shot_id, kind, &message);
        self.store.append_render_event(project_id, event.clone()).await?;
        self.bus.publish(ProgressEvent::Render { project_id, event });

        tracing::warn!(project_id = %project_id, shot_id, error = %err, "Nine-grid step failed");
        Ok(credentials::escalate(err, message, self.credentials.as_ref()).await)
    }
}

/// Prompt for the single composite render call.
fn build_grid_prompt(panels: &[GridPanel], style_phrase: &str) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(
        "One single image divided into an exact 3x3 grid of nine panels with thin white \
         separator lines. Panels are ordered left-to-right, then top-to-bottom:",
    );
    for panel in panels {
        prompt.push_str(&format!(
            "\nPanel {}: {} shot, {} angle. {}",
            panel.index + 1,
            panel.shot_size,
            panel.camera_angle,
            panel.description,
        ));
    }
    prompt.push_str("\n\nVisual style: ");
    prompt.push_str(style_phrase);
    prompt.push_str(
        "\n\nAll nine panels depict the same subject and setting with consistent identity, \
         wardrobe, and lighting.",
    );
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
