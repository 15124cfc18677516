//! Continuity linking: copy the previous shot's completed end keyframe
//! into this shot's start keyframe.
//!
//! This is an explicit, user-invoked operation; the system never copies
//! across shots implicitly. No network call is made: both image and
//! prompt are copied as-is and the start frame is set completed.

use shotflow_core::camera::FrameRole;
use shotflow_core::error::CoreError;
use shotflow_core::status::GenStatus;
use shotflow_core::types::ProjectId;
use shotflow_store::models::Keyframe;
use shotflow_store::{ProjectStore, StoreError};

use crate::error::{PipelineError, PipelineResult};

/// Copy the previous shot's end keyframe into `shot_id`'s start keyframe.
///
/// Rejected with a validation error (no state change) when `shot_id` is
/// the first shot, or when the previous shot's end keyframe is absent or
/// not completed.
pub async fn copy_previous_end_frame(
    store: &ProjectStore,
    project_id: ProjectId,
    shot_id: &str,
) -> PipelineResult<Keyframe> {
    let frame = store
        .update(project_id, |project| -> PipelineResult<Keyframe> {
            let index = project
                .shot_index(shot_id)
                .ok_or_else(|| StoreError::ShotNotFound {
                    project_id,
                    shot_id: shot_id.to_string(),
                })?;
            if index == 0 {
                return Err(CoreError::Validation(
                    "The first shot has no previous shot to copy from".to_string(),
                )
                .into());
            }

            let previous = &project.shots[index - 1];
            let Some(end_frame) = previous
                .end_frame
                .as_ref()
                .filter(|f| f.is_completed())
            else {
                return Err(CoreError::Validation(format!(
                    "Shot {} has no completed end keyframe to copy",
                    previous.id
                ))
                .into());
            };
            let Some(image_url) = end_frame.image_url.clone() else {
                return Err(CoreError::Internal(
                    "Completed end keyframe is missing its image".to_string(),
                )
                .into());
            };
            let visual_prompt = end_frame.visual_prompt.clone();

            let shot = &mut project.shots[index];
            let frame = match shot.start_frame.as_mut() {
                Some(frame) => {
                    frame.status = GenStatus::Completed;
                    frame.image_url = Some(image_url);
                    frame.visual_prompt = visual_prompt;
                    frame.clone()
                }
                None => {
                    let frame = Keyframe::new_completed(
                        &shot.id,
                        FrameRole::Start,
                        visual_prompt,
                        image_url,
                    );
                    shot.start_frame = Some(frame.clone());
                    frame
                }
            };
            Ok(frame)
        })
        .await??;

    tracing::info!(project_id = %project_id, shot_id, "Copied previous end frame into start frame");
    Ok(frame)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
