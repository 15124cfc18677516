//! Route definitions for per-shot operations.
//!
//! Mounted at `/projects/{project_id}/shots`.
//!
//! ```text
//! POST   /{shot_id}/keyframes/{role}/generate    generate_keyframe
//! POST   /{shot_id}/keyframes/{role}/upload      upload_keyframe
//! PATCH  /{shot_id}/keyframes/{role}/prompt      edit_prompt
//! POST   /{shot_id}/video/generate               generate_video
//! POST   /{shot_id}/copy-previous-end            copy_previous_end
//! POST   /{shot_id}/ninegrid/plan                plan_panels
//! POST   /{shot_id}/ninegrid/render              render_grid
//! POST   /{shot_id}/ninegrid/select              select_panel
//! POST   /{shot_id}/ninegrid/use-whole           use_whole_image
//! POST   /{shot_id}/ninegrid/regenerate          regenerate_grid
//! ```

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::{continuity, keyframes, ninegrid, video};
use crate::state::AppState;

/// Shot routes -- mounted at `/projects/{project_id}/shots`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{shot_id}/keyframes/{role}/generate",
            post(keyframes::generate_keyframe),
        )
        .route(
            "/{shot_id}/keyframes/{role}/upload",
            post(keyframes::upload_keyframe),
        )
        .route(
            "/{shot_id}/keyframes/{role}/prompt",
            patch(keyframes::edit_prompt),
        )
        .route("/{shot_id}/video/generate", post(video::generate_video))
        .route(
            "/{shot_id}/copy-previous-end",
            post(continuity::copy_previous_end),
        )
        .route("/{shot_id}/ninegrid/plan", post(ninegrid::plan_panels))
        .route("/{shot_id}/ninegrid/render", post(ninegrid::render_grid))
        .route("/{shot_id}/ninegrid/select", post(ninegrid::select_panel))
        .route("/{shot_id}/ninegrid/use-whole", post(ninegrid::use_whole_image))
        .route("/{shot_id}/ninegrid/regenerate", post(ninegrid::regenerate_grid))
}
