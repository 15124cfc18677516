//! Route definitions for project-level operations.
//!
//! ```text
//! GET    /                         list_projects
//! POST   /                         create_project
//! GET    /{project_id}             get_project
//! GET    /{project_id}/progress    get_progress
//! POST   /{project_id}/snapshot    save_snapshot
//! PUT    /{project_id}/snapshot    load_snapshot
//! POST   /{project_id}/batch-generate   batch_generate
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{batch, projects};
use crate::state::AppState;

/// Project routes -- mounted at `/projects`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route("/{project_id}", get(projects::get_project))
        .route("/{project_id}/progress", get(projects::get_progress))
        .route(
            "/{project_id}/snapshot",
            post(projects::save_snapshot).put(projects::load_snapshot),
        )
        .route("/{project_id}/batch-generate", post(batch::batch_generate))
}
