pub mod health;
pub mod projects;
pub mod shots;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                                    list, create
/// /projects/{id}                               get
/// /projects/{id}/progress                      status projection
/// /projects/{id}/snapshot                      save (POST), load (PUT)
/// /projects/{id}/batch-generate                batch start frames
///
/// /projects/{id}/shots/{shot_id}/keyframes/{role}/generate
/// /projects/{id}/shots/{shot_id}/keyframes/{role}/upload
/// /projects/{id}/shots/{shot_id}/keyframes/{role}/prompt
/// /projects/{id}/shots/{shot_id}/video/generate
/// /projects/{id}/shots/{shot_id}/copy-previous-end
/// /projects/{id}/shots/{shot_id}/ninegrid/{plan,render,select,use-whole,regenerate}
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest(
        "/projects",
        projects::router().nest("/{project_id}/shots", shots::router()),
    )
}
