//! HTTP-level integration tests for the shot production endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router;
//! the generation gateway is replaced with an in-process stub.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_project, expect_json, get, patch_json, png_bytes,
    post_bytes, post_json, StubGateway,
};
use shotflow_gen::GenError;

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_fetch_project() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["title"], "Harbor");
    assert_eq!(json["data"]["shots"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["shots"][0]["camera_movement"], "pan left");
    assert_eq!(json["data"]["render_log"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_project_rejects_empty_title() {
    let app = common::test_app();
    let mut body = common::project_body();
    body["title"] = serde_json::json!("");

    let response = post_json(app, "/api/v1/projects", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_project_returns_404() {
    let app = common::test_app();
    let response = get(
        app,
        &format!("/api/v1/projects/{}", uuid::Uuid::new_v4()),
    )
    .await;
    let json = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Keyframes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_start_keyframe_completes_with_stub_image() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/start/generate"),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["image_url"], "img://stub-0");
    assert!(json["data"]["visual_prompt"]
        .as_str()
        .unwrap()
        .contains("A door opens onto the pier"));

    // The attempt is recorded in the project's render log.
    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["render_log"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["render_log"][0]["outcome"], "succeeded");
}

#[tokio::test]
async fn generation_failure_maps_to_bad_gateway() {
    let stub = Arc::new(StubGateway::default());
    stub.fail_next_image(GenError::ContentRejected("policy".to_string()));
    let app = build_test_app(stub);
    let project_id = create_project(&app).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/start/generate"),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_GATEWAY).await;
    assert_eq!(json["code"], "GENERATION_FAILED");

    // The frame is left failed and retryable.
    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["shots"][0]["start_frame"]["status"], "failed");
}

#[tokio::test]
async fn upload_rejects_non_image_payload() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = post_bytes(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/start/upload"),
        b"definitely not an image".to_vec(),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn upload_png_completes_the_frame() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = post_bytes(
        app,
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/start/upload"),
        png_bytes(),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["image_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png"));
}

#[tokio::test]
async fn edit_prompt_on_missing_frame_returns_404() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = patch_json(
        app,
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/end/prompt"),
        serde_json::json!({ "prompt": "hand-tuned" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

#[tokio::test]
async fn video_without_start_frame_is_rejected() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/shots/shot-1/video/generate"),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn video_after_start_frame_completes() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/start/generate"),
        serde_json::json!({}),
    )
    .await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/shots/shot-1/video/generate"),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["video_url"], "vid://stub");
}

// ---------------------------------------------------------------------------
// Continuity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn copy_previous_end_requires_completed_end_frame() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/shots/shot-2/copy-previous-end"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn copy_previous_end_links_adjacent_shots() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    // Complete shot-1's end frame first.
    post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/end/generate"),
        serde_json::json!({}),
    )
    .await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-2/copy-previous-end"),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["image_url"], "img://stub-0");
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_fill_missing_reports_per_shot_outcomes() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/batch-generate"),
        serde_json::json!({ "mode": "fill_missing" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["succeeded"], 2);
    assert_eq!(json["data"]["shots"][0]["outcome"], "succeeded");

    // A second fill-missing run has nothing left to do.
    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/batch-generate"),
        serde_json::json!({ "mode": "fill_missing" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["total"], 0);
}

// ---------------------------------------------------------------------------
// Nine-grid
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ninegrid_plan_render_select_flow() {
    let app = common::test_app();
    let project_id = create_project(&app).await;
    let base = format!("/api/v1/projects/{project_id}/shots/shot-1/ninegrid");

    let response = post_json(app.clone(), &format!("{base}/plan"), serde_json::json!({})).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["panels"].as_array().unwrap().len(), 9);

    let response = post_json(app.clone(), &format!("{base}/render"), serde_json::json!({})).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "completed");

    let response = post_json(
        app.clone(),
        &format!("{base}/select"),
        serde_json::json!({ "panel_index": 4 }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["image_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png"));
}

#[tokio::test]
async fn ninegrid_plan_with_wrong_count_fails_without_render() {
    let stub = Arc::new(StubGateway::default());
    stub.plan_panel_count(8);
    let app = build_test_app(stub);
    let project_id = create_project(&app).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/ninegrid/plan"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = get(app, &format!("/api/v1/projects/{project_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["shots"][0]["nine_grid"]["status"], "failed");
}

// ---------------------------------------------------------------------------
// Progress projection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_projection_counts_completed_frames() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/start/generate"),
        serde_json::json!({}),
    )
    .await;

    let response = get(app, &format!("/api/v1/projects/{project_id}/progress")).await;
    let json = expect_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["total_shots"], 2);
    assert_eq!(json["data"]["start_frames_completed"], 1);
    assert_eq!(json["data"]["videos_completed"], 0);
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshot_save_and_load_round_trip() {
    let app = common::test_app();
    let project_id = create_project(&app).await;

    post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/shots/shot-1/keyframes/start/generate"),
        serde_json::json!({}),
    )
    .await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/snapshot"),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert!(json["data"]["path"].as_str().unwrap().ends_with(".json"));

    let response = common::put_json(
        app,
        &format!("/api/v1/projects/{project_id}/snapshot"),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["shots"][0]["start_frame"]["status"], "completed");
}
