mod common;

use axum::http::StatusCode;
use common::{
    generate_slots, parse_body, purchase_package, seed_client, seed_duration, seed_package,
    seed_template, TestApp,
};
use serde_json::json;

#[tokio::test]
async fn duration_validation() {
    let app = TestApp::new().await;

    let res = app.post("/api/v1/session-durations", json!({ "name": "Zero", "minutes": 0 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/v1/session-durations", json!({ "name": "  ", "minutes": 30 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/v1/session-durations", json!({ "name": "Half hour", "minutes": 30 })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["minutes"], 30);
    assert_eq!(body["data"]["is_active"], true);
}

#[tokio::test]
async fn template_validation() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;

    let base = |overrides: serde_json::Value| {
        let mut payload = json!({
            "day_of_week": "monday",
            "start_time": "10:00",
            "end_time": "11:00",
            "capacity": 2,
            "session_duration_id": duration_id
        });
        payload.as_object_mut().unwrap().extend(overrides.as_object().unwrap().clone());
        payload
    };

    let res = app.post("/api/v1/schedule-templates", base(json!({ "day_of_week": "funday" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/v1/schedule-templates", base(json!({ "start_time": "11:00", "end_time": "10:00" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/v1/schedule-templates", base(json!({ "start_time": "25:00" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/v1/schedule-templates", base(json!({ "capacity": 0 }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/v1/schedule-templates", base(json!({ "session_duration_id": "nope" }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Day names are case-insensitive.
    let res = app.post("/api/v1/schedule-templates", base(json!({ "day_of_week": "Monday" }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(parse_body(res).await["data"]["day_of_week"], "monday");
}

#[tokio::test]
async fn template_update_is_a_patch() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let template_id = seed_template(&app, &duration_id, "monday", 2).await;

    let res = app
        .put(&format!("/api/v1/schedule-templates/{}", template_id), json!({ "capacity": 5 }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["capacity"], 5);
    assert_eq!(body["data"]["day_of_week"], "monday");
    assert_eq!(body["data"]["start_time"], "10:00");

    // A patch may not leave the template invalid.
    let res = app
        .put(&format!("/api/v1/schedule-templates/{}", template_id), json!({ "end_time": "09:00" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.put("/api/v1/schedule-templates/missing", json!({ "capacity": 2 })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_template_removes_its_unbooked_slots() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let template_id = seed_template(&app, &duration_id, "monday", 2).await;
    let slot_ids = generate_slots(&app, &template_id, "2024-01-01", "2024-01-14").await;
    assert_eq!(slot_ids.len(), 2);

    let res = app.delete(&format!("/api/v1/schedule-templates/{}", template_id)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/schedule-slots?schedule_template_id={}", template_id)).await;
    assert_eq!(parse_body(res).await["pagination"]["total"], 0);

    let res = app.get(&format!("/api/v1/schedule-templates/{}", template_id)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn template_with_active_bookings_cannot_be_deleted() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let template_id = seed_template(&app, &duration_id, "monday", 2).await;
    let slot_ids = generate_slots(&app, &template_id, "2024-01-01", "2024-01-07").await;

    let client_id = seed_client(&app, "holder@test.com").await;
    let package_id = seed_package(&app, &duration_id, "individual", 5, None).await;
    let user_package_id = purchase_package(&app, &client_id, &package_id).await;
    let res = app
        .post(
            "/api/v1/bookings",
            json!({
                "client_id": client_id,
                "schedule_slot_id": slot_ids[0],
                "user_package_id": user_package_id,
                "booking_type": "individual",
                "payment_method": "stripe"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let booking_id = parse_body(res).await["data"]["id"].as_str().unwrap().to_string();

    let res = app.delete(&format!("/api/v1/schedule-templates/{}", template_id)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["error"], "conflict");

    // Once the booking ends, deletion goes through.
    let res = app
        .put(&format!("/api/v1/bookings/{}/status", booking_id), json!({ "status": "cancelled" }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.delete(&format!("/api/v1/schedule-templates/{}", template_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn referenced_duration_cannot_be_deactivated() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let template_id = seed_template(&app, &duration_id, "monday", 2).await;

    let res = app.delete(&format!("/api/v1/session-durations/{}", duration_id)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .put(&format!("/api/v1/schedule-templates/{}", template_id), json!({ "is_available": false }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.delete(&format!("/api/v1/session-durations/{}", duration_id)).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Soft delete: the row survives as inactive.
    let res = app.get("/api/v1/session-durations").await;
    let body = parse_body(res).await;
    assert_eq!(body["data"][0]["is_active"], false);
}
