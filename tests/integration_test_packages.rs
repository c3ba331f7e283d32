mod common;

use axum::http::StatusCode;
use common::{parse_body, seed_client, seed_duration, seed_package, TestApp};
use serde_json::json;

#[tokio::test]
async fn package_definition_validation() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;

    // group packages need a max group size above 1
    let res = app
        .post(
            "/api/v1/package-definitions",
            json!({
                "name": "Bad group",
                "sessions_count": 5,
                "session_duration_id": duration_id,
                "package_type": "group"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // individual packages must not carry one
    let res = app
        .post(
            "/api/v1/package-definitions",
            json!({
                "name": "Bad individual",
                "sessions_count": 5,
                "session_duration_id": duration_id,
                "package_type": "individual",
                "max_group_size": 3
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/v1/package-definitions",
            json!({
                "name": "Mixed",
                "sessions_count": 0,
                "session_duration_id": duration_id,
                "package_type": "mixed",
                "max_group_size": 4
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/v1/package-definitions",
            json!({
                "name": "Mixed",
                "sessions_count": 8,
                "session_duration_id": "missing",
                "package_type": "mixed",
                "max_group_size": 4
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn price_upsert_replaces_the_existing_row() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let package_id = seed_package(&app, &duration_id, "individual", 5, None).await;

    let res = app
        .post(
            &format!("/api/v1/package-definitions/{}/prices", package_id),
            json!({ "currency_code": "USD", "price": 15000, "pricing_mode": "custom" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&format!("/api/v1/package-definitions/{}/prices", package_id)).await;
    let body = parse_body(res).await;
    let prices = body["data"].as_array().unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0]["price"], 15000);

    let res = app
        .post(
            &format!("/api/v1/package-definitions/{}/prices", package_id),
            json!({ "currency_code": "XXX", "price": 100, "pricing_mode": "custom" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .post(
            &format!("/api/v1/package-definitions/{}/prices", package_id),
            json!({ "currency_code": "USD", "price": -5, "pricing_mode": "custom" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn calculated_prices_derive_from_the_default_currency() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let package_id = seed_package(&app, &duration_id, "individual", 5, None).await;

    let res = app
        .post(
            "/api/v1/currencies",
            json!({ "code": "eur", "name": "Euro", "symbol": "€", "exchange_rate": 0.9 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(parse_body(res).await["data"]["code"], "EUR");

    // No EUR row: derived from the 12000 USD base at 0.9.
    let res = app.get(&format!("/api/v1/package-definitions/{}/price?currency=EUR", package_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["amount"], 10800);
    assert_eq!(body["data"]["currency_code"], "EUR");

    // A calculated EUR row still derives from the base.
    let res = app
        .post(
            &format!("/api/v1/package-definitions/{}/prices", package_id),
            json!({ "currency_code": "EUR", "price": 1, "pricing_mode": "calculated" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.get(&format!("/api/v1/package-definitions/{}/price?currency=EUR", package_id)).await;
    assert_eq!(parse_body(res).await["data"]["amount"], 10800);

    // A custom EUR row wins.
    let res = app
        .post(
            &format!("/api/v1/package-definitions/{}/prices", package_id),
            json!({ "currency_code": "EUR", "price": 9999, "pricing_mode": "custom" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.get(&format!("/api/v1/package-definitions/{}/price?currency=EUR", package_id)).await;
    assert_eq!(parse_body(res).await["data"]["amount"], 9999);

    // Default currency when none is given.
    let res = app.get(&format!("/api/v1/package-definitions/{}/price", package_id)).await;
    assert_eq!(parse_body(res).await["data"]["currency_code"], "USD");

    let res = app.get(&format!("/api/v1/package-definitions/{}/price?currency=GBP", package_id)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unpriced_package_cannot_be_quoted() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;

    let res = app
        .post(
            "/api/v1/package-definitions",
            json!({
                "name": "Unpriced",
                "sessions_count": 5,
                "session_duration_id": duration_id,
                "package_type": "individual"
            }),
        )
        .await;
    let package_id = parse_body(res).await["data"]["id"].as_str().unwrap().to_string();

    let res = app.get(&format!("/api/v1/package-definitions/{}/price", package_id)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchases_size_pools_by_package_type() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let client_id = seed_client(&app, "buyer@test.com").await;
    let package_id = seed_package(&app, &duration_id, "mixed", 8, Some(4)).await;

    let res = app
        .post(
            "/api/v1/user-packages",
            json!({ "client_id": client_id, "package_definition_id": package_id }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;
    assert_eq!(body["data"]["sessions_total"], 8);
    assert_eq!(body["data"]["sessions_remaining"], 8);
    assert_eq!(body["data"]["group_sessions_total"], 8);
    assert_eq!(body["data"]["group_sessions_remaining"], 8);
    assert_eq!(body["data"]["is_active"], true);

    let res = app.get(&format!("/api/v1/user-packages?client_id={}", client_id)).await;
    assert_eq!(parse_body(res).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn purchase_rejects_bad_input() {
    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let client_id = seed_client(&app, "buyer2@test.com").await;
    let package_id = seed_package(&app, &duration_id, "individual", 5, None).await;

    let res = app
        .post(
            "/api/v1/user-packages",
            json!({ "client_id": "missing", "package_definition_id": package_id }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .post(
            "/api/v1/user-packages",
            json!({ "client_id": client_id, "package_definition_id": "missing" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .post(
            "/api/v1/user-packages",
            json!({
                "client_id": client_id,
                "package_definition_id": package_id,
                "expires_at": "2020-01-01T00:00:00Z"
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Retired packages cannot be sold.
    let res = app
        .put(&format!("/api/v1/package-definitions/{}", package_id), json!({ "is_active": false }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app
        .post(
            "/api/v1/user-packages",
            json!({ "client_id": client_id, "package_definition_id": package_id }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_pool_guards_hold_under_direct_use() {
    use soulpath_backend::domain::models::user_package::SessionPool;

    let app = TestApp::new().await;
    let duration_id = seed_duration(&app, 60).await;
    let client_id = seed_client(&app, "pool@test.com").await;
    let package_id = seed_package(&app, &duration_id, "individual", 2, None).await;

    let res = app
        .post(
            "/api/v1/user-packages",
            json!({ "client_id": client_id, "package_definition_id": package_id }),
        )
        .await;
    let user_package_id = parse_body(res).await["data"]["id"].as_str().unwrap().to_string();
    let repo = &app.state.user_package_repo;

    repo.reserve(&user_package_id, SessionPool::Individual, 2).await.unwrap();
    // The pool is empty now.
    assert!(repo.reserve(&user_package_id, SessionPool::Individual, 1).await.is_err());

    // Release is capped at what was reserved; over-releasing cannot push
    // remaining past total.
    repo.release(&user_package_id, SessionPool::Individual, 5).await.unwrap();
    let package = repo.find_by_id(&user_package_id).await.unwrap().unwrap();
    assert_eq!(package.sessions_remaining, 2);
    assert_eq!(package.sessions_used, 0);

    // The individual pool says nothing about the group pool.
    assert!(repo.reserve(&user_package_id, SessionPool::Group, 1).await.is_err());
    assert!(repo.reserve(&user_package_id, SessionPool::Individual, 0).await.is_err());
}

#[tokio::test]
async fn duplicate_currency_codes_conflict() {
    let app = TestApp::new().await;

    let res = app
        .post(
            "/api/v1/currencies",
            json!({ "code": "USD", "name": "US Dollar", "symbol": "$", "exchange_rate": 1.0 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .post(
            "/api/v1/currencies",
            json!({ "code": "EURO", "name": "Euro", "symbol": "€", "exchange_rate": 0.9 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/v1/currencies",
            json!({ "code": "EUR", "name": "Euro", "symbol": "€", "exchange_rate": 0.0 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
