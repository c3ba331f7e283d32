use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use soulpath_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::{build_state, run_migrations},
    state::AppState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_migrations(&pool).await;

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            max_generation_days: 365,
            default_currency: "USD".to_string(),
        };

        let state = Arc::new(build_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self { router, pool, db_filename, state }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post(&self, uri: &str, payload: Value) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn put(&self, uri: &str, payload: Value) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn seed_duration(app: &TestApp, minutes: i32) -> String {
    let res = app
        .post("/api/v1/session-durations", json!({ "name": format!("{} min", minutes), "minutes": minutes }))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["data"]["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn seed_template(app: &TestApp, duration_id: &str, day: &str, capacity: i32) -> String {
    let res = app
        .post(
            "/api/v1/schedule-templates",
            json!({
                "day_of_week": day,
                "start_time": "10:00",
                "end_time": "11:00",
                "capacity": capacity,
                "session_duration_id": duration_id
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["data"]["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn seed_client(app: &TestApp, email: &str) -> String {
    let res = app
        .post("/api/v1/clients", json!({ "full_name": "Test Client", "email": email }))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["data"]["id"].as_str().unwrap().to_string()
}

/// Package definition with a custom USD price of 120.00.
#[allow(dead_code)]
pub async fn seed_package(
    app: &TestApp,
    duration_id: &str,
    package_type: &str,
    sessions_count: i32,
    max_group_size: Option<i32>,
) -> String {
    let res = app
        .post(
            "/api/v1/package-definitions",
            json!({
                "name": format!("{} bundle", package_type),
                "sessions_count": sessions_count,
                "session_duration_id": duration_id,
                "package_type": package_type,
                "max_group_size": max_group_size
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let package_id = parse_body(res).await["data"]["id"].as_str().unwrap().to_string();

    let res = app
        .post(
            &format!("/api/v1/package-definitions/{}/prices", package_id),
            json!({ "currency_code": "USD", "price": 12000, "pricing_mode": "custom" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    package_id
}

#[allow(dead_code)]
pub async fn purchase_package(app: &TestApp, client_id: &str, package_id: &str) -> String {
    let res = app
        .post(
            "/api/v1/user-packages",
            json!({ "client_id": client_id, "package_definition_id": package_id }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["data"]["id"].as_str().unwrap().to_string()
}

/// Generates slots for one template over a date window and returns the
/// generated slot ids, oldest first.
#[allow(dead_code)]
pub async fn generate_slots(
    app: &TestApp,
    template_id: &str,
    start_date: &str,
    end_date: &str,
) -> Vec<String> {
    let res = app
        .post(
            "/api/v1/schedule-slots/generate",
            json!({
                "template_ids": [template_id],
                "start_date": start_date,
                "end_date": end_date
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .get(&format!("/api/v1/schedule-slots?schedule_template_id={}&limit=100", template_id))
        .await;
    let body = parse_body(res).await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["id"].as_str().unwrap().to_string())
        .collect()
}
