use axum::{
    body::{to_bytes, Body},
    http::{self, Request},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    config::{Config, SheetLayout},
    routes,
    services::{
        memory_sheet::MemorySheet,
        memory_store::MemoryStore,
        sheets::SheetClient,
        store::StoreHandle,
    },
};

pub const CRON_SECRET: &str = "test-cron-secret";

pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub sheet: Arc<MemorySheet>,
}

/// Voting open for another day, sheet endpoints guarded by `CRON_SECRET`.
pub fn test_config() -> Config {
    Config {
        mongodb_uri: None,
        mongodb_database: "awards_test".to_string(),
        service_account: None,
        spreadsheet_id: None,
        sheet_layout: SheetLayout::default(),
        cron_secret: Some(CRON_SECRET.to_string()),
        voting_ends_at: Utc::now() + Duration::days(1),
    }
}

pub async fn setup() -> TestContext {
    setup_with(test_config()).await
}

pub async fn setup_with(config: Config) -> TestContext {
    let store = Arc::new(MemoryStore::default());
    seed_awards(&store).await;
    let sheet = Arc::new(MemorySheet::default());

    let app = routes::init_routes(
        StoreHandle::new(store.clone()),
        Some(sheet.clone() as Arc<dyn SheetClient>),
        Arc::new(config),
    );

    TestContext { app, store, sheet }
}

/// Two categories, three nominees:
/// best-athlete: abebe (3 votes), tirunesh (7 votes); rising-star: newcomer (0).
pub async fn seed_awards(store: &MemoryStore) {
    store.seed_category("best-athlete", "Best Athlete", 1).await;
    store.seed_category("rising-star", "Rising Star", 2).await;
    store.seed_nominee("best-athlete", "abebe", "Abebe Bikila", 3).await;
    store.seed_nominee("best-athlete", "tirunesh", "Tirunesh Dibaba", 7).await;
    store.seed_nominee("rising-star", "newcomer", "Newcomer", 0).await;
}

/// Helper to create a JSON body for requests.
pub fn json_body(json: &Value) -> Body {
    Body::from(json.to_string())
}

pub fn post_json(uri: &str, ip: Option<&str>, json: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(ip) = ip {
        builder = builder.header("x-forwarded-for", ip);
    }
    builder.body(json_body(json)).unwrap()
}

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    authorized(http::Method::GET, uri, bearer)
}

pub fn authorized(method: http::Method, uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
