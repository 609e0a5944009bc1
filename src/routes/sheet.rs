use axum::{extract::State, middleware, Json, Router};
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppError,
    middleware::auth::cron_auth,
    services::sheet_sync_service::{ImportReport, SheetSyncService, SyncReport},
};

#[utoipa::path(
    get,
    path = "/update-sheet",
    responses(
        (status = 200, description = "Votes column rewritten", body = SyncReport),
        (status = 401, description = "Missing or wrong bearer token"),
        (status = 500, description = "Configuration, store or spreadsheet failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_sheet(
    State(sync_service): State<Arc<SheetSyncService>>,
) -> Result<Json<SyncReport>, AppError> {
    Ok(Json(sync_service.sync_votes().await?))
}

#[utoipa::path(
    post,
    path = "/import-sheet",
    responses(
        (status = 200, description = "Categories and nominees seeded", body = ImportReport),
        (status = 400, description = "Sheet header is missing the Nominees column"),
        (status = 401, description = "Missing or wrong bearer token"),
        (status = 500, description = "Configuration, store or spreadsheet failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn import_sheet(
    State(sync_service): State<Arc<SheetSyncService>>,
) -> Result<Json<ImportReport>, AppError> {
    Ok(Json(sync_service.import_nominees().await?))
}

pub fn sheet_routes(sync_service: Arc<SheetSyncService>, config: Arc<Config>) -> Router {
    Router::new()
        .route("/update-sheet", axum::routing::get(update_sheet))
        .route("/import-sheet", axum::routing::post(import_sheet))
        .layer(middleware::from_fn_with_state(config, cron_auth))
        .with_state(sync_service)
}
