use axum::{
    extract::{Path, State},
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{category::CategoryResponse, nominee::NomineeResponse},
    services::catalog_service::{CatalogService, VotingStatus},
};

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Categories ordered by display order", body = [CategoryResponse])
    )
)]
pub async fn list_categories(
    State(catalog): State<Arc<CatalogService>>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    Ok(Json(catalog.list_categories().await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}/nominees",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Nominees ordered by votes, highest first", body = [NomineeResponse])
    )
)]
pub async fn list_nominees(
    State(catalog): State<Arc<CatalogService>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<NomineeResponse>>, AppError> {
    Ok(Json(catalog.list_nominees(&id).await?))
}

#[utoipa::path(
    get,
    path = "/voting-status",
    responses(
        (status = 200, description = "Voting window and time left", body = VotingStatus)
    )
)]
pub async fn voting_status(State(catalog): State<Arc<CatalogService>>) -> Json<VotingStatus> {
    Json(catalog.voting_status(Utc::now()))
}

pub fn catalog_routes(catalog: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/categories", axum::routing::get(list_categories))
        .route("/categories/{id}/nominees", axum::routing::get(list_nominees))
        .route("/voting-status", axum::routing::get(voting_status))
        .with_state(catalog)
}
