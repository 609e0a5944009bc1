use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{vote::VoteRequest, ApiMessage},
    services::vote_service::VoteService,
    utils::client_ip,
};

#[utoipa::path(
    post,
    path = "/vote",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote counted", body = ApiMessage),
        (status = 400, description = "Missing ids or unidentifiable client", body = ApiMessage),
        (status = 403, description = "Voting period has ended", body = ApiMessage),
        (status = 429, description = "Already voted in this category", body = ApiMessage),
        (status = 500, description = "Unknown nominee or server failure", body = ApiMessage)
    )
)]
pub async fn cast_vote(
    State(vote_service): State<Arc<VoteService>>,
    headers: HeaderMap,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<ApiMessage>, AppError> {
    let now = Utc::now();
    // a closed window wins over a malformed body
    vote_service.ensure_open(now)?;

    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let ip = client_ip(&headers);

    vote_service.cast_vote(&request, ip.as_deref(), now).await?;
    Ok(Json(ApiMessage::ok("Vote counted!")))
}

pub fn vote_routes(vote_service: Arc<VoteService>) -> Router {
    Router::new()
        .route("/vote", axum::routing::post(cast_vote))
        .with_state(vote_service)
}
