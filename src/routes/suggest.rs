use axum::{
    extract::{rejection::JsonRejection, State},
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{
        suggestion::{SuggestionRequest, SuggestionResponse},
        ApiMessage,
    },
    services::suggestion_service::SuggestionService,
};

#[utoipa::path(
    post,
    path = "/suggest",
    request_body = SuggestionRequest,
    responses(
        (status = 200, description = "Suggestion stored as pending", body = SuggestionResponse),
        (status = 400, description = "First failed validation rule", body = ApiMessage),
        (status = 500, description = "Server failure", body = ApiMessage)
    )
)]
pub async fn submit_suggestion(
    State(suggestion_service): State<Arc<SuggestionService>>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let id = suggestion_service.submit(&request, Utc::now()).await?;
    Ok(Json(SuggestionResponse {
        success: true,
        message: "Thank you! Your suggestion has been received.".to_string(),
        id,
    }))
}

pub fn suggest_routes(suggestion_service: Arc<SuggestionService>) -> Router {
    Router::new()
        .route("/suggest", axum::routing::post(submit_suggestion))
        .with_state(suggestion_service)
}
