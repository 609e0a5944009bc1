use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::ApiMessage;
use crate::services::{sheets::SheetError, store::StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Client IP could not be determined from forwarding headers")]
    UnknownClientIp,

    #[error("Missing or invalid bearer token")]
    Auth,

    #[error("Vote received after the voting period ended")]
    PeriodClosed,

    #[error("Duplicate vote for this category")]
    DuplicateVote,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] SheetError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateVote => AppError::DuplicateVote,
            StoreError::NomineeNotFound {
                category_id,
                nominee_id,
            } => AppError::NotFound(format!(
                "nominee {nominee_id} in category {category_id}"
            )),
            other => AppError::Store(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnknownClientIp => StatusCode::BAD_REQUEST,
            AppError::Auth => StatusCode::UNAUTHORIZED,
            AppError::PeriodClosed => StatusCode::FORBIDDEN,
            AppError::DuplicateVote => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_)
            | AppError::Config(_)
            | AppError::Store(_)
            | AppError::Sheets(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message returned to the client. Details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::UnknownClientIp => "Could not identify client.".to_string(),
            AppError::Auth => "Unauthorized".to_string(),
            AppError::PeriodClosed => "The voting period has ended.".to_string(),
            AppError::DuplicateVote => "You have already voted in this category.".to_string(),
            AppError::Config(_) => "Server configuration error.".to_string(),
            AppError::NotFound(_) | AppError::Store(_) | AppError::Sheets(_) => {
                "Internal Server Error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        (status, Json(ApiMessage::failure(self.public_message()))).into_response()
    }
}
