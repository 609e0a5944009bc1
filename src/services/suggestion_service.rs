use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AppError;
use crate::models::suggestion::{Suggestion, SuggestionRequest, SuggestionStatus};
use crate::services::store::StoreHandle;

pub struct SuggestionService {
    store: StoreHandle,
}

impl SuggestionService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Stores a pending suggestion and returns its id. Duplicates are accepted.
    pub async fn submit(&self, request: &SuggestionRequest, now: DateTime<Utc>) -> Result<String, AppError> {
        let store = self.store.get()?;
        let (nominee_name, category_id) = request.validate().map_err(AppError::Validation)?;

        let suggestion = Suggestion {
            nominee_name: nominee_name.to_string(),
            category_id: category_id.to_string(),
            submitted_at: now,
            status: SuggestionStatus::Pending,
        };
        let id = store.add_suggestion(&suggestion).await?;

        info!(suggestion_id = %id, category_id, "suggestion received");
        Ok(id)
    }
}
