use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 100;

/// DB model (stored in the `suggestions` collection)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub nominee_name: String,
    pub category_id: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,
    pub status: SuggestionStatus,
}

/// Moderation past `pending` happens outside this service.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
}

/// Request DTO (what clients POST)
#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub nominee_name: Option<String>,
    pub category_id: Option<String>,
}

impl SuggestionRequest {
    /// Checks constraints in field order and reports the first one violated.
    pub fn validate(&self) -> Result<(&str, &str), String> {
        let name = self.nominee_name.as_deref().unwrap_or_default();
        let name_len = name.chars().count();
        if name_len < MIN_NAME_LEN {
            return Err("Name must be at least 3 characters long.".to_string());
        }
        if name_len > MAX_NAME_LEN {
            return Err("Name must be at most 100 characters long.".to_string());
        }

        let category_id = self.category_id.as_deref().unwrap_or_default();
        if category_id.is_empty() {
            return Err("Please select a category.".to_string());
        }

        Ok((name, category_id))
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SuggestionResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}
