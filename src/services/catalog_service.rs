use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::models::{category::CategoryResponse, nominee::NomineeResponse};
use crate::services::store::StoreHandle;

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VotingStatus {
    pub voting_ends_at: DateTime<Utc>,
    pub open: bool,
    pub remaining: TimeRemaining,
}

/// Read side consumed by the voting page.
pub struct CatalogService {
    store: StoreHandle,
    voting_ends_at: DateTime<Utc>,
}

impl CatalogService {
    pub fn new(store: StoreHandle, voting_ends_at: DateTime<Utc>) -> Self {
        Self { store, voting_ends_at }
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, AppError> {
        let categories = self.store.get()?.list_categories().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    pub async fn list_nominees(&self, category_id: &str) -> Result<Vec<NomineeResponse>, AppError> {
        let nominees = self.store.get()?.list_nominees(category_id).await?;
        Ok(nominees.into_iter().map(NomineeResponse::from).collect())
    }

    pub fn voting_status(&self, now: DateTime<Utc>) -> VotingStatus {
        let left = (self.voting_ends_at - now).num_seconds().max(0);
        VotingStatus {
            voting_ends_at: self.voting_ends_at,
            open: now <= self.voting_ends_at,
            remaining: TimeRemaining {
                days: left / 86_400,
                hours: left % 86_400 / 3_600,
                minutes: left % 3_600 / 60,
                seconds: left % 60,
            },
        }
    }
}
