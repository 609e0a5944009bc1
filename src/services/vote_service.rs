use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AppError;
use crate::models::{ip_vote::IpVote, vote::VoteRequest};
use crate::services::store::{Ballot, StoreHandle};

pub struct VoteService {
    store: StoreHandle,
    voting_ends_at: DateTime<Utc>,
}

impl VoteService {
    pub fn new(store: StoreHandle, voting_ends_at: DateTime<Utc>) -> Self {
        Self { store, voting_ends_at }
    }

    pub fn ensure_open(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if now > self.voting_ends_at {
            return Err(AppError::PeriodClosed);
        }
        Ok(())
    }

    /// Records one vote for `client_ip`. Check order: voting window, ids,
    /// client address, store. Nothing is read or written before all checks pass.
    pub async fn cast_vote(
        &self,
        request: &VoteRequest,
        client_ip: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.ensure_open(now)?;

        let category_id = non_empty(request.category_id.as_deref());
        let nominee_id = non_empty(request.nominee_id.as_deref());
        let (Some(category_id), Some(nominee_id)) = (category_id, nominee_id) else {
            return Err(AppError::Validation(
                "Category ID and Nominee ID are required".to_string(),
            ));
        };

        let ip = client_ip.ok_or(AppError::UnknownClientIp)?;
        let store = self.store.get()?;

        let ballot = Ballot {
            category_id: category_id.to_string(),
            nominee_id: nominee_id.to_string(),
            guard: IpVote::new(ip, category_id, now),
        };
        store.record_vote(&ballot).await?;

        info!(category_id, nominee_id, ip, "vote counted");
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
