use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppError;
use crate::models::{category::Category, ip_vote::IpVote, nominee::Nominee, suggestion::Suggestion};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("an ip vote guard already exists for this category")]
    DuplicateVote,

    #[error("nominee {nominee_id} not found in category {category_id}")]
    NomineeNotFound {
        category_id: String,
        nominee_id: String,
    },

    #[error("transaction gave up after {attempts} conflicting attempts")]
    Conflict { attempts: u32 },

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// One vote: which nominee to bump and the guard document that must not
/// exist yet.
#[derive(Debug, Clone)]
pub struct Ballot {
    pub category_id: String,
    pub nominee_id: String,
    pub guard: IpVote,
}

#[async_trait]
pub trait VoteStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Checks the guard, checks the nominee, increments the counter and writes
    /// the guard, all inside one transaction.
    async fn record_vote(&self, ballot: &Ballot) -> Result<(), StoreError>;

    /// Inserts a suggestion and returns its generated id.
    async fn add_suggestion(&self, suggestion: &Suggestion) -> Result<String, StoreError>;

    /// Categories ordered by `order`, then id.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Nominees of one category ordered by votes (descending), then name.
    async fn list_nominees(&self, category_id: &str) -> Result<Vec<Nominee>, StoreError>;

    /// Creates the category or overwrites its title, description and order.
    async fn upsert_category(&self, category: &Category) -> Result<(), StoreError>;

    /// Returns `true` when a new nominee was created, `false` when one with
    /// the same name already existed in the category.
    async fn insert_nominee_if_absent(
        &self,
        category_id: &str,
        name: &str,
        image_url: &str,
    ) -> Result<bool, StoreError>;
}

/// Injected store handle. Empty when the process started without database
/// settings; every operation then fails with a configuration error.
#[derive(Clone, Default)]
pub struct StoreHandle(Option<Arc<dyn VoteStore>>);

impl StoreHandle {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self(Some(store))
    }

    pub fn unconfigured() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Result<&dyn VoteStore, AppError> {
        self.0
            .as_deref()
            .ok_or_else(|| AppError::Config("document store is not configured".to_string()))
    }
}
