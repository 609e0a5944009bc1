use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::Mutex;

use crate::models::{category::Category, ip_vote::IpVote, nominee::Nominee, suggestion::Suggestion};
use crate::services::store::{Ballot, StoreError, VoteStore};

/// In-process store. One lock around the whole state gives every vote the
/// same all-or-nothing behaviour as a database transaction.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    pub vote_calls: AtomicU64,
}

#[derive(Default)]
struct MemoryState {
    categories: BTreeMap<String, Category>,
    nominees: Vec<Nominee>,
    ip_votes: HashMap<String, IpVote>,
    suggestions: Vec<(String, Suggestion)>,
}

impl MemoryStore {
    pub async fn seed_category(&self, id: &str, title: &str, order: i32) {
        let category = Category {
            id: id.to_string(),
            title: title.to_string(),
            order,
            description: format!("{title} description"),
            icon_url: None,
        };
        self.state.lock().await.categories.insert(category.id.clone(), category);
    }

    pub async fn seed_nominee(&self, category_id: &str, id: &str, name: &str, votes: i64) {
        self.state.lock().await.nominees.push(Nominee {
            id: id.to_string(),
            category_id: category_id.to_string(),
            name: name.to_string(),
            image_url: format!("https://img.example/{id}.png"),
            votes,
        });
    }

    pub async fn nominee_votes(&self, nominee_id: &str) -> Option<i64> {
        self.state
            .lock()
            .await
            .nominees
            .iter()
            .find(|n| n.id == nominee_id)
            .map(|n| n.votes)
    }

    pub async fn total_votes(&self) -> i64 {
        self.state.lock().await.nominees.iter().map(|n| n.votes).sum()
    }

    pub async fn guard_count(&self) -> usize {
        self.state.lock().await.ip_votes.len()
    }

    pub async fn has_guard(&self, key: &str) -> bool {
        self.state.lock().await.ip_votes.contains_key(key)
    }

    pub async fn suggestions(&self) -> Vec<Suggestion> {
        self.state
            .lock()
            .await
            .suggestions
            .iter()
            .map(|(_, s)| s.clone())
            .collect()
    }

    pub async fn category(&self, id: &str) -> Option<Category> {
        self.state.lock().await.categories.get(id).cloned()
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn record_vote(&self, ballot: &Ballot) -> Result<(), StoreError> {
        self.vote_calls.fetch_add(1, Ordering::Relaxed);
        let mut state = self.state.lock().await;

        if state.ip_votes.contains_key(&ballot.guard.key) {
            return Err(StoreError::DuplicateVote);
        }

        // hand the scheduler a chance to interleave other voters mid-transaction
        tokio::task::yield_now().await;

        let nominee = state
            .nominees
            .iter_mut()
            .find(|n| n.id == ballot.nominee_id && n.category_id == ballot.category_id)
            .ok_or_else(|| StoreError::NomineeNotFound {
                category_id: ballot.category_id.clone(),
                nominee_id: ballot.nominee_id.clone(),
            })?;
        nominee.votes += 1;

        state
            .ip_votes
            .insert(ballot.guard.key.clone(), ballot.guard.clone());
        Ok(())
    }

    async fn add_suggestion(&self, suggestion: &Suggestion) -> Result<String, StoreError> {
        let id = ObjectId::new().to_hex();
        self.state
            .lock()
            .await
            .suggestions
            .push((id.clone(), suggestion.clone()));
        Ok(id)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> =
            self.state.lock().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn list_nominees(&self, category_id: &str) -> Result<Vec<Nominee>, StoreError> {
        let mut nominees: Vec<Nominee> = self
            .state
            .lock()
            .await
            .nominees
            .iter()
            .filter(|n| n.category_id == category_id)
            .cloned()
            .collect();
        nominees.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
        Ok(nominees)
    }

    async fn upsert_category(&self, category: &Category) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        match state.categories.get_mut(&category.id) {
            Some(existing) => {
                existing.title = category.title.clone();
                existing.description = category.description.clone();
                existing.order = category.order;
            }
            None => {
                state.categories.insert(category.id.clone(), category.clone());
            }
        }
        Ok(())
    }

    async fn insert_nominee_if_absent(
        &self,
        category_id: &str,
        name: &str,
        image_url: &str,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if state
            .nominees
            .iter()
            .any(|n| n.category_id == category_id && n.name == name)
        {
            return Ok(false);
        }
        state.nominees.push(Nominee {
            id: ObjectId::new().to_hex(),
            category_id: category_id.to_string(),
            name: name.to_string(),
            image_url: image_url.to_string(),
            votes: 0,
        });
        Ok(true)
    }
}
