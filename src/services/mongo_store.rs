use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    error::{Error, ErrorKind, WriteFailure, TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT},
    Client, ClientSession, Collection, Database,
};
use tracing::{debug, info, warn};

use crate::models::{category::Category, ip_vote::IpVote, nominee::Nominee, suggestion::Suggestion};
use crate::services::store::{Ballot, StoreError, VoteStore};

const MAX_TRANSACTION_ATTEMPTS: u32 = 5;
const MAX_COMMIT_ATTEMPTS: u32 = 3;
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB backend. Transactions need a replica set (Atlas, or a local
/// single-node `--replSet`).
pub struct MongoStore {
    client: Client,
    categories: Collection<Category>,
    nominees: Collection<Nominee>,
    ip_votes: Collection<IpVote>,
    suggestions: Collection<Suggestion>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            client: db.client().clone(),
            categories: db.collection("categories"),
            nominees: db.collection("nominees"),
            ip_votes: db.collection("ip_votes"),
            suggestions: db.collection("suggestions"),
        }
    }

    async fn vote_steps(&self, session: &mut ClientSession, ballot: &Ballot) -> Result<(), StoreError> {
        let existing = self
            .ip_votes
            .find_one(doc! { "_id": &ballot.guard.key })
            .session(&mut *session)
            .await?;
        if existing.is_some() {
            return Err(StoreError::DuplicateVote);
        }

        let nominee_filter = doc! { "_id": &ballot.nominee_id, "categoryId": &ballot.category_id };
        let nominee = self
            .nominees
            .find_one(nominee_filter.clone())
            .session(&mut *session)
            .await?;
        if nominee.is_none() {
            return Err(StoreError::NomineeNotFound {
                category_id: ballot.category_id.clone(),
                nominee_id: ballot.nominee_id.clone(),
            });
        }

        self.nominees
            .update_one(nominee_filter, doc! { "$inc": { "votes": 1_i64 } })
            .session(&mut *session)
            .await?;

        self.ip_votes
            .insert_one(&ballot.guard)
            .session(&mut *session)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::DuplicateVote
                } else {
                    StoreError::Database(e)
                }
            })?;

        Ok(())
    }
}

async fn commit(session: &mut ClientSession) -> Result<(), StoreError> {
    let mut attempt = 1;
    loop {
        match session.commit_transaction().await {
            Err(e) if e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT) && attempt < MAX_COMMIT_ATTEMPTS => {
                warn!(attempt, error = %e, "commit result unknown, retrying commit");
                attempt += 1;
            }
            other => return other.map_err(StoreError::from),
        }
    }
}

fn is_duplicate_key(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn is_transient(err: &StoreError) -> bool {
    matches!(err, StoreError::Database(e) if e.contains_label(TRANSIENT_TRANSACTION_ERROR))
}

#[async_trait]
impl VoteStore for MongoStore {
    fn backend_tag(&self) -> &'static str {
        "mongodb"
    }

    async fn record_vote(&self, ballot: &Ballot) -> Result<(), StoreError> {
        let mut session = self.client.start_session().await?;

        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            session.start_transaction().await?;

            let outcome = match self.vote_steps(&mut session, ballot).await {
                Ok(()) => commit(&mut session).await,
                Err(err) => {
                    if let Err(abort_err) = session.abort_transaction().await {
                        debug!(error = %abort_err, "abort after failed vote step");
                    }
                    Err(err)
                }
            };

            match outcome {
                Err(err) if is_transient(&err) => {
                    warn!(
                        attempt,
                        category_id = %ballot.category_id,
                        error = %err,
                        "vote transaction conflict, retrying"
                    );
                }
                other => return other,
            }
        }

        Err(StoreError::Conflict {
            attempts: MAX_TRANSACTION_ATTEMPTS,
        })
    }

    async fn add_suggestion(&self, suggestion: &Suggestion) -> Result<String, StoreError> {
        let result = self.suggestions.insert_one(suggestion).await?;
        Ok(result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| result.inserted_id.to_string()))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let cursor = self
            .categories
            .find(doc! {})
            .sort(doc! { "order": 1, "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_nominees(&self, category_id: &str) -> Result<Vec<Nominee>, StoreError> {
        let cursor = self
            .nominees
            .find(doc! { "categoryId": category_id })
            .sort(doc! { "votes": -1, "name": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn upsert_category(&self, category: &Category) -> Result<(), StoreError> {
        self.categories
            .update_one(
                doc! { "_id": &category.id },
                doc! { "$set": {
                    "title": &category.title,
                    "description": &category.description,
                    "order": category.order,
                } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn insert_nominee_if_absent(
        &self,
        category_id: &str,
        name: &str,
        image_url: &str,
    ) -> Result<bool, StoreError> {
        let result = self
            .nominees
            .update_one(
                doc! { "categoryId": category_id, "name": name },
                doc! { "$setOnInsert": {
                    "_id": ObjectId::new().to_hex(),
                    "imageUrl": image_url,
                    "votes": 0_i64,
                } },
            )
            .upsert(true)
            .await?;

        let created = result.upserted_id.is_some();
        if created {
            info!(category_id, name, "nominee created");
        }
        Ok(created)
    }
}
