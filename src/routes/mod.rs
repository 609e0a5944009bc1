use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        catalog_service::CatalogService, sheet_sync_service::SheetSyncService, sheets::SheetClient,
        store::StoreHandle, suggestion_service::SuggestionService, vote_service::VoteService,
    },
};

pub mod catalog;
pub mod sheet;
pub mod suggest;
pub mod vote;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check OK")
    )
)]
pub async fn health_check() -> &'static str {
    "OK"
}

pub fn init_routes(
    store: StoreHandle,
    sheets: Option<Arc<dyn SheetClient>>,
    config: Arc<Config>,
) -> Router {
    let vote_service = Arc::new(VoteService::new(store.clone(), config.voting_ends_at));
    let suggestion_service = Arc::new(SuggestionService::new(store.clone()));
    let catalog_service = Arc::new(CatalogService::new(store.clone(), config.voting_ends_at));
    let sync_service = Arc::new(SheetSyncService::new(
        store,
        sheets,
        config.sheet_layout.clone(),
    ));

    Router::new()
        .route("/health", get(health_check))
        .merge(vote::vote_routes(vote_service))
        .merge(suggest::suggest_routes(suggestion_service))
        .merge(catalog::catalog_routes(catalog_service))
        .merge(sheet::sheet_routes(sync_service, config))
}
