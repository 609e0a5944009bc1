use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utoipa::{openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme}, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    routes::init_routes,
    services::{
        mongo_store::MongoStore,
        sheets::{GoogleSheetsClient, SheetClient},
        store::{StoreHandle, VoteStore},
    },
};

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health_check,
        routes::vote::cast_vote,
        routes::suggest::submit_suggestion,
        routes::catalog::list_categories,
        routes::catalog::list_nominees,
        routes::catalog::voting_status,
        routes::sheet::update_sheet,
        routes::sheet::import_sheet,
    ),
    components(
        schemas(
            models::ApiMessage,
            models::vote::VoteRequest,
            models::suggestion::SuggestionRequest,
            models::suggestion::SuggestionResponse,
            models::category::CategoryResponse,
            models::nominee::NomineeResponse,
            services::catalog_service::VotingStatus,
            services::catalog_service::TimeRemaining,
            services::sheet_sync_service::SyncReport,
            services::sheet_sync_service::ImportReport,
        ),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

/// Registers the `bearer_auth` scheme used by the cron-protected sheet endpoints.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let comps = openapi.components.get_or_insert_with(Default::default);
        comps.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

async fn connect_store(config: &Config) -> StoreHandle {
    let Some(uri) = config.mongodb_uri.as_deref() else {
        return StoreHandle::unconfigured();
    };

    match db::init_db(uri, &config.mongodb_database).await {
        Ok(db) => {
            let store: Arc<dyn VoteStore> = Arc::new(MongoStore::new(&db));
            info!(backend = store.backend_tag(), database = %config.mongodb_database, "document store ready");
            StoreHandle::new(store)
        }
        Err(e) => {
            error!(error = %e, "document store initialization failed");
            StoreHandle::unconfigured()
        }
    }
}

fn connect_sheets(config: &Config) -> Option<Arc<dyn SheetClient>> {
    let spreadsheet_id = config.spreadsheet_id.clone()?;
    let account = config.service_account.clone()?;

    match GoogleSheetsClient::new(spreadsheet_id, account) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            error!(error = %e, "spreadsheet client initialization failed");
            None
        }
    }
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    dotenv::dotenv().ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let config = Config::from_secrets(&secrets).map_err(shuttle_runtime::CustomError::new)?;
    info!(?config, "configuration loaded");

    let store = connect_store(&config).await;
    let sheets = connect_sheets(&config);

    let app = Router::new()
        .merge(init_routes(store, sheets, Arc::new(config)))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app.into())
}

#[cfg(test)]
mod tests;
