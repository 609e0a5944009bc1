use std::fmt;

use chrono::{DateTime, Utc};
use shuttle_runtime::SecretStore;
use tracing::{info, warn};

use crate::error::AppError;

pub const DEFAULT_DATABASE: &str = "awards_db";
pub const DEFAULT_VOTING_END: &str = "2025-08-16T20:59:59Z";

#[derive(Clone)]
pub struct ServiceAccount {
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Where the sync job reads nominee names and writes vote counts.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub names_column: String,
    pub votes_column: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            names_column: "D".to_string(),
            votes_column: "F".to_string(),
        }
    }
}

impl SheetLayout {
    /// Data rows start below the header row.
    pub fn names_range(&self) -> String {
        format!("{0}!{1}2:{1}", self.sheet_name, self.names_column)
    }

    pub fn votes_range(&self) -> String {
        format!("{0}!{1}2:{1}", self.sheet_name, self.votes_column)
    }

    /// Header row included.
    pub fn import_range(&self) -> String {
        format!("{}!A1:Z", self.sheet_name)
    }
}

#[derive(Clone)]
pub struct Config {
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub service_account: Option<ServiceAccount>,
    pub spreadsheet_id: Option<String>,
    pub sheet_layout: SheetLayout,
    pub cron_secret: Option<String>,
    pub voting_ends_at: DateTime<Utc>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mongodb_configured", &self.mongodb_uri.is_some())
            .field("mongodb_database", &self.mongodb_database)
            .field("service_account", &self.service_account)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_layout", &self.sheet_layout)
            .field("cron_secret_configured", &self.cron_secret.is_some())
            .field("voting_ends_at", &self.voting_ends_at)
            .finish()
    }
}

impl Config {
    /// Shuttle secrets first, then the process environment (`.env` included).
    pub fn from_secrets(secrets: &SecretStore) -> Result<Self, AppError> {
        Self::from_lookup(|key| secrets.get(key).or_else(|| std::env::var(key).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let var_or = |key: &str, default: &str| {
            var(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };

        let service_account = match (var("GCS_CLIENT_EMAIL"), var("GCS_PRIVATE_KEY")) {
            (Some(client_email), Some(private_key)) => Some(ServiceAccount {
                project_id: var("GCS_PROJECT_ID"),
                client_email,
                private_key: private_key.replace("\\n", "\n"),
            }),
            _ => {
                warn!("GCS_CLIENT_EMAIL / GCS_PRIVATE_KEY not set, spreadsheet endpoints disabled");
                None
            }
        };

        let mongodb_uri = var("MONGODB_URI");
        if mongodb_uri.is_none() {
            warn!("MONGODB_URI not set, document store disabled");
        }

        let cron_secret = var("CRON_SECRET");
        if cron_secret.is_none() {
            warn!("CRON_SECRET not set, sheet endpoints will refuse every caller");
        }

        let end = var_or("VOTING_END_DATE", DEFAULT_VOTING_END);
        let voting_ends_at = DateTime::parse_from_rfc3339(&end)
            .map_err(|e| AppError::Config(format!("VOTING_END_DATE {end:?} is not RFC 3339: {e}")))?
            .with_timezone(&Utc);

        Ok(Config {
            mongodb_uri,
            mongodb_database: var_or("MONGODB_DATABASE", DEFAULT_DATABASE),
            service_account,
            spreadsheet_id: var("GOOGLE_SHEET_ID"),
            sheet_layout: SheetLayout {
                sheet_name: var_or("SHEET_NAME", "Sheet1"),
                names_column: var_or("SHEET_NAMES_COLUMN", "D"),
                votes_column: var_or("SHEET_VOTES_COLUMN", "F"),
            },
            cron_secret,
            voting_ends_at,
        })
    }
}
