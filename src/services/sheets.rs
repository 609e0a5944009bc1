//! Google Sheets v4 `values` API.
//!
//! Authentication is the service-account flow: a short-lived JWT assertion
//! signed with the account's RSA key is exchanged for a bearer token at
//! Google's token endpoint. A fresh token is fetched per call, nothing is
//! cached between requests.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ServiceAccount;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid service account credentials: {0}")]
    Credentials(#[from] jsonwebtoken::errors::Error),
}

#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Cell values of an A1 range, row by row, rendered as text. Blank rows
    /// inside the range come back as empty rows.
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError>;

    /// Overwrites a single-column range, one value per row, starting at the
    /// range's first cell.
    async fn write_column(&self, range: &str, values: &[i64]) -> Result<(), SheetError>;
}

pub struct GoogleSheetsClient {
    client: Client,
    spreadsheet_id: String,
    account: ServiceAccount,
    signing_key: EncodingKey,
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl GoogleSheetsClient {
    pub fn new(spreadsheet_id: String, account: ServiceAccount) -> Result<Self, SheetError> {
        let signing_key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;

        Ok(Self {
            client: Client::new(),
            spreadsheet_id,
            account,
            signing_key,
        })
    }

    async fn access_token(&self) -> Result<String, SheetError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.account.client_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)?;

        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let token: TokenResponse = check_status(resp).await?.json().await?;
        debug!("obtained sheets access token");
        Ok(token.access_token)
    }

    fn values_url(&self, range: &str) -> String {
        format!("{SHEETS_API}/{}/values/{range}", self.spreadsheet_id)
    }

    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, SheetError> {
        let token = self.access_token().await?;
        let builder = builder.bearer_auth(token);
        Ok(match &self.account.project_id {
            Some(project) => builder.header("x-goog-user-project", project),
            None => builder,
        })
    }
}

async fn check_status(resp: Response) -> Result<Response, SheetError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SheetError::Api {
        status: status.as_u16(),
        body,
    })
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetClient for GoogleSheetsClient {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        let request = self.authorized(self.client.get(self.values_url(range))).await?;
        let resp = check_status(request.send().await?).await?;
        let body: ValueRange = resp.json().await?;

        info!(range, rows = body.values.len(), "read sheet range");
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn write_column(&self, range: &str, values: &[i64]) -> Result<(), SheetError> {
        let rows: Vec<[i64; 1]> = values.iter().map(|v| [*v]).collect();
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });

        let request = self
            .authorized(
                self.client
                    .put(self.values_url(range))
                    .query(&[("valueInputOption", "RAW")])
                    .json(&body),
            )
            .await?;
        check_status(request.send().await?).await?;

        info!(range, rows = values.len(), "wrote sheet column");
        Ok(())
    }
}
