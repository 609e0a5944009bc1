use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::utils::bearer_matches;

/// Middleware for `middleware::from_fn_with_state`.
/// - Requires `Authorization: Bearer <CRON_SECRET>`.
/// - A deployment without `CRON_SECRET` rejects everyone with a configuration error.
pub async fn cron_auth(
    State(config): State<Arc<Config>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let secret = config
        .cron_secret
        .as_deref()
        .ok_or_else(|| AppError::Config("CRON_SECRET is not configured".to_string()))?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if !bearer_matches(header, secret) {
        return Err(AppError::Auth);
    }

    Ok(next.run(req).await)
}
