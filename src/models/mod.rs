use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod category;
pub mod ip_vote;
pub mod nominee;
pub mod suggestion;
pub mod vote;

/// `{success, message}` body shared by every endpoint.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}
