use serde::Deserialize;
use utoipa::ToSchema;

/// Request DTO for `POST /vote`. Fields are optional so that a missing id
/// surfaces as a validation error rather than a JSON rejection.
#[derive(Deserialize, ToSchema, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub category_id: Option<String>,
    pub nominee_id: Option<String>,
}
