use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DB model. Nominees live in their own collection and point back at the
/// owning category through `categoryId`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nominee {
    #[serde(rename = "_id")]
    pub id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub votes: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NomineeResponse {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub votes: i64,
}

impl From<Nominee> for NomineeResponse {
    fn from(n: Nominee) -> Self {
        NomineeResponse {
            id: n.id,
            name: n.name,
            image_url: n.image_url,
            votes: n.votes,
        }
    }
}
