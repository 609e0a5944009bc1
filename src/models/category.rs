use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DB model (stored in the `categories` collection)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Response DTO (what the API returns)
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub title: String,
    pub order: i32,
    pub description: String,
    pub icon_url: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            title: c.title,
            order: c.order,
            description: c.description,
            icon_url: c.icon_url,
        }
    }
}

/// Category ids are derived from titles: lower-cased, with spaces and
/// slashes turned into dashes.
pub fn category_slug(title: &str) -> String {
    title.trim().to_lowercase().replace([' ', '/'], "-")
}
