use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel document: its existence means `ip` already voted in `category_id`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpVote {
    #[serde(rename = "_id")]
    pub key: String,
    pub ip: String,
    pub category_id: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub voted_at: DateTime<Utc>,
}

impl IpVote {
    pub fn new(ip: &str, category_id: &str, voted_at: DateTime<Utc>) -> Self {
        IpVote {
            key: guard_key(ip, category_id),
            ip: ip.to_string(),
            category_id: category_id.to_string(),
            voted_at,
        }
    }
}

/// `{ip with dots replaced}_{categoryId}`
pub fn guard_key(ip: &str, category_id: &str) -> String {
    format!("{}_{}", ip.replace('.', "_"), category_id)
}
