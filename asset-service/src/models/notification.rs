use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user notification written alongside asset history on assignment
/// actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    pub message: String,

    pub read: bool,

    pub deleted: bool,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            message,
            read: false,
            deleted: false,
            created_at: Utc::now(),
        }
    }
}
