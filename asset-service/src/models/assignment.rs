use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Occupancy state of an assignment. `InUse` while the user holds the
/// asset, `Retired` once the interval has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    InUse,
    Retired,
}

/// One occupancy interval of an asset by a user. At most one assignment per
/// asset may be `IN_USE` at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAssignment {
    #[serde(rename = "_id")]
    pub id: String,

    pub asset_id: String,

    pub user_id: String,

    pub status: AssignmentStatus,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub assigned_at: DateTime<Utc>,

    pub deleted: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<mongodb::bson::DateTime>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl AssetAssignment {
    pub fn new(asset_id: String, user_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            asset_id,
            user_id,
            status: AssignmentStatus::InUse,
            assigned_at: now,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
