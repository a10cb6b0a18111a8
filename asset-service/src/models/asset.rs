use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    /// Available for assignment.
    Active,
    /// Currently assigned to a user.
    InUse,
    UnderMaintenance,
    Retired,
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssetStatus::Active => "ACTIVE",
            AssetStatus::InUse => "IN_USE",
            AssetStatus::UnderMaintenance => "UNDER_MAINTENANCE",
            AssetStatus::Retired => "RETIRED",
        };
        f.write_str(s)
    }
}

/// A trackable asset. `assigned_to_user_id` is a denormalized mirror of the
/// asset's current active assignment and is only ever written inside the
/// same transaction as the assignment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "_id")]
    pub id: String,

    pub asset_name: String,

    /// Globally unique among non-deleted assets.
    pub unique_id: String,

    pub brand: String,

    pub model: String,

    pub serial_number: String,

    pub status: AssetStatus,

    pub assigned_to_user_id: Option<String>,

    pub branch_id: String,

    pub department_id: String,

    pub company_id: String,

    pub deleted: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<mongodb::bson::DateTime>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        asset_name: String,
        unique_id: String,
        brand: String,
        model: String,
        serial_number: String,
        branch_id: String,
        department_id: String,
        company_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            asset_name,
            unique_id,
            brand,
            model,
            serial_number,
            status: AssetStatus::Active,
            assigned_to_user_id: None,
            branch_id,
            department_id,
            company_id,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
