use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to an asset. A closed enum so rendering and filtering are
/// exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    Assigned,
    Unassigned,
    AssignmentUpdated,
    AssignmentDeleted,
}

/// Append-only audit record of an assignment action. Rows are never
/// updated, only soft-deleted when a parent entity cascade reaches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHistory {
    #[serde(rename = "_id")]
    pub id: String,

    pub asset_id: String,

    pub user_id: String,

    pub action: HistoryAction,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,

    pub deleted: bool,
}

impl AssetHistory {
    pub fn new(asset_id: String, user_id: String, action: HistoryAction) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            asset_id,
            user_id,
            action,
            timestamp: Utc::now(),
            deleted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_values() {
        assert_eq!(
            serde_json::to_value(HistoryAction::Assigned).unwrap(),
            "ASSIGNED"
        );
        assert_eq!(
            serde_json::to_value(HistoryAction::Unassigned).unwrap(),
            "UNASSIGNED"
        );
        assert_eq!(
            serde_json::to_value(HistoryAction::AssignmentUpdated).unwrap(),
            "ASSIGNMENT_UPDATED"
        );
        assert_eq!(
            serde_json::to_value(HistoryAction::AssignmentDeleted).unwrap(),
            "ASSIGNMENT_DELETED"
        );
    }
}
