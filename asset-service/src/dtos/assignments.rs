use crate::models::{AssignmentStatus, HistoryAction};
use crate::query::ListOptions;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignAssetRequest {
    #[validate(length(min = 1, message = "Asset id is required"))]
    pub asset_id: String,

    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,
}

/// Reassignment payload. At least one of the two fields must be present;
/// an absent field keeps the current value.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    #[validate(length(min = 1, message = "Asset id cannot be empty"))]
    pub asset_id: Option<String>,

    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListParams {
    pub asset_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<AssignmentStatus>,

    pub page: Option<u64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub search_term: Option<String>,
}

impl AssignmentListParams {
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            page: self.page,
            limit: self.limit,
            sort_by: self.sort_by.clone(),
            sort_type: self.sort_type.clone(),
            search_term: self.search_term.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListParams {
    pub asset_id: Option<String>,
    pub user_id: Option<String>,
    pub action: Option<HistoryAction>,

    pub page: Option<u64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub search_term: Option<String>,
}

impl HistoryListParams {
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            page: self.page,
            limit: self.limit,
            sort_by: self.sort_by.clone(),
            sort_type: self.sort_type.clone(),
            search_term: self.search_term.clone(),
        }
    }
}
