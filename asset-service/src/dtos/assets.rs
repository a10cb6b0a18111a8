use crate::models::AssetStatus;
use crate::query::ListOptions;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, message = "Asset name is required"))]
    pub asset_name: String,

    #[validate(length(min = 1, message = "Unique id is required"))]
    pub unique_id: String,

    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,

    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,

    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,

    #[validate(length(min = 1, message = "Branch id is required"))]
    pub branch_id: String,

    #[validate(length(min = 1, message = "Department id is required"))]
    pub department_id: String,

    #[validate(length(min = 1, message = "Company id is required"))]
    pub company_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, message = "Asset name cannot be empty"))]
    pub asset_name: Option<String>,

    #[validate(length(min = 1, message = "Unique id cannot be empty"))]
    pub unique_id: Option<String>,

    #[validate(length(min = 1, message = "Brand cannot be empty"))]
    pub brand: Option<String>,

    #[validate(length(min = 1, message = "Model cannot be empty"))]
    pub model: Option<String>,

    #[validate(length(min = 1, message = "Serial number cannot be empty"))]
    pub serial_number: Option<String>,

    pub status: Option<AssetStatus>,
}

/// Query parameters for the asset listing endpoint. Date bounds are
/// RFC 3339 strings applied against `createdAt`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListParams {
    pub asset_name: Option<String>,
    pub status: Option<AssetStatus>,
    pub branch_id: Option<String>,
    pub department_id: Option<String>,
    #[serde(rename = "from_date")]
    pub from_date: Option<String>,
    #[serde(rename = "to_date")]
    pub to_date: Option<String>,

    pub page: Option<u64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub search_term: Option<String>,
}

impl AssetListParams {
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
