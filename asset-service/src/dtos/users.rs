use crate::models::{UserRole, UserStatus};
use crate::query::ListOptions;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "User name is required"))]
    pub user_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub user_role: UserRole,

    #[validate(length(min = 1, message = "Branch id is required"))]
    pub branch_id: String,

    #[validate(length(min = 1, message = "Department id is required"))]
    pub department_id: String,

    #[validate(length(min = 1, message = "Company id is required"))]
    pub company_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "User name cannot be empty"))]
    pub user_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Phone cannot be empty"))]
    pub phone: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub user_role: Option<UserRole>,

    pub status: Option<UserStatus>,
}

/// Query parameters for the user listing endpoint.
///
/// Pagination fields are declared inline because `axum::extract::Query`
/// cannot flatten nested structs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub status: Option<UserStatus>,
    pub branch_id: Option<String>,
    pub department_id: Option<String>,

    pub page: Option<u64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub search_term: Option<String>,
}

impl UserListParams {
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
