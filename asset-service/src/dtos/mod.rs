pub mod assets;
pub mod assignments;
pub mod auth;
pub mod branches;
pub mod departments;
pub mod envelope;
pub mod organizations;
pub mod users;

pub use envelope::{ApiResponse, ListResponse};

use serde::Deserialize;
use validator::Validate;

/// Body for the bulk-delete endpoints. The whole batch is validated before
/// anything is deleted.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, message = "At least one id is required"))]
    pub ids: Vec<String>,
}
