use crate::services::Page;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Single-entity response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, Some(data))
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, Some(data))
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, message, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Listing response envelope with pagination metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: Vec<T>,
    pub total_data: u64,
    pub page: u64,
    pub limit: i64,
    pub total_pages: u64,
    pub mode: &'static str,
}

impl<T: Serialize> ListResponse<T> {
    pub fn from_page(message: impl Into<String>, page: Page<T>) -> Self {
        let total_pages = page.query.total_pages(page.total);
        Self {
            success: true,
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: page.data,
            total_data: page.total,
            page: page.query.page,
            limit: page.query.limit,
            total_pages,
            mode: page.query.mode.as_str(),
        }
    }

    /// Same as `from_page` but maps each row first, for endpoints that
    /// return a trimmed view of the stored model.
    pub fn from_page_mapped<U, F>(message: impl Into<String>, page: Page<U>, map: F) -> Self
    where
        F: FnMut(U) -> T,
    {
        let total_pages = page.query.total_pages(page.total);
        Self {
            success: true,
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: page.data.into_iter().map(map).collect(),
            total_data: page.total,
            page: page.query.page,
            limit: page.query.limit,
            total_pages,
            mode: page.query.mode.as_str(),
        }
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ListOptions, QueryMode, ResolvedQuery};

    #[test]
    fn test_envelope_fields_are_camel_case() {
        let body = ApiResponse::ok("Done", serde_json::json!({ "x": 1 }));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["message"], "Done");
        assert_eq!(value["data"]["x"], 1);
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let value = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_list_envelope_metadata() {
        let query = ResolvedQuery::resolve(&ListOptions::default(), "createdAt");
        let page = Page {
            data: vec![1, 2, 3],
            total: 23,
            query,
        };
        let value = serde_json::to_value(ListResponse::from_page("Fetched", page)).unwrap();
        assert_eq!(value["totalData"], 23);
        assert_eq!(value["page"], 1);
        assert_eq!(value["limit"], 10);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["mode"], QueryMode::Pagination.as_str());
    }
}
