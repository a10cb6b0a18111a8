use crate::dtos::{ApiResponse, ListResponse};
use crate::models::Notification;
use crate::query::ListOptions;
use crate::services::notification;
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use service_core::error::AppError;

pub async fn get_user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<Notification>, AppError> {
    let page = notification::get_user_notifications(&state.db, &user_id, &options).await?;
    Ok(ListResponse::from_page(
        "Notifications fetched successfully",
        page,
    ))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    notification::mark_notification_read(&state.db, &notification_id).await?;
    Ok(ApiResponse::message("Notification marked as read"))
}
