use crate::dtos::users::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::dtos::{ApiResponse, BulkDeleteRequest, ListResponse};
use crate::models::SanitizedUser;
use crate::services::user;
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<ApiResponse<SanitizedUser>, AppError> {
    payload.validate()?;
    let user = user::create_user(&state.db, payload).await?;
    Ok(ApiResponse::created(
        "User created successfully",
        SanitizedUser::from(user),
    ))
}

pub async fn get_all_users(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> Result<ListResponse<SanitizedUser>, AppError> {
    let page = user::query_users(&state.db, &params).await?;
    Ok(ListResponse::from_page_mapped(
        "Users fetched successfully",
        page,
        SanitizedUser::from,
    ))
}

pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<SanitizedUser>, AppError> {
    let user = user::get_user_by_id(&state.db, &user_id).await?;
    Ok(ApiResponse::ok(
        "User fetched successfully",
        SanitizedUser::from(user),
    ))
}

pub async fn update_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<ApiResponse<SanitizedUser>, AppError> {
    payload.validate()?;
    let user = user::update_user_by_id(&state.db, &user_id, payload).await?;
    Ok(ApiResponse::ok(
        "User updated successfully",
        SanitizedUser::from(user),
    ))
}

pub async fn delete_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    user::delete_user_by_id(&state.db, &user_id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

pub async fn bulk_delete_users(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    user::delete_users_by_ids(&state.db, &payload.ids).await?;
    Ok(ApiResponse::message("Users deleted successfully"))
}
