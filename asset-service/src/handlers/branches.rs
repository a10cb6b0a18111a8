use crate::dtos::branches::{CreateBranchRequest, UpdateBranchRequest};
use crate::dtos::{ApiResponse, BulkDeleteRequest, ListResponse};
use crate::models::Branch;
use crate::query::ListOptions;
use crate::services::branch;
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

pub async fn create_branch(
    State(state): State<AppState>,
    Json(payload): Json<CreateBranchRequest>,
) -> Result<ApiResponse<Branch>, AppError> {
    payload.validate()?;
    let branch = branch::create_branch(&state.db, payload).await?;
    Ok(ApiResponse::created("Branch created successfully", branch))
}

pub async fn get_all_branches(
    State(state): State<AppState>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<Branch>, AppError> {
    let page = branch::query_branches(&state.db, &options).await?;
    Ok(ListResponse::from_page("Branches fetched successfully", page))
}

pub async fn get_branch_by_id(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
) -> Result<ApiResponse<Branch>, AppError> {
    let branch = branch::get_branch_by_id(&state.db, &branch_id).await?;
    Ok(ApiResponse::ok("Branch fetched successfully", branch))
}

pub async fn update_branch_by_id(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
    Json(payload): Json<UpdateBranchRequest>,
) -> Result<ApiResponse<Branch>, AppError> {
    payload.validate()?;
    let branch = branch::update_branch_by_id(&state.db, &branch_id, payload).await?;
    Ok(ApiResponse::ok("Branch updated successfully", branch))
}

pub async fn delete_branch_by_id(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    branch::delete_branch_by_id(&state.db, &branch_id).await?;
    Ok(ApiResponse::message("Branch deleted successfully"))
}

pub async fn bulk_delete_branches(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    branch::delete_branches_by_ids(&state.db, &payload.ids).await?;
    Ok(ApiResponse::message("Branches deleted successfully"))
}
