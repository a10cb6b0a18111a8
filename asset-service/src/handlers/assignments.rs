use crate::dtos::assignments::{
    AssignAssetRequest, AssignmentListParams, HistoryListParams, UpdateAssignmentRequest,
};
use crate::dtos::{ApiResponse, BulkDeleteRequest, ListResponse};
use crate::models::{Asset, AssetAssignment, AssetHistory, SanitizedUser};
use crate::query::ListOptions;
use crate::services::{assignment, asset, history, user};
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

pub async fn assign_asset(
    State(state): State<AppState>,
    Json(payload): Json<AssignAssetRequest>,
) -> Result<ApiResponse<AssetAssignment>, AppError> {
    payload.validate()?;
    let assignment =
        assignment::assign_asset(&state.db, &payload.asset_id, &payload.user_id).await?;
    Ok(ApiResponse::created(
        "Asset assigned successfully",
        assignment,
    ))
}

pub async fn get_asset_assignments(
    State(state): State<AppState>,
    Query(params): Query<AssignmentListParams>,
) -> Result<ListResponse<AssetAssignment>, AppError> {
    let page = assignment::get_asset_assignments(&state.db, &params).await?;
    Ok(ListResponse::from_page(
        "Assignments fetched successfully",
        page,
    ))
}

pub async fn get_assignment_by_id(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<ApiResponse<AssetAssignment>, AppError> {
    let assignment = assignment::get_assignment_by_id(&state.db, &assignment_id).await?;
    Ok(ApiResponse::ok("Assignment fetched successfully", assignment))
}

pub async fn unassign_asset(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<ApiResponse<AssetAssignment>, AppError> {
    let assignment = assignment::unassign_asset(&state.db, &assignment_id).await?;
    Ok(ApiResponse::ok("Asset unassigned successfully", assignment))
}

pub async fn update_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    Json(payload): Json<UpdateAssignmentRequest>,
) -> Result<ApiResponse<AssetAssignment>, AppError> {
    payload.validate()?;
    let assignment = assignment::update_assignment(&state.db, &assignment_id, payload).await?;
    Ok(ApiResponse::ok("Assignment updated successfully", assignment))
}

pub async fn delete_assignment_by_id(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    assignment::delete_assignment_by_id(&state.db, &assignment_id).await?;
    Ok(ApiResponse::message("Assignment deleted successfully"))
}

pub async fn bulk_delete_assignments(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    assignment::delete_assignments_by_ids(&state.db, &payload.ids).await?;
    Ok(ApiResponse::message("Assignments deleted successfully"))
}

pub async fn get_available_assets(
    State(state): State<AppState>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<Asset>, AppError> {
    let page = asset::get_available_assets(&state.db, &options).await?;
    Ok(ListResponse::from_page(
        "Available assets fetched successfully",
        page,
    ))
}

pub async fn get_assignable_users(
    State(state): State<AppState>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<SanitizedUser>, AppError> {
    let page = user::get_assignable_users(&state.db, &options).await?;
    Ok(ListResponse::from_page_mapped(
        "Assignable users fetched successfully",
        page,
        SanitizedUser::from,
    ))
}

pub async fn get_asset_histories(
    State(state): State<AppState>,
    Query(params): Query<HistoryListParams>,
) -> Result<ListResponse<AssetHistory>, AppError> {
    let page = history::query_asset_histories(&state.db, &params).await?;
    Ok(ListResponse::from_page(
        "Asset histories fetched successfully",
        page,
    ))
}
