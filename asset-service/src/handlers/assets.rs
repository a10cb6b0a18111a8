use crate::dtos::assets::{AssetListParams, CreateAssetRequest, UpdateAssetRequest};
use crate::dtos::{ApiResponse, BulkDeleteRequest, ListResponse};
use crate::models::{Asset, AssetAssignment, AssetHistory};
use crate::query::ListOptions;
use crate::services::{asset, assignment, history};
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

pub async fn create_asset(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssetRequest>,
) -> Result<ApiResponse<Asset>, AppError> {
    payload.validate()?;
    let asset = asset::create_asset(&state.db, payload).await?;
    Ok(ApiResponse::created("Asset created successfully", asset))
}

pub async fn get_all_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> Result<ListResponse<Asset>, AppError> {
    let page = asset::query_assets(&state.db, &params).await?;
    Ok(ListResponse::from_page("Assets fetched successfully", page))
}

pub async fn get_asset_by_id(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<ApiResponse<Asset>, AppError> {
    let asset = asset::get_asset_by_id(&state.db, &asset_id).await?;
    Ok(ApiResponse::ok("Asset fetched successfully", asset))
}

pub async fn update_asset_by_id(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Json(payload): Json<UpdateAssetRequest>,
) -> Result<ApiResponse<Asset>, AppError> {
    payload.validate()?;
    let asset = asset::update_asset_by_id(&state.db, &asset_id, payload).await?;
    Ok(ApiResponse::ok("Asset updated successfully", asset))
}

pub async fn delete_asset_by_id(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    asset::delete_asset_by_id(&state.db, &asset_id).await?;
    Ok(ApiResponse::message("Asset deleted successfully"))
}

pub async fn bulk_delete_assets(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    asset::delete_assets_by_ids(&state.db, &payload.ids).await?;
    Ok(ApiResponse::message("Assets deleted successfully"))
}

pub async fn get_asset_assignments(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<AssetAssignment>, AppError> {
    let page = assignment::get_assignments_by_asset_id(&state.db, &asset_id, &options).await?;
    Ok(ListResponse::from_page(
        "Assignments fetched successfully",
        page,
    ))
}

pub async fn get_asset_history(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<AssetHistory>, AppError> {
    let page = history::get_asset_histories_by_asset_id(&state.db, &asset_id, &options).await?;
    Ok(ListResponse::from_page(
        "Asset history fetched successfully",
        page,
    ))
}
