use crate::dtos::organizations::{CreateOrganizationRequest, UpdateOrganizationRequest};
use crate::dtos::{ApiResponse, BulkDeleteRequest, ListResponse};
use crate::models::Organization;
use crate::query::ListOptions;
use crate::services::organization;
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

pub async fn create_organization(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<ApiResponse<Organization>, AppError> {
    payload.validate()?;
    let organization = organization::create_organization(&state.db, payload).await?;
    Ok(ApiResponse::created(
        "Organization created successfully",
        organization,
    ))
}

pub async fn get_all_organizations(
    State(state): State<AppState>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<Organization>, AppError> {
    let page = organization::query_organizations(&state.db, &options).await?;
    Ok(ListResponse::from_page(
        "Organizations fetched successfully",
        page,
    ))
}

pub async fn get_organization_by_id(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> Result<ApiResponse<Organization>, AppError> {
    let organization = organization::get_organization_by_id(&state.db, &organization_id).await?;
    Ok(ApiResponse::ok(
        "Organization fetched successfully",
        organization,
    ))
}

pub async fn update_organization_by_id(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> Result<ApiResponse<Organization>, AppError> {
    payload.validate()?;
    let organization =
        organization::update_organization_by_id(&state.db, &organization_id, payload).await?;
    Ok(ApiResponse::ok(
        "Organization updated successfully",
        organization,
    ))
}

pub async fn delete_organization_by_id(
    State(state): State<AppState>,
    Path(organization_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    organization::delete_organization_by_id(&state.db, &organization_id).await?;
    Ok(ApiResponse::message("Organization deleted successfully"))
}

pub async fn bulk_delete_organizations(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    organization::delete_organizations_by_ids(&state.db, &payload.ids).await?;
    Ok(ApiResponse::message("Organizations deleted successfully"))
}
