use crate::dtos::departments::{CreateDepartmentRequest, UpdateDepartmentRequest};
use crate::dtos::{ApiResponse, BulkDeleteRequest, ListResponse};
use crate::models::{Asset, Department, SanitizedUser};
use crate::query::ListOptions;
use crate::services::{asset, department, user};
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use service_core::error::AppError;
use validator::Validate;

pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> Result<ApiResponse<Department>, AppError> {
    payload.validate()?;
    let department = department::create_department(&state.db, payload).await?;
    Ok(ApiResponse::created(
        "Department created successfully",
        department,
    ))
}

pub async fn get_all_departments(
    State(state): State<AppState>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<Department>, AppError> {
    let page = department::query_departments(&state.db, &options).await?;
    Ok(ListResponse::from_page(
        "Departments fetched successfully",
        page,
    ))
}

pub async fn get_department_by_id(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> Result<ApiResponse<Department>, AppError> {
    let department = department::get_department_by_id(&state.db, &department_id).await?;
    Ok(ApiResponse::ok("Department fetched successfully", department))
}

pub async fn update_department_by_id(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> Result<ApiResponse<Department>, AppError> {
    payload.validate()?;
    let department =
        department::update_department_by_id(&state.db, &department_id, payload).await?;
    Ok(ApiResponse::ok("Department updated successfully", department))
}

pub async fn delete_department_by_id(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    department::delete_department_by_id(&state.db, &department_id).await?;
    Ok(ApiResponse::message("Department deleted successfully"))
}

pub async fn bulk_delete_departments(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    department::delete_departments_by_ids(&state.db, &payload.ids).await?;
    Ok(ApiResponse::message("Departments deleted successfully"))
}

pub async fn get_department_assets(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<Asset>, AppError> {
    let page = asset::get_assets_by_department_id(&state.db, &department_id, &options).await?;
    Ok(ListResponse::from_page("Assets fetched successfully", page))
}

pub async fn get_department_users(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
    Query(options): Query<ListOptions>,
) -> Result<ListResponse<SanitizedUser>, AppError> {
    let page = user::get_users_by_department_id(&state.db, &department_id, &options).await?;
    Ok(ListResponse::from_page_mapped(
        "Users fetched successfully",
        page,
        SanitizedUser::from,
    ))
}
