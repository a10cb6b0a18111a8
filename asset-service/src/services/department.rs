use super::cascade::{self, CascadeSet};
use super::database::{not_deleted, MongoDb};
use super::{count_phrase, find_page, Page};
use crate::dtos::departments::{CreateDepartmentRequest, UpdateDepartmentRequest};
use crate::models::Department;
use crate::query::{with_search, ListOptions, ResolvedQuery};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use service_core::error::AppError;

pub async fn create_department(
    db: &MongoDb,
    payload: CreateDepartmentRequest,
) -> Result<Department, AppError> {
    let parent = db
        .branches()
        .find_one(not_deleted(doc! { "_id": &payload.branch_id }), None)
        .await?;
    if parent.is_none() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Branch does not exist"
        )));
    }

    // Department names are unique within their branch among live rows.
    let collision = db
        .departments()
        .find_one(
            not_deleted(doc! {
                "departmentName": &payload.department_name,
                "branchId": &payload.branch_id,
            }),
            None,
        )
        .await?;
    if collision.is_some() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Department with this name already exists in this branch"
        )));
    }

    let department = Department::new(payload.department_name, payload.branch_id);
    db.departments().insert_one(&department, None).await?;

    tracing::info!(department_id = %department.id, "Department created");
    Ok(department)
}

pub async fn query_departments(
    db: &MongoDb,
    options: &ListOptions,
) -> Result<Page<Department>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = with_search(
        not_deleted(doc! {}),
        &["departmentName"],
        options.search_term(),
    );
    find_page(&db.departments(), filter, query).await
}

pub async fn get_department_by_id(db: &MongoDb, id: &str) -> Result<Department, AppError> {
    db.departments()
        .find_one(not_deleted(doc! { "_id": id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Department not found")))
}

pub async fn update_department_by_id(
    db: &MongoDb,
    id: &str,
    payload: UpdateDepartmentRequest,
) -> Result<Department, AppError> {
    let current = get_department_by_id(db, id).await?;

    let mut set = doc! { "updatedAt": Utc::now() };
    if let Some(name) = payload.department_name {
        if name != current.department_name {
            let collision = db
                .departments()
                .find_one(
                    not_deleted(doc! {
                        "departmentName": &name,
                        "branchId": &current.branch_id,
                        "_id": { "$ne": id },
                    }),
                    None,
                )
                .await?;
            if collision.is_some() {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Department with this name already exists in this branch"
                )));
            }
        }
        set.insert("departmentName", name);
    }

    db.departments()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    get_department_by_id(db, id).await
}

/// Human-readable description of what blocks a department delete, or `None`
/// when nothing does.
async fn blocking_dependents(db: &MongoDb, department_id: &str) -> Result<Option<String>, AppError> {
    let active_users = db
        .users()
        .count_documents(not_deleted(doc! { "departmentId": department_id }), None)
        .await?;
    let active_assets = db
        .assets()
        .count_documents(not_deleted(doc! { "departmentId": department_id }), None)
        .await?;

    let mut parts = Vec::new();
    if active_users > 0 {
        parts.push(count_phrase(active_users, "user"));
    }
    if active_assets > 0 {
        parts.push(count_phrase(active_assets, "asset"));
    }

    Ok((!parts.is_empty()).then(|| parts.join(" and ")))
}

pub async fn delete_department_by_id(db: &MongoDb, id: &str) -> Result<(), AppError> {
    let department = db
        .departments()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Department not found")))?;
    if department.deleted {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Department is already deleted"
        )));
    }

    if let Some(blocking) = blocking_dependents(db, id).await? {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "This department has {} and cannot be deleted.",
            blocking
        )));
    }

    let set = CascadeSet::for_departments(db, vec![id.to_string()]).await?;
    cascade::run(db, &set).await?;

    tracing::info!(department_id = %id, "Department soft-deleted");
    Ok(())
}

pub async fn delete_departments_by_ids(db: &MongoDb, ids: &[String]) -> Result<(), AppError> {
    let mut found = Vec::new();
    let mut cursor = db
        .departments()
        .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
        .await?;
    while let Some(department) = cursor.try_next().await? {
        found.push(department);
    }

    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !found.iter().any(|d| &d.id == *id))
        .map(|s| s.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Departments not found: {}",
            missing.join(", ")
        )));
    }

    let already_deleted: Vec<&str> = found
        .iter()
        .filter(|d| d.deleted)
        .map(|d| d.id.as_str())
        .collect();
    if !already_deleted.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Departments already deleted: {}",
            already_deleted.join(", ")
        )));
    }

    // Collect every blocking condition across the batch before failing.
    let mut blocking = Vec::new();
    for department in &found {
        if let Some(dependents) = blocking_dependents(db, &department.id).await? {
            blocking.push(format!(
                "department {} has {}",
                department.department_name, dependents
            ));
        }
    }
    if !blocking.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Cannot delete: {}.",
            blocking.join("; ")
        )));
    }

    let set = CascadeSet::for_departments(db, ids.to_vec()).await?;
    cascade::run(db, &set).await?;

    tracing::info!(count = ids.len(), "Departments soft-deleted");
    Ok(())
}
