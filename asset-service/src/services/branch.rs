use super::cascade::{self, CascadeSet};
use super::database::{not_deleted, MongoDb};
use super::{find_page, Page};
use crate::dtos::branches::{CreateBranchRequest, UpdateBranchRequest};
use crate::models::Branch;
use crate::query::{with_search, ListOptions, ResolvedQuery};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use service_core::error::AppError;

pub async fn create_branch(db: &MongoDb, payload: CreateBranchRequest) -> Result<Branch, AppError> {
    let parent = db
        .organizations()
        .find_one(not_deleted(doc! { "_id": &payload.company_id }), None)
        .await?;
    if parent.is_none() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Organization does not exist"
        )));
    }

    let branch = Branch::new(payload.name, payload.location, payload.company_id);
    db.branches().insert_one(&branch, None).await?;

    tracing::info!(branch_id = %branch.id, "Branch created");
    Ok(branch)
}

pub async fn query_branches(db: &MongoDb, options: &ListOptions) -> Result<Page<Branch>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = with_search(not_deleted(doc! {}), &["name"], options.search_term());
    find_page(&db.branches(), filter, query).await
}

pub async fn get_branch_by_id(db: &MongoDb, id: &str) -> Result<Branch, AppError> {
    db.branches()
        .find_one(not_deleted(doc! { "_id": id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Branch not found")))
}

pub async fn update_branch_by_id(
    db: &MongoDb,
    id: &str,
    payload: UpdateBranchRequest,
) -> Result<Branch, AppError> {
    get_branch_by_id(db, id).await?;

    let mut set = doc! { "updatedAt": Utc::now() };
    if let Some(name) = payload.name {
        set.insert("name", name);
    }
    if let Some(location) = payload.location {
        set.insert("location", location);
    }

    db.branches()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    get_branch_by_id(db, id).await
}

pub async fn delete_branch_by_id(db: &MongoDb, id: &str) -> Result<(), AppError> {
    let branch = db
        .branches()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Branch not found")))?;
    if branch.deleted {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Branch is already deleted"
        )));
    }

    let set = CascadeSet::for_branches(db, vec![id.to_string()]).await?;
    cascade::run(db, &set).await?;

    tracing::info!(branch_id = %id, "Branch soft-deleted");
    Ok(())
}

pub async fn delete_branches_by_ids(db: &MongoDb, ids: &[String]) -> Result<(), AppError> {
    let mut found = Vec::new();
    let mut cursor = db
        .branches()
        .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
        .await?;
    while let Some(branch) = cursor.try_next().await? {
        found.push(branch);
    }

    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !found.iter().any(|b| &b.id == *id))
        .map(|s| s.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Branches not found: {}",
            missing.join(", ")
        )));
    }

    let already_deleted: Vec<&str> = found
        .iter()
        .filter(|b| b.deleted)
        .map(|b| b.id.as_str())
        .collect();
    if !already_deleted.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Branches already deleted: {}",
            already_deleted.join(", ")
        )));
    }

    let set = CascadeSet::for_branches(db, ids.to_vec()).await?;
    cascade::run(db, &set).await?;

    tracing::info!(count = ids.len(), "Branches soft-deleted");
    Ok(())
}
