use super::cascade::{self, CascadeSet};
use super::database::{not_deleted, MongoDb};
use super::{count_phrase, find_page, Page};
use crate::dtos::organizations::{CreateOrganizationRequest, UpdateOrganizationRequest};
use crate::models::Organization;
use crate::query::{with_search, ListOptions, ResolvedQuery};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use service_core::error::AppError;

pub async fn create_organization(
    db: &MongoDb,
    payload: CreateOrganizationRequest,
) -> Result<Organization, AppError> {
    let existing = db
        .organizations()
        .find_one(
            not_deleted(doc! { "organizationName": &payload.organization_name }),
            None,
        )
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Organization with this name already exists"
        )));
    }

    let organization = Organization::new(payload.organization_name);
    db.organizations().insert_one(&organization, None).await?;

    tracing::info!(organization_id = %organization.id, "Organization created");
    Ok(organization)
}

pub async fn query_organizations(
    db: &MongoDb,
    options: &ListOptions,
) -> Result<Page<Organization>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = with_search(
        not_deleted(doc! {}),
        &["organizationName"],
        options.search_term(),
    );
    find_page(&db.organizations(), filter, query).await
}

pub async fn get_organization_by_id(db: &MongoDb, id: &str) -> Result<Organization, AppError> {
    db.organizations()
        .find_one(not_deleted(doc! { "_id": id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Organization not found")))
}

pub async fn update_organization_by_id(
    db: &MongoDb,
    id: &str,
    payload: UpdateOrganizationRequest,
) -> Result<Organization, AppError> {
    let current = get_organization_by_id(db, id).await?;

    let mut set = doc! { "updatedAt": Utc::now() };
    if let Some(name) = payload.organization_name {
        // Re-check uniqueness only when the name actually changes.
        if name != current.organization_name {
            let collision = db
                .organizations()
                .find_one(
                    not_deleted(doc! { "organizationName": &name, "_id": { "$ne": id } }),
                    None,
                )
                .await?;
            if collision.is_some() {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Organization with this name already exists"
                )));
            }
        }
        set.insert("organizationName", name);
    }

    db.organizations()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    get_organization_by_id(db, id).await
}

pub async fn delete_organization_by_id(db: &MongoDb, id: &str) -> Result<(), AppError> {
    let organization = db
        .organizations()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Organization not found")))?;
    if organization.deleted {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Organization is already deleted"
        )));
    }

    let active_branches = db
        .branches()
        .count_documents(not_deleted(doc! { "companyId": id }), None)
        .await?;
    if active_branches > 0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "This organization has {} and cannot be deleted.",
            count_phrase(active_branches, "branch")
        )));
    }

    let set = CascadeSet::for_organizations(db, vec![id.to_string()]).await?;
    cascade::run(db, &set).await?;

    tracing::info!(organization_id = %id, "Organization soft-deleted");
    Ok(())
}

pub async fn delete_organizations_by_ids(db: &MongoDb, ids: &[String]) -> Result<(), AppError> {
    let mut found = Vec::new();
    let mut cursor = db
        .organizations()
        .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
        .await?;
    while let Some(organization) = cursor.try_next().await? {
        found.push(organization);
    }

    // Validate the whole batch before mutating anything.
    let missing: Vec<&String> = ids
        .iter()
        .filter(|id| !found.iter().any(|o| &o.id == *id))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Organizations not found: {}",
            missing
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    let already_deleted: Vec<&str> = found
        .iter()
        .filter(|o| o.deleted)
        .map(|o| o.id.as_str())
        .collect();
    if !already_deleted.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Organizations already deleted: {}",
            already_deleted.join(", ")
        )));
    }

    let mut blocking = Vec::new();
    for organization in &found {
        let active_branches = db
            .branches()
            .count_documents(not_deleted(doc! { "companyId": &organization.id }), None)
            .await?;
        if active_branches > 0 {
            blocking.push(format!(
                "organization {} has {}",
                organization.organization_name,
                count_phrase(active_branches, "branch")
            ));
        }
    }
    if !blocking.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Cannot delete: {}.",
            blocking.join("; ")
        )));
    }

    let set = CascadeSet::for_organizations(db, ids.to_vec()).await?;
    cascade::run(db, &set).await?;

    tracing::info!(count = ids.len(), "Organizations soft-deleted");
    Ok(())
}
