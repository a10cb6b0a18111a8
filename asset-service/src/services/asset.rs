use super::cascade::{self, CascadeSet};
use super::database::{not_deleted, MongoDb};
use super::{find_page, Page};
use crate::dtos::assets::{AssetListParams, CreateAssetRequest, UpdateAssetRequest};
use crate::models::{Asset, AssetStatus};
use crate::query::{with_search, ListOptions, ResolvedQuery};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::doc;
use service_core::error::AppError;

async fn unique_id_taken(
    db: &MongoDb,
    unique_id: &str,
    exclude_asset_id: Option<&str>,
) -> Result<bool, AppError> {
    let mut filter = not_deleted(doc! { "uniqueId": unique_id });
    if let Some(id) = exclude_asset_id {
        filter.insert("_id", doc! { "$ne": id });
    }
    Ok(db.assets().find_one(filter, None).await?.is_some())
}

pub async fn create_asset(db: &MongoDb, payload: CreateAssetRequest) -> Result<Asset, AppError> {
    let department = db
        .departments()
        .find_one(not_deleted(doc! { "_id": &payload.department_id }), None)
        .await?;
    if department.is_none() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Department does not exist"
        )));
    }

    if unique_id_taken(db, &payload.unique_id, None).await? {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Asset with uniqueId {} already exists",
            payload.unique_id
        )));
    }

    let asset = Asset::new(
        payload.asset_name,
        payload.unique_id,
        payload.brand,
        payload.model,
        payload.serial_number,
        payload.branch_id,
        payload.department_id,
        payload.company_id,
    );
    db.assets().insert_one(&asset, None).await?;

    tracing::info!(asset_id = %asset.id, unique_id = %asset.unique_id, "Asset created");
    Ok(asset)
}

pub async fn query_assets(db: &MongoDb, params: &AssetListParams) -> Result<Page<Asset>, AppError> {
    let options = params.list_options();
    let query = ResolvedQuery::resolve(&options, "createdAt");

    let mut filter = not_deleted(doc! {});
    if let Some(asset_name) = &params.asset_name {
        filter.insert("assetName", asset_name);
    }
    if let Some(status) = params.status {
        filter.insert("status", mongodb::bson::to_bson(&status)?);
    }
    if let Some(branch_id) = &params.branch_id {
        filter.insert("branchId", branch_id);
    }
    if let Some(department_id) = &params.department_id {
        filter.insert("departmentId", department_id);
    }
    if let Some(range) = date_range(params.from_date.as_deref(), params.to_date.as_deref())? {
        filter.insert("createdAt", range);
    }

    let filter = with_search(filter, &["assetName", "uniqueId"], options.search_term());
    find_page(&db.assets(), filter, query).await
}

/// Inclusive `createdAt` range from RFC 3339 bounds.
fn date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<mongodb::bson::Document>, AppError> {
    let mut range = doc! {};
    if let Some(from) = from {
        range.insert("$gte", parse_date(from)?);
    }
    if let Some(to) = to {
        range.insert("$lte", parse_date(to)?);
    }
    Ok((!range.is_empty()).then_some(range))
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid date: {}", raw)))
}

pub async fn get_assets_by_department_id(
    db: &MongoDb,
    department_id: &str,
    options: &ListOptions,
) -> Result<Page<Asset>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = with_search(
        not_deleted(doc! { "departmentId": department_id }),
        &["assetName", "uniqueId"],
        options.search_term(),
    );
    find_page(&db.assets(), filter, query).await
}

/// Assets currently available for assignment.
pub async fn get_available_assets(
    db: &MongoDb,
    options: &ListOptions,
) -> Result<Page<Asset>, AppError> {
    let query = ResolvedQuery::resolve(options, "createdAt");
    let filter = with_search(
        not_deleted(doc! { "status": mongodb::bson::to_bson(&AssetStatus::Active)? }),
        &["assetName", "uniqueId"],
        options.search_term(),
    );
    find_page(&db.assets(), filter, query).await
}

pub async fn get_asset_by_id(db: &MongoDb, id: &str) -> Result<Asset, AppError> {
    db.assets()
        .find_one(not_deleted(doc! { "_id": id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Asset not found")))
}

pub async fn update_asset_by_id(
    db: &MongoDb,
    id: &str,
    payload: UpdateAssetRequest,
) -> Result<Asset, AppError> {
    let current = get_asset_by_id(db, id).await?;

    let mut set = doc! { "updatedAt": Utc::now() };
    if let Some(unique_id) = payload.unique_id {
        if unique_id != current.unique_id && unique_id_taken(db, &unique_id, Some(id)).await? {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Asset with uniqueId {} already exists",
                unique_id
            )));
        }
        set.insert("uniqueId", unique_id);
    }
    if let Some(asset_name) = payload.asset_name {
        set.insert("assetName", asset_name);
    }
    if let Some(brand) = payload.brand {
        set.insert("brand", brand);
    }
    if let Some(model) = payload.model {
        set.insert("model", model);
    }
    if let Some(serial_number) = payload.serial_number {
        set.insert("serialNumber", serial_number);
    }
    if let Some(status) = payload.status {
        // The assignment manager owns the ACTIVE/IN_USE transitions; direct
        // updates may only park or retire an unassigned asset.
        if current.status == AssetStatus::InUse {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Asset is currently assigned; unassign it before changing its status"
            )));
        }
        if status == AssetStatus::InUse {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Asset status IN_USE can only be set by assigning the asset"
            )));
        }
        set.insert("status", mongodb::bson::to_bson(&status)?);
    }

    db.assets()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    get_asset_by_id(db, id).await
}

pub async fn delete_asset_by_id(db: &MongoDb, id: &str) -> Result<(), AppError> {
    let asset = db
        .assets()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Asset not found")))?;
    if asset.deleted {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Asset is already deleted"
        )));
    }

    let set = CascadeSet::for_assets(vec![id.to_string()]);
    cascade::run(db, &set).await?;

    tracing::info!(asset_id = %id, "Asset soft-deleted");
    Ok(())
}

pub async fn delete_assets_by_ids(db: &MongoDb, ids: &[String]) -> Result<(), AppError> {
    let mut found = Vec::new();
    let mut cursor = db
        .assets()
        .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
        .await?;
    while let Some(asset) = cursor.try_next().await? {
        found.push(asset);
    }

    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !found.iter().any(|a| &a.id == *id))
        .map(|s| s.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Assets not found: {}",
            missing.join(", ")
        )));
    }

    let already_deleted: Vec<&str> = found
        .iter()
        .filter(|a| a.deleted)
        .map(|a| a.id.as_str())
        .collect();
    if !already_deleted.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Assets already deleted: {}",
            already_deleted.join(", ")
        )));
    }

    let set = CascadeSet::for_assets(ids.to_vec());
    cascade::run(db, &set).await?;

    tracing::info!(count = ids.len(), "Assets soft-deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_bounds() {
        let range = date_range(Some("2026-01-01T00:00:00Z"), Some("2026-02-01T00:00:00Z"))
            .unwrap()
            .unwrap();
        assert!(range.contains_key("$gte"));
        assert!(range.contains_key("$lte"));

        assert!(date_range(None, None).unwrap().is_none());
    }

    #[test]
    fn test_invalid_date_is_bad_request() {
        let err = date_range(Some("yesterday"), None).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
