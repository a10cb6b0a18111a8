//! Append-only recorder of assignment actions. Rows are written once and
//! never updated; only a parent-entity cascade may soft-delete them.

use super::database::{not_deleted, MongoDb};
use super::{find_page, Page};
use crate::dtos::assignments::HistoryListParams;
use crate::models::{AssetHistory, HistoryAction};
use crate::query::{ListOptions, ResolvedQuery};
use mongodb::bson::doc;
use service_core::error::AppError;

pub async fn record(
    db: &MongoDb,
    asset_id: &str,
    user_id: &str,
    action: HistoryAction,
) -> Result<AssetHistory, AppError> {
    let entry = AssetHistory::new(asset_id.to_string(), user_id.to_string(), action);
    db.histories().insert_one(&entry, None).await?;
    Ok(entry)
}

pub async fn query_asset_histories(
    db: &MongoDb,
    params: &HistoryListParams,
) -> Result<Page<AssetHistory>, AppError> {
    let options = params.list_options();
    let query = ResolvedQuery::resolve(&options, "timestamp");

    let mut filter = not_deleted(doc! {});
    if let Some(asset_id) = &params.asset_id {
        filter.insert("assetId", asset_id);
    }
    if let Some(user_id) = &params.user_id {
        filter.insert("userId", user_id);
    }
    if let Some(action) = params.action {
        filter.insert("action", mongodb::bson::to_bson(&action)?);
    }

    find_page(&db.histories(), filter, query).await
}

pub async fn get_asset_histories_by_asset_id(
    db: &MongoDb,
    asset_id: &str,
    options: &ListOptions,
) -> Result<Page<AssetHistory>, AppError> {
    let query = ResolvedQuery::resolve(options, "timestamp");
    let filter = not_deleted(doc! { "assetId": asset_id });
    find_page(&db.histories(), filter, query).await
}
