//! Assignment lifecycle: the only writer of `assets.status` /
//! `assets.assignedToUserId` transitions between ACTIVE and IN_USE.
//!
//! Every mutation keeps the asset mirror and the assignment row in lockstep
//! inside one transaction; the at-most-one-active-assignment check runs
//! inside that same transaction so a racing second request observes the
//! first committer's row and fails with a conflict. History and
//! notifications are appended after the commit.

use super::database::{not_deleted, MongoDb};
use super::{find_page, history, notification, Page};
use crate::dtos::assignments::{AssignmentListParams, UpdateAssignmentRequest};
use crate::models::{AssetAssignment, AssetStatus, AssignmentStatus, HistoryAction};
use crate::query::{regex_condition, ListOptions, ResolvedQuery};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson};
use mongodb::ClientSession;
use service_core::error::AppError;

fn in_use() -> Result<Bson, AppError> {
    Ok(mongodb::bson::to_bson(&AssignmentStatus::InUse)?)
}

pub async fn assign_asset(
    db: &MongoDb,
    asset_id: &str,
    user_id: &str,
) -> Result<AssetAssignment, AppError> {
    // All precondition checks happen before anything is written or any
    // response is produced.
    let asset = db
        .assets()
        .find_one(not_deleted(doc! { "_id": asset_id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Asset not found")))?;

    db.users()
        .find_one(not_deleted(doc! { "_id": user_id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    // A held asset reads IN_USE through the mirror, so check for the holder
    // before the status: the caller gets the conflicting assignment id, not
    // just the status name. The check repeats inside the transaction for
    // the racing case.
    let existing = db
        .assignments()
        .find_one(
            not_deleted(doc! { "assetId": asset_id, "status": in_use()? }),
            None,
        )
        .await?;
    if let Some(existing) = existing {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Asset is already assigned (assignment {})",
            existing.id
        )));
    }

    if asset.status != AssetStatus::Active {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Asset is not available for assignment (current status: {})",
            asset.status
        )));
    }

    let assignment = AssetAssignment::new(asset_id.to_string(), user_id.to_string());

    let mut session = db.start_transaction().await?;
    let result = assign_in_transaction(db, &mut session, &assignment).await;
    if let Err(e) = result {
        session.abort_transaction().await.ok();
        return Err(e);
    }
    session.commit_transaction().await?;

    history::record(db, asset_id, user_id, HistoryAction::Assigned).await?;
    notification::create_user_notification(
        db,
        user_id,
        format!("Asset {} has been assigned to you", asset.asset_name),
    )
    .await?;

    tracing::info!(
        assignment_id = %assignment.id,
        asset_id = %asset_id,
        user_id = %user_id,
        "Asset assigned"
    );
    Ok(assignment)
}

async fn assign_in_transaction(
    db: &MongoDb,
    session: &mut ClientSession,
    assignment: &AssetAssignment,
) -> Result<(), AppError> {
    // The existence check runs inside the transaction: the first committer
    // wins and the loser sees its row here.
    let existing = db
        .assignments()
        .find_one_with_session(
            not_deleted(doc! { "assetId": &assignment.asset_id, "status": in_use()? }),
            None,
            session,
        )
        .await?;
    if let Some(existing) = existing {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Asset is already assigned (assignment {})",
            existing.id
        )));
    }

    db.assignments()
        .insert_one_with_session(assignment, None, session)
        .await?;

    db.assets()
        .update_one_with_session(
            doc! { "_id": &assignment.asset_id },
            doc! { "$set": {
                "status": mongodb::bson::to_bson(&AssetStatus::InUse)?,
                "assignedToUserId": &assignment.user_id,
                "updatedAt": Utc::now(),
            } },
            None,
            session,
        )
        .await?;

    Ok(())
}

pub async fn unassign_asset(db: &MongoDb, assignment_id: &str) -> Result<AssetAssignment, AppError> {
    let assignment = get_assignment_by_id(db, assignment_id).await?;
    if assignment.status != AssignmentStatus::InUse {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Assignment is not active"
        )));
    }

    let mut session = db.start_transaction().await?;
    let result: Result<(), AppError> = async {
        db.assignments()
            .update_one_with_session(
                doc! { "_id": assignment_id },
                doc! { "$set": {
                    "status": mongodb::bson::to_bson(&AssignmentStatus::Retired)?,
                    "updatedAt": Utc::now(),
                } },
                None,
                &mut session,
            )
            .await?;

        release_asset(db, &mut session, &assignment.asset_id).await
    }
    .await;
    if let Err(e) = result {
        session.abort_transaction().await.ok();
        return Err(e);
    }
    session.commit_transaction().await?;

    history::record(
        db,
        &assignment.asset_id,
        &assignment.user_id,
        HistoryAction::Unassigned,
    )
    .await?;

    tracing::info!(assignment_id = %assignment_id, "Asset unassigned");
    get_assignment_by_id(db, assignment_id).await
}

/// Reset an asset to available with no assignee, inside a transaction.
async fn release_asset(
    db: &MongoDb,
    session: &mut ClientSession,
    asset_id: &str,
) -> Result<(), AppError> {
    db.assets()
        .update_one_with_session(
            doc! { "_id": asset_id },
            doc! { "$set": {
                "status": mongodb::bson::to_bson(&AssetStatus::Active)?,
                "assignedToUserId": null,
                "updatedAt": Utc::now(),
            } },
            None,
            session,
        )
        .await?;
    Ok(())
}

pub async fn update_assignment(
    db: &MongoDb,
    assignment_id: &str,
    payload: UpdateAssignmentRequest,
) -> Result<AssetAssignment, AppError> {
    let current = get_assignment_by_id(db, assignment_id).await?;

    let new_asset_id = payload.asset_id.unwrap_or_else(|| current.asset_id.clone());
    let new_user_id = payload.user_id.unwrap_or_else(|| current.user_id.clone());
    let asset_changed = new_asset_id != current.asset_id;
    let user_changed = new_user_id != current.user_id;

    if asset_changed {
        let asset = db
            .assets()
            .find_one(not_deleted(doc! { "_id": &new_asset_id }), None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Asset not found")))?;

        // Same ordering as assign_asset: another holder beats the status
        // check so the conflicting assignment id is reported.
        let conflicting = db
            .assignments()
            .find_one(
                not_deleted(doc! {
                    "assetId": &new_asset_id,
                    "status": in_use()?,
                    "_id": { "$ne": assignment_id },
                }),
                None,
            )
            .await?;
        if let Some(conflicting) = conflicting {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Asset is already assigned (assignment {})",
                conflicting.id
            )));
        }

        if asset.status != AssetStatus::Active {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Asset is not available for assignment (current status: {})",
                asset.status
            )));
        }
    }
    if user_changed {
        db.users()
            .find_one(not_deleted(doc! { "_id": &new_user_id }), None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;
    }

    let mut session = db.start_transaction().await?;
    let result: Result<(), AppError> = async {
        if asset_changed {
            // Nobody else may hold the new asset.
            let conflicting = db
                .assignments()
                .find_one_with_session(
                    not_deleted(doc! {
                        "assetId": &new_asset_id,
                        "status": in_use()?,
                        "_id": { "$ne": assignment_id },
                    }),
                    None,
                    &mut session,
                )
                .await?;
            if let Some(conflicting) = conflicting {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "Asset is already assigned (assignment {})",
                    conflicting.id
                )));
            }
        }

        db.assignments()
            .update_one_with_session(
                doc! { "_id": assignment_id },
                doc! { "$set": {
                    "assetId": &new_asset_id,
                    "userId": &new_user_id,
                    "updatedAt": Utc::now(),
                } },
                None,
                &mut session,
            )
            .await?;

        if current.status == AssignmentStatus::InUse {
            if asset_changed {
                db.assets()
                    .update_one_with_session(
                        doc! { "_id": &new_asset_id },
                        doc! { "$set": {
                            "status": mongodb::bson::to_bson(&AssetStatus::InUse)?,
                            "assignedToUserId": &new_user_id,
                            "updatedAt": Utc::now(),
                        } },
                        None,
                        &mut session,
                    )
                    .await?;
                release_asset(db, &mut session, &current.asset_id).await?;
            } else if user_changed {
                // Same asset, new holder: keep the mirror in lockstep.
                db.assets()
                    .update_one_with_session(
                        doc! { "_id": &new_asset_id },
                        doc! { "$set": {
                            "assignedToUserId": &new_user_id,
                            "updatedAt": Utc::now(),
                        } },
                        None,
                        &mut session,
                    )
                    .await?;
            }
        }

        Ok(())
    }
    .await;
    if let Err(e) = result {
        session.abort_transaction().await.ok();
        return Err(e);
    }
    session.commit_transaction().await?;

    history::record(db, &new_asset_id, &new_user_id, HistoryAction::AssignmentUpdated).await?;
    if asset_changed {
        history::record(
            db,
            &current.asset_id,
            &current.user_id,
            HistoryAction::Unassigned,
        )
        .await?;
    }

    tracing::info!(assignment_id = %assignment_id, "Assignment updated");
    get_assignment_by_id(db, assignment_id).await
}

pub async fn delete_assignment_by_id(db: &MongoDb, assignment_id: &str) -> Result<(), AppError> {
    delete_assignments_by_ids(db, &[assignment_id.to_string()]).await
}

pub async fn delete_assignments_by_ids(db: &MongoDb, ids: &[String]) -> Result<(), AppError> {
    let mut found = Vec::new();
    let mut cursor = db
        .assignments()
        .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
        .await?;
    while let Some(assignment) = cursor.try_next().await? {
        found.push(assignment);
    }

    // Report every missing id together rather than failing on the first.
    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !found.iter().any(|a| &a.id == *id))
        .map(|s| s.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Assignments not found: {}",
            missing.join(", ")
        )));
    }

    let mut affected_assets: Vec<String> = found.iter().map(|a| a.asset_id.clone()).collect();
    affected_assets.sort();
    affected_assets.dedup();

    let mut session = db.start_transaction().await?;
    let result: Result<(), AppError> = async {
        db.assignments()
            .delete_many_with_session(doc! { "_id": { "$in": ids.to_vec() } }, None, &mut session)
            .await?;

        // An asset with no remaining assignment rows at all (any status)
        // goes back to available.
        for asset_id in &affected_assets {
            let remaining = db
                .assignments()
                .find_one_with_session(doc! { "assetId": asset_id }, None, &mut session)
                .await?;
            if remaining.is_none() {
                release_asset(db, &mut session, asset_id).await?;
            }
        }
        Ok(())
    }
    .await;
    if let Err(e) = result {
        session.abort_transaction().await.ok();
        return Err(e);
    }
    session.commit_transaction().await?;

    for assignment in &found {
        history::record(
            db,
            &assignment.asset_id,
            &assignment.user_id,
            HistoryAction::AssignmentDeleted,
        )
        .await?;
    }

    tracing::info!(count = found.len(), "Assignments deleted");
    Ok(())
}

pub async fn get_assignment_by_id(
    db: &MongoDb,
    assignment_id: &str,
) -> Result<AssetAssignment, AppError> {
    db.assignments()
        .find_one(not_deleted(doc! { "_id": assignment_id }), None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Assignment not found")))
}

pub async fn get_asset_assignments(
    db: &MongoDb,
    params: &AssignmentListParams,
) -> Result<Page<AssetAssignment>, AppError> {
    let options = params.list_options();
    let query = ResolvedQuery::resolve(&options, "assignedAt");

    let mut filter = not_deleted(doc! {});
    if let Some(asset_id) = &params.asset_id {
        filter.insert("assetId", asset_id);
    }
    if let Some(user_id) = &params.user_id {
        filter.insert("userId", user_id);
    }
    if let Some(status) = params.status {
        filter.insert("status", mongodb::bson::to_bson(&status)?);
    }

    // Assignments have no name field of their own; a search term matches
    // against the names of the assets they reference.
    if let Some(term) = options.search_term() {
        let mut matching_assets = db
            .assets()
            .find(not_deleted(regex_condition("assetName", term)), None)
            .await?;
        let mut asset_ids = Vec::new();
        while let Some(asset) = matching_assets.try_next().await? {
            asset_ids.push(asset.id);
        }
        // An explicit assetId filter intersects with the name matches
        // rather than being replaced by them.
        if let Some(requested) = &params.asset_id {
            asset_ids.retain(|id| id == requested);
        }
        filter.insert("assetId", doc! { "$in": asset_ids });
    }

    find_page(&db.assignments(), filter, query).await
}

pub async fn get_assignments_by_asset_id(
    db: &MongoDb,
    asset_id: &str,
    options: &ListOptions,
) -> Result<Page<AssetAssignment>, AppError> {
    let query = ResolvedQuery::resolve(options, "assignedAt");
    let filter = not_deleted(doc! { "assetId": asset_id });
    find_page(&db.assignments(), filter, query).await
}
