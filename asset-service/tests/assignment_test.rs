mod common;

use asset_service::dtos::assets::UpdateAssetRequest;
use asset_service::dtos::assignments::UpdateAssignmentRequest;
use asset_service::models::{AssetStatus, AssignmentStatus, HistoryAction};
use asset_service::services::{asset, assignment, not_deleted};
use futures::TryStreamExt;
use mongodb::bson::doc;
use service_core::error::AppError;

#[tokio::test]
async fn assign_asset_creates_assignment_history_and_mirror() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .expect("Assignment should succeed");
    assert_eq!(created.asset_id, seeded.asset.id);
    assert_eq!(created.user_id, seeded.user.id);
    assert_eq!(created.status, AssignmentStatus::InUse);

    let refreshed = asset::get_asset_by_id(&app.db, &seeded.asset.id)
        .await
        .unwrap();
    assert_eq!(refreshed.status, AssetStatus::InUse);
    assert_eq!(refreshed.assigned_to_user_id.as_deref(), Some(seeded.user.id.as_str()));

    let active_count = app
        .db
        .assignments()
        .count_documents(
            not_deleted(doc! { "assetId": &seeded.asset.id, "status": "IN_USE" }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(active_count, 1);

    let histories: Vec<_> = app
        .db
        .histories()
        .find(not_deleted(doc! { "assetId": &seeded.asset.id }), None)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].action, HistoryAction::Assigned);
    assert_eq!(histories[0].user_id, seeded.user.id);

    let notifications = app
        .db
        .notifications()
        .count_documents(not_deleted(doc! { "userId": &seeded.user.id }), None)
        .await
        .unwrap();
    assert_eq!(notifications, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn double_assign_fails_with_conflict_and_leaves_state_unchanged() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;
    let bob = common::seed_user(
        &app.db,
        &seeded.organization,
        &seeded.branch,
        &seeded.department,
        "Bob",
    )
    .await;

    let first = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();

    let err = assignment::assign_asset(&app.db, &seeded.asset.id, &bob.id)
        .await
        .expect_err("Second assignment must fail");
    match err {
        AppError::Conflict(inner) => {
            // The conflicting assignment id is reported to the caller.
            assert!(inner.to_string().contains(&first.id));
        }
        other => panic!("Expected Conflict, got {:?}", other),
    }

    // Mirror still points at the first assignee.
    let refreshed = asset::get_asset_by_id(&app.db, &seeded.asset.id)
        .await
        .unwrap();
    assert_eq!(refreshed.assigned_to_user_id.as_deref(), Some(seeded.user.id.as_str()));

    let active_count = app
        .db
        .assignments()
        .count_documents(
            not_deleted(doc! { "assetId": &seeded.asset.id, "status": "IN_USE" }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(active_count, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn assigning_an_unavailable_asset_reports_its_status() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    asset::update_asset_by_id(
        &app.db,
        &seeded.asset.id,
        UpdateAssetRequest {
            asset_name: None,
            unique_id: None,
            brand: None,
            model: None,
            serial_number: None,
            status: Some(AssetStatus::UnderMaintenance),
        },
    )
    .await
    .unwrap();

    let err = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .expect_err("Unavailable asset must not be assignable");
    match err {
        AppError::BadRequest(inner) => {
            assert!(inner.to_string().contains("UNDER_MAINTENANCE"));
        }
        other => panic!("Expected BadRequest, got {:?}", other),
    }

    app.cleanup().await;
}

#[tokio::test]
async fn unassign_retires_assignment_and_resets_asset() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();
    let retired = assignment::unassign_asset(&app.db, &created.id).await.unwrap();
    assert_eq!(retired.status, AssignmentStatus::Retired);

    let refreshed = asset::get_asset_by_id(&app.db, &seeded.asset.id)
        .await
        .unwrap();
    assert_eq!(refreshed.status, AssetStatus::Active);
    assert_eq!(refreshed.assigned_to_user_id, None);

    let unassigned_rows = app
        .db
        .histories()
        .count_documents(
            not_deleted(doc! { "assetId": &seeded.asset.id, "action": "UNASSIGNED" }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(unassigned_rows, 1);

    // A second unassign of the same row is rejected.
    let err = assignment::unassign_asset(&app.db, &created.id)
        .await
        .expect_err("Unassigning a retired assignment must fail");
    assert!(matches!(err, AppError::BadRequest(_)));

    app.cleanup().await;
}

#[tokio::test]
async fn update_assignment_to_new_user_moves_mirror() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;
    let bob = common::seed_user(
        &app.db,
        &seeded.organization,
        &seeded.branch,
        &seeded.department,
        "Bob",
    )
    .await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();

    let updated = assignment::update_assignment(
        &app.db,
        &created.id,
        UpdateAssignmentRequest {
            asset_id: None,
            user_id: Some(bob.id.clone()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.user_id, bob.id);

    let refreshed = asset::get_asset_by_id(&app.db, &seeded.asset.id)
        .await
        .unwrap();
    assert_eq!(refreshed.status, AssetStatus::InUse);
    assert_eq!(refreshed.assigned_to_user_id.as_deref(), Some(bob.id.as_str()));

    let updated_rows = app
        .db
        .histories()
        .count_documents(
            not_deleted(doc! { "assetId": &seeded.asset.id, "action": "ASSIGNMENT_UPDATED" }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated_rows, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn update_assignment_to_new_asset_releases_old_asset() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;
    let other = common::seed_asset(
        &app.db,
        &seeded.organization,
        &seeded.branch,
        &seeded.department,
        "Laptop-2",
    )
    .await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();

    let updated = assignment::update_assignment(
        &app.db,
        &created.id,
        UpdateAssignmentRequest {
            asset_id: Some(other.id.clone()),
            user_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.asset_id, other.id);

    let old = asset::get_asset_by_id(&app.db, &seeded.asset.id).await.unwrap();
    assert_eq!(old.status, AssetStatus::Active);
    assert_eq!(old.assigned_to_user_id, None);

    let new = asset::get_asset_by_id(&app.db, &other.id).await.unwrap();
    assert_eq!(new.status, AssetStatus::InUse);
    assert_eq!(new.assigned_to_user_id.as_deref(), Some(seeded.user.id.as_str()));

    app.cleanup().await;
}

#[tokio::test]
async fn delete_assignment_resets_asset_and_records_history() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();
    assignment::delete_assignment_by_id(&app.db, &created.id)
        .await
        .unwrap();

    let refreshed = asset::get_asset_by_id(&app.db, &seeded.asset.id)
        .await
        .unwrap();
    assert_eq!(refreshed.status, AssetStatus::Active);
    assert_eq!(refreshed.assigned_to_user_id, None);

    let deleted_rows = app
        .db
        .histories()
        .count_documents(
            not_deleted(doc! { "assetId": &seeded.asset.id, "action": "ASSIGNMENT_DELETED" }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(deleted_rows, 1);

    // The assignment row itself no longer exists.
    let err = assignment::get_assignment_by_id(&app.db, &created.id)
        .await
        .expect_err("Deleted assignment must not resolve");
    assert!(matches!(err, AppError::NotFound(_)));

    app.cleanup().await;
}

#[tokio::test]
async fn bulk_delete_reports_all_missing_ids() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();

    let err = assignment::delete_assignments_by_ids(
        &app.db,
        &[created.id.clone(), "missing-1".to_string(), "missing-2".to_string()],
    )
    .await
    .expect_err("Batch with missing ids must fail");
    match err {
        AppError::NotFound(inner) => {
            let message = inner.to_string();
            assert!(message.contains("missing-1"));
            assert!(message.contains("missing-2"));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }

    // Nothing was deleted: the valid assignment survives.
    assignment::get_assignment_by_id(&app.db, &created.id)
        .await
        .expect("Assignment must still exist");

    app.cleanup().await;
}
