mod common;

use asset_service::dtos::assets::UpdateAssetRequest;
use asset_service::dtos::branches::CreateBranchRequest;
use asset_service::dtos::departments::CreateDepartmentRequest;
use asset_service::dtos::organizations::{CreateOrganizationRequest, UpdateOrganizationRequest};
use asset_service::models::AssetStatus;
use asset_service::services::{asset, assignment, branch, department, organization};
use service_core::error::AppError;

#[tokio::test]
async fn duplicate_organization_name_is_a_conflict() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let err = organization::create_organization(
        &app.db,
        CreateOrganizationRequest {
            organization_name: seeded.organization.organization_name.clone(),
        },
    )
    .await
    .expect_err("Duplicate organization name must fail");
    assert!(matches!(err, AppError::Conflict(_)));

    app.cleanup().await;
}

#[tokio::test]
async fn update_keeping_same_name_does_not_trip_uniqueness() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    // Re-submitting the current name is not a collision with itself.
    let updated = organization::update_organization_by_id(
        &app.db,
        &seeded.organization.id,
        UpdateOrganizationRequest {
            organization_name: Some(seeded.organization.organization_name.clone()),
        },
    )
    .await
    .expect("Unchanged unique field must pass");
    assert_eq!(
        updated.organization_name,
        seeded.organization.organization_name
    );

    app.cleanup().await;
}

#[tokio::test]
async fn branch_requires_existing_organization() {
    let Some(app) = common::spawn_app().await else {
        return;
    };

    let err = branch::create_branch(
        &app.db,
        CreateBranchRequest {
            name: "Ghost".to_string(),
            location: "Nowhere".to_string(),
            company_id: "no-such-org".to_string(),
        },
    )
    .await
    .expect_err("Branch under a missing organization must fail");
    assert!(matches!(err, AppError::BadRequest(_)));

    app.cleanup().await;
}

#[tokio::test]
async fn department_name_is_unique_within_branch_only() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let err = department::create_department(
        &app.db,
        CreateDepartmentRequest {
            department_name: seeded.department.department_name.clone(),
            branch_id: seeded.branch.id.clone(),
        },
    )
    .await
    .expect_err("Duplicate department name in the same branch must fail");
    assert!(matches!(err, AppError::Conflict(_)));

    // The same name in a sibling branch is fine.
    let other_branch = branch::create_branch(
        &app.db,
        CreateBranchRequest {
            name: "Satellite".to_string(),
            location: "Hamburg".to_string(),
            company_id: seeded.organization.id.clone(),
        },
    )
    .await
    .unwrap();
    department::create_department(
        &app.db,
        CreateDepartmentRequest {
            department_name: seeded.department.department_name.clone(),
            branch_id: other_branch.id.clone(),
        },
    )
    .await
    .expect("Same department name in another branch must pass");

    app.cleanup().await;
}

#[tokio::test]
async fn asset_status_cannot_be_forced_into_in_use() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let err = asset::update_asset_by_id(
        &app.db,
        &seeded.asset.id,
        UpdateAssetRequest {
            asset_name: None,
            unique_id: None,
            brand: None,
            model: None,
            serial_number: None,
            status: Some(AssetStatus::InUse),
        },
    )
    .await
    .expect_err("IN_USE is only reachable through assignment");
    assert!(matches!(err, AppError::BadRequest(_)));

    app.cleanup().await;
}

#[tokio::test]
async fn assigned_asset_status_is_locked() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;
    assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();

    let err = asset::update_asset_by_id(
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
    .expect_err("Status of an assigned asset must not change");
    assert!(matches!(err, AppError::BadRequest(_)));

    // Non-status fields still update.
    let updated = asset::update_asset_by_id(
        &app.db,
        &seeded.asset.id,
        UpdateAssetRequest {
            asset_name: Some("Laptop-1b".to_string()),
            unique_id: None,
            brand: None,
            model: None,
            serial_number: None,
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.asset_name, "Laptop-1b");
    assert_eq!(updated.status, AssetStatus::InUse);

    app.cleanup().await;
}
