mod common;

use asset_service::dtos::assignments::{AssignmentListParams, HistoryListParams};
use asset_service::models::HistoryAction;
use asset_service::query::ListOptions;
use asset_service::services::{asset, assignment, history};

#[tokio::test]
async fn search_mode_overrides_requested_limit() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    for i in 0..7 {
        common::seed_asset(
            &app.db,
            &seeded.organization,
            &seeded.branch,
            &seeded.department,
            &format!("Printer-{}", i),
        )
        .await;
    }

    let options = ListOptions {
        limit: Some(50),
        search_term: Some("printer".to_string()),
        ..Default::default()
    };
    let page = asset::get_assets_by_department_id(&app.db, &seeded.department.id, &options)
        .await
        .unwrap();

    assert_eq!(page.data.len(), 5);
    assert_eq!(page.total, 7);
    assert_eq!(page.query.limit, 5);
    assert_eq!(page.query.mode.as_str(), "search");

    app.cleanup().await;
}

#[tokio::test]
async fn search_is_case_insensitive_and_literal() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;
    common::seed_asset(
        &app.db,
        &seeded.organization,
        &seeded.branch,
        &seeded.department,
        "Monitor (27in)",
    )
    .await;

    let options = ListOptions {
        search_term: Some("monitor (27".to_string()),
        ..Default::default()
    };
    let page = asset::get_assets_by_department_id(&app.db, &seeded.department.id, &options)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].asset_name, "Monitor (27in)");

    app.cleanup().await;
}

#[tokio::test]
async fn pagination_skips_and_counts() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    for i in 0..12 {
        common::seed_asset(
            &app.db,
            &seeded.organization,
            &seeded.branch,
            &seeded.department,
            &format!("Desk-{}", i),
        )
        .await;
    }

    // 13 assets in the department including the seeded laptop.
    let options = ListOptions {
        page: Some(2),
        limit: Some(10),
        ..Default::default()
    };
    let page = asset::get_assets_by_department_id(&app.db, &seeded.department.id, &options)
        .await
        .unwrap();
    assert_eq!(page.total, 13);
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.query.total_pages(page.total), 2);

    app.cleanup().await;
}

#[tokio::test]
async fn assignment_search_intersects_with_explicit_asset_filter() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;
    let other = common::seed_asset(
        &app.db,
        &seeded.organization,
        &seeded.branch,
        &seeded.department,
        "Printer-A",
    )
    .await;
    let printer_b = common::seed_asset(
        &app.db,
        &seeded.organization,
        &seeded.branch,
        &seeded.department,
        "Printer-B",
    )
    .await;
    let bob = common::seed_user(
        &app.db,
        &seeded.organization,
        &seeded.branch,
        &seeded.department,
        "Bob",
    )
    .await;

    assignment::assign_asset(&app.db, &other.id, &seeded.user.id)
        .await
        .unwrap();
    assignment::assign_asset(&app.db, &printer_b.id, &bob.id)
        .await
        .unwrap();

    // The name search matches both printers; the explicit assetId narrows
    // the result to one rather than being overridden.
    let params = AssignmentListParams {
        asset_id: Some(other.id.clone()),
        search_term: Some("printer".to_string()),
        ..Default::default()
    };
    let page = assignment::get_asset_assignments(&app.db, &params).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].asset_id, other.id);

    app.cleanup().await;
}

#[tokio::test]
async fn history_query_is_stable_between_identical_calls() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();
    assignment::unassign_asset(&app.db, &created.id).await.unwrap();

    let params = HistoryListParams {
        asset_id: Some(seeded.asset.id.clone()),
        ..Default::default()
    };
    let first = history::query_asset_histories(&app.db, &params).await.unwrap();
    let second = history::query_asset_histories(&app.db, &params).await.unwrap();

    assert_eq!(first.total, 2);
    assert_eq!(first.total, second.total);
    let first_ids: Vec<_> = first.data.iter().map(|h| h.id.clone()).collect();
    let second_ids: Vec<_> = second.data.iter().map(|h| h.id.clone()).collect();
    assert_eq!(first_ids, second_ids);

    app.cleanup().await;
}

#[tokio::test]
async fn history_filter_by_action() {
    let Some(app) = common::spawn_app().await else {
        return;
    };
    let seeded = common::seed_basic(&app.db).await;

    let created = assignment::assign_asset(&app.db, &seeded.asset.id, &seeded.user.id)
        .await
        .unwrap();
    assignment::unassign_asset(&app.db, &created.id).await.unwrap();

    let params = HistoryListParams {
        asset_id: Some(seeded.asset.id.clone()),
        action: Some(HistoryAction::Unassigned),
        ..Default::default()
    };
    let page = history::query_asset_histories(&app.db, &params).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].action, HistoryAction::Unassigned);

    app.cleanup().await;
}
