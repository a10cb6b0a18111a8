//! Shared setup for asset-service integration tests.
//!
//! These tests need a running MongoDB (with replica set support for
//! transactions). When `MONGODB_URI` is unset they skip cleanly so the
//! suite passes without a database.

#![allow(dead_code)]

use asset_service::config::{AssetConfig, JwtConfig, MongoConfig, SmtpConfig};
use asset_service::dtos::assets::CreateAssetRequest;
use asset_service::dtos::branches::CreateBranchRequest;
use asset_service::dtos::departments::CreateDepartmentRequest;
use asset_service::dtos::organizations::CreateOrganizationRequest;
use asset_service::dtos::users::CreateUserRequest;
use asset_service::models::{Asset, Branch, Department, Organization, User, UserRole};
use asset_service::services::{
    asset, branch, department, organization, user, MockEmailService, MongoDb,
};
use asset_service::startup::{build_router, AppState};
use axum::Router;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestApp {
    pub db: MongoDb,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    /// Drop the throwaway test database.
    pub async fn cleanup(&self) {
        self.db.database().drop(None).await.ok();
    }
}

fn test_config(uri: String, database: String) -> AssetConfig {
    AssetConfig {
        common: service_core::config::Config {
            port: 0,
            log_level: "warn".to_string(),
        },
        api_prefix: "/api/v1".to_string(),
        mongodb: MongoConfig { uri, database },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 30,
            reset_password_expiry_minutes: 10,
            verify_email_expiry_minutes: 10,
        },
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            user: String::new(),
            password: String::new(),
            from: "noreply@example.com".to_string(),
            frontend_base_url: "http://localhost:3000".to_string(),
        },
    }
}

/// Spin up an app against a UUID-named throwaway database, or `None` when
/// `MONGODB_URI` is not set.
pub async fn spawn_app() -> Option<TestApp> {
    let uri = match std::env::var("MONGODB_URI") {
        Ok(uri) => uri,
        Err(_) => {
            eprintln!("MONGODB_URI not set, skipping integration test");
            return None;
        }
    };

    let database = format!("asset_test_{}", Uuid::new_v4().simple());
    let db = MongoDb::connect(&uri, &database)
        .await
        .expect("Failed to connect to MongoDB");
    db.initialize_indexes()
        .await
        .expect("Failed to initialize indexes");

    let config = test_config(uri, database);
    let state = AppState::new(config, db.clone(), Arc::new(MockEmailService));
    let router = build_router(state.clone());

    Some(TestApp { db, state, router })
}

/// One organization -> branch -> department chain with an available asset
/// and an active user, mirroring the smallest realistic tenant.
pub struct Seeded {
    pub organization: Organization,
    pub branch: Branch,
    pub department: Department,
    pub asset: Asset,
    pub user: User,
}

pub async fn seed_basic(db: &MongoDb) -> Seeded {
    let suffix = Uuid::new_v4().simple().to_string();

    let organization = organization::create_organization(
        db,
        CreateOrganizationRequest {
            organization_name: format!("Acme-{}", suffix),
        },
    )
    .await
    .expect("Failed to create organization");

    let branch = branch::create_branch(
        db,
        CreateBranchRequest {
            name: "HQ".to_string(),
            location: "Berlin".to_string(),
            company_id: organization.id.clone(),
        },
    )
    .await
    .expect("Failed to create branch");

    let department = department::create_department(
        db,
        CreateDepartmentRequest {
            department_name: "IT".to_string(),
            branch_id: branch.id.clone(),
        },
    )
    .await
    .expect("Failed to create department");

    let asset = seed_asset(db, &organization, &branch, &department, "Laptop-1").await;
    let user = seed_user(db, &organization, &branch, &department, "Alice").await;

    Seeded {
        organization,
        branch,
        department,
        asset,
        user,
    }
}

pub async fn seed_asset(
    db: &MongoDb,
    organization: &Organization,
    branch: &Branch,
    department: &Department,
    name: &str,
) -> Asset {
    let suffix = Uuid::new_v4().simple().to_string();
    asset::create_asset(
        db,
        CreateAssetRequest {
            asset_name: name.to_string(),
            unique_id: format!("LT-{}", suffix),
            brand: "Lenovo".to_string(),
            model: "T14".to_string(),
            serial_number: format!("SN-{}", suffix),
            branch_id: branch.id.clone(),
            department_id: department.id.clone(),
            company_id: organization.id.clone(),
        },
    )
    .await
    .expect("Failed to create asset")
}

pub async fn seed_user(
    db: &MongoDb,
    organization: &Organization,
    branch: &Branch,
    department: &Department,
    name: &str,
) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    user::create_user(
        db,
        CreateUserRequest {
            user_name: name.to_string(),
            email: format!("{}-{}@example.com", name.to_lowercase(), suffix),
            phone: format!("+49{}", &suffix[..12]),
            password: "password1234".to_string(),
            user_role: UserRole::User,
            branch_id: branch.id.clone(),
            department_id: department.id.clone(),
            company_id: organization.id.clone(),
        },
    )
    .await
    .expect("Failed to create user")
}
