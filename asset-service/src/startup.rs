use crate::config::AssetConfig;
use crate::handlers;
use crate::middleware::auth_middleware;
use crate::services::{AuthService, EmailProvider, JwtService, MongoDb};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AssetConfig,
    pub db: MongoDb,
    pub jwt: JwtService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(config: AssetConfig, db: MongoDb, email: Arc<dyn EmailProvider>) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let auth = AuthService::new(db.clone(), jwt.clone(), email, &config.jwt);
        Self {
            config,
            db,
            jwt,
            auth,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let organization_routes = Router::new()
        .route(
            "/createOrganization",
            post(handlers::organizations::create_organization),
        )
        .route(
            "/getAllOrganizations",
            get(handlers::organizations::get_all_organizations),
        )
        .route(
            "/bulk-delete",
            post(handlers::organizations::bulk_delete_organizations),
        )
        .route(
            "/:organizationId",
            get(handlers::organizations::get_organization_by_id)
                .put(handlers::organizations::update_organization_by_id)
                .delete(handlers::organizations::delete_organization_by_id),
        );

    let branch_routes = Router::new()
        .route("/createBranch", post(handlers::branches::create_branch))
        .route("/getAllBranches", get(handlers::branches::get_all_branches))
        .route("/bulk-delete", post(handlers::branches::bulk_delete_branches))
        .route(
            "/:branchId",
            get(handlers::branches::get_branch_by_id)
                .put(handlers::branches::update_branch_by_id)
                .delete(handlers::branches::delete_branch_by_id),
        );

    let department_routes = Router::new()
        .route(
            "/createDepartment",
            post(handlers::departments::create_department),
        )
        .route(
            "/getAllDepartments",
            get(handlers::departments::get_all_departments),
        )
        .route(
            "/bulk-delete",
            post(handlers::departments::bulk_delete_departments),
        )
        .route(
            "/:departmentId/assets",
            get(handlers::departments::get_department_assets),
        )
        .route(
            "/:departmentId/users",
            get(handlers::departments::get_department_users),
        )
        .route(
            "/:departmentId",
            get(handlers::departments::get_department_by_id)
                .put(handlers::departments::update_department_by_id)
                .delete(handlers::departments::delete_department_by_id),
        );

    let user_routes = Router::new()
        .route("/createUser", post(handlers::users::create_user))
        .route("/getAllUsers", get(handlers::users::get_all_users))
        .route("/bulk-delete", post(handlers::users::bulk_delete_users))
        .route(
            "/:userId",
            get(handlers::users::get_user_by_id)
                .put(handlers::users::update_user_by_id)
                .delete(handlers::users::delete_user_by_id),
        );

    let asset_routes = Router::new()
        .route("/createAsset", post(handlers::assets::create_asset))
        .route("/getAllAssets", get(handlers::assets::get_all_assets))
        .route("/bulk-delete", post(handlers::assets::bulk_delete_assets))
        .route(
            "/:assetId/assignments",
            get(handlers::assets::get_asset_assignments),
        )
        .route("/:assetId/history", get(handlers::assets::get_asset_history))
        .route(
            "/:assetId",
            get(handlers::assets::get_asset_by_id)
                .put(handlers::assets::update_asset_by_id)
                .delete(handlers::assets::delete_asset_by_id),
        );

    let assignment_routes = Router::new()
        .route(
            "/asset-assignments",
            post(handlers::assignments::assign_asset)
                .get(handlers::assignments::get_asset_assignments),
        )
        .route(
            "/asset-assignments/:assignmentId/unassign",
            post(handlers::assignments::unassign_asset),
        )
        .route(
            "/asset-histories",
            get(handlers::assignments::get_asset_histories),
        )
        .route(
            "/available-assets",
            get(handlers::assignments::get_available_assets),
        )
        .route(
            "/assignable-users",
            get(handlers::assignments::get_assignable_users),
        )
        .route(
            "/bulk-delete",
            post(handlers::assignments::bulk_delete_assignments),
        )
        .route(
            "/:assignmentId",
            get(handlers::assignments::get_assignment_by_id)
                .put(handlers::assignments::update_assignment)
                .delete(handlers::assignments::delete_assignment_by_id),
        );

    let notification_routes = Router::new()
        .route(
            "/getUserNotifications/:userId",
            get(handlers::notifications::get_user_notifications),
        )
        .route(
            "/:notificationId/read",
            post(handlers::notifications::mark_notification_read),
        );

    let protected = Router::new()
        .nest("/organization", organization_routes)
        .nest("/branch", branch_routes)
        .nest("/department", department_routes)
        .nest("/users", user_routes)
        .nest("/asset", asset_routes)
        .nest("/assignAsset", assignment_routes)
        .nest("/notification", notification_routes)
        .route(
            "/auth/send-verification-email",
            post(handlers::auth::send_verification_email),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh-tokens", post(handlers::auth::refresh_tokens))
        .route(
            "/auth/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .route("/auth/verify-email", post(handlers::auth::verify_email));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest(&state.config.api_prefix, protected.merge(auth_routes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: AssetConfig, email: Arc<dyn EmailProvider>) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let state = AppState::new(config, db, email);
        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
