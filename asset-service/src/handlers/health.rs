use crate::startup::AppState;
use axum::extract::State;
use axum::{response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.db.health_check().await?;
    Ok(Json(json!({
        "status": "ok",
        "service": "asset-service",
        "version": env!("CARGO_PKG_VERSION")
    })))
}
