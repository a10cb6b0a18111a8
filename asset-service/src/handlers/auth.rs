use crate::dtos::auth::{
    ForgotPasswordRequest, LoginRequest, LogoutRequest, RefreshTokensRequest,
    ResetPasswordRequest, VerifyEmailRequest,
};
use crate::dtos::ApiResponse;
use crate::middleware::AuthUser;
use crate::models::SanitizedUser;
use crate::services::TokenResponse;
use crate::startup::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: SanitizedUser,
    pub tokens: TokenResponse,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    payload.validate()?;
    let (user, tokens) = state.auth.login(&payload.email, &payload.password).await?;
    Ok(ApiResponse::ok(
        "Logged in successfully",
        LoginResponse { user, tokens },
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    state.auth.logout(&payload.refresh_token).await?;
    Ok(ApiResponse::message("Logged out successfully"))
}

pub async fn refresh_tokens(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokensRequest>,
) -> Result<ApiResponse<TokenResponse>, AppError> {
    payload.validate()?;
    let tokens = state.auth.refresh_tokens(&payload.refresh_token).await?;
    Ok(ApiResponse::ok("Tokens refreshed successfully", tokens))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    state.auth.forgot_password(&payload.email).await?;
    Ok(ApiResponse::message("Password reset email sent"))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    state
        .auth
        .reset_password(&payload.token, &payload.password)
        .await?;
    Ok(ApiResponse::message("Password reset successfully"))
}

pub async fn send_verification_email(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<ApiResponse<()>, AppError> {
    state.auth.send_verification_email(&claims.sub).await?;
    Ok(ApiResponse::message("Verification email sent"))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<ApiResponse<()>, AppError> {
    payload.validate()?;
    state.auth.verify_email(&payload.token).await?;
    Ok(ApiResponse::message("Email verified successfully"))
}
