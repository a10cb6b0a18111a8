use super::database::MongoDb;
use super::email::EmailProvider;
use super::jwt::{JwtService, TokenResponse};
use super::user;
use crate::config::JwtConfig;
use crate::models::{SanitizedUser, Token, TokenType, User, UserStatus};
use crate::utils::password::{hash_password, verify_password, Password};
use chrono::{Duration, Utc};
use mongodb::bson::doc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use service_core::error::AppError;
use std::sync::Arc;

/// Login, token refresh and the email-driven reset/verify flows.
#[derive(Clone)]
pub struct AuthService {
    db: MongoDb,
    jwt: JwtService,
    email: Arc<dyn EmailProvider>,
    reset_password_expiry_minutes: i64,
    verify_email_expiry_minutes: i64,
}

impl AuthService {
    pub fn new(
        db: MongoDb,
        jwt: JwtService,
        email: Arc<dyn EmailProvider>,
        config: &JwtConfig,
    ) -> Self {
        Self {
            db,
            jwt,
            email,
            reset_password_expiry_minutes: config.reset_password_expiry_minutes,
            verify_email_expiry_minutes: config.verify_email_expiry_minutes,
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(SanitizedUser, TokenResponse), AppError> {
        let user = user::get_user_by_email(&self.db, email)
            .await?
            .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Invalid email or password")))?;

        verify_password(&Password::new(password.to_string()), &user.password_hash)
            .map_err(|_| AppError::AuthError(anyhow::anyhow!("Invalid email or password")))?;

        if user.status != UserStatus::Active {
            return Err(AppError::Forbidden(anyhow::anyhow!("Account is inactive")));
        }

        let tokens = self.issue_token_pair(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((SanitizedUser::from(user), tokens))
    }

    async fn issue_token_pair(&self, user: &User) -> Result<TokenResponse, AppError> {
        let access_token = self
            .jwt
            .generate_access_token(&user.id, &user.email, user.user_role)?;
        let (refresh_token, claims) = self.jwt.generate_refresh_token(&user.id)?;

        let record = Token::new(
            user.id.clone(),
            claims.jti.clone(),
            TokenType::Refresh,
            Utc::now() + Duration::days(self.jwt.refresh_token_expiry_days()),
        );
        self.db.tokens().insert_one(&record, None).await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_seconds(),
        })
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;

        let updated = self
            .db
            .tokens()
            .update_one(
                doc! { "token": &claims.jti, "tokenType": "REFRESH", "blacklisted": false },
                doc! { "$set": { "blacklisted": true } },
                None,
            )
            .await?;
        if updated.matched_count == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("Token not found")));
        }

        tracing::info!(user_id = %claims.sub, "User logged out");
        Ok(())
    }

    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;

        let record = self
            .db
            .tokens()
            .find_one(
                doc! { "token": &claims.jti, "tokenType": "REFRESH", "blacklisted": false },
                None,
            )
            .await?
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Refresh token revoked")))?;
        if record.is_expired() {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "Refresh token expired"
            )));
        }

        let user = user::get_user_by_id(&self.db, &claims.sub).await?;

        // Rotation: the presented token is spent either way.
        self.db
            .tokens()
            .update_one(
                doc! { "_id": &record.id },
                doc! { "$set": { "blacklisted": true } },
                None,
            )
            .await?;

        self.issue_token_pair(&user).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let user = user::get_user_by_email(&self.db, email)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No user with this email")))?;

        let token = opaque_token();
        let record = Token::new(
            user.id.clone(),
            token.clone(),
            TokenType::ResetPassword,
            Utc::now() + Duration::minutes(self.reset_password_expiry_minutes),
        );
        self.db.tokens().insert_one(&record, None).await?;

        self.email
            .send_password_reset_email(&user.email, &token)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset email sent");
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let record = self.consume_token(token, TokenType::ResetPassword).await?;

        let password_hash = hash_password(&Password::new(new_password.to_string()))?;

        // New password and refresh-token revocation land together.
        let mut session = self.db.start_transaction().await?;
        let result: Result<(), AppError> = async {
            self.db
                .users()
                .update_one_with_session(
                    doc! { "_id": &record.user_id },
                    doc! { "$set": {
                        "passwordHash": &password_hash,
                        "updatedAt": Utc::now(),
                    } },
                    None,
                    &mut session,
                )
                .await?;

            self.db
                .tokens()
                .update_many_with_session(
                    doc! { "userId": &record.user_id, "tokenType": "REFRESH" },
                    doc! { "$set": { "blacklisted": true } },
                    None,
                    &mut session,
                )
                .await?;
            Ok(())
        }
        .await;
        if let Err(e) = result {
            session.abort_transaction().await.ok();
            return Err(e);
        }
        session.commit_transaction().await?;

        tracing::info!(user_id = %record.user_id, "Password reset");
        Ok(())
    }

    pub async fn send_verification_email(&self, user_id: &str) -> Result<(), AppError> {
        let user = user::get_user_by_id(&self.db, user_id).await?;
        if user.email_verified {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Email is already verified"
            )));
        }

        let token = opaque_token();
        let record = Token::new(
            user.id.clone(),
            token.clone(),
            TokenType::VerifyEmail,
            Utc::now() + Duration::minutes(self.verify_email_expiry_minutes),
        );
        self.db.tokens().insert_one(&record, None).await?;

        self.email
            .send_verification_email(&user.email, &token)
            .await?;
        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        let record = self.consume_token(token, TokenType::VerifyEmail).await?;

        self.db
            .users()
            .update_one(
                doc! { "_id": &record.user_id },
                doc! { "$set": { "emailVerified": true, "updatedAt": Utc::now() } },
                None,
            )
            .await?;

        tracing::info!(user_id = %record.user_id, "Email verified");
        Ok(())
    }

    /// Look up an opaque token of the given type, check expiry and spend it.
    async fn consume_token(&self, token: &str, token_type: TokenType) -> Result<Token, AppError> {
        let record = self
            .db
            .tokens()
            .find_one(
                doc! {
                    "token": token,
                    "tokenType": mongodb::bson::to_bson(&token_type)?,
                    "blacklisted": false,
                },
                None,
            )
            .await?
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid token")))?;
        if record.is_expired() {
            return Err(AppError::BadRequest(anyhow::anyhow!("Token expired")));
        }

        self.db
            .tokens()
            .update_one(
                doc! { "_id": &record.id },
                doc! { "$set": { "blacklisted": true } },
                None,
            )
            .await?;
        Ok(record)
    }
}

/// Opaque single-purpose token for reset/verify links.
fn opaque_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_token_length_and_charset() {
        let token = opaque_token();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_opaque_tokens_are_unique() {
        assert_ne!(opaque_token(), opaque_token());
    }
}
