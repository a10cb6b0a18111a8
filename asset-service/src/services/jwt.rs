use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::UserRole;

/// JWT service for token generation and validation (HS256).
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
    refresh_token_expiry_days: i64,
}

/// Claims for access tokens (short-lived).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT id
    pub jti: String,
}

/// Claims for refresh tokens (long-lived).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    pub sub: String,
    /// Token id, matching the persisted token row.
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned to the client on login/refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        }
    }

    pub fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: (now + Duration::minutes(self.access_token_expiry_minutes)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Generate a refresh token. The returned `jti` is what gets persisted.
    pub fn generate_refresh_token(
        &self,
        user_id: &str,
    ) -> Result<(String, RefreshTokenClaims), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = RefreshTokenClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: (now + Duration::days(self.refresh_token_expiry_days)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, claims))
    }

    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    pub fn validate_refresh_token(
        &self,
        token: &str,
    ) -> Result<RefreshTokenClaims, jsonwebtoken::errors::Error> {
        let data = decode::<RefreshTokenClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    pub fn refresh_token_expiry_days(&self) -> i64 {
        self.refresh_token_expiry_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "unit-test-secret".to_string(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 30,
            reset_password_expiry_minutes: 10,
            verify_email_expiry_minutes: 10,
        })
    }

    #[test]
    fn test_access_token_round_trip() {
        let jwt = test_service();
        let token = jwt
            .generate_access_token("u1", "alice@example.com", UserRole::Admin)
            .unwrap();
        let claims = jwt.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let jwt = test_service();
        let (token, issued) = jwt.generate_refresh_token("u1").unwrap();
        let claims = jwt.validate_refresh_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let jwt = test_service();
        let other = JwtService::new(&JwtConfig {
            secret: "a-different-secret".to_string(),
            access_token_expiry_minutes: 30,
            refresh_token_expiry_days: 30,
            reset_password_expiry_minutes: 10,
            verify_email_expiry_minutes: 10,
        });
        let token = jwt
            .generate_access_token("u1", "alice@example.com", UserRole::User)
            .unwrap();
        assert!(other.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let jwt = test_service();
        let (token, _) = jwt.generate_refresh_token("u1").unwrap();
        // Missing email/role claims: must not validate as an access token.
        assert!(jwt.validate_access_token(&token).is_err());
    }
}
