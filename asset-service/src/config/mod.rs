use serde::Deserialize;
use service_core::config as core_config;
use service_core::config::get_env;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub api_prefix: String,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
    pub reset_password_expiry_minutes: i64,
    pub verify_email_expiry_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub from: String,
    /// Base URL embedded in reset/verify links sent by email.
    pub frontend_base_url: String,
}

impl AssetConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix.
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AssetConfig {
            common,
            api_prefix: get_env("API_PREFIX", Some("/api/v1"), is_prod)?,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("asset_db"), is_prod)?,
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", Some("dev-only-secret"), is_prod)?,
                access_token_expiry_minutes: parse_i64("JWT_ACCESS_EXPIRY_MINUTES", 30, is_prod)?,
                refresh_token_expiry_days: parse_i64("JWT_REFRESH_EXPIRY_DAYS", 30, is_prod)?,
                reset_password_expiry_minutes: parse_i64("JWT_RESET_EXPIRY_MINUTES", 10, is_prod)?,
                verify_email_expiry_minutes: parse_i64("JWT_VERIFY_EXPIRY_MINUTES", 10, is_prod)?,
            },
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("localhost"), is_prod)?,
                user: get_env("SMTP_USER", Some(""), is_prod)?,
                password: get_env("SMTP_PASSWORD", Some(""), is_prod)?,
                from: get_env("SMTP_FROM", Some("noreply@example.com"), is_prod)?,
                frontend_base_url: get_env(
                    "FRONTEND_BASE_URL",
                    Some("http://localhost:3000"),
                    is_prod,
                )?,
            },
        })
    }
}

fn parse_i64(key: &str, default: i64, is_prod: bool) -> Result<i64, AppError> {
    let raw = get_env(key, Some(&default.to_string()), is_prod)?;
    raw.parse()
        .map_err(|_| AppError::ConfigError(anyhow::anyhow!("{} must be an integer, got {}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_i64_falls_back_to_default() {
        std::env::remove_var("TEST_PARSE_I64_UNSET");
        let value = parse_i64("TEST_PARSE_I64_UNSET", 42, false).unwrap();
        assert_eq!(value, 42);
    }
}
