use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    Access,
    Refresh,
    ResetPassword,
    VerifyEmail,
}

/// A persisted token: refresh JWTs plus the opaque reset/verify tokens sent
/// by email. Revocation flips `blacklisted` rather than deleting the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    pub token: String,

    pub token_type: TokenType,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub expires: DateTime<Utc>,

    pub blacklisted: bool,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(
        user_id: String,
        token: String,
        token_type: TokenType,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            token,
            token_type,
            expires,
            blacklisted: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires < Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_type_wire_values() {
        assert_eq!(
            serde_json::to_value(TokenType::ResetPassword).unwrap(),
            "RESET_PASSWORD"
        );
        assert_eq!(
            serde_json::to_value(TokenType::VerifyEmail).unwrap(),
            "VERIFY_EMAIL"
        );
    }

    #[test]
    fn test_is_expired() {
        let live = Token::new(
            "u1".into(),
            "t".into(),
            TokenType::Refresh,
            Utc::now() + Duration::minutes(5),
        );
        let stale = Token::new(
            "u1".into(),
            "t".into(),
            TokenType::Refresh,
            Utc::now() - Duration::minutes(5),
        );
        assert!(!live.is_expired());
        assert!(stale.is_expired());
    }
}
