use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Superadmin,
    Admin,
    Manager,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    InActive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_name: String,

    /// Unique among non-deleted users.
    pub email: String,

    /// Unique among non-deleted users.
    pub phone: String,

    /// Argon2 hash, never serialized back to clients (see [`SanitizedUser`]).
    pub password_hash: String,

    pub user_role: UserRole,

    pub status: UserStatus,

    pub branch_id: String,

    pub department_id: String,

    pub company_id: String,

    pub email_verified: bool,

    pub deleted: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<mongodb::bson::DateTime>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_name: String,
        email: String,
        phone: String,
        password_hash: String,
        user_role: UserRole,
        branch_id: String,
        department_id: String,
        company_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_name,
            email,
            phone,
            password_hash,
            user_role,
            status: UserStatus::Active,
            branch_id,
            department_id,
            company_id,
            email_verified: false,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User shape returned by the API: everything except the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedUser {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub phone: String,
    pub user_role: UserRole,
    pub status: UserStatus,
    pub branch_id: String,
    pub department_id: String,
    pub company_id: String,
    pub email_verified: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for SanitizedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            email: user.email,
            phone: user.phone,
            user_role: user.user_role,
            status: user.status,
            branch_id: user.branch_id,
            department_id: user.department_id,
            company_id: user.company_id,
            email_verified: user.email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_and_status_wire_values() {
        assert_eq!(
            serde_json::to_value(UserRole::Superadmin).unwrap(),
            "SUPERADMIN"
        );
        assert_eq!(serde_json::to_value(UserStatus::Active).unwrap(), "ACTIVE");
        assert_eq!(
            serde_json::to_value(UserStatus::InActive).unwrap(),
            "IN_ACTIVE"
        );
    }

    #[test]
    fn test_sanitized_user_has_no_password_hash() {
        let user = User::new(
            "Alice".into(),
            "alice@example.com".into(),
            "+15550100".into(),
            "$argon2id$fake".into(),
            UserRole::User,
            "b1".into(),
            "d1".into(),
            "c1".into(),
        );
        let sanitized = SanitizedUser::from(user);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
    }
}
