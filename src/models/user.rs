//! User account model with role-based access control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Platform role. Administrators manage the whole platform, moderators
/// author and own courses, students consume them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Administrator,
    Moderator,
    Student,
}

impl UserRole {
    /// Administrators and moderators are staff; students are not.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Administrator | Self::Moderator)
    }
}

/// Full user row from database (includes password_hash — never serialize to API).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response DTO — excludes password_hash and internal fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            is_active: u.is_active,
            last_login: u.last_login,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 128))]
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateUser {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Administrator).unwrap(),
            "\"administrator\""
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Student).unwrap(),
            "\"student\""
        );
    }

    #[test]
    fn user_role_staff_check() {
        assert!(UserRole::Administrator.is_staff());
        assert!(UserRole::Moderator.is_staff());
        assert!(!UserRole::Student.is_staff());
    }

    #[test]
    fn user_response_excludes_password() {
        let json = serde_json::to_string(&UserResponse {
            id: 1,
            username: "admin".to_string(),
            email: "admin@learnhub.test".to_string(),
            full_name: "Admin".to_string(),
            role: UserRole::Administrator,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        })
        .unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn user_to_response_conversion() {
        let user = User {
            id: 7,
            username: "maya".to_string(),
            email: "maya@learnhub.test".to_string(),
            password_hash: "secret_hash".to_string(),
            full_name: "Maya Lin".to_string(),
            role: UserRole::Moderator,
            is_active: true,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response: UserResponse = user.into();
        assert_eq!(response.id, 7);
        assert_eq!(response.role, UserRole::Moderator);
    }

    #[test]
    fn create_user_rejects_bad_email() {
        let input = CreateUser {
            username: "newbie".to_string(),
            email: "not-an-email".to_string(),
            password: "CorrectHorse1!".to_string(),
            full_name: "New Student".to_string(),
            role: UserRole::Student,
        };
        assert!(validator::Validate::validate(&input).is_err());
    }

    #[test]
    fn create_user_accepts_valid_input() {
        let input = CreateUser {
            username: "newbie".to_string(),
            email: "newbie@learnhub.test".to_string(),
            password: "CorrectHorse1!".to_string(),
            full_name: "New Student".to_string(),
            role: UserRole::Student,
        };
        assert!(validator::Validate::validate(&input).is_ok());
    }
}
