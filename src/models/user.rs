use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::jwt::SessionUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Maps role strings from profile rows and the auth provider onto the two roles.
    /// `supabase_admin` and `service_role` are older spellings of the admin role.
    pub fn from_role_str(role: &str) -> Self {
        match role.trim() {
            "admin" | "supabase_admin" | "service_role" => UserRole::Admin,
            _ => UserRole::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// Local mirror of the auth provider's user, used for display fields and role.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn user_role(&self) -> UserRole {
        UserRole::from_role_str(&self.role)
    }
}

#[derive(Debug)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCodeRequest {
    pub code: Option<String>,
    pub code_verifier: Option<String>,
}

// Response types

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub role: UserRole,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct AuthCheckResponse {
    pub authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_admin_literals_map_to_admin() {
        assert_eq!(UserRole::from_role_str("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_role_str("supabase_admin"), UserRole::Admin);
        assert_eq!(UserRole::from_role_str("service_role"), UserRole::Admin);
    }

    #[test]
    fn everything_else_is_a_regular_user() {
        assert_eq!(UserRole::from_role_str("user"), UserRole::User);
        assert_eq!(UserRole::from_role_str("authenticated"), UserRole::User);
        assert_eq!(UserRole::from_role_str(""), UserRole::User);
        assert_eq!(UserRole::from_role_str("Admin"), UserRole::User);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "admin");
        assert_eq!(
            serde_json::from_value::<UserRole>(serde_json::json!("user")).unwrap(),
            UserRole::User
        );
    }
}
