use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::UserRole,
};

const SESSION_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Identity carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
            name: claims.name,
            avatar: claims.avatar,
        }
    }
}

/// Signs and verifies session tokens with the configured HS256 secret.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn sign(&self, user: &SessionUser) -> Result<String> {
        self.sign_with_lifetime(user, Duration::days(SESSION_LIFETIME_DAYS))
    }

    fn sign_with_lifetime(&self, user: &SessionUser, lifetime: Duration) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| AppError::InternalError("Failed to calculate expiration".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            iat: now.timestamp(),
            exp: expiration,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalError(format!("Token generation failed: {}", e)))
    }

    /// Returns `None` for expired, tampered or malformed tokens.
    pub fn verify(&self, token: &str) -> Option<SessionUser> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims.into()),
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                None
            }
        }
    }
}
