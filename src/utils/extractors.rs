use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    utils::{client_ip, cookies, jwt::SessionUser},
};

pub fn extract_user_id(session: &SessionUser) -> Result<Uuid> {
    session
        .id
        .parse::<Uuid>()
        .map_err(|_| AppError::Unauthorized("Unauthorized".to_string()))
}

/// Session of the caller when a valid one is present; never rejects.
pub struct OptionalSession(pub Option<SessionUser>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<SessionUser>() {
            return Ok(Self(Some(session.clone())));
        }

        let session = cookies::session_token(&parts.headers)
            .and_then(|token| state.sessions.verify(&token));

        Ok(Self(session))
    }
}

/// Requester address and user agent, as recorded with product views.
pub struct ClientInfo {
    pub ip: String,
    pub user_agent: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self {
            ip: client_ip::client_ip_from_parts(parts),
            user_agent: client_ip::user_agent(&parts.headers),
        })
    }
}
