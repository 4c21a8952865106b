use axum::{
    Json,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use http::{HeaderName, header::SET_COOKIE};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, LoginRequest},
    queries::profile_queries,
    services::profile_service,
    utils::{best_effort::BestEffort, jwt::SessionUser},
};

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let session = state
        .identity
        .sign_in_with_password(email, &payload.password)
        .await?;

    let profile = profile_queries::find_by_id(&state.db, session.user.id)
        .await
        .best_effort("profile lookup")
        .flatten();

    let user = profile_service::session_user(&session.user, profile.as_ref());
    tracing::info!("User {} logged in", user.id);

    signed_in(&state, user)
}

type SignedIn = (AppendHeaders<[(HeaderName, String); 1]>, Json<AuthResponse>);

/// Signs the session and returns the login payload with its cookie.
pub(super) fn signed_in(state: &AppState, user: SessionUser) -> Result<SignedIn> {
    let token = state.sessions.sign(&user)?;

    Ok((
        AppendHeaders([(SET_COOKIE, state.cookies.session_cookie(&token))]),
        Json(AuthResponse {
            message: "Logged in".to_string(),
            role: user.role,
            user,
        }),
    ))
}
