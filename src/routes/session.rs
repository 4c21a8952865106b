use axum::{
    Json,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use http::header::SET_COOKIE;

use crate::{
    AppState,
    models::{AuthCheckResponse, MessageResponse},
    utils::extractors::OptionalSession,
};

pub async fn check_auth(OptionalSession(session): OptionalSession) -> Json<AuthCheckResponse> {
    Json(AuthCheckResponse {
        authorized: session.is_some(),
        user: session,
    })
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, state.cookies.clear_session_cookie())]),
        Json(MessageResponse::new("Logged out")),
    )
}
