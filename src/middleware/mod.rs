use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    error::AppError,
    utils::{cookies, jwt::SessionUser},
};

fn authenticate(state: &AppState, req: &Request) -> Result<SessionUser, AppError> {
    let token = cookies::session_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    state
        .sessions
        .verify(&token)
        .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = authenticate(&state, &req)?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

pub async fn admin_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = authenticate(&state, &req)?;

    if !session.is_admin() {
        tracing::warn!("User {} denied admin access to {}", session.id, req.uri().path());
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
