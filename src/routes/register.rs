use axum::{Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{MessageResponse, NewProfile, RegisterRequest, ResetPasswordRequest, UserRole},
    queries::profile_queries,
    services::profile_service,
    utils::best_effort::BestEffort,
};

const MIN_PASSWORD_LENGTH: usize = 6;

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>> {
    let email = payload.email.trim();
    if !is_valid_email(email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let user = state.identity.sign_up(email, &payload.password, name).await?;

    profile_queries::create_profile(
        &state.db,
        &NewProfile {
            id: user.id,
            email: email.to_string(),
            name: name
                .map(str::to_string)
                .or_else(|| profile_service::display_name(&user.user_metadata, Some(email))),
            avatar_url: profile_service::avatar_url(&user.user_metadata),
            role: UserRole::User,
        },
    )
    .await
    .best_effort("profile creation");

    tracing::info!("Registered user {}", user.id);

    Ok(Json(MessageResponse::new(
        "Check your email to confirm account",
    )))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let redirect_to = format!("{}/reset-password", state.client_url);
    state
        .identity
        .send_password_reset(email, &redirect_to)
        .await?;

    Ok(Json(MessageResponse::new("Reset email sent")))
}
