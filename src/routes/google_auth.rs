use axum::{
    Json,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use http::{HeaderMap, header::SET_COOKIE};
use url::Url;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{OAuthCallbackQuery, OAuthCodeRequest},
    services::profile_service,
    utils::{
        cookies::{self, OAUTH_VERIFIER_COOKIE},
        jwt::SessionUser,
        pkce,
    },
};

use super::login;

const PROVIDER: &str = "google";

pub async fn google_login(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let pair = pkce::generate();
    let redirect_to = format!("{}/auth/google/callback", state.backend_url);
    let authorize_url = state
        .identity
        .authorize_url(PROVIDER, &redirect_to, &pair.challenge)?;

    Ok((
        AppendHeaders([(SET_COOKIE, state.cookies.verifier_cookie(&pair.verifier))]),
        Redirect::to(&authorize_url),
    ))
}

async fn exchange_code(state: &AppState, code: &str, verifier: &str) -> Result<SessionUser> {
    let session = state
        .identity
        .exchange_code_for_session(code, verifier)
        .await?;
    let profile = profile_service::ensure_profile(&state.db, &session.user).await;

    Ok(profile_service::session_user(&session.user, profile.as_ref()))
}

/// Browser lands here from the provider; every outcome ends in a redirect to the client.
pub async fn google_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OAuthCallbackQuery>,
) -> Response {
    if let Some(error) = query.error_description.or(query.error) {
        tracing::warn!("Google sign-in rejected by provider: {}", error);
        return login_error_redirect(&state, &error);
    }

    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        return login_error_redirect(&state, "Missing authorization code");
    };

    let Some(verifier) = cookies::read_cookie(&headers, OAUTH_VERIFIER_COOKIE) else {
        return login_error_redirect(&state, "Sign-in session expired, please try again");
    };

    let signed = async {
        let user = exchange_code(&state, &code, &verifier).await?;
        let token = state.sessions.sign(&user)?;
        Ok::<_, AppError>((user, token))
    }
    .await;

    match signed {
        Ok((user, token)) => {
            tracing::info!("User {} signed in with Google", user.id);
            (
                AppendHeaders([
                    (SET_COOKIE, state.cookies.session_cookie(&token)),
                    (SET_COOKIE, state.cookies.clear_verifier_cookie()),
                ]),
                Redirect::to(&state.client_url),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Google code exchange failed: {}", e);
            login_error_redirect(&state, redirect_error_message(&e))
        }
    }
}

/// Same exchange for a front-end that receives the provider redirect itself.
pub async fn google_callback_json(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<OAuthCodeRequest>,
) -> Result<impl IntoResponse> {
    let code = payload
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Authorization code is required".to_string()))?;

    let verifier = payload
        .code_verifier
        .filter(|verifier| !verifier.is_empty())
        .or_else(|| cookies::read_cookie(&headers, OAUTH_VERIFIER_COOKIE))
        .ok_or_else(|| AppError::BadRequest("Missing PKCE code verifier".to_string()))?;

    let user = exchange_code(&state, &code, &verifier).await?;
    tracing::info!("User {} signed in with Google", user.id);

    Ok((
        AppendHeaders([(SET_COOKIE, state.cookies.clear_verifier_cookie())]),
        login::signed_in(&state, user)?,
    ))
}

/// Provider rejections are shown to the user; anything else stays in the logs.
fn redirect_error_message(error: &AppError) -> &str {
    match error {
        AppError::Upstream(message) => message.as_str(),
        _ => "Sign-in failed, please try again",
    }
}

fn login_error_redirect(state: &AppState, message: &str) -> Response {
    let login_url = format!("{}/login", state.client_url);
    let location = Url::parse_with_params(&login_url, &[("error", message)])
        .map(String::from)
        .unwrap_or(login_url);

    (
        AppendHeaders([(SET_COOKIE, state.cookies.clear_verifier_cookie())]),
        Redirect::to(&location),
    )
        .into_response()
}
