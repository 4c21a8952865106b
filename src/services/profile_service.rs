use sqlx::PgPool;

use crate::{
    models::{NewProfile, Profile, UserRole},
    queries::profile_queries,
    services::identity_service::{ProviderUser, UserMetadata},
    utils::{best_effort::BestEffort, jwt::SessionUser},
};

/// `full_name`, then `name`, then the local part of the email.
pub fn display_name(metadata: &UserMetadata, email: Option<&str>) -> Option<String> {
    [metadata.full_name.as_deref(), metadata.name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .or_else(|| {
            email
                .and_then(|email| email.split('@').next())
                .filter(|local| !local.is_empty())
        })
        .map(str::to_string)
}

pub fn avatar_url(metadata: &UserMetadata) -> Option<String> {
    metadata
        .avatar_url
        .clone()
        .or_else(|| metadata.picture.clone())
}

/// Looks up the profile, creating it on first login. Lookup or insert failures
/// are logged and yield `None`; the login proceeds without a profile.
pub async fn ensure_profile(pool: &PgPool, user: &ProviderUser) -> Option<Profile> {
    let existing = profile_queries::find_by_id(pool, user.id)
        .await
        .best_effort("profile lookup")?;

    if let Some(profile) = existing {
        return Some(profile);
    }

    let email = user.email.clone().unwrap_or_default();
    tracing::info!("Creating profile for user {}", user.id);

    profile_queries::create_profile(
        pool,
        &NewProfile {
            id: user.id,
            name: display_name(&user.user_metadata, Some(&email)),
            avatar_url: avatar_url(&user.user_metadata),
            email,
            role: UserRole::User,
        },
    )
    .await
    .best_effort("profile creation")
}

pub fn session_user(user: &ProviderUser, profile: Option<&Profile>) -> SessionUser {
    let role = match profile {
        Some(profile) => profile.user_role(),
        None => UserRole::from_role_str(user.role.as_deref().unwrap_or("user")),
    };

    let email = user
        .email
        .clone()
        .or_else(|| profile.map(|p| p.email.clone()))
        .unwrap_or_default();

    SessionUser {
        id: user.id.to_string(),
        name: profile
            .and_then(|p| p.name.clone())
            .or_else(|| display_name(&user.user_metadata, Some(&email))),
        avatar: profile
            .and_then(|p| p.avatar_url.clone())
            .or_else(|| avatar_url(&user.user_metadata)),
        email,
        role,
    }
}
