use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{NewProfile, Profile},
};

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}

/// Inserts the profile unless one already exists for the id.
pub async fn create_profile(pool: &PgPool, profile: &NewProfile) -> Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (id, email, name, avatar_url, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (id) DO UPDATE SET updated_at = profiles.updated_at
         RETURNING *",
    )
    .bind(profile.id)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(&profile.avatar_url)
    .bind(profile.role.as_str())
    .fetch_one(pool)
    .await?;

    Ok(profile)
}
