use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::Result, models::Favorite};

pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Favorite>> {
    let favorites = sqlx::query_as::<_, Favorite>(
        "SELECT * FROM favorites WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(favorites)
}

/// Idempotent: an existing pair is returned unchanged.
pub async fn add_favorite(pool: &PgPool, user_id: Uuid, equipment_id: i32) -> Result<Favorite> {
    let favorite = sqlx::query_as::<_, Favorite>(
        "INSERT INTO favorites (user_id, equipment_id)
         VALUES ($1, $2)
         ON CONFLICT (user_id, equipment_id) DO UPDATE SET user_id = EXCLUDED.user_id
         RETURNING *",
    )
    .bind(user_id)
    .bind(equipment_id)
    .fetch_one(pool)
    .await?;

    Ok(favorite)
}

pub async fn remove_favorite(pool: &PgPool, user_id: Uuid, equipment_id: i32) -> Result<()> {
    sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND equipment_id = $2")
        .bind(user_id)
        .bind(equipment_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn is_favorite(pool: &PgPool, user_id: Uuid, equipment_id: i32) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND equipment_id = $2)",
    )
    .bind(user_id)
    .bind(equipment_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn delete_by_equipment(pool: &PgPool, equipment_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM favorites WHERE equipment_id = $1")
        .bind(equipment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
