use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::Result, models::CartItem};

/// Upper bound for a single cart line.
pub const MAX_CART_QUANTITY: i32 = 999;

pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Adds `quantity` to the existing line, or creates it. The sum is capped at
/// `MAX_CART_QUANTITY`.
pub async fn add_or_increment(
    pool: &PgPool,
    user_id: Uuid,
    equipment_id: i32,
    quantity: i32,
) -> Result<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(
        "INSERT INTO cart_items (user_id, equipment_id, quantity)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, equipment_id)
         DO UPDATE SET quantity = LEAST(cart_items.quantity + EXCLUDED.quantity, $4),
                       updated_at = NOW()
         RETURNING *",
    )
    .bind(user_id)
    .bind(equipment_id)
    .bind(quantity)
    .bind(MAX_CART_QUANTITY)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn set_quantity(
    pool: &PgPool,
    user_id: Uuid,
    equipment_id: i32,
    quantity: i32,
) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
        "UPDATE cart_items SET quantity = $3, updated_at = NOW()
         WHERE user_id = $1 AND equipment_id = $2
         RETURNING *",
    )
    .bind(user_id)
    .bind(equipment_id)
    .bind(quantity)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn remove_item(pool: &PgPool, user_id: Uuid, equipment_id: i32) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND equipment_id = $2")
        .bind(user_id)
        .bind(equipment_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn clear_cart(pool: &PgPool, user_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_by_equipment(pool: &PgPool, equipment_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE equipment_id = $1")
        .bind(equipment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
