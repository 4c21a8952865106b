use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{PriceChangeSummary, PriceHistory},
};

pub async fn insert_change(
    pool: &PgPool,
    equipment_id: i32,
    old_price: Decimal,
    new_price: Decimal,
    changed_by: Option<Uuid>,
) -> Result<PriceHistory> {
    let entry = sqlx::query_as::<_, PriceHistory>(
        "INSERT INTO price_history (equipment_id, old_price, new_price, changed_by)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(equipment_id)
    .bind(old_price)
    .bind(new_price)
    .bind(changed_by)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<PriceChangeSummary>> {
    let changes = sqlx::query_as::<_, PriceChangeSummary>(
        "SELECT equipment_id, old_price, new_price, changed_at
         FROM price_history
         ORDER BY changed_at DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(changes)
}

pub async fn find_by_equipment(pool: &PgPool, equipment_id: i32) -> Result<Vec<PriceHistory>> {
    let history = sqlx::query_as::<_, PriceHistory>(
        "SELECT * FROM price_history WHERE equipment_id = $1 ORDER BY changed_at DESC",
    )
    .bind(equipment_id)
    .fetch_all(pool)
    .await?;

    Ok(history)
}

pub async fn delete_by_equipment(pool: &PgPool, equipment_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM price_history WHERE equipment_id = $1")
        .bind(equipment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
