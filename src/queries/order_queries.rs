use sqlx::PgPool;

use crate::{error::Result, models::Order};

pub async fn find_all(pool: &PgPool) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(orders)
}

pub async fn find_by_equipment(pool: &PgPool, equipment_id: i32) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE equipment_id = $1 ORDER BY created_at DESC",
    )
    .bind(equipment_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}
