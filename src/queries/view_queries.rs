use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::Result,
    models::{NewProductView, ProductView, ViewEvent},
};

pub async fn insert_view(pool: &PgPool, view: &NewProductView) -> Result<()> {
    sqlx::query(
        "INSERT INTO product_views (equipment_id, user_id, ip_address, user_agent, viewed_at)
         VALUES ($1, $2, $3, $4, NOW())",
    )
    .bind(view.equipment_id)
    .bind(view.user_id)
    .bind(&view.ip_address)
    .bind(&view.user_agent)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_since(pool: &PgPool, since: DateTime<Utc>) -> Result<Vec<ViewEvent>> {
    let views = sqlx::query_as::<_, ViewEvent>(
        "SELECT equipment_id, viewed_at FROM product_views WHERE viewed_at >= $1",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(views)
}

pub async fn find_by_equipment(pool: &PgPool, equipment_id: i32) -> Result<Vec<ProductView>> {
    let views = sqlx::query_as::<_, ProductView>(
        "SELECT * FROM product_views WHERE equipment_id = $1 ORDER BY viewed_at DESC",
    )
    .bind(equipment_id)
    .fetch_all(pool)
    .await?;

    Ok(views)
}

pub async fn delete_by_equipment(pool: &PgPool, equipment_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM product_views WHERE equipment_id = $1")
        .bind(equipment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
