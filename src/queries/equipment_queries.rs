use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Equipment, EquipmentChanges, EquipmentSummary, NewEquipment},
};

pub async fn find_all(pool: &PgPool) -> Result<Vec<Equipment>> {
    let items = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(items)
}

pub async fn find_by_category(pool: &PgPool, category: &str) -> Result<Vec<Equipment>> {
    let items = sqlx::query_as::<_, Equipment>(
        "SELECT * FROM equipment WHERE category = $1 ORDER BY created_at DESC",
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Equipment>> {
    let item = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

pub async fn exists(pool: &PgPool, id: i32) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipment WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i32]) -> Result<HashMap<i32, Equipment>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let items = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(items.into_iter().map(|item| (item.id, item)).collect())
}

pub async fn find_categories(pool: &PgPool) -> Result<Vec<String>> {
    let categories: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT category FROM equipment
         WHERE category IS NOT NULL AND btrim(category) <> ''
         ORDER BY category",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn find_summaries(pool: &PgPool) -> Result<Vec<EquipmentSummary>> {
    let items = sqlx::query_as::<_, EquipmentSummary>(
        "SELECT id, name, price, stock, category FROM equipment",
    )
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn create_equipment(pool: &PgPool, new: &NewEquipment) -> Result<Equipment> {
    let item = sqlx::query_as::<_, Equipment>(
        "INSERT INTO equipment (name, description, price, stock, category, images, main_image)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(new.stock)
    .bind(&new.category)
    .bind(&new.images)
    .bind(new.images.first())
    .fetch_one(pool)
    .await?;

    Ok(item)
}

/// Applies the provided fields; `images` and `main_image` are always rewritten.
pub async fn update_equipment(
    pool: &PgPool,
    id: i32,
    changes: &EquipmentChanges,
) -> Result<Option<Equipment>> {
    let mut query_builder = QueryBuilder::<Postgres>::new("UPDATE equipment SET ");
    let mut fields = query_builder.separated(", ");

    if let Some(name) = &changes.name {
        fields.push("name = ").push_bind_unseparated(name.clone());
    }

    if let Some(description) = &changes.description {
        fields
            .push("description = ")
            .push_bind_unseparated(description.clone());
    }

    if let Some(price) = changes.price {
        fields.push("price = ").push_bind_unseparated(price);
    }

    if let Some(stock) = changes.stock {
        fields.push("stock = ").push_bind_unseparated(stock);
    }

    if let Some(category) = &changes.category {
        fields
            .push("category = ")
            .push_bind_unseparated(category.clone());
    }

    fields
        .push("images = ")
        .push_bind_unseparated(changes.images.clone());
    fields
        .push("main_image = ")
        .push_bind_unseparated(changes.images.first().cloned());
    fields.push("updated_at = NOW()");

    query_builder.push(" WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING *");

    let item = query_builder
        .build_query_as::<Equipment>()
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

pub async fn increment_views(pool: &PgPool, id: i32) -> Result<()> {
    sqlx::query("UPDATE equipment SET views_count = views_count + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_equipment(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
