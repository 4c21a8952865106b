use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CreateEquipmentRequest, EquipmentMutationResponse, EquipmentStats, UpdateEquipmentRequest,
    },
    queries::{
        cart_queries, equipment_queries, favorite_queries, order_queries, price_history_queries,
        view_queries,
    },
    services::{analytics_service, catalog_service},
    utils::{best_effort::BestEffort, extractors::extract_user_id, jwt::SessionUser},
};

pub async fn create_equipment(
    State(state): State<AppState>,
    Json(payload): Json<CreateEquipmentRequest>,
) -> Result<(StatusCode, Json<EquipmentMutationResponse>)> {
    let new_equipment = catalog_service::validate_new_equipment(&payload)?;
    let equipment = equipment_queries::create_equipment(&state.db, &new_equipment).await?;

    tracing::info!("Created equipment {} ({})", equipment.id, equipment.name);

    Ok((
        StatusCode::CREATED,
        Json(EquipmentMutationResponse::new(
            Some(equipment),
            "Equipment created",
        )),
    ))
}

pub async fn update_equipment(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEquipmentRequest>,
) -> Result<Json<EquipmentMutationResponse>> {
    let existing = equipment_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let (changes, images) = catalog_service::plan_update(&payload, &existing)?;
    let price_change = catalog_service::price_change(existing.price, changes.price);

    let equipment = equipment_queries::update_equipment(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    if let Some((old_price, new_price)) = price_change {
        price_history_queries::insert_change(
            &state.db,
            id,
            old_price,
            new_price,
            extract_user_id(&session).ok(),
        )
        .await
        .best_effort("price history insert");
    }

    if !images.removed.is_empty() {
        state.storage.delete_images(&images.removed).await;
    }

    tracing::info!("Updated equipment {}", id);

    Ok(Json(EquipmentMutationResponse::new(
        Some(equipment),
        "Equipment updated",
    )))
}

pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EquipmentMutationResponse>> {
    let existing = equipment_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    let (views, history, favorites, cart_items) = tokio::join!(
        view_queries::delete_by_equipment(&state.db, id),
        price_history_queries::delete_by_equipment(&state.db, id),
        favorite_queries::delete_by_equipment(&state.db, id),
        cart_queries::delete_by_equipment(&state.db, id),
    );
    views.best_effort("product view cleanup");
    history.best_effort("price history cleanup");
    favorites.best_effort("favorites cleanup");
    cart_items.best_effort("cart cleanup");

    if !equipment_queries::delete_equipment(&state.db, id).await? {
        return Err(AppError::NotFound("Equipment not found".to_string()));
    }

    state.storage.delete_images(&existing.images).await;

    tracing::info!("Deleted equipment {}", id);

    Ok(Json(EquipmentMutationResponse::new(None, "Equipment deleted")))
}

pub async fn equipment_stats(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EquipmentStats>> {
    let (equipment, views, orders, price_history) = tokio::try_join!(
        equipment_queries::find_by_id(&state.db, id),
        view_queries::find_by_equipment(&state.db, id),
        order_queries::find_by_equipment(&state.db, id),
        price_history_queries::find_by_equipment(&state.db, id),
    )?;

    let equipment =
        equipment.ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    Ok(Json(analytics_service::build_equipment_stats(
        equipment,
        views,
        orders,
        price_history,
        Utc::now(),
    )))
}
