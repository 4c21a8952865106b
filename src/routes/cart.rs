use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AddToCartRequest, CartItem, CartItemResponse, CartItemWithEquipment, CartResponse,
        SuccessResponse, UpdateCartRequest,
    },
    queries::{
        cart_queries::{self, MAX_CART_QUANTITY},
        equipment_queries,
    },
    utils::{extractors::extract_user_id, jwt::SessionUser},
};

fn check_quantity_limit(quantity: i32) -> Result<i32> {
    if quantity > MAX_CART_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "Quantity cannot exceed {}",
            MAX_CART_QUANTITY
        )));
    }

    Ok(quantity)
}

async fn with_equipment(state: &AppState, item: CartItem) -> Result<CartItemWithEquipment> {
    let equipment = equipment_queries::find_by_id(&state.db, item.equipment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

    Ok(CartItemWithEquipment {
        item,
        equipment: equipment.with_main_image(),
    })
}

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<CartResponse>> {
    let user_id = extract_user_id(&session)?;
    let items = cart_queries::find_by_user(&state.db, user_id).await?;

    let ids: Vec<i32> = items.iter().map(|item| item.equipment_id).collect();
    let equipment = equipment_queries::find_by_ids(&state.db, &ids).await?;

    let cart_items = items
        .into_iter()
        .filter_map(|item| {
            let equipment = equipment.get(&item.equipment_id)?.clone();
            Some(CartItemWithEquipment {
                item,
                equipment: equipment.with_main_image(),
            })
        })
        .collect();

    Ok(Json(CartResponse::from_items(cart_items)))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(equipment_id): Path<i32>,
    payload: Option<Json<AddToCartRequest>>,
) -> Result<Json<CartItemResponse>> {
    let user_id = extract_user_id(&session)?;
    let quantity = payload
        .and_then(|Json(payload)| payload.quantity)
        .unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }
    let quantity = check_quantity_limit(quantity)?;

    if !equipment_queries::exists(&state.db, equipment_id).await? {
        return Err(AppError::NotFound("Equipment not found".to_string()));
    }

    let item = cart_queries::add_or_increment(&state.db, user_id, equipment_id, quantity).await?;

    Ok(Json(CartItemResponse {
        success: true,
        cart_item: Some(with_equipment(&state, item).await?),
        removed: false,
    }))
}

/// A quantity of zero or less removes the line.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(equipment_id): Path<i32>,
    Json(payload): Json<UpdateCartRequest>,
) -> Result<Json<CartItemResponse>> {
    let user_id = extract_user_id(&session)?;
    let quantity = payload
        .quantity
        .ok_or_else(|| AppError::BadRequest("quantity is required".to_string()))?;

    if quantity <= 0 {
        cart_queries::remove_item(&state.db, user_id, equipment_id).await?;
        return Ok(Json(CartItemResponse {
            success: true,
            cart_item: None,
            removed: true,
        }));
    }

    let quantity = check_quantity_limit(quantity)?;
    let item = cart_queries::set_quantity(&state.db, user_id, equipment_id, quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    Ok(Json(CartItemResponse {
        success: true,
        cart_item: Some(with_equipment(&state, item).await?),
        removed: false,
    }))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(equipment_id): Path<i32>,
) -> Result<Json<SuccessResponse>> {
    let user_id = extract_user_id(&session)?;
    cart_queries::remove_item(&state.db, user_id, equipment_id).await?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> Result<Json<SuccessResponse>> {
    let user_id = extract_user_id(&session)?;
    cart_queries::clear_cart(&state.db, user_id).await?;

    Ok(Json(SuccessResponse::ok()))
}
