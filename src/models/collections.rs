use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Equipment;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: i32,
    pub user_id: Uuid,
    pub equipment_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: i32,
    pub user_id: Uuid,
    pub equipment_id: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteWithEquipment {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub equipment: Equipment,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartItemWithEquipment {
    #[serde(flatten)]
    pub item: CartItem,
    pub equipment: Equipment,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<FavoriteWithEquipment>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub success: bool,
    pub favorite: FavoriteWithEquipment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheckResponse {
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_items: Vec<CartItemWithEquipment>,
    pub total: Decimal,
    pub total_items: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_item: Option<CartItemWithEquipment>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub removed: bool,
}

impl CartResponse {
    /// Recomputes `total` and `totalItems` from the rows on every fetch.
    pub fn from_items(cart_items: Vec<CartItemWithEquipment>) -> Self {
        let total = cart_items
            .iter()
            .map(|entry| entry.equipment.price * Decimal::from(entry.item.quantity))
            .sum();
        let total_items = cart_items
            .iter()
            .map(|entry| i64::from(entry.item.quantity))
            .sum();

        Self {
            cart_items,
            total,
            total_items,
        }
    }
}
