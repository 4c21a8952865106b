use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Equipment;

// DB models

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductView {
    pub id: i64,
    pub equipment_id: i32,
    pub user_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PriceHistory {
    pub id: i32,
    pub equipment_id: i32,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub changed_by: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i32,
    pub equipment_id: i32,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog columns the dashboard needs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EquipmentSummary {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ViewEvent {
    pub equipment_id: i32,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewProductView {
    pub equipment_id: i32,
    pub user_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// Request types

#[derive(Debug, Deserialize)]
pub struct TrackViewRequest {
    pub equipment_id: Option<i32>,
    pub user_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// Response types

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PopularProduct {
    pub id: i32,
    pub name: String,
    pub views: usize,
    pub orders: i64,
    pub stock: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_views: usize,
    pub total_orders: usize,
    pub low_stock: usize,
    pub categories: Vec<String>,
    pub popular_products: Vec<PopularProduct>,
    pub recent_price_changes: Vec<PriceChangeSummary>,
    pub sales_by_category: BTreeMap<String, i64>,
    pub daily_views: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct PriceChangeSummary {
    pub equipment_id: i32,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyStat {
    pub stat_date: NaiveDate,
    pub views: usize,
}

#[derive(Debug, Serialize)]
pub struct EquipmentStats {
    pub equipment: Equipment,
    pub total_views: usize,
    pub total_orders: i64,
    pub recent_views: Vec<ProductView>,
    pub price_history: Vec<PriceHistory>,
    pub daily_stats: Vec<DailyStat>,
}
