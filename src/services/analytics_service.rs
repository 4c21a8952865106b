use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{
    DailyStat, DashboardStats, Equipment, EquipmentStats, EquipmentSummary, Order,
    PopularProduct, PriceChangeSummary, PriceHistory, ProductView, ViewEvent,
};

pub const ANALYTICS_WINDOW_DAYS: i64 = 30;
const LOW_STOCK_THRESHOLD: i32 = 5;
const POPULAR_PRODUCTS_LIMIT: usize = 10;
const RECENT_VIEWS_LIMIT: usize = 10;
pub const RECENT_PRICE_CHANGES_LIMIT: i64 = 10;

pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(ANALYTICS_WINDOW_DAYS)
}

/// Raw rows the dashboard is aggregated from.
#[derive(Debug, Default)]
pub struct DashboardSource {
    pub equipment: Vec<EquipmentSummary>,
    pub views: Vec<ViewEvent>,
    pub orders: Vec<Order>,
    pub price_changes: Vec<PriceChangeSummary>,
}

impl DashboardStats {
    /// Payload served when the dashboard cannot be built at all.
    pub fn empty() -> Self {
        Self {
            total_products: 0,
            total_views: 0,
            total_orders: 0,
            low_stock: 0,
            categories: Vec::new(),
            popular_products: Vec::new(),
            recent_price_changes: Vec::new(),
            sales_by_category: BTreeMap::new(),
            daily_views: BTreeMap::new(),
        }
    }
}

pub fn daily_view_counts<'a>(
    timestamps: impl IntoIterator<Item = &'a DateTime<Utc>>,
) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for viewed_at in timestamps {
        *counts.entry(viewed_at.date_naive()).or_insert(0) += 1;
    }
    counts
}

fn ordered_quantities(orders: &[Order]) -> HashMap<i32, i64> {
    let mut quantities = HashMap::new();
    for order in orders {
        *quantities.entry(order.equipment_id).or_insert(0) += i64::from(order.quantity);
    }
    quantities
}

pub fn build_dashboard(source: DashboardSource, now: DateTime<Utc>) -> DashboardStats {
    let since = window_start(now);
    let views: Vec<&ViewEvent> = source
        .views
        .iter()
        .filter(|view| view.viewed_at >= since)
        .collect();

    let mut view_counts: HashMap<i32, usize> = HashMap::new();
    for view in &views {
        *view_counts.entry(view.equipment_id).or_insert(0) += 1;
    }
    let quantities = ordered_quantities(&source.orders);

    let mut popular_products: Vec<PopularProduct> = source
        .equipment
        .iter()
        .map(|item| PopularProduct {
            id: item.id,
            name: item.name.clone(),
            views: view_counts.get(&item.id).copied().unwrap_or(0),
            orders: quantities.get(&item.id).copied().unwrap_or(0),
            stock: item.stock,
            price: item.price,
        })
        .collect();
    popular_products.sort_by(|a, b| b.views.cmp(&a.views));
    popular_products.truncate(POPULAR_PRODUCTS_LIMIT);

    let mut categories: Vec<String> = Vec::new();
    let mut sales_by_category: BTreeMap<String, i64> = BTreeMap::new();
    for item in &source.equipment {
        let Some(category) = item.category.as_deref().filter(|c| !c.trim().is_empty()) else {
            continue;
        };

        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }

        *sales_by_category.entry(category.to_string()).or_insert(0) +=
            quantities.get(&item.id).copied().unwrap_or(0);
    }

    let daily_views = daily_view_counts(views.iter().map(|view| &view.viewed_at))
        .into_iter()
        .map(|(date, count)| (date.to_string(), count))
        .collect();

    let mut recent_price_changes = source.price_changes;
    recent_price_changes.truncate(RECENT_PRICE_CHANGES_LIMIT as usize);

    DashboardStats {
        total_products: source.equipment.len(),
        total_views: views.len(),
        total_orders: source.orders.len(),
        low_stock: source
            .equipment
            .iter()
            .filter(|item| item.stock < LOW_STOCK_THRESHOLD)
            .count(),
        categories,
        popular_products,
        recent_price_changes,
        sales_by_category,
        daily_views,
    }
}

/// Per-product statistics. `views` and `price_history` arrive newest first.
pub fn build_equipment_stats(
    equipment: Equipment,
    views: Vec<ProductView>,
    orders: Vec<Order>,
    price_history: Vec<PriceHistory>,
    now: DateTime<Utc>,
) -> EquipmentStats {
    let since = window_start(now);
    let daily_stats = daily_view_counts(
        views
            .iter()
            .map(|view| &view.viewed_at)
            .filter(|viewed_at| **viewed_at >= since),
    )
    .into_iter()
    .map(|(stat_date, views)| DailyStat { stat_date, views })
    .collect();

    EquipmentStats {
        equipment: equipment.with_main_image(),
        total_views: views.len(),
        total_orders: orders.iter().map(|order| i64::from(order.quantity)).sum(),
        recent_views: views.into_iter().take(RECENT_VIEWS_LIMIT).collect(),
        price_history,
        daily_stats,
    }
}
