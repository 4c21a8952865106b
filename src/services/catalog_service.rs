use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{AppError, Result},
    models::{
        CreateEquipmentRequest, Equipment, EquipmentChanges, ImagesInput, NewEquipment,
        NumberInput, UpdateEquipmentRequest,
    },
};

const MISSING_FIELDS: &str = "Missing required fields: name, price, stock, category";

/// Scale of the `price` column; values are rounded the way Postgres rounds on insert.
const PRICE_SCALE: u32 = 2;

/// Object URLs created by the browser for local previews; never persisted.
pub fn is_transient_url(url: &str) -> bool {
    url.starts_with("blob:") || url.starts_with("data:")
}

/// Accepts `"a.jpg, b.jpg"` or `["a.jpg", "b.jpg"]`; trims entries and drops
/// blank and transient ones.
pub fn normalize_images(input: &ImagesInput) -> Vec<String> {
    let entries: Vec<&str> = match input {
        ImagesInput::Text(text) => text.split(',').collect(),
        ImagesInput::List(list) => list.iter().map(String::as_str).collect(),
    };

    entries
        .into_iter()
        .map(str::trim)
        .filter(|img| !img.is_empty() && !is_transient_url(img))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, PartialEq)]
pub struct ImageReconciliation {
    /// List to persist.
    pub images: Vec<String>,
    /// Previously stored images that must be removed from storage.
    pub removed: Vec<String>,
}

/// An empty or absent incoming list keeps the stored one. Explicit deletions are
/// then removed; only deletions that were actually stored reach storage.
pub fn reconcile_images(
    stored: &[String],
    incoming: Option<&ImagesInput>,
    to_delete: &[String],
) -> ImageReconciliation {
    let candidate = incoming.map(normalize_images).unwrap_or_default();
    let base = if candidate.is_empty() {
        stored.to_vec()
    } else {
        candidate
    };

    let to_delete: Vec<&str> = to_delete.iter().map(|img| img.trim()).collect();

    let images = base
        .into_iter()
        .filter(|img| !to_delete.contains(&img.as_str()))
        .collect();

    let mut removed: Vec<String> = Vec::new();
    for img in stored {
        if to_delete.contains(&img.as_str()) && !removed.contains(img) {
            removed.push(img.clone());
        }
    }

    ImageReconciliation { images, removed }
}

/// `(old, new)` when an update actually changes the price.
pub fn price_change(current: Decimal, requested: Option<Decimal>) -> Option<(Decimal, Decimal)> {
    requested
        .filter(|new_price| *new_price != current)
        .map(|new_price| (current, new_price))
}

fn parse_price(input: &NumberInput) -> Result<Decimal> {
    let price = input
        .to_decimal()
        .ok_or_else(|| AppError::BadRequest("price must be a number".to_string()))?;

    if price.is_sign_negative() {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }

    Ok(price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

fn parse_stock(input: &NumberInput) -> Result<i32> {
    let stock = input
        .to_i32()
        .ok_or_else(|| AppError::BadRequest("stock must be an integer".to_string()))?;

    if stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".to_string()));
    }

    Ok(stock)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate_new_equipment(payload: &CreateEquipmentRequest) -> Result<NewEquipment> {
    let (Some(name), Some(price), Some(stock), Some(category)) = (
        non_blank(payload.name.as_ref()),
        payload.price.as_ref(),
        payload.stock.as_ref(),
        non_blank(payload.category.as_ref()),
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };

    Ok(NewEquipment {
        name,
        description: payload.description.clone().unwrap_or_default(),
        price: parse_price(price)?,
        stock: parse_stock(stock)?,
        category,
        images: payload
            .images
            .as_ref()
            .map(normalize_images)
            .unwrap_or_default(),
    })
}

/// Field changes plus the image plan for an update against `existing`.
pub fn plan_update(
    payload: &UpdateEquipmentRequest,
    existing: &Equipment,
) -> Result<(EquipmentChanges, ImageReconciliation)> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name cannot be empty".to_string()));
        }
    }

    let reconciliation = reconcile_images(
        &existing.images,
        payload.images.as_ref(),
        payload.images_to_delete.as_deref().unwrap_or_default(),
    );

    let changes = EquipmentChanges {
        name: payload.name.as_ref().map(|n| n.trim().to_string()),
        description: payload.description.clone(),
        price: payload.price.as_ref().map(parse_price).transpose()?,
        stock: payload.stock.as_ref().map(parse_stock).transpose()?,
        category: payload.category.clone(),
        images: reconciliation.images.clone(),
    };

    Ok((changes, reconciliation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::dec;
    use serde_json::json;

    fn images(value: serde_json::Value) -> ImagesInput {
        serde_json::from_value(value).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn stored(imgs: &[&str]) -> Equipment {
        Equipment {
            id: 9,
            name: "Kayak".to_string(),
            description: None,
            price: dec!(100),
            stock: 2,
            category: Some("water".to_string()),
            images: strings(imgs),
            main_image: None,
            views_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn string_and_array_forms_normalize_identically() {
        let from_text = normalize_images(&images(json!("a.jpg, b.jpg")));
        let from_list = normalize_images(&images(json!(["a.jpg", "b.jpg"])));

        assert_eq!(from_text, strings(&["a.jpg", "b.jpg"]));
        assert_eq!(from_text, from_list);
    }

    #[test]
    fn blank_and_transient_entries_are_dropped() {
        let normalized = normalize_images(&images(json!([
            " ",
            "blob:http://localhost/123",
            "data:image/png;base64,AAAA",
            " https://cdn.test/x.jpg "
        ])));

        assert_eq!(normalized, strings(&["https://cdn.test/x.jpg"]));
        assert!(normalize_images(&images(json!(",, ,"))).is_empty());
    }

    #[test]
    fn empty_incoming_list_keeps_stored_images() {
        let plan = reconcile_images(
            &strings(&["a.jpg", "b.jpg"]),
            Some(&images(json!(["blob:http://x/1"]))),
            &[],
        );

        assert_eq!(plan.images, strings(&["a.jpg", "b.jpg"]));
        assert!(plan.removed.is_empty());
    }

    #[test]
    fn explicit_deletions_are_reconciled_against_stored_list() {
        let plan = reconcile_images(
            &strings(&["a.jpg", "b.jpg", "c.jpg"]),
            None,
            &strings(&["b.jpg", "never-stored.jpg", "b.jpg"]),
        );

        assert_eq!(plan.images, strings(&["a.jpg", "c.jpg"]));
        assert_eq!(plan.removed, strings(&["b.jpg"]));
    }

    #[test]
    fn incoming_list_replaces_stored_and_honours_deletions() {
        let plan = reconcile_images(
            &strings(&["a.jpg", "b.jpg"]),
            Some(&images(json!(["b.jpg", "new.jpg"]))),
            &strings(&["a.jpg"]),
        );

        assert_eq!(plan.images, strings(&["b.jpg", "new.jpg"]));
        assert_eq!(plan.removed, strings(&["a.jpg"]));
    }

    #[test]
    fn price_change_only_when_price_differs() {
        assert_eq!(
            price_change(dec!(100), Some(dec!(120))),
            Some((dec!(100), dec!(120)))
        );
        assert_eq!(price_change(dec!(100), Some(dec!(100.00))), None);
        assert_eq!(price_change(dec!(100), None), None);
    }

    #[test]
    fn create_requires_core_fields() {
        let payload: CreateEquipmentRequest =
            serde_json::from_value(json!({ "name": "Tent", "price": 10, "stock": 1 })).unwrap();

        match validate_new_equipment(&payload) {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, MISSING_FIELDS),
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn create_accepts_string_numbers_and_zero_stock() {
        let payload: CreateEquipmentRequest = serde_json::from_value(json!({
            "name": " Tent ",
            "price": "49.90",
            "stock": "0",
            "category": "camping",
            "images": "a.jpg, b.jpg"
        }))
        .unwrap();

        let new = validate_new_equipment(&payload).unwrap();
        assert_eq!(new.name, "Tent");
        assert_eq!(new.price, dec!(49.90));
        assert_eq!(new.stock, 0);
        assert_eq!(new.description, "");
        assert_eq!(new.images, strings(&["a.jpg", "b.jpg"]));
    }

    #[test]
    fn create_rejects_negative_price() {
        let payload: CreateEquipmentRequest = serde_json::from_value(json!({
            "name": "Tent", "price": -1, "stock": 1, "category": "camping"
        }))
        .unwrap();

        assert!(matches!(
            validate_new_equipment(&payload),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn update_plan_only_touches_provided_fields() {
        let payload: UpdateEquipmentRequest = serde_json::from_value(json!({
            "price": "120",
            "images_to_delete": ["a.jpg"]
        }))
        .unwrap();

        let (changes, plan) = plan_update(&payload, &stored(&["a.jpg", "b.jpg"])).unwrap();

        assert_eq!(changes.price, Some(dec!(120)));
        assert!(changes.name.is_none());
        assert!(changes.stock.is_none());
        assert_eq!(changes.images, strings(&["b.jpg"]));
        assert_eq!(plan.removed, strings(&["a.jpg"]));
    }

    #[test]
    fn sub_cent_price_is_rounded_to_column_scale() {
        let payload: UpdateEquipmentRequest =
            serde_json::from_value(json!({ "price": "100.001" })).unwrap();

        let (changes, _) = plan_update(&payload, &stored(&[])).unwrap();

        assert_eq!(changes.price, Some(dec!(100.00)));
        assert_eq!(price_change(dec!(100.00), changes.price), None);
    }

    #[test]
    fn half_cent_rounds_away_from_zero() {
        let payload: CreateEquipmentRequest = serde_json::from_value(json!({
            "name": "Paddle",
            "price": "10.005",
            "stock": 1,
            "category": "water"
        }))
        .unwrap();

        assert_eq!(validate_new_equipment(&payload).unwrap().price, dec!(10.01));
    }
}
