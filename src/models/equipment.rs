use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub main_image: Option<String>,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// Fills `main_image` from the first image when none is stored.
    pub fn with_main_image(mut self) -> Self {
        if self.main_image.as_deref().is_none_or(str::is_empty) {
            self.main_image = self.images.first().cloned();
        }
        self
    }
}

/// `images` may arrive as a comma-separated string or a JSON array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImagesInput {
    Text(String),
    List(Vec<String>),
}

/// Numeric form fields arrive either as JSON numbers or numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumberInput {
    fn as_text(&self) -> String {
        match self {
            NumberInput::Number(n) => n.to_string(),
            NumberInput::Text(s) => s.trim().to_string(),
        }
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        let text = self.as_text();
        text.parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_scientific(&text).ok())
    }

    pub fn to_i32(&self) -> Option<i32> {
        let text = self.as_text();
        text.parse::<i32>().ok().or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
                .map(|v| v as i32)
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEquipmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumberInput>,
    pub stock: Option<NumberInput>,
    pub category: Option<String>,
    pub images: Option<ImagesInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEquipmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<NumberInput>,
    pub stock: Option<NumberInput>,
    pub category: Option<String>,
    pub images: Option<ImagesInput>,
    pub images_to_delete: Option<Vec<String>>,
}

/// Validated insert payload.
#[derive(Debug)]
pub struct NewEquipment {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
    pub images: Vec<String>,
}

/// Validated update payload; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct EquipmentChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EquipmentListResponse {
    pub items: Vec<Equipment>,
}

impl EquipmentListResponse {
    pub fn from_rows(rows: Vec<Equipment>) -> Self {
        Self {
            items: rows.into_iter().map(Equipment::with_main_image).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EquipmentResponse {
    pub equipment: Equipment,
}

#[derive(Debug, Serialize)]
pub struct EquipmentMutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Equipment>,
    pub message: String,
}

impl EquipmentMutationResponse {
    pub fn new(equipment: Option<Equipment>, message: &str) -> Self {
        Self {
            success: true,
            equipment: equipment.map(Equipment::with_main_image),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn equipment(images: &[&str], main_image: Option<&str>) -> Equipment {
        Equipment {
            id: 1,
            name: "Tent".to_string(),
            description: None,
            price: dec!(10),
            stock: 1,
            category: None,
            images: images.iter().map(|s| s.to_string()).collect(),
            main_image: main_image.map(str::to_string),
            views_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn main_image_falls_back_to_first_image() {
        let item = equipment(&["a.jpg", "b.jpg"], None).with_main_image();
        assert_eq!(item.main_image.as_deref(), Some("a.jpg"));

        let item = equipment(&["a.jpg"], Some("")).with_main_image();
        assert_eq!(item.main_image.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn stored_main_image_is_kept() {
        let item = equipment(&["a.jpg"], Some("cover.jpg")).with_main_image();
        assert_eq!(item.main_image.as_deref(), Some("cover.jpg"));
    }

    #[test]
    fn no_images_means_no_main_image() {
        assert!(equipment(&[], None).with_main_image().main_image.is_none());
    }

    #[test]
    fn numbers_accept_strings_and_json_numbers() {
        let price: NumberInput = serde_json::from_value(serde_json::json!("19.99")).unwrap();
        assert_eq!(price.to_decimal(), Some(dec!(19.99)));

        let price: NumberInput = serde_json::from_value(serde_json::json!(120)).unwrap();
        assert_eq!(price.to_decimal(), Some(dec!(120)));

        let stock: NumberInput = serde_json::from_value(serde_json::json!("7")).unwrap();
        assert_eq!(stock.to_i32(), Some(7));

        let stock: NumberInput = serde_json::from_value(serde_json::json!(3.0)).unwrap();
        assert_eq!(stock.to_i32(), Some(3));

        let stock: NumberInput = serde_json::from_value(serde_json::json!("lots")).unwrap();
        assert_eq!(stock.to_i32(), None);
    }
}
