use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CartLine, NewCartLine, Variant, placeholder_line_id};

/// Body of `POST /cart/add`. `user_id` is the account email; `price` is the
/// effective (discounted) price captured at add-time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_image: String,
    pub price: Decimal,
    pub original_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    pub brand: String,
    pub category: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<Variant>,
}

impl AddToCartRequest {
    pub fn from_new_line(user_email: &str, line: &NewCartLine) -> Self {
        let discount_price = (line.unit_price < line.list_price).then_some(line.unit_price);
        Self {
            user_id: user_email.to_string(),
            product_id: line.product_id.clone(),
            product_name: line.name.clone(),
            product_image: line.image_url.clone(),
            price: line.unit_price,
            original_price: line.list_price,
            discount_price,
            brand: line.brand.clone(),
            category: line.category.clone(),
            quantity: line.quantity,
            selected_variant: line.variant.clone(),
        }
    }
}

/// Body of `PUT /cart/update/{lineId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// One persisted cart entry as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_id: String,
    #[serde(alias = "name")]
    pub product_name: String,
    #[serde(default, alias = "image")]
    pub product_image: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    pub quantity: u32,
    #[serde(default)]
    pub selected_variant: Option<Variant>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

impl CartRecord {
    /// Effective price: the discounted figure where one exists.
    pub fn unit_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }

    /// Pre-discount price, retained for strikethrough display.
    pub fn list_price(&self) -> Decimal {
        self.original_price.unwrap_or(self.price)
    }

    pub fn into_line(self) -> CartLine {
        let unit_price = self.unit_price();
        let list_price = self.list_price();
        CartLine {
            line_id: if self.id.is_empty() {
                placeholder_line_id()
            } else {
                self.id
            },
            product_id: self.product_id,
            name: self.product_name,
            image_url: self.product_image,
            brand: self.brand,
            unit_price,
            list_price,
            quantity: self.quantity.max(1),
            variant: self.selected_variant,
            added_at: self.added_at.unwrap_or_else(Utc::now),
        }
    }
}
