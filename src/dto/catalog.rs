use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ShippingInfo, Variant};

/// One catalog entry as `GET /browseProduct` / `GET /productDetail/{id}`
/// return it. Owned by the backend; this crate only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariantRecord>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub is_featured: bool,
}

impl ProductRecord {
    pub fn effective_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }

    pub fn has_discount(&self) -> bool {
        self.discount_price.is_some_and(|d| d < self.price)
    }

    pub fn primary_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or_default()
    }
}

/// A variant option on a product, with its own stock figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariantRecord {
    pub color: String,
    pub size: String,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl ProductVariantRecord {
    pub fn selection(&self) -> Variant {
        Variant {
            color: self.color.clone(),
            size: self.size.clone(),
        }
    }
}

/// One order in `GET /api/orders?userEmail=…`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub order_status: String,
    #[serde(default)]
    pub items: Vec<OrderItemRecord>,
    #[serde(default)]
    pub shipping_info: Option<ShippingInfo>,
    #[serde(default)]
    pub order_summary: Option<OrderSummaryRecord>,
    #[serde(default)]
    pub timestamps: Option<OrderTimestamps>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRecord {
    #[serde(default)]
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub variant: Option<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryRecord {
    pub total_amount: Decimal,
    #[serde(default)]
    pub items_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTimestamps {
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
}
