use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product form body for `POST /addProducts` and `PUT /products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub category: String,
    pub sub_category: String,
    #[serde(default)]
    pub stock: u32,
    pub unit: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// One account as `GET /admin/users` returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub role: String,
}

/// Body of `PATCH /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Response of `PATCH /admin/user/{id}/status`; the backend decides the
/// toggled value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusResponse {
    pub status: String,
}
