use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CartLine, ShippingInfo, Variant};

/// Where a checkout session originated. Direct-buy sessions bypass the
/// persisted cart entirely and carry exactly one synthesized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutSource {
    #[serde(rename = "cart")]
    Cart,
    #[serde(rename = "directBuy")]
    DirectBuy,
}

/// One line item as the payment-initiation endpoint expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayCartItem {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl From<&CartLine> for GatewayCartItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            price: line.unit_price,
            quantity: line.quantity,
            image: line.image_url.clone(),
            variant: line.variant.clone(),
        }
    }
}

/// Body of `POST /api/sslcommerz/init`. No card or payment-method data is
/// ever held client-side; the gateway collects it after the redirect.
///
/// `promo_code`/`discount_amount` describe the display-only client discount;
/// the backend re-validates the code before charging.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentInitRequest {
    pub total_amount: Decimal,
    pub currency: String,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: String,
    pub customer_country: String,
    pub shipping_info: ShippingInfo,
    pub cart_items: Vec<GatewayCartItem>,
    pub source: CheckoutSource,
    pub user_email: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub discount_amount: Decimal,
}

/// Response of the payment-initiation endpoint. A present `GatewayPageURL`
/// is success; otherwise `error`/`message` carry the reason.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayInitResponse {
    #[serde(rename = "GatewayPageURL")]
    pub gateway_page_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GatewayInitResponse {
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Payment initialization failed".to_string())
    }
}
