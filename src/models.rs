use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthSession;

/// Optional `{color, size}` selection. Immutable once captured on a line;
/// part of the line identity alongside the product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub color: String,
    pub size: String,
}

/// One purchasable line item. Display fields are a snapshot copied at
/// add-time and may go stale relative to the catalog; `unit_price` is the
/// effective price at add-time and never tracks later catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Server-assigned cart-entry id when persisted, otherwise a
    /// client-generated placeholder.
    pub line_id: String,
    pub product_id: String,
    pub name: String,
    pub image_url: String,
    pub brand: String,
    pub unit_price: Decimal,
    pub list_price: Decimal,
    pub quantity: u32,
    pub variant: Option<Variant>,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn has_discount(&self) -> bool {
        self.unit_price < self.list_price
    }

    /// Merge identity: same product and same variant selection.
    pub fn matches(&self, product_id: &str, variant: Option<&Variant>) -> bool {
        self.product_id == product_id && self.variant.as_ref() == variant
    }
}

/// Generates an id for a line that has no server-assigned entry yet
/// (direct-buy synthesis, unauthenticated local lines).
pub fn placeholder_line_id() -> String {
    Uuid::new_v4().to_string()
}

/// Input for an add-to-cart call, before the server assigns a line id.
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub product_id: String,
    pub name: String,
    pub image_url: String,
    pub brand: String,
    pub category: String,
    pub unit_price: Decimal,
    pub list_price: Decimal,
    pub quantity: u32,
    pub variant: Option<Variant>,
}

/// The ordered contents of one user's cart at a point in time. Two snapshots
/// exist concurrently (server record, local cache); a successful server sync
/// supersedes the local one whole, never field-by-field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines; the payload of cart-changed events.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn find_line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    /// Adds a line under the merge invariant: at most one line per distinct
    /// `(product_id, variant)` pair. An already-present combination has its
    /// quantity incremented instead of producing a duplicate line.
    pub fn merge_line(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(&line.product_id, line.variant.as_ref()))
        {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    pub fn set_quantity(&mut self, line_id: &str, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove_line(&mut self, line_id: &str) {
        self.lines.retain(|l| l.line_id != line_id);
    }
}

/// Delivery details for the current checkout session. Not persisted beyond
/// the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ShippingInfo {
    pub const DEFAULT_COUNTRY: &'static str = "Bangladesh";

    /// Blank form with the country defaulted.
    pub fn blank() -> Self {
        Self {
            country: Self::DEFAULT_COUNTRY.to_string(),
            ..Self::default()
        }
    }

    /// Pre-populates name/email/phone from the signed-in profile.
    pub fn prefilled_from(session: &AuthSession) -> Self {
        Self {
            full_name: session.name.clone(),
            email: session.email.clone(),
            phone: session.phone.clone().unwrap_or_default(),
            ..Self::blank()
        }
    }

    /// Names of required fields that are still empty. Presence only — no
    /// email or phone format is enforced by this layer.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let required: [(&'static str, &str); 7] = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// One past order in the signed-in user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub order_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub items_count: u32,
    pub placed_at: Option<DateTime<Utc>>,
}
