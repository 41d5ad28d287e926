use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    api::StorefrontApi,
    auth::{SessionProvider, require_admin},
    dto::admin::{AdminUserRecord, ProductInput},
    error::{AppError, AppResult},
    models::OrderSummary,
};

use super::order_service::summarize;

/// Admin console operations: order management, the product form, and user
/// administration. Every call is gated on an active admin session; the
/// backend enforces the same rule on its side, this gate just keeps a
/// non-admin shell from issuing the requests at all.
pub struct AdminService {
    api: Arc<dyn StorefrontApi>,
    sessions: Arc<dyn SessionProvider>,
}

impl AdminService {
    pub fn new(api: Arc<dyn StorefrontApi>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { api, sessions }
    }

    /// Every customer's orders, newest first.
    pub async fn all_orders(&self) -> AppResult<Vec<OrderSummary>> {
        require_admin(self.sessions.as_ref())?;
        let records = self.api.list_all_orders().await?;
        let mut orders: Vec<OrderSummary> = records.into_iter().map(summarize).collect();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        Ok(orders)
    }

    pub async fn set_order_status(&self, order_id: &str, status: &str) -> AppResult<()> {
        require_admin(self.sessions.as_ref())?;
        if status.trim().is_empty() {
            return Err(AppError::BadRequest("status must not be empty".to_string()));
        }
        self.api.update_order_status(order_id, status).await
    }

    /// Creates a product after the same form validation the console applies.
    pub async fn add_product(&self, input: &ProductInput) -> AppResult<()> {
        require_admin(self.sessions.as_ref())?;
        validate_product(input)?;
        self.api.create_product(input).await
    }

    pub async fn edit_product(&self, product_id: &str, input: &ProductInput) -> AppResult<()> {
        require_admin(self.sessions.as_ref())?;
        validate_product(input)?;
        self.api.update_product(product_id, input).await
    }

    pub async fn remove_product(&self, product_id: &str) -> AppResult<()> {
        require_admin(self.sessions.as_ref())?;
        self.api.delete_product(product_id).await
    }

    pub async fn users(&self) -> AppResult<Vec<AdminUserRecord>> {
        require_admin(self.sessions.as_ref())?;
        self.api.list_users().await
    }

    pub async fn remove_user(&self, user_id: &str) -> AppResult<()> {
        require_admin(self.sessions.as_ref())?;
        self.api.delete_user(user_id).await
    }

    /// Toggles an account between active and blocked. The backend decides
    /// the new value; the returned status is what the caller applies.
    pub async fn toggle_user_status(&self, user_id: &str) -> AppResult<String> {
        require_admin(self.sessions.as_ref())?;
        self.api.toggle_user_status(user_id).await
    }
}

/// Required-field gate of the product form: name, category, subCategory, and
/// unit non-empty, a positive price, and at least one non-blank image URL.
/// Refused before any network call, naming the missing fields.
fn validate_product(input: &ProductInput) -> AppResult<()> {
    let mut missing = Vec::new();
    if input.name.trim().is_empty() {
        missing.push("name");
    }
    if input.category.trim().is_empty() {
        missing.push("category");
    }
    if input.sub_category.trim().is_empty() {
        missing.push("subCategory");
    }
    if input.unit.trim().is_empty() {
        missing.push("unit");
    }
    if input.price <= Decimal::ZERO {
        missing.push("price");
    }
    if !input.images.iter().any(|image| !image.trim().is_empty()) {
        missing.push("images");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}
