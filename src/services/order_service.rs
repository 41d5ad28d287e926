use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    api::StorefrontApi,
    auth::{SessionProvider, require_session},
    dto::catalog::OrderRecord,
    error::AppResult,
    models::OrderSummary,
};

/// Order history for the signed-in user. Read-only; the backend owns order
/// state.
pub struct OrderService {
    api: Arc<dyn StorefrontApi>,
    sessions: Arc<dyn SessionProvider>,
}

impl OrderService {
    pub fn new(api: Arc<dyn StorefrontApi>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { api, sessions }
    }

    /// Past orders, newest first.
    pub async fn history(&self) -> AppResult<Vec<OrderSummary>> {
        let session = require_session(self.sessions.as_ref())?;
        let records = self.api.list_orders(&session.email).await?;
        let mut orders: Vec<OrderSummary> = records.into_iter().map(summarize).collect();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        Ok(orders)
    }
}

/// Subset of orders in a given status ("all" passes everything through).
pub fn filter_by_status<'a>(orders: &'a [OrderSummary], status: &str) -> Vec<&'a OrderSummary> {
    orders
        .iter()
        .filter(|order| status == "all" || order.status == status)
        .collect()
}

pub(crate) fn summarize(record: OrderRecord) -> OrderSummary {
    let (total_amount, items_count) = match &record.order_summary {
        Some(summary) => (summary.total_amount, summary.items_count),
        None => (
            record
                .items
                .iter()
                .map(|item| item.price * Decimal::from(item.quantity))
                .sum(),
            record.items.iter().map(|item| item.quantity).sum(),
        ),
    };
    OrderSummary {
        order_id: record.id,
        order_number: record.order_number,
        status: record.order_status,
        total_amount,
        items_count,
        placed_at: record.timestamps.and_then(|t| t.created),
    }
}
