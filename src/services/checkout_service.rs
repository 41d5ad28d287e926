use std::sync::Arc;

use crate::{
    api::StorefrontApi,
    auth::AuthSession,
    config::StoreConfig,
    dto::payment::{CheckoutSource, GatewayCartItem, PaymentInitRequest},
    error::{AppError, AppResult},
    models::{CartLine, CartSnapshot, ShippingInfo},
    navigation::Navigator,
    pricing::{self, OrderTotals, Promo},
};

/// How the gateway reported back via its redirect to one of the fixed
/// return URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOutcome {
    Success,
    Failure,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    CollectingShipping,
    ReviewingOrder,
    /// Control was handed to the gateway. The user may abandon the gateway
    /// page entirely, leaving the session here forever — the server is the
    /// authority on whether payment completed.
    AwaitingGatewayRedirect,
    Completed(GatewayOutcome),
}

/// Ephemeral, in-memory checkout. Never written back to the cart store;
/// direct-buy sessions never read it either.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    source: CheckoutSource,
    lines: Vec<CartLine>,
    shipping: ShippingInfo,
    promo: Option<Promo>,
    state: CheckoutState,
    user_email: String,
    user_id: String,
    gateway_url: Option<String>,
}

impl CheckoutSession {
    /// Checkout of the loaded cart. Refused while the cart is empty.
    pub fn from_cart(snapshot: &CartSnapshot, session: &AuthSession) -> AppResult<Self> {
        if snapshot.is_empty() {
            return Err(AppError::BadRequest("Cart is empty".to_string()));
        }
        Ok(Self::new(
            CheckoutSource::Cart,
            snapshot.lines.clone(),
            session,
        ))
    }

    /// Checkout of exactly one synthesized line, bypassing the cart store in
    /// both directions.
    pub fn direct_buy(line: CartLine, session: &AuthSession) -> Self {
        Self::new(CheckoutSource::DirectBuy, vec![line], session)
    }

    fn new(source: CheckoutSource, lines: Vec<CartLine>, session: &AuthSession) -> Self {
        Self {
            source,
            lines,
            shipping: ShippingInfo::prefilled_from(session),
            promo: None,
            state: CheckoutState::CollectingShipping,
            user_email: session.email.clone(),
            user_id: session.user_id.clone(),
            gateway_url: None,
        }
    }

    pub fn source(&self) -> CheckoutSource {
        self.source
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    pub fn promo(&self) -> Option<&Promo> {
        self.promo.as_ref()
    }

    /// Gateway page URL, present once payment initiation succeeded.
    pub fn gateway_url(&self) -> Option<&str> {
        self.gateway_url.as_deref()
    }

    /// Client-side promo match. Display-only; the backend re-validates the
    /// code at payment initiation.
    pub fn apply_promo(&mut self, code: &str) -> bool {
        match pricing::match_promo_code(code) {
            Some(promo) => {
                self.promo = Some(promo);
                true
            }
            None => false,
        }
    }

    pub fn totals(&self) -> OrderTotals {
        pricing::compute_totals(&self.lines, self.promo.as_ref())
    }

    /// `CollectingShipping → ReviewingOrder`, guarded by presence of all
    /// required fields. No server call; no format validation. Refusal keeps
    /// the session collecting.
    pub fn submit_shipping(&mut self, shipping: ShippingInfo) -> AppResult<()> {
        if self.state != CheckoutState::CollectingShipping {
            return Err(AppError::BadRequest(
                "Shipping can only be submitted while collecting shipping".to_string(),
            ));
        }
        let missing = shipping.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Missing required shipping fields: {}",
                missing.join(", ")
            )));
        }
        self.shipping = shipping;
        self.state = CheckoutState::ReviewingOrder;
        Ok(())
    }

    /// Back from review to the shipping form.
    pub fn back_to_shipping(&mut self) {
        if self.state == CheckoutState::ReviewingOrder {
            self.state = CheckoutState::CollectingShipping;
        }
    }

    /// Terminal transition, reached only via the gateway's own redirect back
    /// to a fixed return URL.
    pub fn record_gateway_outcome(&mut self, outcome: GatewayOutcome) -> AppResult<()> {
        if self.state != CheckoutState::AwaitingGatewayRedirect {
            return Err(AppError::BadRequest(
                "No payment handoff is in progress".to_string(),
            ));
        }
        self.state = CheckoutState::Completed(outcome);
        Ok(())
    }
}

/// Turns a reviewed checkout session into a full-page redirect to the
/// external payment gateway. No card data is ever held here.
pub struct CheckoutService {
    api: Arc<dyn StorefrontApi>,
    config: StoreConfig,
}

impl CheckoutService {
    pub fn new(api: Arc<dyn StorefrontApi>, config: StoreConfig) -> Self {
        Self { api, config }
    }

    /// `ReviewingOrder → AwaitingGatewayRedirect`. Sends the totals,
    /// shipping info, and line items to the payment-initiation endpoint and
    /// navigates to the returned gateway URL. Failure keeps the session in
    /// `ReviewingOrder` and surfaces the error; it never silently retries.
    pub async fn initiate_payment(
        &self,
        session: &mut CheckoutSession,
        navigator: &dyn Navigator,
    ) -> AppResult<String> {
        if session.state != CheckoutState::ReviewingOrder {
            return Err(AppError::BadRequest(
                "Order must be reviewed before payment".to_string(),
            ));
        }
        if session.lines.is_empty() {
            return Err(AppError::BadRequest("No items to pay for".to_string()));
        }
        let totals = session.totals();
        if totals.total <= rust_decimal::Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Order total must be positive".to_string(),
            ));
        }

        let request = self.build_init_request(session, &totals);
        let gateway_url = self.api.init_payment(&request).await?;

        session.state = CheckoutState::AwaitingGatewayRedirect;
        session.gateway_url = Some(gateway_url.clone());
        tracing::info!(source = ?session.source, "handing off to payment gateway");
        // Deliberate hand-off of control: full navigation, nothing tracked
        // further until the gateway redirects back.
        navigator.navigate(&gateway_url);
        Ok(gateway_url)
    }

    fn build_init_request(
        &self,
        session: &CheckoutSession,
        totals: &OrderTotals,
    ) -> PaymentInitRequest {
        let shipping = &session.shipping;
        PaymentInitRequest {
            total_amount: totals.total,
            currency: self.config.currency.clone(),
            success_url: self.config.success_url(),
            fail_url: self.config.fail_url(),
            cancel_url: self.config.cancel_url(),
            customer_name: shipping.full_name.clone(),
            customer_email: shipping.email.clone(),
            customer_phone: shipping.phone.clone(),
            customer_address: shipping.address.clone(),
            customer_city: shipping.city.clone(),
            customer_country: shipping.country.clone(),
            shipping_info: shipping.clone(),
            cart_items: session.lines.iter().map(GatewayCartItem::from).collect(),
            source: session.source,
            user_email: session.user_email.clone(),
            user_id: session.user_id.clone(),
            promo_code: session.promo.as_ref().map(|p| p.code.clone()),
            discount_amount: totals.discount,
        }
    }
}
