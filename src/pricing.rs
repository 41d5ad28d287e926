use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::CartLine;

/// Orders strictly above this subtotal ship free. The boundary is exclusive:
/// a subtotal of exactly 50.00 still pays the flat fee.
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(50.00);
pub const FLAT_SHIPPING_FEE: Decimal = dec!(5.99);
pub const TAX_RATE: Decimal = dec!(0.08);

/// The one recognized promo code and its rate. Matching is client-side and
/// display-only; the code is forwarded to the payment-initiation endpoint so
/// the backend can re-validate it before charging.
pub const PROMO_CODE: &str = "GLOBUS10";
pub const PROMO_RATE: Decimal = dec!(0.10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promo {
    pub code: String,
    pub rate: Decimal,
}

/// Case-insensitive match against the recognized code.
pub fn match_promo_code(code: &str) -> Option<Promo> {
    if code.trim().eq_ignore_ascii_case(PROMO_CODE) {
        Some(Promo {
            code: PROMO_CODE.to_string(),
            rate: PROMO_RATE,
        })
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Pure pricing over a set of lines. No I/O, deterministic for a given
/// input. Amounts are rounded to cents.
pub fn compute_totals(lines: &[CartLine], promo: Option<&Promo>) -> OrderTotals {
    let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
    let shipping_fee = if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    };
    let tax = (subtotal * TAX_RATE).round_dp(2);
    let discount = promo
        .map(|p| (subtotal * p.rate).round_dp(2))
        .unwrap_or(Decimal::ZERO);
    let total = subtotal + shipping_fee + tax - discount;
    OrderTotals {
        subtotal,
        shipping_fee,
        tax,
        discount,
        total,
    }
}
