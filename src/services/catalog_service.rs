use std::sync::Arc;

use crate::{
    api::StorefrontApi,
    dto::catalog::{ProductRecord, ProductVariantRecord},
    error::{AppError, AppResult},
    models::{CartLine, NewCartLine, placeholder_line_id},
};
use chrono::Utc;

/// Read-only catalog access plus the pure selection helpers the storefront
/// pages use over the fetched records.
pub struct CatalogService {
    api: Arc<dyn StorefrontApi>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    pub async fn browse(&self) -> AppResult<Vec<ProductRecord>> {
        self.api.browse_products().await
    }

    pub async fn detail(&self, product_id: &str) -> AppResult<ProductRecord> {
        self.api.product_detail(product_id).await
    }
}

pub fn featured(products: &[ProductRecord], limit: usize) -> Vec<&ProductRecord> {
    products.iter().filter(|p| p.is_featured).take(limit).collect()
}

/// Products with an actual markdown from list price.
pub fn deals(products: &[ProductRecord], limit: usize) -> Vec<&ProductRecord> {
    products.iter().filter(|p| p.has_discount()).take(limit).collect()
}

pub fn by_category<'a>(
    products: &'a [ProductRecord],
    category: &str,
    limit: usize,
) -> Vec<&'a ProductRecord> {
    products
        .iter()
        .filter(|p| p.category == category)
        .take(limit)
        .collect()
}

/// Search-autocomplete over name, brand, and category. Case-insensitive
/// substring match; a blank query suggests nothing.
pub fn search_suggestions<'a>(
    products: &'a [ProductRecord],
    query: &str,
    limit: usize,
) -> Vec<&'a ProductRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.brand.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
        })
        .take(limit)
        .collect()
}

/// Synthesizes the single line a direct-buy checkout carries. Never touches
/// the cart store. Refuses a variant that is known to be out of stock.
pub fn direct_buy_line(
    product: &ProductRecord,
    quantity: u32,
    variant: Option<&ProductVariantRecord>,
) -> AppResult<CartLine> {
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    if variant.is_some_and(|v| v.stock == Some(0)) {
        return Err(AppError::BadRequest(
            "Selected variant is out of stock".to_string(),
        ));
    }
    Ok(CartLine {
        line_id: placeholder_line_id(),
        product_id: product.id.clone(),
        name: product.name.clone(),
        image_url: product.primary_image().to_string(),
        brand: product.brand.clone(),
        unit_price: product.effective_price(),
        list_price: product.price,
        quantity,
        variant: variant.map(ProductVariantRecord::selection),
        added_at: Utc::now(),
    })
}

/// Add-to-cart input built from a catalog record, capturing the display
/// snapshot and effective price at add-time.
pub fn new_cart_line(
    product: &ProductRecord,
    quantity: u32,
    variant: Option<&ProductVariantRecord>,
) -> NewCartLine {
    NewCartLine {
        product_id: product.id.clone(),
        name: product.name.clone(),
        image_url: product.primary_image().to_string(),
        brand: product.brand.clone(),
        category: product.category.clone(),
        unit_price: product.effective_price(),
        list_price: product.price,
        quantity,
        variant: variant.map(ProductVariantRecord::selection),
    }
}
