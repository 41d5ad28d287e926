#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;

use globus_storefront::{
    api::StorefrontApi,
    auth::{AuthSession, CachedSessionProvider},
    dto::{
        admin::{AdminUserRecord, ProductInput},
        cart::{AddToCartRequest, CartRecord},
        catalog::{OrderRecord, ProductRecord},
        payment::PaymentInitRequest,
    },
    error::{AppError, AppResult},
    navigation::Navigator,
    services::cart_service::CartController,
    storage::{CacheStore, MemoryStore, SESSION_CACHE_KEY},
};

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// In-memory stand-in for the external backend, with per-operation failure
/// switches, call counters, and scriptable response latency for the
/// out-of-order tests.
#[derive(Default)]
pub struct MockApi {
    pub server_cart: Mutex<Vec<CartRecord>>,
    pub products: Mutex<Vec<ProductRecord>>,
    pub orders: Mutex<Vec<OrderRecord>>,
    pub users: Mutex<Vec<AdminUserRecord>>,
    pub stock_clamp: Mutex<Option<u32>>,
    pub fail_fetch: AtomicBool,
    pub fail_add: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_remove: AtomicBool,
    pub fail_clear: AtomicBool,
    pub fail_payment: AtomicBool,
    pub fetch_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub payment_calls: AtomicUsize,
    pub admin_calls: AtomicUsize,
    pub update_delays: Mutex<VecDeque<Duration>>,
    pub last_payment: Mutex<Option<serde_json::Value>>,
    next_id: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_cart(&self, records: Vec<CartRecord>) {
        *self.server_cart.lock().unwrap() = records;
    }

    pub fn cart_len(&self) -> usize {
        self.server_cart.lock().unwrap().len()
    }

    fn backend_error(message: &str) -> AppError {
        AppError::Backend {
            status: 500,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl StorefrontApi for MockApi {
    async fn fetch_cart(&self, _user_email: &str) -> AppResult<Vec<CartRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Self::backend_error("server unavailable"));
        }
        Ok(self.server_cart.lock().unwrap().clone())
    }

    async fn add_to_cart(&self, request: &AddToCartRequest) -> AppResult<CartRecord> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Self::backend_error("product not found"));
        }
        let mut cart = self.server_cart.lock().unwrap();
        if let Some(existing) = cart.iter_mut().find(|record| {
            record.product_id == request.product_id
                && record.selected_variant == request.selected_variant
        }) {
            existing.quantity += request.quantity;
            return Ok(existing.clone());
        }
        let id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = CartRecord {
            id,
            product_id: request.product_id.clone(),
            product_name: request.product_name.clone(),
            product_image: request.product_image.clone(),
            price: request.price,
            original_price: Some(request.original_price),
            discount_price: request.discount_price,
            brand: request.brand.clone(),
            category: request.category.clone(),
            quantity: request.quantity,
            selected_variant: request.selected_variant.clone(),
            added_at: Some(Utc::now()),
        };
        cart.push(record.clone());
        Ok(record)
    }

    async fn update_quantity(&self, line_id: &str, quantity: u32) -> AppResult<CartRecord> {
        let delay = self.update_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::backend_error("server unavailable"));
        }
        let clamp = *self.stock_clamp.lock().unwrap();
        let mut cart = self.server_cart.lock().unwrap();
        let record = cart
            .iter_mut()
            .find(|record| record.id == line_id)
            .ok_or_else(|| Self::backend_error("Cart item not found"))?;
        record.quantity = clamp.map_or(quantity, |limit| quantity.min(limit));
        Ok(record.clone())
    }

    async fn remove_line(&self, line_id: &str) -> AppResult<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Self::backend_error("server unavailable"));
        }
        self.server_cart
            .lock()
            .unwrap()
            .retain(|record| record.id != line_id);
        Ok(())
    }

    async fn clear_cart(&self, _user_email: &str) -> AppResult<()> {
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(Self::backend_error("server unavailable"));
        }
        self.server_cart.lock().unwrap().clear();
        Ok(())
    }

    async fn init_payment(&self, request: &PaymentInitRequest) -> AppResult<String> {
        self.payment_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payment.lock().unwrap() = serde_json::to_value(request).ok();
        if self.fail_payment.load(Ordering::SeqCst) {
            return Err(AppError::Backend {
                status: 200,
                message: "Payment initialization failed!".to_string(),
            });
        }
        Ok("https://sandbox.gateway.example/session/abc123".to_string())
    }

    async fn browse_products(&self) -> AppResult<Vec<ProductRecord>> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn product_detail(&self, product_id: &str) -> AppResult<ProductRecord> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|product| product.id == product_id)
            .cloned()
            .ok_or(AppError::Backend {
                status: 404,
                message: "Product not found".to_string(),
            })
    }

    async fn list_orders(&self, _user_email: &str) -> AppResult<Vec<OrderRecord>> {
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn list_all_orders(&self) -> AppResult<Vec<OrderRecord>> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn update_order_status(&self, order_id: &str, status: &str) -> AppResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|order| order.id == order_id)
            .ok_or(AppError::Backend {
                status: 404,
                message: "Order not found".to_string(),
            })?;
        order.order_status = status.to_string();
        Ok(())
    }

    async fn create_product(&self, input: &ProductInput) -> AppResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        let id = format!("prod-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.products.lock().unwrap().push(ProductRecord {
            id,
            name: input.name.clone(),
            brand: input.brand.clone(),
            category: input.category.clone(),
            price: input.price,
            discount_price: input.discount_price,
            images: input.images.clone(),
            description: input.description.clone(),
            variants: Vec::new(),
            stock: Some(i64::from(input.stock)),
            is_featured: input.is_featured,
        });
        Ok(())
    }

    async fn update_product(&self, product_id: &str, input: &ProductInput) -> AppResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|product| product.id == product_id)
            .ok_or(AppError::Backend {
                status: 404,
                message: "Product not found".to_string(),
            })?;
        product.name = input.name.clone();
        product.price = input.price;
        product.discount_price = input.discount_price;
        product.stock = Some(i64::from(input.stock));
        Ok(())
    }

    async fn delete_product(&self, product_id: &str) -> AppResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        self.products
            .lock()
            .unwrap()
            .retain(|product| product.id != product_id);
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<AdminUserRecord>> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete_user(&self, user_id: &str) -> AppResult<()> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        self.users.lock().unwrap().retain(|user| user.id != user_id);
        Ok(())
    }

    async fn toggle_user_status(&self, user_id: &str) -> AppResult<String> {
        self.admin_calls.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(AppError::Backend {
                status: 404,
                message: "User not found".to_string(),
            })?;
        user.status = if user.status == "blocked" {
            "active".to_string()
        } else {
            "blocked".to_string()
        };
        Ok(user.status.clone())
    }
}

/// Captures full-page navigations instead of performing them.
#[derive(Default)]
pub struct RecordingNavigator {
    pub targets: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn last_target(&self) -> Option<String> {
        self.targets.lock().unwrap().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.targets.lock().unwrap().push(url.to_string());
    }
}

pub fn active_session(email: &str) -> AuthSession {
    AuthSession {
        user_id: format!("uid-{email}"),
        name: "Test Shopper".to_string(),
        email: email.to_string(),
        phone: Some("01700000000".to_string()),
        role: "user".to_string(),
        photo_url: None,
        token: "opaque-token".to_string(),
        issued_at: Utc::now(),
        expires_at: Utc::now() + ChronoDuration::hours(1),
    }
}

pub fn admin_session(email: &str) -> AuthSession {
    AuthSession {
        name: "Store Admin".to_string(),
        role: "admin".to_string(),
        ..active_session(email)
    }
}

pub fn expired_session(email: &str) -> AuthSession {
    AuthSession {
        issued_at: Utc::now() - ChronoDuration::hours(2),
        expires_at: Utc::now() - ChronoDuration::hours(1),
        ..active_session(email)
    }
}

pub fn sign_in(cache: &MemoryStore, session: &AuthSession) {
    cache.put(
        SESSION_CACHE_KEY,
        &serde_json::to_string(session).expect("session serializes"),
    );
}

pub fn cart_record(id: &str, product_id: &str, price: Decimal, quantity: u32) -> CartRecord {
    CartRecord {
        id: id.to_string(),
        product_id: product_id.to_string(),
        product_name: format!("Product {product_id}"),
        product_image: "/placeholder.png".to_string(),
        price,
        original_price: Some(price),
        discount_price: None,
        brand: "GloBus".to_string(),
        category: "General".to_string(),
        quantity,
        selected_variant: None,
        added_at: Some(Utc::now()),
    }
}

/// Controller wired to the mock backend through the cache-backed session
/// provider, the way the shell wires the real thing.
pub fn controller(api: Arc<MockApi>, cache: Arc<MemoryStore>) -> CartController {
    let sessions = Arc::new(CachedSessionProvider::new(cache.clone()));
    CartController::new(api, cache, sessions)
}
