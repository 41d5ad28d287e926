use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    config::StoreConfig,
    dto::{
        admin::{AdminUserRecord, ProductInput, UpdateOrderStatusRequest, UserStatusResponse},
        cart::{AddToCartRequest, CartRecord, UpdateQuantityRequest},
        catalog::{OrderRecord, ProductRecord},
        payment::{GatewayInitResponse, PaymentInitRequest},
    },
    error::{AppError, AppResult},
};

/// HTTP capability over the external GloBus backend. One method per consumed
/// endpoint; the controller and services depend on this trait, never on
/// `reqwest` directly.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn fetch_cart(&self, user_email: &str) -> AppResult<Vec<CartRecord>>;
    async fn add_to_cart(&self, request: &AddToCartRequest) -> AppResult<CartRecord>;
    async fn update_quantity(&self, line_id: &str, quantity: u32) -> AppResult<CartRecord>;
    async fn remove_line(&self, line_id: &str) -> AppResult<()>;
    async fn clear_cart(&self, user_email: &str) -> AppResult<()>;
    /// Returns the gateway page URL to navigate to.
    async fn init_payment(&self, request: &PaymentInitRequest) -> AppResult<String>;
    async fn browse_products(&self) -> AppResult<Vec<ProductRecord>>;
    async fn product_detail(&self, product_id: &str) -> AppResult<ProductRecord>;
    async fn list_orders(&self, user_email: &str) -> AppResult<Vec<OrderRecord>>;
    async fn list_all_orders(&self) -> AppResult<Vec<OrderRecord>>;
    async fn update_order_status(&self, order_id: &str, status: &str) -> AppResult<()>;
    async fn create_product(&self, input: &ProductInput) -> AppResult<()>;
    async fn update_product(&self, product_id: &str, input: &ProductInput) -> AppResult<()>;
    async fn delete_product(&self, product_id: &str) -> AppResult<()>;
    async fn list_users(&self) -> AppResult<Vec<AdminUserRecord>>;
    async fn delete_user(&self, user_id: &str) -> AppResult<()>;
    /// Returns the toggled status as the backend reports it.
    async fn toggle_user_status(&self, user_id: &str) -> AppResult<String>;
}

/// `reqwest`-backed implementation against the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
}

impl HttpStorefrontApi {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Shape of a backend error body; either field may carry the message.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decodes a success body, or surfaces the server's own message verbatim on
/// a non-success status.
async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(backend_error(status, response).await)
}

async fn expect_success(response: Response) -> AppResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(backend_error(status, response).await)
}

async fn backend_error(status: StatusCode, response: Response) -> AppError {
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or_default();
    AppError::Backend {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn fetch_cart(&self, user_email: &str) -> AppResult<Vec<CartRecord>> {
        let response = self
            .client
            .get(self.url(&format!("/cart/{user_email}")))
            .send()
            .await?;
        decode(response).await
    }

    async fn add_to_cart(&self, request: &AddToCartRequest) -> AppResult<CartRecord> {
        let response = self
            .client
            .post(self.url("/cart/add"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_quantity(&self, line_id: &str, quantity: u32) -> AppResult<CartRecord> {
        let response = self
            .client
            .put(self.url(&format!("/cart/update/{line_id}")))
            .json(&UpdateQuantityRequest { quantity })
            .send()
            .await?;
        decode(response).await
    }

    async fn remove_line(&self, line_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/cart/remove/{line_id}")))
            .send()
            .await?;
        expect_success(response).await
    }

    async fn clear_cart(&self, user_email: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/cart/clear/{user_email}")))
            .send()
            .await?;
        expect_success(response).await
    }

    async fn init_payment(&self, request: &PaymentInitRequest) -> AppResult<String> {
        let response = self
            .client
            .post(self.url("/api/sslcommerz/init"))
            .json(request)
            .send()
            .await?;
        // The endpoint reports failures in the body as well as via status.
        let init: GatewayInitResponse = decode(response).await?;
        match init.gateway_page_url {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(AppError::Backend {
                status: 200,
                message: init.failure_message(),
            }),
        }
    }

    async fn browse_products(&self) -> AppResult<Vec<ProductRecord>> {
        let response = self.client.get(self.url("/browseProduct")).send().await?;
        decode(response).await
    }

    async fn product_detail(&self, product_id: &str) -> AppResult<ProductRecord> {
        let response = self
            .client
            .get(self.url(&format!("/productDetail/{product_id}")))
            .send()
            .await?;
        decode(response).await
    }

    async fn list_orders(&self, user_email: &str) -> AppResult<Vec<OrderRecord>> {
        let response = self
            .client
            .get(self.url("/api/orders"))
            .query(&[("userEmail", user_email)])
            .send()
            .await?;
        decode(response).await
    }

    async fn list_all_orders(&self) -> AppResult<Vec<OrderRecord>> {
        let response = self.client.get(self.url("/api/orders/all")).send().await?;
        decode(response).await
    }

    async fn update_order_status(&self, order_id: &str, status: &str) -> AppResult<()> {
        let response = self
            .client
            .patch(self.url(&format!("/api/orders/{order_id}/status")))
            .json(&UpdateOrderStatusRequest {
                status: status.to_string(),
            })
            .send()
            .await?;
        expect_success(response).await
    }

    async fn create_product(&self, input: &ProductInput) -> AppResult<()> {
        let response = self
            .client
            .post(self.url("/addProducts"))
            .json(input)
            .send()
            .await?;
        expect_success(response).await
    }

    async fn update_product(&self, product_id: &str, input: &ProductInput) -> AppResult<()> {
        let response = self
            .client
            .put(self.url(&format!("/products/{product_id}")))
            .json(input)
            .send()
            .await?;
        expect_success(response).await
    }

    async fn delete_product(&self, product_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/products/{product_id}")))
            .send()
            .await?;
        expect_success(response).await
    }

    async fn list_users(&self) -> AppResult<Vec<AdminUserRecord>> {
        let response = self.client.get(self.url("/admin/users")).send().await?;
        decode(response).await
    }

    async fn delete_user(&self, user_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/admin/user/{user_id}")))
            .send()
            .await?;
        expect_success(response).await
    }

    async fn toggle_user_status(&self, user_id: &str) -> AppResult<String> {
        let response = self
            .client
            .patch(self.url(&format!("/admin/user/{user_id}/status")))
            .send()
            .await?;
        let body: UserStatusResponse = decode(response).await?;
        Ok(body.status)
    }
}
