use std::env;

/// Client-side configuration. The backend base URL points at the external
/// GloBus API; the web origin is only used to build the fixed return URLs
/// handed to the payment gateway.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub api_base_url: String,
    pub web_origin: String,
    pub currency: String,
}

impl StoreConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let api_base_url = env::var("STORE_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let web_origin =
            env::var("STORE_WEB_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let currency = env::var("STORE_CURRENCY").unwrap_or_else(|_| "BDT".to_string());
        Ok(Self {
            api_base_url: trim_trailing_slash(api_base_url),
            web_origin: trim_trailing_slash(web_origin),
            currency,
        })
    }

    /// Where the gateway sends the user after a completed payment.
    pub fn success_url(&self) -> String {
        format!("{}/payment-success", self.web_origin)
    }

    /// Where the gateway sends the user after a failed payment.
    pub fn fail_url(&self) -> String {
        format!("{}/payment-failed", self.web_origin)
    }

    /// Where the gateway sends the user when they cancel at the gateway.
    pub fn cancel_url(&self) -> String {
        format!("{}/cart", self.web_origin)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            web_origin: "http://localhost:3000".to_string(),
            currency: "BDT".to_string(),
        }
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
