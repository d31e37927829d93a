//! # Instamojo Configuration
//!
//! Configuration management for the Instamojo integration.
//! Credentials are loaded from environment variables.

use pay_core::PaymentError;
use std::env;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://www.instamojo.com";

/// Instamojo API configuration
#[derive(Debug, Clone)]
pub struct InstamojoConfig {
    /// Private API key (`X-Api-Key`)
    pub api_key: String,

    /// Private auth token (`X-Auth-Token`)
    pub auth_token: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// How long idle keep-alive connections stay pooled
    pub keep_alive: Duration,
}

impl InstamojoConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `INSTAMOJO_API_KEY`
    /// - `INSTAMOJO_AUTH_TOKEN`
    ///
    /// Optional:
    /// - `INSTAMOJO_API_BASE_URL`
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_key = required_var("INSTAMOJO_API_KEY")?;
        let auth_token = required_var("INSTAMOJO_AUTH_TOKEN")?;

        let mut config = Self::new(api_key, auth_token);
        if let Ok(url) = env::var("INSTAMOJO_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(api_key: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            auth_token: auth_token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
            keep_alive: Duration::from_secs(60),
        }
    }

    /// Payment-request creation endpoint
    pub fn payment_requests_url(&self) -> String {
        format!("{}/api/1.1/payment-requests/", self.api_base_url)
    }

    /// API key safe for logs
    pub fn masked_api_key(&self) -> String {
        mask(&self.api_key)
    }

    /// Auth token safe for logs
    pub fn masked_auth_token(&self) -> String {
        mask(&self.auth_token)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn required_var(name: &str) -> Result<String, PaymentError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PaymentError::Configuration(format!("{} not set", name))),
    }
}

fn mask(secret: &str) -> String {
    let prefix: String = secret.chars().take(8).collect();
    format!("{}...", prefix)
}
