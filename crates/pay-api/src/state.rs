//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment gateway, cooldown store, payment policy and configuration.

use pay_core::{
    BoxedCooldownStore, BoxedPaymentGateway, InMemoryCooldownStore, PaymentPolicy,
};
use pay_instamojo::InstamojoGateway;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public origin; also the default gateway redirect target
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Hosted checkout provider
    pub gateway: BoxedPaymentGateway,
    /// Per-buyer submission throttle
    pub cooldowns: BoxedCooldownStore,
    /// Create-payment tunables
    pub policy: Arc<PaymentPolicy>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Instamojo and an in-memory cooldown store.
    ///
    /// Fails if the Instamojo credentials are missing.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let policy = load_payment_policy()?;

        let gateway = InstamojoGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Instamojo: {}", e))?;

        tracing::info!(
            "Instamojo credentials loaded: api_key={}, auth_token={}",
            gateway.config().masked_api_key(),
            gateway.config().masked_auth_token()
        );

        Ok(Self::with_parts(
            config,
            policy,
            Arc::new(gateway),
            Arc::new(InMemoryCooldownStore::new()),
        ))
    }

    /// Assemble state from explicit parts (tests, alternative gateways)
    pub fn with_parts(
        config: AppConfig,
        policy: PaymentPolicy,
        gateway: BoxedPaymentGateway,
        cooldowns: BoxedCooldownStore,
    ) -> Self {
        Self {
            gateway,
            cooldowns,
            policy: Arc::new(policy),
            config,
        }
    }

    /// Redirect target used when the form does not provide one
    pub fn default_redirect_url(&self) -> &str {
        &self.config.base_url
    }
}

/// Load the payment policy from config file
fn load_payment_policy() -> anyhow::Result<PaymentPolicy> {
    let config_paths = [
        "config/payments.toml",
        "../config/payments.toml",
        "../../config/payments.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let policy = PaymentPolicy::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded payment policy from {}", path);
            return Ok(policy);
        }
    }

    tracing::warn!("No payment policy found, using defaults");
    Ok(PaymentPolicy::default())
}
