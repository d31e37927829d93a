//! # Payment Policy
//!
//! Tunables for the create-payment flow. Defaults reproduce the behaviour
//! the registration site was launched with; any of them can be overridden
//! from `config/payments.toml`.
//!
//! ```toml
//! min_amount = 9
//! cooldown_ms = 10000
//! on_gateway_unavailable = "fallback"
//! fallback_url = "https://www.instamojo.com/@heritagefest2025/"
//!
//! [[amount_delays]]
//! amount = 200
//! delay_ms = 2000
//!
//! [retry]
//! max_attempts = 3
//! backoff = { kind = "linear", step_ms = 1000 }
//! ```

use crate::error::{PaymentError, PaymentResult};
use crate::request::MIN_AMOUNT;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Static checkout page used when the gateway API is unreachable
pub const DEFAULT_FALLBACK_URL: &str = "https://www.instamojo.com/@heritagefest2025/";

/// What to tell the caller when the gateway cannot be reached after retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayUnavailablePolicy {
    /// Report success with the static fallback checkout URL.
    /// No payment request exists on the gateway in this case.
    #[default]
    Fallback,
    /// Surface the failure as an error response
    Error,
}

/// Pause inserted before the gateway call for a given amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountDelay {
    pub amount: i64,
    pub delay_ms: u64,
}

/// Create-payment policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentPolicy {
    pub min_amount: i64,
    pub cooldown_ms: u64,
    /// Upstream rate-limits the 200 tier; delaying those calls avoided rejections
    pub amount_delays: Vec<AmountDelay>,
    pub retry: RetryPolicy,
    pub on_gateway_unavailable: GatewayUnavailablePolicy,
    pub fallback_url: String,
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self {
            min_amount: MIN_AMOUNT,
            cooldown_ms: 10_000,
            amount_delays: vec![AmountDelay {
                amount: 200,
                delay_ms: 2000,
            }],
            retry: RetryPolicy::default(),
            on_gateway_unavailable: GatewayUnavailablePolicy::default(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
        }
    }
}

impl PaymentPolicy {
    /// Parse a policy from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> PaymentResult<Self> {
        toml::from_str(content)
            .map_err(|e| PaymentError::Configuration(format!("invalid payment policy: {}", e)))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Delay configured for `amount`, if any
    pub fn delay_for(&self, amount: i64) -> Option<Duration> {
        self.amount_delays
            .iter()
            .find(|d| d.amount == amount)
            .map(|d| Duration::from_millis(d.delay_ms))
    }

    /// Reject amounts below the gateway minimum
    pub fn validate_amount(&self, amount: i64) -> PaymentResult<()> {
        if amount < self.min_amount {
            return Err(PaymentError::AmountBelowMinimum {
                amount,
                minimum: self.min_amount,
            });
        }
        Ok(())
    }

    /// Builder: set the unavailable policy
    pub fn with_unavailable_policy(mut self, policy: GatewayUnavailablePolicy) -> Self {
        self.on_gateway_unavailable = policy;
        self
    }
}
