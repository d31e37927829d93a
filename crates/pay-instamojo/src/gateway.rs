//! # Instamojo Payment Requests
//!
//! Implementation of the Instamojo v1.1 payment-request API.
//! Each call creates one hosted checkout and returns its `longurl`.

use crate::config::InstamojoConfig;
use async_trait::async_trait;
use pay_core::{
    GatewayPaymentRequest, NetworkErrorKind, PaymentError, PaymentGateway, PaymentLink,
    PaymentResult,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error as StdError;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "Instamojo";

/// Instamojo hosted checkout gateway
pub struct InstamojoGateway {
    config: InstamojoConfig,
    client: Client,
}

impl InstamojoGateway {
    /// Create a new gateway with a pooled keep-alive client
    pub fn new(config: InstamojoConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(config.keep_alive)
            .tcp_keepalive(config.keep_alive)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = InstamojoConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &InstamojoConfig {
        &self.config
    }

    /// Form fields in the shape the v1.1 API expects
    fn build_form(request: &GatewayPaymentRequest) -> Vec<(&'static str, String)> {
        vec![
            ("purpose", request.purpose.clone()),
            ("amount", request.amount.to_string()),
            ("buyer_name", request.buyer_name.clone()),
            ("email", request.email.clone()),
            ("phone", request.phone.clone()),
            ("redirect_url", request.redirect_url.clone()),
            ("send_email", python_bool(request.send_email).to_string()),
            ("send_sms", python_bool(request.send_sms).to_string()),
            (
                "allow_repeated_payments",
                request.allow_repeated_payments.to_string(),
            ),
        ]
    }
}

#[async_trait]
impl PaymentGateway for InstamojoGateway {
    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn create_payment_request(
        &self,
        request: &GatewayPaymentRequest,
    ) -> PaymentResult<PaymentLink> {
        let url = self.config.payment_requests_url();
        let form = Self::build_form(request);

        debug!(
            "Sending to Instamojo API: url={}, api_key={}, auth_token={}",
            url,
            self.config.masked_api_key(),
            self.config.masked_auth_token()
        );

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .header("X-Auth-Token", &self.config.auth_token)
            .form(&form)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));

        if !status.is_success() {
            error!("Instamojo API error: status={}, body={}", status, details);
            return Err(PaymentError::GatewayHttp {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                details,
            });
        }

        let parsed: InstamojoResponse = serde_json::from_value(details.clone()).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Instamojo response: {}", e))
        })?;

        let payment_request = match parsed {
            InstamojoResponse {
                success: true,
                payment_request: Some(pr),
            } => pr,
            InstamojoResponse { success: true, .. } => {
                return Err(PaymentError::Serialization(
                    "Instamojo response missing payment_request".to_string(),
                ))
            }
            InstamojoResponse { success: false, .. } => {
                error!("Instamojo API Error: {}", details);
                return Err(PaymentError::GatewayRejected {
                    provider: PROVIDER.to_string(),
                    details,
                });
            }
        };

        info!(
            "Created Instamojo payment request: id={}, url={}",
            payment_request.id, payment_request.longurl
        );

        Ok(PaymentLink {
            payment_url: payment_request.longurl,
            payment_request_id: payment_request.id,
        })
    }

    fn provider_name(&self) -> &'static str {
        "instamojo"
    }
}

// =============================================================================
// Instamojo API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct InstamojoResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    payment_request: Option<InstamojoPaymentRequest>,
}

#[derive(Debug, Deserialize)]
struct InstamojoPaymentRequest {
    id: String,
    longurl: String,
}

/// The v1.1 API parses notification flags as Python-style booleans
fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

// =============================================================================
// Transport Error Classification
// =============================================================================

fn network_error(err: reqwest::Error) -> PaymentError {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else {
        classify_source(&err)
    };
    PaymentError::network(kind, chain_message(&err))
}

/// Full cause chain, e.g. "error sending request: client error: connection reset"
fn chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();

    while let Some(e) = current {
        let cause = e.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
        current = e.source();
    }

    message
}

/// Walk the source chain looking for a recognisable transport failure
fn classify_source(err: &(dyn StdError + 'static)) -> NetworkErrorKind {
    let mut current = Some(err);

    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            match io.kind() {
                std::io::ErrorKind::ConnectionReset => return NetworkErrorKind::ConnectionReset,
                std::io::ErrorKind::TimedOut => return NetworkErrorKind::Timeout,
                _ => {}
            }
        }

        // Peer hung up before answering, e.g. a stale keep-alive socket
        if let Some(hyper_err) = e.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() {
                return NetworkErrorKind::ConnectionReset;
            }
        }

        let message = e.to_string().to_ascii_lowercase();
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return NetworkErrorKind::DnsFailure;
        }
        if message.contains("connection reset")
            || message.contains("connection closed before message completed")
        {
            return NetworkErrorKind::ConnectionReset;
        }

        current = e.source();
    }

    NetworkErrorKind::Other
}
