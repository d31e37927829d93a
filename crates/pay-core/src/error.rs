//! # Payment Error Types
//!
//! Typed error handling for the payment relay.
//! All payment operations return `Result<T, PaymentError>`.

use serde_json::Value;
use thiserror::Error;

/// Transport-level failure class observed while talking to a gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Peer reset the connection mid-request
    ConnectionReset,
    /// Gateway host name could not be resolved
    DnsFailure,
    /// Request exceeded the outbound timeout
    Timeout,
    /// Any other transport failure (refused, TLS, broken body...)
    Other,
}

impl NetworkErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorKind::ConnectionReset => "connection_reset",
            NetworkErrorKind::DnsFailure => "dns_failure",
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request body could not be decoded
    #[error("Invalid request body")]
    InvalidRequest(String),

    /// Amount below the gateway-imposed minimum
    #[error("Minimum payment amount is ₹{minimum}")]
    AmountBelowMinimum { amount: i64, minimum: i64 },

    /// Same requester submitted again inside the cooldown window
    #[error("Please wait before making another payment request")]
    CooldownActive { retry_after_secs: u64 },

    /// Gateway answered but reported `success: false`
    #[error("{provider} API returned an error")]
    GatewayRejected { provider: String, details: Value },

    /// Gateway answered with a non-success HTTP status
    #[error("Provider error [{provider}]: HTTP {status}")]
    GatewayHttp {
        provider: String,
        status: u16,
        details: Value,
    },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error ({kind}): {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        PaymentError::Network {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if the call may be retried as-is.
    ///
    /// Only connection resets qualify: DNS failures and timeouts already
    /// burned their budget and are left to the unavailable policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::Network {
                kind: NetworkErrorKind::ConnectionReset,
                ..
            }
        )
    }

    /// Returns true if the gateway could not be reached at all
    pub fn is_gateway_unreachable(&self) -> bool {
        matches!(
            self,
            PaymentError::Network {
                kind: NetworkErrorKind::ConnectionReset
                    | NetworkErrorKind::DnsFailure
                    | NetworkErrorKind::Timeout,
                ..
            }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::AmountBelowMinimum { .. } => 400,
            PaymentError::CooldownActive { .. } => 429,
            PaymentError::GatewayRejected { .. } => 400,
            PaymentError::GatewayHttp { .. } => 500,
            PaymentError::Network { .. } if self.is_gateway_unreachable() => 503,
            PaymentError::Network { .. } => 500,
            PaymentError::Serialization(_) => 500,
        }
    }

    /// Caller-facing detail payload, if the error carries one
    pub fn details(&self) -> Option<Value> {
        match self {
            PaymentError::AmountBelowMinimum { amount, .. } => {
                Some(Value::String(format!("Received amount: ₹{}", amount)))
            }
            PaymentError::GatewayRejected { details, .. }
            | PaymentError::GatewayHttp { details, .. } => Some(details.clone()),
            PaymentError::InvalidRequest(reason) => Some(Value::String(reason.clone())),
            PaymentError::CooldownActive { .. } => None,
            other => Some(Value::String(other.to_string())),
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
