//! # Payment Gateway Trait
//!
//! Seam between the HTTP layer and a hosted-checkout provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          PaymentGateway (trait)             │
//! │  ├── create_payment_request()               │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                      ▲
//!          ┌───────────┴───────────┐
//!  ┌───────┴────────┐     ┌────────┴───────┐
//!  │InstamojoGateway│     │ test doubles   │
//!  └────────────────┘     └────────────────┘
//! ```

use crate::error::PaymentResult;
use crate::request::{GatewayPaymentRequest, PaymentLink};
use async_trait::async_trait;
use std::sync::Arc;

/// A provider able to create hosted payment requests.
///
/// Implementations perform exactly one outbound attempt per call; retries
/// are layered on top by the caller.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted payment request and return its checkout link.
    ///
    /// # Errors
    /// - `GatewayRejected` when the provider answers with `success: false`
    /// - `GatewayHttp` for non-success HTTP statuses
    /// - `Network` for transport failures, classified by kind
    async fn create_payment_request(
        &self,
        request: &GatewayPaymentRequest,
    ) -> PaymentResult<PaymentLink>;

    /// Get the provider name (for logging and error messages).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
