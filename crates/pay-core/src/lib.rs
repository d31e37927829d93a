//! # pay-core
//!
//! Core types and traits for the fest-pay registration payment relay.
//!
//! This crate provides:
//! - `PaymentGateway` trait for hosted-checkout providers
//! - `PaymentRequest`, `GatewayPaymentRequest` and `PaymentLink`
//! - `CooldownStore` and an in-memory implementation
//! - `retry` combinator with `RetryPolicy`
//! - `PaymentPolicy` for the create-payment flow
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{retry, PaymentError, PaymentPolicy, PaymentRequest};
//!
//! let policy = PaymentPolicy::default();
//! policy.validate_amount(request.amount)?;
//!
//! let gateway_request = request.to_gateway_request("https://fest.example");
//! let link = retry(&policy.retry, PaymentError::is_retryable, |_| {
//!     gateway.create_payment_request(&gateway_request)
//! })
//! .await?;
//!
//! // Redirect the buyer to link.payment_url
//! ```

pub mod cooldown;
pub mod error;
pub mod gateway;
pub mod policy;
pub mod request;
pub mod retry;

// Re-exports for convenience
pub use cooldown::{remaining_secs, BoxedCooldownStore, CooldownStore, InMemoryCooldownStore};
pub use error::{NetworkErrorKind, PaymentError, PaymentResult};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use policy::{AmountDelay, GatewayUnavailablePolicy, PaymentPolicy, DEFAULT_FALLBACK_URL};
pub use request::{GatewayPaymentRequest, PaymentLink, PaymentRequest, MIN_AMOUNT};
pub use retry::{retry, Backoff, RetryPolicy};
