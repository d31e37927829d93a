//! # pay-instamojo
//!
//! Instamojo payment gateway for fest-pay-rs.
//!
//! `InstamojoGateway` creates hosted payment requests through the v1.1
//! REST API (`POST /api/1.1/payment-requests/`), authenticating with the
//! private API key and auth token.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_instamojo::InstamojoGateway;
//! use pay_core::PaymentGateway;
//!
//! // Create gateway from environment
//! let gateway = InstamojoGateway::from_env()?;
//!
//! // Create hosted checkout
//! let link = gateway.create_payment_request(&request.to_gateway_request(base_url)).await?;
//!
//! // Redirect buyer to link.payment_url
//! ```
//!
//! Transport failures come back as `PaymentError::Network` with the kind
//! classified (connection reset, DNS failure, timeout), so callers can decide
//! what is worth retrying.

pub mod config;
pub mod gateway;

// Re-exports
pub use config::InstamojoConfig;
pub use gateway::InstamojoGateway;
