//! # pay-api
//!
//! HTTP API layer for fest-pay-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The create-payment endpoint relaying registrations to the gateway
//! - The post-payment confirmation page
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create-payment` | Create hosted payment request (JSON or form body) |
//! | GET | `/payment-success` | Confirmation page |

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
