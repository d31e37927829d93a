//! # Request Handlers
//!
//! Axum request handlers for the registration payment API.

use crate::extract::JsonOrForm;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use pay_core::{
    remaining_secs, retry, GatewayUnavailablePolicy, PaymentError, PaymentLink, PaymentRequest,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment response
#[derive(Debug, Serialize)]
pub struct CreatePaymentResponse {
    pub success: bool,
    /// Checkout URL (redirect the buyer here)
    #[serde(rename = "paymentUrl")]
    pub payment_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_request_id: Option<String>,
    /// Set when `payment_url` is the static fallback page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CreatePaymentResponse {
    pub fn created(link: PaymentLink) -> Self {
        Self {
            success: true,
            payment_url: link.payment_url,
            payment_request_id: Some(link.payment_request_id),
            fallback: None,
            message: None,
        }
    }

    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            success: true,
            payment_url: url.into(),
            payment_request_id: None,
            fallback: Some(true),
            message: Some(
                "Using fallback payment method due to API connectivity issues.".to_string(),
            ),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Seconds until the requester may submit again
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            cooldown: None,
        }
    }

    pub fn with_cooldown(mut self, secs: u64) -> Self {
        self.cooldown = Some(secs);
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn payment_error_to_response(err: PaymentError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = match &err {
        PaymentError::CooldownActive { retry_after_secs } => {
            ErrorResponse::new(err.to_string()).with_cooldown(*retry_after_secs)
        }
        PaymentError::AmountBelowMinimum { .. }
        | PaymentError::GatewayRejected { .. }
        | PaymentError::InvalidRequest(_) => ErrorResponse::new(err.to_string()),
        _ if err.is_gateway_unreachable() => ErrorResponse::new("Payment gateway unavailable"),
        _ => ErrorResponse::new("Server error while creating payment"),
    };
    response.details = err.details();

    (status, Json(response))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fest-pay",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Create a hosted payment request for a registration
#[instrument(skip(state, request), fields(amount = request.amount))]
pub async fn create_payment(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<PaymentRequest>,
) -> Result<Json<CreatePaymentResponse>, ApiError> {
    let policy = &state.policy;

    // Claim the cooldown slot before anything else, including validation
    let key = request.cooldown_key();
    let now = tokio::time::Instant::now().into_std();
    if let Err(remaining) = state.cooldowns.try_acquire(&key, now, policy.cooldown()).await {
        warn!("Cooldown active for {}", key);
        return Err(payment_error_to_response(PaymentError::CooldownActive {
            retry_after_secs: remaining_secs(remaining),
        }));
    }

    info!(
        "Creating payment request: amount={}, purpose={}, buyer_name={}, buyer_email={}",
        request.amount, request.purpose, request.buyer_name, request.buyer_email
    );

    policy
        .validate_amount(request.amount)
        .map_err(payment_error_to_response)?;

    if let Some(delay) = policy.delay_for(request.amount) {
        info!(
            "Delaying gateway call by {}ms for amount {}",
            delay.as_millis(),
            request.amount
        );
        tokio::time::sleep(delay).await;
    }

    let gateway_request = request.to_gateway_request(state.default_redirect_url());
    let gateway = &state.gateway;

    let result = retry(&policy.retry, PaymentError::is_retryable, |attempt| {
        debug!("Calling {} (attempt {})", gateway.provider_name(), attempt);
        gateway.create_payment_request(&gateway_request)
    })
    .await;

    match result {
        Ok(link) => {
            info!("Created payment request: {}", link.payment_request_id);
            Ok(Json(CreatePaymentResponse::created(link)))
        }
        Err(err)
            if err.is_gateway_unreachable()
                && policy.on_gateway_unavailable == GatewayUnavailablePolicy::Fallback =>
        {
            warn!(
                "Connection error detected ({}), providing fallback payment link",
                err
            );
            Ok(Json(CreatePaymentResponse::fallback(&policy.fallback_url)))
        }
        Err(err) => {
            error!("Failed to create payment request: {}", err);
            Err(payment_error_to_response(err))
        }
    }
}

/// Landing page the gateway redirects to after payment
pub async fn payment_success() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Payment Success - Heritage Fest 2025</title></head>
<body style="font-family: Arial, sans-serif; text-align: center; padding: 50px; background: linear-gradient(135deg, #FF6B35, #b6854d); color: white;">
    <div style="background: white; color: #333; padding: 40px; border-radius: 10px; max-width: 500px; margin: 0 auto; box-shadow: 0 10px 30px rgba(0,0,0,0.3);">
        <div style="font-size: 4rem; color: #28a745; margin-bottom: 20px;">🎉</div>
        <h1 style="color: #28a745;">Payment Successful!</h1>
        <p>Thank you for registering for Heritage Fest 2025!</p>
        <p>You will receive confirmation details via email and SMS shortly.</p>
        <a href="/" style="background: #FF6B35; color: white; padding: 15px 30px; border-radius: 5px; text-decoration: none; display: inline-block; margin-top: 20px;">Back to Heritage Fest</a>
    </div>
</body>
</html>
"#,
    )
}
