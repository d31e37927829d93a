//! Body extractor accepting either JSON or URL-encoded form submissions.

use crate::handlers::{payment_error_to_response, ApiError};
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use pay_core::PaymentError;
use serde::de::DeserializeOwned;

/// Deserializes the body as a form when the request says so, JSON otherwise
#[derive(Debug, Clone)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

fn invalid_body(details: String) -> ApiError {
    payment_error_to_response(PaymentError::InvalidRequest(details))
}
