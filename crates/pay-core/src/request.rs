//! # Payment Request Types
//!
//! Inbound registration payload and the gateway-facing request/result types.

use serde::{Deserialize, Deserializer, Serialize};

/// Gateway-imposed minimum amount, in whole rupees
pub const MIN_AMOUNT: i64 = 9;

/// A registration payment submitted by the site's form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount in whole currency units
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: i64,

    /// What the payment is for (shown on the hosted checkout)
    pub purpose: String,

    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,

    /// Where the gateway sends the buyer afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl PaymentRequest {
    /// Key used to throttle repeated submissions from one buyer
    pub fn cooldown_key(&self) -> String {
        format!("{}-{}", self.buyer_email, self.buyer_phone)
    }

    /// Build the gateway payload, falling back to `default_redirect`
    pub fn to_gateway_request(&self, default_redirect: &str) -> GatewayPaymentRequest {
        let redirect_url = match self.redirect_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => default_redirect.to_string(),
        };

        GatewayPaymentRequest {
            purpose: self.purpose.clone(),
            amount: self.amount,
            buyer_name: self.buyer_name.clone(),
            email: self.buyer_email.clone(),
            phone: self.buyer_phone.clone(),
            redirect_url,
            send_email: true,
            send_sms: true,
            allow_repeated_payments: false,
        }
    }
}

/// Payment request as the gateway expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayPaymentRequest {
    pub purpose: String,
    pub amount: i64,
    pub buyer_name: String,
    pub email: String,
    pub phone: String,
    pub redirect_url: String,
    pub send_email: bool,
    pub send_sms: bool,
    pub allow_repeated_payments: bool,
}

/// Hosted checkout created by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Checkout URL (redirect the buyer here)
    pub payment_url: String,
    /// Gateway's payment request identifier
    pub payment_request_id: String,
}

/// Accepts `200`, `200.0` or `"200"`; form bodies only ever carry strings.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let from_float = |f: f64| -> Result<i64, D::Error> {
        if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 {
            Ok(f as i64)
        } else {
            Err(serde::de::Error::custom(format!(
                "amount must be a whole number, got {}",
                f
            )))
        }
    };

    match Amount::deserialize(deserializer)? {
        Amount::Int(i) => Ok(i),
        Amount::Float(f) => from_float(f),
        Amount::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Ok(i),
                Err(_) => s
                    .parse::<f64>()
                    .map_err(|_| serde::de::Error::custom(format!("invalid amount: {:?}", s)))
                    .and_then(from_float),
            }
        }
    }
}
