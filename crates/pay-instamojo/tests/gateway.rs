use pay_core::{
    retry, Backoff, GatewayPaymentRequest, NetworkErrorKind, PaymentError, PaymentGateway,
    RetryPolicy,
};
use pay_instamojo::{InstamojoConfig, InstamojoGateway};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAYMENT_REQUESTS: &str = "/api/1.1/payment-requests/";

fn gateway_for(server: &MockServer) -> InstamojoGateway {
    let config = InstamojoConfig::new("test_api_key", "test_auth_token")
        .with_api_base_url(server.uri());
    InstamojoGateway::new(config).unwrap()
}

fn request(amount: i64) -> GatewayPaymentRequest {
    GatewayPaymentRequest {
        purpose: "Heritage Fest 2025 - Group".to_string(),
        amount,
        buyer_name: "Ravi Kumar".to_string(),
        email: "ravi@example.com".to_string(),
        phone: "9123456780".to_string(),
        redirect_url: "http://localhost:3000/payment-success".to_string(),
        send_email: true,
        send_sms: true,
        allow_repeated_payments: false,
    }
}

#[tokio::test]
async fn creates_payment_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PAYMENT_REQUESTS))
        .and(header("X-Api-Key", "test_api_key"))
        .and(header("X-Auth-Token", "test_auth_token"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("amount=500"))
        .and(body_string_contains("email=ravi%40example.com"))
        .and(body_string_contains("send_sms=True"))
        .and(body_string_contains("allow_repeated_payments=false"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "payment_request": {
                "id": "d66cb29dd059482e8072999f995c4eef",
                "longurl": "https://www.instamojo.com/@fest/d66cb29dd059482e8072999f995c4eef",
                "status": "Pending"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = gateway_for(&server)
        .create_payment_request(&request(500))
        .await
        .unwrap();

    assert_eq!(link.payment_request_id, "d66cb29dd059482e8072999f995c4eef");
    assert_eq!(
        link.payment_url,
        "https://www.instamojo.com/@fest/d66cb29dd059482e8072999f995c4eef"
    );
}

#[tokio::test]
async fn success_false_is_rejected_with_raw_payload() {
    let server = MockServer::start().await;
    let payload = json!({
        "success": false,
        "message": { "phone": ["Phone number is invalid."] }
    });

    Mock::given(method("POST"))
        .and(path(PAYMENT_REQUESTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .create_payment_request(&request(500))
        .await
        .unwrap_err();

    match err {
        PaymentError::GatewayRejected { details, .. } => assert_eq!(details, payload),
        other => panic!("expected GatewayRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn http_error_status_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PAYMENT_REQUESTS))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"success": false, "message": "Invalid token"})),
        )
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .create_payment_request(&request(500))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 500);
    match err {
        PaymentError::GatewayHttp { status, details, .. } => {
            assert_eq!(status, 401);
            assert_eq!(details["message"], "Invalid token");
        }
        other => panic!("expected GatewayHttp, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_success_body_is_serialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PAYMENT_REQUESTS))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .create_payment_request(&request(500))
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::Serialization(_)));
}

#[tokio::test]
async fn slow_gateway_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PAYMENT_REQUESTS))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = InstamojoConfig::new("k", "t")
        .with_api_base_url(server.uri())
        .with_timeout(Duration::from_millis(50));
    let gateway = InstamojoGateway::new(config).unwrap();

    let err = gateway.create_payment_request(&request(500)).await.unwrap_err();

    assert!(matches!(
        err,
        PaymentError::Network {
            kind: NetworkErrorKind::Timeout,
            ..
        }
    ));
    assert!(err.is_gateway_unreachable());
    assert!(!err.is_retryable());
}

// =============================================================================
// Raw socket failures
// =============================================================================

#[derive(Clone, Copy)]
enum Hangup {
    /// RST via SO_LINGER 0
    Reset,
    /// Plain FIN with no response written
    Close,
}

/// Accepts connections, reads one full request, then hangs up without answering.
/// Returns the base URL and the number of accepted connections.
async fn hangup_server(hangup: Hangup) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let stream = read_request(stream).await;
                if let Hangup::Reset = hangup {
                    #[allow(deprecated)]
                    stream.set_linger(Some(Duration::ZERO)).unwrap();
                }
                drop(stream);
            });
        }
    });

    (format!("http://{}", addr), accepted)
}

async fn read_request(mut stream: TcpStream) -> TcpStream {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return stream;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return stream;
            }
        }
    }
}

fn gateway_at(base_url: String) -> InstamojoGateway {
    let config = InstamojoConfig::new("k", "t").with_api_base_url(base_url);
    InstamojoGateway::new(config).unwrap()
}

#[tokio::test]
async fn hard_reset_is_connection_reset() {
    let (base_url, accepted) = hangup_server(Hangup::Reset).await;

    let err = gateway_at(base_url)
        .create_payment_request(&request(500))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            PaymentError::Network {
                kind: NetworkErrorKind::ConnectionReset,
                ..
            }
        ),
        "unexpected error: {:?}",
        err
    );
    assert!(err.is_retryable());
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn close_without_response_is_connection_reset() {
    let (base_url, _) = hangup_server(Hangup::Close).await;

    let err = gateway_at(base_url)
        .create_payment_request(&request(500))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            PaymentError::Network {
                kind: NetworkErrorKind::ConnectionReset,
                ..
            }
        ),
        "unexpected error: {:?}",
        err
    );
    assert!(err.is_gateway_unreachable());
}

#[tokio::test]
async fn repeated_resets_use_every_attempt() {
    let (base_url, accepted) = hangup_server(Hangup::Reset).await;
    let gateway = gateway_at(base_url);
    let req = request(500);

    let result = retry(
        &RetryPolicy::new(3, Backoff::None),
        PaymentError::is_retryable,
        |_| gateway.create_payment_request(&req),
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.is_gateway_unreachable());
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
}
