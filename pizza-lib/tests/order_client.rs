//! Integration tests for the order client and the form controller.
//!
//! Each test binds a one-shot HTTP server on 127.0.0.1 that answers with a
//! canned status and body and hands back the request body it received.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use pizza_lib::error::ApiError;
use pizza_lib::form::{DEFAULT_SUCCESS_MESSAGE, GENERIC_FAILURE_MESSAGE, SubmitRejected};
use pizza_lib::{FieldChange, FormController, OrderClient, OrderSink, OrderValues};

/// What the fake endpoint saw.
struct Received {
    method: String,
    path: String,
    content_type: Option<String>,
    body: serde_json::Value,
}

/// Serves exactly one request, replying with `status` and `reply`.
async fn serve_once(
    status: StatusCode,
    reply: &'static str,
) -> (String, oneshot::Receiver<Received>) {
    serve_once_after(Duration::ZERO, status, reply).await
}

/// Like [`serve_once`], but holds the reply back for `delay`.
async fn serve_once_after(
    delay: Duration,
    status: StatusCode,
    reply: &'static str,
) -> (String, oneshot::Receiver<Received>) {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local address");
    let url = format!("http://{}/api/order", addr);

    let (tx, rx) = oneshot::channel::<Received>();
    let tx = Arc::new(Mutex::new(Some(tx)));

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("Accept failed");
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<Incoming>| {
            let tx = tx.clone();
            async move {
                let method = req.method().to_string();
                let path = req.uri().path().to_string();
                let content_type = req
                    .headers()
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let bytes = req
                    .into_body()
                    .collect()
                    .await
                    .map(|b| b.to_bytes())
                    .unwrap_or_default();
                let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

                if let Some(sender) = tx.lock().unwrap().take() {
                    let _ = sender.send(Received {
                        method,
                        path,
                        content_type,
                        body,
                    });
                }

                tokio::time::sleep(delay).await;

                Ok::<_, Infallible>(
                    Response::builder()
                        .status(status)
                        .header("Content-Type", "application/json")
                        .body(Full::new(Bytes::from(reply)))
                        .unwrap(),
                )
            }
        });

        let _ = http1::Builder::new().serve_connection(io, service).await;
    });

    (url, rx)
}

fn client(url: &str) -> OrderClient {
    client_with_timeout(url, Duration::from_secs(5))
}

fn client_with_timeout(url: &str, timeout: Duration) -> OrderClient {
    OrderClient::builder()
        .url(url)
        .timeout(timeout)
        .build()
        .expect("Failed to build client")
}

fn order() -> OrderValues {
    let mut values = OrderValues {
        name: "Alice Smith".to_string(),
        size: "L".to_string(),
        ..Default::default()
    };
    values.set_topping("1", true);
    values.set_topping("3", true);
    values
}

async fn filled_form(name: &str, size: &str, toppings: &[&str]) -> FormController {
    let mut form = FormController::new();
    form.change_and_validate(FieldChange::Name(name.to_string()))
        .await;
    form.change_and_validate(FieldChange::Size(size.to_string()))
        .await;
    for id in toppings {
        form.change_and_validate(FieldChange::Topping {
            id: id.to_string(),
            checked: true,
        })
        .await;
    }
    form
}

// =============================================================================
// OrderClient
// =============================================================================

mod client {
    use super::*;

    #[tokio::test]
    async fn test_posts_json_payload() {
        let (url, rx) = serve_once(StatusCode::CREATED, r#"{"message":"Order placed"}"#).await;

        let reply = client(&url).place_order(&order()).await.unwrap();
        assert_eq!(reply.message, "Order placed");

        let received = rx.await.unwrap();
        assert_eq!(received.method, "POST");
        assert_eq!(received.path, "/api/order");
        assert_eq!(received.content_type.as_deref(), Some("application/json"));
        assert_eq!(
            received.body,
            serde_json::json!({ "fullName": "Alice Smith", "size": "L", "toppings": ["1", "3"] })
        );
    }

    #[tokio::test]
    async fn test_error_with_message() {
        let (url, _rx) = serve_once(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Out of stock"}"#).await;

        let err = client(&url).place_order(&order()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.server_message(), Some("Out of stock"));
    }

    #[tokio::test]
    async fn test_error_without_body() {
        let (url, _rx) = serve_once(StatusCode::INTERNAL_SERVER_ERROR, "").await;

        let err = client(&url).place_order(&order()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn test_success_with_garbage_body() {
        let (url, _rx) = serve_once(StatusCode::OK, "not json").await;

        let reply = client(&url).place_order(&order()).await.unwrap();
        assert_eq!(reply.message, "");
    }

    #[tokio::test]
    async fn test_success_with_null_message() {
        let (url, _rx) = serve_once(StatusCode::CREATED, r#"{"message":null}"#).await;

        let reply = client(&url).place_order(&order()).await.unwrap();
        assert_eq!(reply.message, "");
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let (url, _rx) =
            serve_once_after(Duration::from_secs(2), StatusCode::CREATED, "{}").await;

        let err = client_with_timeout(&url, Duration::from_millis(100))
            .place_order(&order())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout(t) if t == Duration::from_millis(100)));
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/api/order", addr))
            .place_order(&order())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.server_message(), None);
    }
}

// =============================================================================
// FormController over HTTP
// =============================================================================

mod form {
    use super::*;

    #[tokio::test]
    async fn test_order_placed() {
        let (url, rx) = serve_once(StatusCode::CREATED, r#"{"message":"Order placed"}"#).await;
        let mut form = filled_form("Alice Smith", "L", &["1", "3"]).await;
        assert!(form.can_submit());

        form.submit(&client(&url)).await.unwrap();

        assert_eq!(form.outcome().success(), Some("Order placed"));
        assert_eq!(form.outcome().failure(), None);
        assert_eq!(form.values(), &OrderValues::default());
        assert!(!form.can_submit());
        assert_eq!(rx.await.unwrap().body["fullName"], "Alice Smith");
    }

    #[tokio::test]
    async fn test_accepted_without_message() {
        for reply in [r#"{"message":null}"#, "not json", ""] {
            let (url, _rx) = serve_once(StatusCode::CREATED, reply).await;
            let mut form = filled_form("Alice Smith", "L", &["1"]).await;

            form.submit(&client(&url)).await.unwrap();

            assert_eq!(form.outcome().success(), Some(DEFAULT_SUCCESS_MESSAGE));
            assert_eq!(form.values(), &OrderValues::default());
        }
    }

    #[tokio::test]
    async fn test_out_of_stock() {
        let (url, _rx) = serve_once(StatusCode::CONFLICT, r#"{"message":"Out of stock"}"#).await;
        let mut form = filled_form("Alice Smith", "L", &["1"]).await;
        let before = form.values().clone();

        form.submit(&client(&url)).await.unwrap();

        assert_eq!(form.outcome().failure(), Some("Out of stock"));
        assert_eq!(form.outcome().success(), None);
        assert_eq!(form.values(), &before);
    }

    #[tokio::test]
    async fn test_unreachable_server_uses_fallback() {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut form = filled_form("Alice", "S", &[]).await;
        form.submit(&client(&format!("http://{}/api/order", addr)))
            .await
            .unwrap();

        assert_eq!(form.outcome().failure(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(form.values().name, "Alice");
    }

    #[tokio::test]
    async fn test_timeout_uses_fallback() {
        let (url, _rx) =
            serve_once_after(Duration::from_secs(2), StatusCode::CREATED, "{}").await;
        let mut form = filled_form("Alice", "M", &["2"]).await;
        let before = form.values().clone();

        form.submit(&client_with_timeout(&url, Duration::from_millis(100)))
            .await
            .unwrap();

        assert_eq!(form.outcome().failure(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(form.values(), &before);
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let mut form = filled_form("Al", "M", &[]).await;
        let sink = client("http://127.0.0.1:9/api/order");

        assert_eq!(form.submit(&sink).await, Err(SubmitRejected::Invalid));
        assert!(form.outcome().is_none());
        assert!(form.errors().name.contains("at least 3 characters"));
    }
}
