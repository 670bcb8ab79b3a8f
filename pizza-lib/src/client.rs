//! HTTP client for the order endpoint

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::FormConfig;
use crate::error::ApiError;
use crate::model::{OrderResponse, OrderValues};

/// Something that accepts a finished order.
///
/// [`OrderClient`] sends it over HTTP; the form controller only depends on
/// this trait.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Places one order. Exactly one attempt, no retry.
    async fn place_order(&self, order: &OrderValues) -> Result<OrderResponse, ApiError>;
}

/// Client that POSTs orders as JSON.
///
/// This client is cheap to clone (uses `Arc` internally) and can be moved
/// into spawned tasks.
///
/// # Example
///
/// ```ignore
/// use pizza_lib::OrderClient;
///
/// let client = OrderClient::builder()
///     .url("http://localhost:9009/api/order")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let reply = client.place_order(&values).await?;
/// println!("{}", reply.message);
/// ```
#[derive(Clone)]
pub struct OrderClient {
    inner: Arc<OrderClientInner>,
}

struct OrderClientInner {
    endpoint: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

/// Body of a reply, success or error. Every part of it is optional.
#[derive(Debug, Default, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    message: Option<String>,
}

impl OrderClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> OrderClientBuilder<Missing> {
        OrderClientBuilder::new()
    }

    /// Builds a client from a [`FormConfig`].
    pub fn from_config(config: &FormConfig) -> Result<Self, ApiError> {
        let mut builder = Self::builder().url(config.endpoint.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder.build()
    }

    /// Returns the endpoint orders are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    async fn send(&self, order: &OrderValues) -> Result<OrderResponse, ApiError> {
        let mut request = self
            .inner
            .http_client
            .post(self.inner.endpoint.clone())
            .json(order);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        debug!(
            "POST {} ({} toppings)",
            self.inner.endpoint,
            order.toppings.len()
        );

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        let message = reply_message(&body);

        if status.is_success() {
            Ok(OrderResponse {
                message: message.unwrap_or_default(),
            })
        } else {
            Err(ApiError::Http {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

/// The `message` of a reply body, if the body is JSON and carries one.
fn reply_message(body: &str) -> Option<String> {
    match serde_json::from_str::<ReplyBody>(body) {
        Ok(reply) => reply.message,
        Err(e) => {
            if !body.trim().is_empty() {
                debug!("Reply body has no usable message: {}", e);
            }
            None
        }
    }
}

#[async_trait]
impl OrderSink for OrderClient {
    async fn place_order(&self, order: &OrderValues) -> Result<OrderResponse, ApiError> {
        let result = self.send(order).await;
        match &result {
            Ok(reply) => info!("Order accepted: {}", reply.message),
            Err(e) => warn!("Order failed: {}", e),
        }
        result
    }
}

impl std::fmt::Debug for OrderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`OrderClient`].
///
/// Uses the typestate pattern so `build` is only available once the endpoint
/// URL has been set.
pub struct OrderClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl OrderClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the order endpoint URL.
    pub fn url(self, url: impl Into<String>) -> OrderClientBuilder<Set<String>> {
        OrderClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for OrderClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> OrderClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl OrderClientBuilder<Set<String>> {
    /// Builds the [`OrderClient`].
    pub fn build(self) -> Result<OrderClient, ApiError> {
        let endpoint = Url::parse(&self.url.0)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(OrderClient {
            inner: Arc::new(OrderClientInner {
                endpoint,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_bad_url() {
        let err = OrderClient::builder().url("::nope::").build().unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_from_config() {
        let config = FormConfig::default().with_timeout(Duration::from_secs(3));
        let client = OrderClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:9009/api/order");
        assert_eq!(client.inner.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_reply_message_is_optional() {
        assert_eq!(
            reply_message(r#"{"message":"Out of stock"}"#).as_deref(),
            Some("Out of stock")
        );
        assert_eq!(reply_message(r#"{"error":"x"}"#), None);
        assert_eq!(reply_message(r#"{"message":null}"#), None);
        assert_eq!(reply_message(r#"{"message":42}"#), None);
        assert_eq!(reply_message("<html>"), None);
        assert_eq!(reply_message(""), None);
    }
}
