//! REST collaborator interface (spec §6) and a `reqwest`-backed
//! implementation.
//!
//! Authentication is explicitly out of scope (spec §1/§6: "Signed headers
//! produced by an external signer"); callers supply a [`RequestSigner`]
//! that decorates an outgoing request with whatever headers the exchange
//! requires.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{CancelResponse, NewOrder, OpenOrderEntry, OrderResponse, Snapshot};

/// Decorates an HTTP request with exchange authentication headers. Kept as
/// a trait so the signing scheme itself stays an external collaborator per
/// spec §6.
pub trait RequestSigner: Send + Sync {
    /// Adds whatever headers/signature the exchange requires to `builder`.
    fn sign(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder;
}

/// A signer that adds no headers, for use against a sandbox or in tests.
pub struct NullSigner;

impl RequestSigner for NullSigner {
    fn sign(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
    }
}

/// The REST surface the synchronizer and quote manager depend on (spec
/// §6): fetching the level-3 snapshot, listing currently open orders, and
/// posting/cancelling orders.
#[async_trait]
pub trait ExchangeRest: Send + Sync {
    /// Errors returned by this client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// `GET /products/BTC-USD/book?level=3`.
    async fn get_snapshot(&self) -> Result<Snapshot, Self::Error>;

    /// `GET /orders`, filtered to this account's open orders.
    async fn get_open_orders(&self) -> Result<Vec<OpenOrderEntry>, Self::Error>;

    /// `POST /orders`.
    async fn post_order(&self, order: NewOrder) -> Result<OrderResponse, Self::Error>;

    /// `DELETE /orders/{id}`. Returns `Ok(None)` on HTTP 200, `Ok(Some(..))`
    /// when the body carries a `message` describing a race outcome.
    async fn cancel_order(&self, order_id: &str) -> Result<CancelResponse, Self::Error>;
}

/// Base URLs for the REST API, split out so tests can point at a mock
/// server.
#[derive(Debug, Clone)]
pub struct RestEndpoints {
    /// Base URL, e.g. `http://api.exchange.coinbase.com`.
    pub base_url: String,
    /// Product id, e.g. `BTC-USD`.
    pub product_id: String,
}

/// [`ExchangeRest`] implementation backed by [`reqwest`].
///
/// `signer` is an `Arc` rather than a `Box` so the client stays `Clone` —
/// the supervisor holds one instance shared across the quote manager and
/// each session's synchronizer.
#[derive(Clone)]
pub struct ReqwestExchange {
    client: reqwest::Client,
    endpoints: RestEndpoints,
    signer: Arc<dyn RequestSigner>,
}

impl ReqwestExchange {
    /// Builds a client against `endpoints`, signing every request with
    /// `signer`.
    pub fn new(endpoints: RestEndpoints, signer: Arc<dyn RequestSigner>) -> Self {
        ReqwestExchange {
            client: reqwest::Client::new(),
            endpoints,
            signer,
        }
    }
}

#[async_trait]
impl ExchangeRest for ReqwestExchange {
    type Error = reqwest::Error;

    async fn get_snapshot(&self) -> Result<Snapshot, Self::Error> {
        let url = format!(
            "{}/products/{}/book",
            self.endpoints.base_url, self.endpoints.product_id
        );
        let builder = self.client.get(url).query(&[("level", "3")]);
        self.signer.sign(builder).send().await?.json().await
    }

    async fn get_open_orders(&self) -> Result<Vec<OpenOrderEntry>, Self::Error> {
        let url = format!("{}/orders", self.endpoints.base_url);
        let builder = self.client.get(url);
        self.signer.sign(builder).send().await?.json().await
    }

    async fn post_order(&self, order: NewOrder) -> Result<OrderResponse, Self::Error> {
        let url = format!("{}/orders", self.endpoints.base_url);
        let builder = self.client.post(url).json(&order);
        self.signer.sign(builder).send().await?.json().await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<CancelResponse, Self::Error> {
        let url = format!("{}/orders/{}", self.endpoints.base_url, order_id);
        let builder = self.client.delete(url);
        let response = self.signer.sign(builder).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // HTTP 200 is the only status a bare success (or a race-outcome
        // `message`) can come back on (spec §4.4/§7: "Anything else
        // aborts."). A non-200 status is surfaced as an unhandled message
        // regardless of what its body contains, so it cannot be mistaken
        // for one of the known race outcomes by coincidence.
        if !status.is_success() {
            return Ok(CancelResponse {
                message: Some(format!("HTTP {status}")),
            });
        }
        if bytes.is_empty() {
            return Ok(CancelResponse::default());
        }
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_| CancelResponse {
            message: Some(format!("unparseable body: {}", String::from_utf8_lossy(&bytes))),
        }))
    }
}
