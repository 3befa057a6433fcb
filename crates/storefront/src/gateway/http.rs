//! HTTP backend over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use common::{ErrorBody, OrderAccepted, OrderPayload, SubscribeRequest, SubscribeResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Backend;
use crate::error::GatewayError;

const ORDER_PATH: &str = "/api/order";
const SUBSCRIBE_PATH: &str = "/subscribe";

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Whole-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Backend reached over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` and decodes a 2xx response as `R`.
    ///
    /// Non-2xx responses become `Rejected`, carrying the `error` field of the
    /// body when it has one.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            let reason = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .map(|body| body.error);
            tracing::warn!(%url, status = status.as_u16(), ?reason, "backend rejected request");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn place_order(&self, order: &OrderPayload) -> Result<OrderAccepted, GatewayError> {
        let ack: OrderAccepted = self.post_json(ORDER_PATH, order).await?;
        if !ack.success {
            return Err(GatewayError::MalformedResponse(
                "acknowledgement without success".to_string(),
            ));
        }
        Ok(ack)
    }

    #[tracing::instrument(skip(self, request))]
    async fn subscribe(
        &self,
        request: &SubscribeRequest,
    ) -> Result<SubscribeResponse, GatewayError> {
        let response: SubscribeResponse = self.post_json(SUBSCRIBE_PATH, request).await?;
        if !response.success {
            return Err(GatewayError::MalformedResponse(
                "subscription without success".to_string(),
            ));
        }
        Ok(response)
    }
}
