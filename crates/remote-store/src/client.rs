//! HTTP client for the shopping-list product service.
//!
//! Every response goes through one decoding step: try the `{success, data}`
//! envelope, fall back to the bare payload, otherwise fail.

use async_trait::async_trait;
use std::borrow::Cow;
use log::{debug, error, warn};
use serde::de::{DeserializeOwned, IgnoredAny};

use shoplist_core::items::{Item, ItemId, ItemUpdate, NewItem, RemoteItemStore};
use shoplist_core::sync::RemoteFailure;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::types::{Envelope, ProductDto, ProductPayload, ResponseShape};

const MAX_LOG_BODY_CHARS: usize = 512;

/// First `MAX_LOG_BODY_CHARS` characters of `body`, marked when cut.
fn body_preview(body: &str) -> Cow<'_, str> {
    match body.char_indices().nth(MAX_LOG_BODY_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &body[..cut])),
        None => Cow::Borrowed(body),
    }
}

/// Client for `/api/products`.
#[derive(Debug, Clone)]
pub struct ShoppingApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ShoppingApiClient {
    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("Service answered {}", status);
        } else {
            debug!("Service answered {} with: {}", status, body_preview(body));
        }
    }

    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    fn product_url(&self, id: ItemId) -> String {
        format!("{}/api/products/{}", self.base_url, id)
    }

    /// Reads the body and rejects non-2xx statuses with the raw body.
    async fn read_body(response: reqwest::Response) -> Result<(reqwest::StatusCode, String)> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            if let Some(reason) = serde_json::from_str::<Envelope<IgnoredAny>>(&body)
                .ok()
                .and_then(|envelope| envelope.rejection_reason())
            {
                warn!("Service answered {}: {}", status, reason);
            }
            return Err(ApiError::api(status.as_u16(), body));
        }
        Ok((status, body))
    }

    /// Unwraps an envelope or bare payload.
    ///
    /// `Ok(None)` means the service acknowledged the call without a payload:
    /// an empty body or an envelope with `success: true` and no `data`.
    fn decode<T: DeserializeOwned>(
        status: reqwest::StatusCode,
        body: &str,
    ) -> Result<Option<T>> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        let shape = serde_json::from_str::<ResponseShape<T>>(body).map_err(|e| {
            error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body, e
            );
            ApiError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })?;

        match shape {
            ResponseShape::Bare(payload) => Ok(Some(payload)),
            ResponseShape::Envelope(envelope) if envelope.success => Ok(envelope.data),
            ResponseShape::Envelope(envelope) => {
                warn!(
                    "Service rejected request: {}",
                    envelope
                        .rejection_reason()
                        .unwrap_or_else(|| "no reason given".to_string())
                );
                Err(ApiError::api(status.as_u16(), body))
            }
        }
    }

    /// `GET /api/products`
    pub async fn list_products(&self) -> Result<Vec<ProductDto>> {
        let url = self.products_url();
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let (status, body) = Self::read_body(response).await?;
        Self::decode::<Vec<ProductDto>>(status, &body)?
            .ok_or_else(|| ApiError::api(status.as_u16(), "Response carried no product list"))
    }

    /// `POST /api/products`
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<ProductDto> {
        let url = self.products_url();
        debug!("POST {} name={}", url, payload.name);
        let response = self.client.post(&url).json(payload).send().await?;
        let (status, body) = Self::read_body(response).await?;
        Self::decode::<ProductDto>(status, &body)?
            .ok_or_else(|| ApiError::api(status.as_u16(), "Response carried no created product"))
    }

    /// `PUT /api/products/{id}`. `None` when the service does not echo the product.
    pub async fn update_product(
        &self,
        id: ItemId,
        payload: &ProductPayload,
    ) -> Result<Option<ProductDto>> {
        let url = self.product_url(id);
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(payload).send().await?;
        let (status, body) = Self::read_body(response).await?;
        Self::decode::<ProductDto>(status, &body)
    }

    /// `DELETE /api/products/{id}`
    pub async fn delete_product(&self, id: ItemId) -> Result<()> {
        let url = self.product_url(id);
        debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        let (status, body) = Self::read_body(response).await?;
        Self::decode::<IgnoredAny>(status, &body)?;
        Ok(())
    }
}

#[async_trait]
impl RemoteItemStore for ShoppingApiClient {
    async fn list(&self) -> std::result::Result<Vec<Item>, RemoteFailure> {
        let products = self.list_products().await?;
        Ok(products.into_iter().map(Item::from).collect())
    }

    async fn create(&self, item: NewItem) -> std::result::Result<Item, RemoteFailure> {
        let payload = ProductPayload::from(item);
        Ok(self.create_product(&payload).await?.into())
    }

    async fn update(
        &self,
        id: ItemId,
        update: ItemUpdate,
    ) -> std::result::Result<Item, RemoteFailure> {
        let payload = ProductPayload::for_update(id, update.clone());
        match self.update_product(id, &payload).await? {
            Some(product) => Ok(product.into()),
            None => Ok(update.into_item(id)),
        }
    }

    async fn delete(&self, id: ItemId) -> std::result::Result<(), RemoteFailure> {
        Ok(self.delete_product(id).await?)
    }
}
