//! HTTP implementations of the peer clients.

use std::time::Duration;

use async_trait::async_trait;
use common::{Product, ProductId, UserId, headers};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    CartClient, CartView, CatalogClient, ClientError, IdentityClient, ProductResponse, Result,
};

/// Connection settings for one peer service.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the peer, e.g. `"http://catalog:8082"`.
    pub base_url: String,

    /// Per-request timeout covering connect, send and body read.
    pub timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn build_client(&self, service: &'static str) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::unavailable(service, format!("client setup failed: {e}")))
    }
}

fn transport_error(service: &'static str, error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::unavailable(service, "request timed out")
    } else {
        ClientError::unavailable(service, error.to_string())
    }
}

/// Maps a non-success response to an `Unavailable` error, keeping the body for context.
async fn failure(service: &'static str, response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    ClientError::unavailable(service, format!("unexpected status {status}: {text}"))
}

async fn json_body<T: DeserializeOwned>(service: &'static str, response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::unavailable(service, format!("malformed response body: {e}")))
}

/// Catalog client speaking to `GET /products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    config: HttpClientConfig,
    http: Client,
}

impl HttpCatalogClient {
    const SERVICE: &'static str = "catalog";

    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let http = config.build_client(Self::SERVICE)?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[tracing::instrument(skip(self), fields(service = "catalog"))]
    async fn get_product(&self, id: ProductId) -> Result<Product> {
        let url = format!("{}/products/{id}", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(Self::SERVICE, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ClientError::not_found("product", id)),
            status if status.is_success() => {
                let body: ProductResponse = json_body(Self::SERVICE, response).await?;
                Ok(body.into())
            }
            _ => Err(failure(Self::SERVICE, response).await),
        }
    }
}

/// Cart client speaking to `GET /cart/{userId}`.
#[derive(Debug, Clone)]
pub struct HttpCartClient {
    config: HttpClientConfig,
    http: Client,
}

impl HttpCartClient {
    const SERVICE: &'static str = "cart";

    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let http = config.build_client(Self::SERVICE)?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl CartClient for HttpCartClient {
    #[tracing::instrument(skip(self), fields(service = "cart"))]
    async fn get_cart(&self, user_id: UserId) -> Result<Option<CartView>> {
        let url = format!("{}/cart/{user_id}", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .header(headers::USER_ID, user_id.to_string())
            .send()
            .await
            .map_err(|e| transport_error(Self::SERVICE, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => json_body(Self::SERVICE, response).await.map(Some),
            _ => Err(failure(Self::SERVICE, response).await),
        }
    }
}

/// Identity client speaking to `GET /auth/{id}/exists`.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    config: HttpClientConfig,
    http: Client,
}

impl HttpIdentityClient {
    const SERVICE: &'static str = "identity";

    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let http = config.build_client(Self::SERVICE)?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    #[tracing::instrument(skip(self), fields(service = "identity"))]
    async fn user_exists(&self, user_id: UserId) -> Result<bool> {
        let url = format!("{}/auth/{user_id}/exists", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(Self::SERVICE, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => json_body(Self::SERVICE, response).await,
            _ => Err(failure(Self::SERVICE, response).await),
        }
    }
}
