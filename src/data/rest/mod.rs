//! HTTP implementation of [`BoatDataGateway`].
//!
//! The data service exposes a small REST surface under a configurable base
//! URL:
//!
//! - `GET  {base}/boats?boatTypeId=<id>` lists boats (empty id lists all)
//! - `GET  {base}/boats/{id}/reviews` lists reviews for one boat
//! - `PATCH {base}/records/{id}` applies a field-level update

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::DataError;
use super::models::{BoatRecord, BoatTypeFilter, RecordId, RecordUpdate, ReviewRecord};
use super::BoatDataGateway;

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for [`HttpBoatGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpGatewayConfig {
    /// Base URL of the data service REST surface.
    pub base_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    /// Constructs configuration for the given base URL with the default
    /// timeout and no token.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `reqwest`-backed gateway.
#[derive(Debug, Clone)]
pub struct HttpBoatGateway {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBoatGateway {
    /// Builds a gateway from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidUrl`] when the base URL cannot be parsed
    /// or cannot carry path segments, and [`DataError::Configuration`] when
    /// the HTTP client cannot be constructed.
    pub fn new(config: &HttpGatewayConfig) -> Result<Self, DataError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|error| DataError::InvalidUrl(format!("{}: {error}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(DataError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| DataError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DataError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                DataError::InvalidUrl(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, DataError> {
        let response = self
            .authorise(request)
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, DataError> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|error| DataError::Decode {
                message: format!("{operation}: {error}"),
            })
    }
}

#[async_trait]
impl BoatDataGateway for HttpBoatGateway {
    async fn query_boats(&self, filter: &BoatTypeFilter) -> Result<Vec<BoatRecord>, DataError> {
        let url = self.endpoint(&["boats"])?;
        tracing::debug!("querying boats for {}", filter.label());
        let request = self
            .client
            .get(url)
            .query(&[("boatTypeId", filter.query_value())]);
        self.fetch_json("boats", request).await
    }

    async fn query_reviews(&self, boat_id: &RecordId) -> Result<Vec<ReviewRecord>, DataError> {
        let url = self.endpoint(&["boats", boat_id.as_str(), "reviews"])?;
        tracing::debug!("querying reviews for boat {boat_id}");
        self.fetch_json("reviews", self.client.get(url)).await
    }

    async fn update_record(&self, update: &RecordUpdate) -> Result<(), DataError> {
        let url = self.endpoint(&["records", update.id.as_str()])?;
        tracing::debug!("updating record {}", update.id);
        self.send("update", self.client.patch(url).json(update))
            .await
            .map(|_| ())
    }
}

/// Error payloads come either as a single object or as a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Many(Vec<ApiErrorMessage>),
    One(ApiErrorMessage),
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

fn service_message(status: StatusCode, body: &str) -> String {
    let parsed = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody::One(error)) => Some(error.message),
        Ok(ApiErrorBody::Many(errors)) => errors.into_iter().next().map(|error| error.message),
        Err(_) => None,
    };

    parsed.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        } else {
            trimmed.to_owned()
        }
    })
}

fn map_status_error(status: StatusCode, body: &str) -> DataError {
    let message = service_message(status, body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        DataError::Authentication { message }
    } else {
        DataError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

fn map_transport_error(operation: &str, error: &reqwest::Error) -> DataError {
    if error.is_timeout() {
        DataError::Network {
            message: format!("{operation} request timed out"),
        }
    } else {
        DataError::Network {
            message: format!("{operation}: {error}"),
        }
    }
}

#[cfg(test)]
mod tests;
