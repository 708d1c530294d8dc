//! Shared HTTP plumbing

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::ApiError;
use crate::Result;

/// Error body shape used by the service for every non-2xx response
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// A `reqwest::Client` bound to the service's base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("adminboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(path)?))
    }

    /// Send a request and decode a 2xx JSON body into `T`.
    ///
    /// Any non-2xx status becomes [`ApiError::Status`] carrying the
    /// service's `message` field when the error body has one.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);

            tracing::debug!(
                path = %url,
                status = status.as_u16(),
                message = ?message,
                "Request rejected"
            );

            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(path = %url, status = status.as_u16(), "Request succeeded");

        Ok(serde_json::from_slice(&body)?)
    }
}
