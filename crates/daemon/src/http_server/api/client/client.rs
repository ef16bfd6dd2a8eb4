use std::time::Duration;

use reqwest::{header::HeaderMap, header::HeaderValue, Client, StatusCode};
use url::Url;

use super::error::ApiError;
use super::ApiRequest;

/// Registry calls never wait on I/O, so anything slower is a dead daemon
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client);
        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(REQUEST_TIMEOUT)
            } else {
                ApiError::Reqwest(e)
            }
        })?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<T::Response>().await?),
            StatusCode::BAD_REQUEST => Err(ApiError::BadRequest(response.text().await?)),
            status => Err(ApiError::HttpStatus(status, response.text().await?)),
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
