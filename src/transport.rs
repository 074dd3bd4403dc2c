//! HTTP transport used to dispatch signed requests.
//!
//! [`Transport`] is the seam between request building and the network.
//! [`HttpTransport`] is the default, backed by `reqwest`.

use crate::{metadata::DispatchRequest, Error, Response, Result};
use http::{header::CONTENT_TYPE, HeaderMap};
use std::future::Future;
use std::time::{Duration, Instant};

/// Sends a signed request and returns the exchange's response.
///
/// Implementations report network failures and non-2xx responses as errors.
/// The request builder passes those errors through untouched.
pub trait Transport: Send + Sync {
    /// Dispatches `request`.
    fn send(&self, request: &DispatchRequest) -> impl Future<Output = Result<Response>> + Send;
}

/// The default transport: form-encoded bodies over a pooled `reqwest::Client`.
///
/// The body is the canonical query string (see [`DispatchRequest::form_body`]),
/// so it carries the exact bytes that were signed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport with the given default headers and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(default_headers: HeaderMap, timeout: Option<Duration>) -> Result<Self> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http_client,
            default_headers,
            timeout,
        })
    }

    async fn execute(&self, request: &DispatchRequest) -> Result<Response> {
        let start_time = Instant::now();

        tracing::debug!(
            method = %request.method,
            url = %request.endpoint,
            params = request.params.len(),
            "Executing HTTP request"
        );

        let mut builder = self
            .http_client
            .request(request.method.into(), request.endpoint.clone());

        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(request.form_body())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let raw_response = response.text().await.unwrap_or_default();

            if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Client error (4xx)"
                );
            } else if status.is_server_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            }

            return Err(Error::HttpError {
                status,
                raw_response,
                headers,
            });
        }

        let raw_body = response.text().await.map_err(map_reqwest_error)?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        Ok(Response::new(raw_body, status, headers, latency))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &DispatchRequest) -> impl Future<Output = Result<Response>> + Send {
        self.execute(request)
    }
}

fn map_reqwest_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(error)
    }
}
