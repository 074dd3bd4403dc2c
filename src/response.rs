//! Response wrapper returned by a transport.
//!
//! The body is kept as raw text. Interpreting it is up to the caller.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A response from the exchange.
///
/// # Examples
///
/// ```no_run
/// use bitforex_rest::{Client, Credentials};
///
/// # async fn example() -> Result<(), bitforex_rest::Error> {
/// let client = Client::builder()
///     .credentials(Credentials::from_env())
///     .build()?;
///
/// let response = client
///     .request()
///     .with_segment("fund/allAccount")
///     .finalize(false)
///     .await?;
///
/// println!("Status: {}", response.status);
/// println!("Request took {:?}", response.latency);
/// println!("Body: {}", response.raw_body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl Response {
    /// Creates a new `Response`.
    pub fn new(raw_body: String, status: StatusCode, headers: HeaderMap, latency: Duration) -> Self {
        Self {
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Returns `true` if the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns a reference to a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bitforex_rest::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new(
    ///     String::new(),
    ///     StatusCode::OK,
    ///     headers,
    ///     Duration::from_millis(100),
    /// );
    ///
    /// assert_eq!(
    ///     response.header("content-type").unwrap(),
    ///     "application/json"
    /// );
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl AsRef<str> for Response {
    fn as_ref(&self) -> &str {
        &self.raw_body
    }
}
