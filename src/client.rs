//! Client configuration and the entry point for building requests.
//!
//! A [`Client`] holds everything that stays fixed across requests: the API
//! base URL, credentials, and the transport. Use [`ClientBuilder`] to create
//! one, then call [`Client::request`] for each API call.

use crate::{
    credentials::Credentials,
    request::RequestBuilder,
    transport::{HttpTransport, Transport},
    Error, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Production REST API root.
pub const BASE_API_ENDPOINT: &str = "https://api.bitforex.com";

/// Fixed path prefix every request starts with.
pub const PATH_PREFIX: [&str; 2] = ["api", "v1"];

/// Shared configuration for signed exchange requests.
///
/// The client is cheap to clone and can be shared across tasks. Each
/// request gets its own [`RequestBuilder`].
///
/// # Examples
///
/// ```no_run
/// use bitforex_rest::{Client, Credentials, Params};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), bitforex_rest::Error> {
/// let client = Client::builder()
///     .credentials(Credentials::from_env())
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let response = client
///     .request()
///     .build_request("POST", "trade/placeOrder", Params::new()
///         .with("symbol", "coin-usdt-btc")
///         .with("price", 1000.5)
///         .with("amount", 1)
///         .with("tradeType", 1))?
///     .finalize(false)
///     .await?;
/// println!("{}", response.raw_body);
/// # Ok(())
/// # }
/// ```
pub struct Client<T = HttpTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    api_base: Url,
    credentials: Credentials,
    transport: T,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: Transport> Client<T> {
    /// Starts a new request: `GET /api/v1` with a fresh nonce and the
    /// configured access key.
    pub fn request(&self) -> RequestBuilder<'_, T> {
        RequestBuilder::new(self)
    }

    /// The scheme and host every endpoint is built on.
    pub fn api_base(&self) -> &Url {
        &self.inner.api_base
    }

    /// The configured credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// The transport requests are dispatched through.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use bitforex_rest::{ClientBuilder, Credentials};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), bitforex_rest::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.bitforex.com")?
///     .credentials(Credentials::new("access", "secret"))
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    credentials: Credentials,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// The base URL defaults to [`BASE_API_ENDPOINT`] and no credentials
    /// are set.
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: Credentials::default(),
            default_headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Sets the API root (scheme and host).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or carries a path, query or
    /// fragment. Endpoint paths always start at `/api/v1`.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        if url.cannot_be_a_base()
            || url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return Err(Error::ConfigurationError(format!(
                "Base URL must be a scheme and host only: {}",
                url
            )));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the credentials used to sign requests.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds a `Client` that dispatches through [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let transport = HttpTransport::new(self.default_headers.clone(), self.timeout)?;
        self.build_with_transport(transport)
    }

    /// Builds a `Client` that dispatches through `transport`.
    ///
    /// Default headers and timeout only apply to [`HttpTransport`]; a custom
    /// transport handles those itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the default base URL cannot be parsed.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Client<T>> {
        let api_base = match self.base_url {
            Some(url) => url,
            None => Url::parse(BASE_API_ENDPOINT)?,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                api_base,
                credentials: self.credentials,
                transport,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.api_base().as_str(), "https://api.bitforex.com/");
        assert!(client.credentials().access_key().is_none());
    }

    #[test]
    fn test_base_url_rejects_paths_and_queries() {
        assert!(matches!(
            Client::builder().base_url("https://api.example.com/api"),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            Client::builder().base_url("https://api.example.com/?a=1"),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            Client::builder().base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(Client::builder().base_url("https://api.example.com").is_ok());
    }

    #[test]
    fn test_default_header_validation() {
        assert!(Client::builder().default_header("User-Agent", "test").is_ok());
        assert!(matches!(
            Client::builder().default_header("bad header", "x"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_clone_shares_configuration() {
        let client = Client::builder()
            .credentials(Credentials::new("ak", "sk"))
            .build()
            .unwrap();
        let cloned = client.clone();
        assert_eq!(cloned.credentials().access_key(), Some("ak"));
    }
}
