//! Fluent construction of signed requests.
//!
//! A [`RequestBuilder`] starts as `GET /api/v1` with a fresh nonce and the
//! client's access key. Chain `with_*` calls to shape it, then either
//! [`finalize`](RequestBuilder::finalize) to validate, sign and dispatch, or
//! [`test`](RequestBuilder::test) to sign and log without sending anything.

use crate::{
    canonical,
    client::{Client, PATH_PREFIX},
    credentials::Credentials,
    metadata::{DispatchRequest, HttpMethod},
    params::{Params, ACCESS_KEY_KEY, NONCE_KEY, SIGNATURE_KEY},
    signer::RequestSigner,
    transport::Transport,
    Error, Response, Result,
};
use url::Url;

/// Builds, signs and dispatches one exchange request.
///
/// Builders are single-use. Reusing one for a second call carries over any
/// params (including a previous `signData`) that were not reset with
/// [`with_params`](Self::with_params).
///
/// # Examples
///
/// ```
/// use bitforex_rest::{Client, Credentials, Params};
///
/// # fn example() -> Result<(), bitforex_rest::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .credentials(Credentials::new("AK", "SK"))
///     .build()?;
///
/// let request = client
///     .request()
///     .with_segment("order/pending")
///     .with_params(Params::new().with("symbol", "BTC").with("nonce", 1000));
///
/// assert_eq!(request.path_string(), "/api/v1/order/pending");
/// assert_eq!(request.query_string(), "accessKey=AK&nonce=1000&symbol=BTC");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct RequestBuilder<'a, T = crate::HttpTransport> {
    client: &'a Client<T>,
    credentials: Credentials,
    path_segments: Vec<String>,
    method: HttpMethod,
    params: Params,
}

impl<'a, T: Transport> RequestBuilder<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        let builder = Self {
            client,
            credentials: client.credentials().clone(),
            path_segments: PATH_PREFIX.iter().map(|s| s.to_string()).collect(),
            method: HttpMethod::default(),
            params: Params::new(),
        };
        builder.with_params(Params::new())
    }

    /// Overrides the credentials for this request.
    ///
    /// Only `Some` non-empty values replace the current keys. The access key
    /// is re-inserted into the params; the nonce is left alone.
    pub fn with_keys(mut self, access_key: Option<&str>, secret_key: Option<&str>) -> Self {
        if let Some(access_key) = access_key {
            self.credentials.set_access_key(access_key);
        }
        if let Some(secret_key) = secret_key {
            self.credentials.set_secret_key(secret_key);
        }
        let access_key = self.access_key().to_string();
        self.params.insert(ACCESS_KEY_KEY, access_key);
        self
    }

    /// Sets the method from its name (`GET`, `POST`, `DELETE` or `PUT`).
    ///
    /// # Errors
    ///
    /// Any other name is logged and returned as a [`RejectedMethod`] that
    /// still holds the unchanged builder. `?` converts it into
    /// [`Error::InvalidMethod`]; [`RejectedMethod::into_builder`] carries on.
    pub fn with_method(
        self,
        method: impl AsRef<str>,
    ) -> std::result::Result<Self, RejectedMethod<Self>> {
        let name = method.as_ref();
        match name.parse::<HttpMethod>() {
            Ok(method) => Ok(self.method(method)),
            Err(_) => {
                tracing::error!(method = name, "\"{}\" not a valid method", name);
                Err(RejectedMethod {
                    method: name.to_string(),
                    builder: self,
                })
            }
        }
    }

    /// Sets the method.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the path below `/api/v1`.
    ///
    /// `path` is split on `/` and empty components are dropped. Each call
    /// replaces the segments set by the previous one.
    pub fn with_segment(mut self, path: &str) -> Self {
        self.path_segments.truncate(PATH_PREFIX.len());
        self.path_segments.extend(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Replaces all params with a fresh nonce, the access key, and `params`.
    ///
    /// Keys in `params` win, so a caller can pin `nonce` or `accessKey`.
    pub fn with_params(mut self, params: Params) -> Self {
        let mut fresh = Params::new();
        fresh.insert_nonce();
        fresh.insert(ACCESS_KEY_KEY, self.access_key());
        fresh.merge(params);
        self.params = fresh;
        self
    }

    /// Stamps a fresh nonce and merges `params` into the existing ones.
    ///
    /// Keys in `params` win on conflict. The access key is not re-inserted.
    pub fn add_params(mut self, params: Params) -> Self {
        self.params.insert_nonce();
        self.params.merge(params);
        self
    }

    /// Merges `params` into the existing ones without touching the nonce.
    pub fn add_params_without_nonce(mut self, params: Params) -> Self {
        self.params.merge(params);
        self
    }

    /// Shorthand for [`with_method`](Self::with_method),
    /// [`with_segment`](Self::with_segment) and
    /// [`with_params`](Self::with_params), in that order.
    ///
    /// # Errors
    ///
    /// Returns a [`RejectedMethod`] holding the untouched builder if `method`
    /// is not accepted.
    pub fn build_request(
        self,
        method: impl AsRef<str>,
        path: &str,
        params: Params,
    ) -> std::result::Result<Self, RejectedMethod<Self>> {
        Ok(self.with_method(method)?.with_segment(path).with_params(params))
    }

    /// The current method.
    pub fn current_method(&self) -> HttpMethod {
        self.method
    }

    /// The current path segments, starting with `api`, `v1`.
    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    /// The current params.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The access key for this request, or `""` if none is configured.
    pub fn access_key(&self) -> &str {
        self.credentials.access_key().unwrap_or_default()
    }

    /// The normalized absolute path, e.g. `/api/v1/order/pending`.
    pub fn path_string(&self) -> String {
        canonical::path_string(self.path_segments.as_slice())
    }

    /// The key-sorted, URL-encoded query string.
    pub fn query_string(&self) -> String {
        canonical::query_string(&self.params)
    }

    /// The endpoint URL: API base plus path, without query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptEndpoint`] if the path cannot be joined onto
    /// the base URL.
    pub fn endpoint(&self) -> Result<Url> {
        self.client
            .api_base()
            .join(&self.path_string())
            .map_err(|_| Error::CorruptEndpoint)
    }

    /// The full URL, endpoint plus query string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptEndpoint`] if the endpoint cannot be built.
    pub fn url(&self) -> Result<Url> {
        let mut url = self.endpoint()?;
        let query = self.query_string();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        Ok(url)
    }

    /// The string the signature covers: path and query, relative to the
    /// API base.
    pub fn request_string(&self) -> String {
        canonical::request_string(&self.path_string(), &self.query_string())
    }

    /// Checks that the request can be sent.
    ///
    /// # Errors
    ///
    /// Returns, in this order of precedence, [`Error::MissingAccessKey`],
    /// [`Error::MissingSecretKey`] or [`Error::CorruptEndpoint`].
    pub fn validate(&self) -> Result<()> {
        if self.credentials.access_key().is_none() {
            return Err(Error::MissingAccessKey);
        }
        if self.credentials.secret_key().is_none() {
            return Err(Error::MissingSecretKey);
        }
        self.endpoint()?;
        Ok(())
    }

    /// Signs the current request string and stores the digest as `signData`.
    ///
    /// The nonce is not regenerated, since the signature covers it. A
    /// missing secret key signs with an empty key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningFailed`] if the secret or the request string
    /// contains a character above U+00FF.
    pub fn sign(&mut self) -> Result<()> {
        let request_string = self.request_string();
        tracing::debug!(request_string = %request_string, "Signing request");

        let secret = self.credentials.secret_key().unwrap_or_default();
        let signature = RequestSigner::new(secret).sign(&request_string)?;
        self.params.insert(SIGNATURE_KEY, signature);
        Ok(())
    }

    /// Signs the request and logs what would be sent, without sending it.
    ///
    /// Never validates credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningFailed`] if signing fails.
    pub fn test(&mut self) -> Result<()> {
        self.sign()?;

        let endpoint = self.endpoint().map(|u| u.to_string()).unwrap_or_default();
        let full_url = self.url().map(|u| u.to_string()).unwrap_or_default();
        tracing::debug!(endpoint = %endpoint, "Endpoint");
        tracing::debug!(path = %self.path_string(), "Path str");
        tracing::debug!(query = %self.query_string(), "Query str");
        tracing::debug!(url = %full_url, "Full URL");
        Ok(())
    }

    /// Validates (unless `skip_validation`), signs, and dispatches.
    ///
    /// The params, including `signData`, are sent as the request body to the
    /// endpoint. Transport errors are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network activity, a signing
    /// error, or whatever the transport returns.
    pub async fn finalize(mut self, skip_validation: bool) -> Result<Response> {
        if !skip_validation {
            self.validate()?;
        }
        self.sign()?;

        let endpoint = self.endpoint()?;
        if let Ok(url) = self.url() {
            tracing::debug!(method = %self.method, url = %url, "Final URL");
        }

        let request = DispatchRequest::new(self.method, endpoint, self.params);
        self.client.transport().send(&request).await
    }
}

/// A method name that [`RequestBuilder::with_method`] refused.
///
/// Holds the builder exactly as it was before the call.
pub struct RejectedMethod<B> {
    method: String,
    builder: B,
}

impl<B> RejectedMethod<B> {
    /// The rejected method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Recovers the unchanged builder.
    pub fn into_builder(self) -> B {
        self.builder
    }

    /// Drops the builder and returns [`Error::InvalidMethod`].
    pub fn into_error(self) -> Error {
        Error::InvalidMethod(self.method)
    }
}

impl<B> From<RejectedMethod<B>> for Error {
    fn from(rejected: RejectedMethod<B>) -> Self {
        rejected.into_error()
    }
}

impl<B> std::fmt::Debug for RejectedMethod<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RejectedMethod")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl<B> std::fmt::Display for RejectedMethod<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" is not a valid method", self.method)
    }
}

impl<B> std::error::Error for RejectedMethod<B> {}
