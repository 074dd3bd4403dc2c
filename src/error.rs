//! Error types for building, signing and dispatching exchange requests.
//!
//! Builder-side failures (bad method, missing credentials, unsignable input)
//! get their own variants so callers and tests can branch on the kind.
//! Transport failures keep the raw response details for debugging.

use http::{HeaderMap, StatusCode};

/// The main error type for the request builder and its transport.
///
/// # Examples
///
/// ```no_run
/// use bitforex_rest::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().build()?;
///
/// match client.request().with_segment("order/pending").finalize(false).await {
///     Ok(response) => println!("Status: {}", response.status),
///     Err(Error::MissingSecretKey) => eprintln!("set BF_SECRET_KEY first"),
///     Err(Error::HttpError { status, raw_response, .. }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The method name is not one of GET, POST, DELETE or PUT.
    #[error("\"{0}\" is not a valid method")]
    InvalidMethod(String),

    /// No access key was configured (set `BF_ACCESS_KEY` or call `with_keys`).
    #[error("Access key not found, set BF_ACCESS_KEY in env")]
    MissingAccessKey,

    /// No secret key was configured (set `BF_SECRET_KEY` or call `with_keys`).
    #[error("Secret key not found, set BF_SECRET_KEY in env")]
    MissingSecretKey,

    /// The endpoint URL could not be built from the base URL and path.
    #[error("Corrupt built url")]
    CorruptEndpoint,

    /// The secret or the request string could not be signed.
    ///
    /// Both are encoded one byte per character, so anything above U+00FF
    /// is rejected rather than truncated.
    #[error("Failed to sign request: {0}")]
    SigningFailed(String),

    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The server returned a non-2xx HTTP status code.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// Invalid configuration was provided.
    ///
    /// This indicates a problem with how the client was configured,
    /// such as a base URL with a path or invalid header values.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error was raised by [`validate`] before dispatch.
    ///
    /// [`validate`]: crate::RequestBuilder::validate
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::MissingAccessKey | Error::MissingSecretKey | Error::CorruptEndpoint
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for exchange requests.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_distinct() {
        assert!(Error::MissingAccessKey.is_validation_error());
        assert!(Error::MissingSecretKey.is_validation_error());
        assert!(Error::CorruptEndpoint.is_validation_error());
        assert!(!Error::InvalidMethod("PATCH".into()).is_validation_error());
        assert!(!Error::Timeout.is_validation_error());
    }

    #[test]
    fn test_http_error_accessors() {
        let err = Error::HttpError {
            status: StatusCode::UNAUTHORIZED,
            raw_response: "bad signature".to_string(),
            headers: HeaderMap::new(),
        };

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.raw_response(), Some("bad signature"));
        assert_eq!(Error::Timeout.status(), None);
    }

    #[test]
    fn test_invalid_method_message() {
        let err = Error::InvalidMethod("PATCH".into());
        assert_eq!(err.to_string(), "\"PATCH\" is not a valid method");
    }
}
