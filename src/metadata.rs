//! Request method and the finished request handed to a transport.

use crate::canonical;
use crate::params::{ParamValue, Params};
use crate::Error;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// The HTTP methods the exchange accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// `GET`, the default.
    #[default]
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `PUT`
    Put,
}

impl HttpMethod {
    /// Every accepted method.
    pub const ALL: [HttpMethod; 4] = [Self::Get, Self::Post, Self::Delete, Self::Put];

    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    /// Parses a method name. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidMethod(s.to_string()))
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Put => http::Method::PUT,
        }
    }
}

/// A signed request, ready for a [`Transport`](crate::Transport).
///
/// The endpoint carries no query string. Parameters (including `signData`)
/// travel as the form body.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// The HTTP method.
    pub method: HttpMethod,

    /// The absolute endpoint URL, without query.
    pub endpoint: Url,

    /// The signed request parameters.
    pub params: Params,
}

impl DispatchRequest {
    /// Creates a new `DispatchRequest`.
    pub fn new(method: HttpMethod, endpoint: Url, params: Params) -> Self {
        Self {
            method,
            endpoint,
            params,
        }
    }

    /// Returns the body parameters sorted by key.
    pub fn form_pairs(&self) -> Vec<(&str, &ParamValue)> {
        self.params.sorted()
    }

    /// Returns the form-urlencoded body, encoded exactly like the signed
    /// query string.
    pub fn form_body(&self) -> String {
        canonical::query_string(&self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_methods() {
        for method in HttpMethod::ALL {
            assert_eq!(method.as_str().parse::<HttpMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_and_lowercase() {
        assert!(matches!(
            "PATCH".parse::<HttpMethod>(),
            Err(Error::InvalidMethod(m)) if m == "PATCH"
        ));
        assert!("get".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_form_body_matches_query_string() {
        let params = Params::new()
            .with("price", 3.0)
            .with("note", "x~y*z é")
            .with("nonce", 1000);
        let request = DispatchRequest::new(
            HttpMethod::Post,
            Url::parse("https://api.example.com/api/v1").unwrap(),
            params.clone(),
        );

        assert_eq!(request.form_body(), canonical::query_string(&params));
        assert_eq!(request.form_body(), "nonce=1000&note=x~y%2Az+%C3%A9&price=3.0");
    }

    #[test]
    fn test_default_is_get() {
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
        assert_eq!(http::Method::from(HttpMethod::Delete), http::Method::DELETE);
    }
}
