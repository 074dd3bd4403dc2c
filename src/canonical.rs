//! Canonical path and query string construction.
//!
//! The exchange recomputes the signature from the path and query it
//! receives, so both must be produced byte-for-byte the same way every time.

use crate::params::Params;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except ASCII alphanumerics and `_.-~` is escaped. Spaces are
/// escaped here too and turned into `+` afterwards.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Percent-encodes one key or value, with spaces as `+`.
///
/// ```
/// use bitforex_rest::canonical::encode_component;
///
/// assert_eq!(encode_component("a b~c*d"), "a+b~c%2Ad");
/// ```
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

/// Normalizes an absolute or relative slash-separated path.
///
/// Repeated separators collapse, `.` components disappear and `..` removes
/// the preceding component. For absolute paths `..` never climbs above root.
///
/// # Examples
///
/// ```
/// use bitforex_rest::canonical::normalize_path;
///
/// assert_eq!(normalize_path("/api//v1/./order/../trade"), "/api/v1/trade");
/// assert_eq!(normalize_path("/../api"), "/api");
/// assert_eq!(normalize_path(""), ".");
/// ```
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Joins path segments under root and normalizes the result.
///
/// ```
/// use bitforex_rest::canonical::path_string;
///
/// assert_eq!(path_string(&["api", "v1", "order", "pending"]), "/api/v1/order/pending");
/// ```
pub fn path_string<S: AsRef<str>>(segments: &[S]) -> String {
    let mut raw = String::new();
    for segment in segments {
        raw.push('/');
        raw.push_str(segment.as_ref());
    }
    if raw.is_empty() {
        raw.push('/');
    }
    normalize_path(&raw)
}

/// Serializes parameters as a key-sorted, form-urlencoded query string.
///
/// The same string is sent as the request body, so what gets signed is
/// exactly what the exchange receives.
///
/// ```
/// use bitforex_rest::{canonical::query_string, Params};
///
/// let params = Params::new().with("symbol", "BTC").with("nonce", 1000).with("accessKey", "AK");
/// assert_eq!(query_string(&params), "accessKey=AK&nonce=1000&symbol=BTC");
/// ```
pub fn query_string(params: &Params) -> String {
    params
        .sorted()
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key),
                encode_component(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the request string that gets signed: the path plus the query.
pub fn request_string(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_is_order_independent() {
        let a = Params::new()
            .with("symbol", "coin-usdt-btc")
            .with("price", 0.25)
            .with("amount", 3);
        let b = Params::new()
            .with("amount", 3)
            .with("symbol", "coin-usdt-btc")
            .with("price", 0.25);

        assert_eq!(query_string(&a), query_string(&b));
        assert_eq!(query_string(&a), "amount=3&price=0.25&symbol=coin-usdt-btc");
    }

    #[test]
    fn test_query_string_encodes_reserved_characters() {
        let params = Params::new().with("note", "a b&c=d/é");
        assert_eq!(query_string(&params), "note=a+b%26c%3Dd%2F%C3%A9");
    }

    #[test]
    fn test_query_string_tilde_safe_asterisk_escaped() {
        let params = Params::new().with("a", "x~y*z").with("b", "1_2.3-4");
        assert_eq!(query_string(&params), "a=x~y%2Az&b=1_2.3-4");
    }

    #[test]
    fn test_query_string_floats_and_exponents() {
        let params = Params::new().with("price", 3.0).with("amount", 1e21);
        assert_eq!(query_string(&params), "amount=1e%2B21&price=3.0");
    }

    #[test]
    fn test_query_string_empty() {
        assert_eq!(query_string(&Params::new()), "");
    }

    #[test]
    fn test_normalize_path_rules() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/api/v1/"), "/api/v1");
        assert_eq!(normalize_path("/api/v1/a/../../b"), "/api/b");
        assert_eq!(normalize_path("/api/v1/../../../../x"), "/x");
        assert_eq!(normalize_path("a/../.."), "..");
        assert_eq!(normalize_path("./a//b/."), "a/b");
    }

    #[test]
    fn test_normalize_path_is_idempotent() {
        let once = path_string(&["api", "v1", "order", ".", "pending"]);
        let twice = normalize_path(&once);
        assert_eq!(once, twice);
        assert_eq!(once, path_string(&["api", "v1", "order", ".", "pending"]));
    }

    #[test]
    fn test_request_string() {
        assert_eq!(request_string("/api/v1", "a=1"), "/api/v1?a=1");
        assert_eq!(request_string("/api/v1", ""), "/api/v1");
    }
}
