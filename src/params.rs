//! Request parameters and nonce generation.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parameter key carrying the request nonce.
pub const NONCE_KEY: &str = "nonce";
/// Parameter key carrying the public access key.
pub const ACCESS_KEY_KEY: &str = "accessKey";
/// Parameter key carrying the request signature.
pub const SIGNATURE_KEY: &str = "signData";

/// Returns the current wall-clock time in milliseconds since the Unix epoch.
///
/// This is the nonce source. Successive calls are non-decreasing at
/// millisecond resolution (assuming the system clock is not set back).
pub fn current_timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// A single parameter value.
///
/// Values are always rendered through `Display`, both when the query string
/// is signed and when the body is sent, so the two never disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Formats a float in shortest round-trip form.
///
/// Whole numbers keep a trailing `.0`, and magnitudes at or above `1e16`
/// or below `1e-4` switch to exponent form with a signed, two-digit
/// exponent (`1e+21`, `1.5e-07`).
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", x);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
        return scientific;
    }

    let mut plain = x.to_string();
    if !plain.contains('.') {
        plain.push_str(".0");
    }
    plain
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

/// An unordered mapping of parameter names to values.
///
/// Insertion order is not remembered. Anything that has to be deterministic
/// (the query string, the form body) goes through [`Params::sorted`].
///
/// # Examples
///
/// ```
/// use bitforex_rest::Params;
///
/// let params = Params::new()
///     .with("symbol", "coin-usdt-btc")
///     .with("state", 0);
///
/// let keys: Vec<_> = params.sorted().into_iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, vec!["state", "symbol"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: HashMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a parameter, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes and returns the value for `key`.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Merges `other` into `self`. Keys from `other` win on conflict.
    pub fn merge(&mut self, other: Params) {
        self.entries.extend(other.entries);
    }

    /// Stamps a fresh nonce.
    pub fn insert_nonce(&mut self) {
        self.insert(NONCE_KEY, current_timestamp_ms());
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries sorted ascending by key.
    pub fn sorted(&self) -> Vec<(&str, &ParamValue)> {
        let mut pairs: Vec<(&str, &ParamValue)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }
}

impl Serialize for Params {
    /// Serializes as a map in key order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (key, value) in sorted {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_on_conflict() {
        let mut params = Params::new().with("a", 1).with("b", "x");
        params.merge(Params::new().with("b", "y").with("c", 2.5));

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("b"), Some(&ParamValue::Str("y".into())));
        assert_eq!(params.get("c"), Some(&ParamValue::Float(2.5)));
    }

    #[test]
    fn test_sorted_ignores_insertion_order() {
        let forward: Params = [("zebra", "1"), ("alpha", "2"), ("middle", "3")]
            .into_iter()
            .collect();
        let backward: Params = [("middle", "3"), ("alpha", "2"), ("zebra", "1")]
            .into_iter()
            .collect();

        assert_eq!(forward.sorted(), backward.sorted());
        assert_eq!(forward.sorted()[0].0, "alpha");
    }

    #[test]
    fn test_nonce_is_non_decreasing() {
        let first = current_timestamp_ms();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = current_timestamp_ms();

        assert!(first > 0);
        assert!(second >= first);
    }

    #[test]
    fn test_display_values() {
        assert_eq!(ParamValue::from("BTC").to_string(), "BTC");
        assert_eq!(ParamValue::from(1000i64).to_string(), "1000");
        assert_eq!(ParamValue::from(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_float_display_keeps_decimal_point() {
        assert_eq!(ParamValue::from(3.0).to_string(), "3.0");
        assert_eq!(ParamValue::from(-2.0).to_string(), "-2.0");
        assert_eq!(ParamValue::from(0.0).to_string(), "0.0");
        assert_eq!(ParamValue::from(100.5).to_string(), "100.5");
        assert_eq!(ParamValue::from(0.0001).to_string(), "0.0001");
        assert_eq!(ParamValue::from(9999999999999998.0).to_string(), "9999999999999998.0");
    }

    #[test]
    fn test_serialize_uses_display_form() {
        let params = Params::new()
            .with("price", 3.0)
            .with("amount", 1e21)
            .with("nonce", 1000);

        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"amount":"1e+21","nonce":"1000","price":"3.0"}"#
        );
    }

    #[test]
    fn test_float_display_uses_exponent_at_extremes() {
        assert_eq!(ParamValue::from(1e21).to_string(), "1e+21");
        assert_eq!(ParamValue::from(1e16).to_string(), "1e+16");
        assert_eq!(ParamValue::from(-2.5e20).to_string(), "-2.5e+20");
        assert_eq!(ParamValue::from(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(ParamValue::from(0.00009).to_string(), "9e-05");
        assert_eq!(ParamValue::from(f64::NAN).to_string(), "nan");
        assert_eq!(ParamValue::from(f64::NEG_INFINITY).to_string(), "-inf");
    }
}
