//! API credential management.
//!
//! The secret key is wrapped in `SecretString` so it never shows up in
//! `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the public access key.
pub const ACCESS_KEY_ENV: &str = "BF_ACCESS_KEY";
/// Environment variable holding the secret key.
pub const SECRET_KEY_ENV: &str = "BF_SECRET_KEY";

/// Access and secret keys for signed requests.
///
/// Either key may be absent. That is only an error once a validated
/// request is finalized.
#[derive(Default)]
pub struct Credentials {
    access_key: Option<String>,
    secret_key: Option<SecretString>,
}

impl Credentials {
    /// Create credentials from explicit values.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::from_parts(Some(access_key.into()), Some(secret_key.into()))
    }

    /// Create credentials where either key may be missing.
    ///
    /// Empty strings count as missing.
    pub fn from_parts(access_key: Option<String>, secret_key: Option<String>) -> Self {
        Self {
            access_key: access_key.filter(|k| !k.is_empty()),
            secret_key: secret_key
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
        }
    }

    /// Load credentials from `BF_ACCESS_KEY` and `BF_SECRET_KEY`.
    ///
    /// A `.env` file is loaded first if one exists. Missing variables leave
    /// the corresponding key unset.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary key-value lookup.
    ///
    /// ```
    /// use bitforex_rest::Credentials;
    /// use std::collections::HashMap;
    ///
    /// let store = HashMap::from([("BF_ACCESS_KEY", "AK")]);
    /// let creds = Credentials::from_lookup(|name| store.get(name).map(|v| v.to_string()));
    ///
    /// assert_eq!(creds.access_key(), Some("AK"));
    /// assert!(creds.secret_key().is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_parts(lookup(ACCESS_KEY_ENV), lookup(SECRET_KEY_ENV))
    }

    /// The access key (public, safe to log).
    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    /// Expose the secret key for signing.
    ///
    /// Only use this for cryptographic operations. Never log the return value.
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_ref().map(|s| s.expose_secret())
    }

    /// Replace the access key if `access_key` is non-empty.
    pub fn set_access_key(&mut self, access_key: &str) {
        if !access_key.is_empty() {
            self.access_key = Some(access_key.to_string());
        }
    }

    /// Replace the secret key if `secret_key` is non-empty.
    pub fn set_secret_key(&mut self, secret_key: &str) {
        if !secret_key.is_empty() {
            self.secret_key = Some(SecretString::from(secret_key.to_string()));
        }
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self::from_parts(
            self.access_key.clone(),
            self.secret_key().map(str::to_string),
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field(
                "secret_key",
                &self.secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = Credentials::new("my_access_key", "my_secret");
        assert_eq!(creds.access_key(), Some("my_access_key"));
        assert_eq!(creds.secret_key(), Some("my_secret"));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let creds = Credentials::from_parts(Some(String::new()), None);
        assert!(creds.access_key().is_none());
        assert!(creds.secret_key().is_none());
    }

    #[test]
    fn test_setters_ignore_empty_values() {
        let mut creds = Credentials::new("ak", "sk");
        creds.set_access_key("");
        creds.set_secret_key("new_sk");

        assert_eq!(creds.access_key(), Some("ak"));
        assert_eq!(creds.secret_key(), Some("new_sk"));
    }

    #[test]
    fn test_from_lookup_reads_both_names() {
        let creds = Credentials::from_lookup(|name| match name {
            ACCESS_KEY_ENV => Some("env_ak".to_string()),
            SECRET_KEY_ENV => Some("env_sk".to_string()),
            _ => None,
        });

        assert_eq!(creds.access_key(), Some("env_ak"));
        assert_eq!(creds.secret_key(), Some("env_sk"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("my_access_key", "super_secret_key");
        let debug_str = format!("{:?}", creds);

        assert!(debug_str.contains("my_access_key"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
