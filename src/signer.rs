//! HMAC-SHA256 request signing.

use crate::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Encodes `text` one byte per character (ISO-8859-1).
///
/// Fails on the first character above U+00FF instead of truncating it.
fn encode_latin1(text: &str, what: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(position, c)| {
            u8::try_from(u32::from(c)).map_err(|_| {
                Error::SigningFailed(format!(
                    "{} contains {:?} at position {}, which is not a single-byte character",
                    what, c, position
                ))
            })
        })
        .collect()
}

/// Signs request strings with a shared secret.
pub struct RequestSigner<'a> {
    secret: &'a str,
}

impl<'a> RequestSigner<'a> {
    /// Create a signer for the given secret key.
    pub fn new(secret: &'a str) -> Self {
        Self { secret }
    }

    /// Sign a message and return the lower-case hex HMAC-SHA256 digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SigningFailed`] if the secret or the message contains
    /// a character outside the single-byte range.
    pub fn sign(&self, message: &str) -> Result<String> {
        let key = encode_latin1(self.secret, "secret key")?;
        let message = encode_latin1(message, "request string")?;

        let mut mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| Error::SigningFailed(e.to_string()))?;
        mac.update(&message);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_known_vector() {
        // RFC 4231 test case 2
        let signer = RequestSigner::new("Jefe");
        let signature = signer.sign("what do ya want for nothing?").unwrap();

        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_sign_is_stable() {
        let signer = RequestSigner::new("SK");
        let message = "/api/v1/order/pending?accessKey=AK&nonce=1000&symbol=BTC";

        let first = signer.sign(message).unwrap();
        let second = signer.sign(message).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_latin1_characters_are_single_bytes() {
        // "é" is one byte under Latin-1 but two under UTF-8.
        let latin1 = RequestSigner::new("clé").sign("café").unwrap();

        let mut mac = HmacSha256::new_from_slice(&[b'c', b'l', 0xE9]).unwrap();
        mac.update(&[b'c', b'a', b'f', 0xE9]);
        assert_eq!(latin1, hex::encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn test_sign_rejects_wide_characters() {
        let result = RequestSigner::new("secret").sign("/api/v1?note=€");
        assert!(matches!(result, Err(Error::SigningFailed(_))));

        let result = RequestSigner::new("秘密").sign("/api/v1");
        assert!(matches!(result, Err(Error::SigningFailed(_))));
    }

    #[test]
    fn test_sign_empty_message() {
        let signature = RequestSigner::new("secret").sign("").unwrap();
        assert!(!signature.is_empty());
    }
}
