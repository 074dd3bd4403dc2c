//! # bitforex-rest - signed requests for the Bitforex REST API
//!
//! A fluent builder that assembles an exchange request (path under `/api/v1`,
//! parameters with an injected nonce and access key), signs the canonical
//! request string with HMAC-SHA256, and dispatches it over `reqwest`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bitforex_rest::{Client, Credentials, Params};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bitforex_rest::Error> {
//!     // Reads BF_ACCESS_KEY and BF_SECRET_KEY (and a .env file if present)
//!     let client = Client::builder()
//!         .credentials(Credentials::from_env())
//!         .timeout(Duration::from_secs(10))
//!         .build()?;
//!
//!     let response = client
//!         .request()
//!         .with_method("POST")?
//!         .with_segment("trade/orderInfo")
//!         .with_params(Params::new()
//!             .with("symbol", "coin-usdt-btc")
//!             .with("orderId", "42"))
//!         .finalize(false)
//!         .await?;
//!
//!     println!("{} in {:?}: {}", response.status, response.latency, response.raw_body);
//!     Ok(())
//! }
//! ```
//!
//! ## Signing
//!
//! Parameters are sorted by key and percent-encoded (space as `+`, `~`
//! left as is). The same string is sent as the form body. The signature is
//! `hex(HMAC-SHA256(secret, path + "?" + query))`, where the path is relative
//! to the API host, and is added to the parameters as `signData`.
//!
//! Use [`RequestBuilder::test`] to sign and log a request without sending it:
//!
//! ```
//! use bitforex_rest::{Client, Credentials};
//!
//! # fn example() -> Result<(), bitforex_rest::Error> {
//! let client = Client::builder()
//!     .credentials(Credentials::new("AK", "SK"))
//!     .build()?;
//!
//! let mut request = client.request().with_segment("market/ticker");
//! request.test()?;
//! assert!(request.params().contains_key("signData"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Validation failures are distinct variants, so callers can tell what is
//! missing without sending anything:
//!
//! ```no_run
//! use bitforex_rest::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().build()?;
//! match client.request().with_segment("fund/allAccount").finalize(false).await {
//!     Ok(response) => println!("Success: {}", response.raw_body),
//!     Err(Error::MissingAccessKey) => eprintln!("set BF_ACCESS_KEY"),
//!     Err(Error::MissingSecretKey) => eprintln!("set BF_SECRET_KEY"),
//!     Err(Error::HttpError { status, raw_response, .. }) => {
//!         eprintln!("HTTP error {}: {}", status, raw_response);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod canonical;
mod client;
mod credentials;
mod error;
pub mod metadata;
mod params;
mod request;
mod response;
pub mod signer;
mod transport;

pub use client::{Client, ClientBuilder, BASE_API_ENDPOINT, PATH_PREFIX};
pub use credentials::{Credentials, ACCESS_KEY_ENV, SECRET_KEY_ENV};
pub use error::{Error, Result};
pub use metadata::{DispatchRequest, HttpMethod};
pub use params::{
    current_timestamp_ms, ParamValue, Params, ACCESS_KEY_KEY, NONCE_KEY, SIGNATURE_KEY,
};
pub use request::{RejectedMethod, RequestBuilder};
pub use response::Response;
pub use transport::{HttpTransport, Transport};
