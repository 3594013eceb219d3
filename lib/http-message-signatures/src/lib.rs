//!
//! HTTP Message Signatures
//!
//! Constructs the canonical signature base of an HTTP message, signs and verifies it with RSA keys
//! and renders the `Signature-Input` and `Signature` header values.
//!
//! ```
//! use http_message_signatures::{base, message::Message, params::Params};
//!
//! let message = Message::parse(b"GET /foo?q=1 HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! let base = base::construct(&message, ["@request-target", "host"], Params::default()).unwrap();
//!
//! assert_eq!(
//!     base.as_str(),
//!     "\"@request-target\": get /foo?q=1\n\"host\": example.com\n\"@signature-params\": (\"@request-target\" \"host\")"
//! );
//! ```
//!

#![forbid(rust_2018_idioms)]

pub use self::error::{Error, ErrorKind};
pub use structured_fields;

pub mod base;
pub mod component;
pub mod crypto;
#[cfg(feature = "easy")]
pub mod easy;
mod error;
pub mod header;
pub mod input;
pub mod message;
pub mod params;
pub mod signature;

type Result<T, E = Error> = std::result::Result<T, E>;
