//!
//! Composition and parsing of the signature header fields
//!

use crate::{input, params::SignatureParams, Error, Result};
use http::HeaderName;
use indexmap::IndexMap;
use std::fmt;
use structured_fields::{BareItem, Dictionary, FieldValue, Item, Key, ListEntry};

/// `Signature` header name
pub static SIGNATURE: HeaderName = HeaderName::from_static("signature");

/// `Signature-Input` header name
pub static SIGNATURE_INPUT: HeaderName = HeaderName::from_static("signature-input");

/// Rendered header values of a signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureHeaders {
    /// Value of the `Signature-Input` header
    pub signature_input: String,

    /// Value of the `Signature` header
    pub signature: String,
}

/// Renders the header block
///
/// ```text
/// Signature-Input: sig1=("@status-code");alg="rsa-pss-sha512"
/// Signature: sig1=:dGhpcyBpcyBub3QgYSByZWFsIHNpZ25hdHVyZQ==:
/// ```
impl fmt::Display for SignatureHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature-Input: {}\nSignature: {}",
            self.signature_input, self.signature
        )
    }
}

/// Compose the header values for a signature created over `params`
#[must_use]
pub fn compose(label: &Key, params: &SignatureParams, signature: &[u8]) -> SignatureHeaders {
    let mut dictionary = Dictionary::new();
    dictionary.insert(label.clone(), Item::new(signature.to_vec()).into());

    SignatureHeaders {
        signature_input: input::build(label, params),
        signature: dictionary.serialise(),
    }
}

/// Parse the value of a `Signature` header into the raw signatures, keyed by label
pub fn parse_signature(header: &str) -> Result<IndexMap<String, Vec<u8>>> {
    Dictionary::parse(header)?
        .into_iter()
        .map(|(label, member)| match member {
            ListEntry::Item(Item {
                bare_item: BareItem::ByteSequence(signature),
                ..
            }) => Ok((label.to_string(), signature)),
            _ => Err(Error::InvalidSignature(label.to_string())),
        })
        .collect()
}
