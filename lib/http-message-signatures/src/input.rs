//!
//! `Signature-Input` header handling
//!

use crate::{params::SignatureParams, Error, Result};
use indexmap::IndexMap;
use structured_fields::{Dictionary, FieldValue, Key, ListEntry};

/// Single entry of the `Signature-Input` header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureInput {
    params: SignatureParams,
    raw: String,
}

impl SignatureInput {
    /// Covered components and parameters of the signature
    #[must_use]
    pub fn params(&self) -> &SignatureParams {
        &self.params
    }

    /// The serialised inner list
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Parse the value of a `Signature-Input` header
///
/// Labels keep the order they appear in
pub fn parse(header: &str) -> Result<IndexMap<String, SignatureInput>> {
    Dictionary::parse(header)?
        .into_iter()
        .map(|(label, member)| {
            let ListEntry::InnerList(inner_list) = member else {
                return Err(Error::InvalidSignatureInput(label.to_string()));
            };

            let raw = inner_list.serialise();
            let params = SignatureParams::try_from(inner_list)?;

            Ok((label.to_string(), SignatureInput { params, raw }))
        })
        .collect()
}

/// Render the `Signature-Input` value for a single signature
#[must_use]
pub fn build(label: &Key, params: &SignatureParams) -> String {
    let mut dictionary = Dictionary::new();
    dictionary.insert(label.clone(), params.to_inner_list().into());
    dictionary.serialise()
}
