//!
//! Signature parameters
//!

use crate::{crypto::Algorithm, Error, Result};
use std::{fmt, str::FromStr};
use structured_fields::{
    BareItem, FieldValue, InnerList, Integer, Item, Key, Parameters, ParseError, SfString,
};

/// Named parameters of a signature (`created`, `expires`, `keyid`, `alg`, `nonce`, ...)
///
/// Immutable once built. Parameters serialise in the order they were added
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    inner: Parameters,
}

impl Params {
    /// Start building a set of parameters
    pub fn builder() -> ParamsBuilder {
        ParamsBuilder::default()
    }

    /// Creation timestamp (UNIX seconds)
    #[must_use]
    pub fn created(&self) -> Option<i64> {
        self.inner.get("created").and_then(BareItem::as_integer)
    }

    /// Expiry timestamp (UNIX seconds)
    #[must_use]
    pub fn expires(&self) -> Option<i64> {
        self.inner.get("expires").and_then(BareItem::as_integer)
    }

    /// Key identifier
    #[must_use]
    pub fn keyid(&self) -> Option<&str> {
        self.inner.get("keyid").and_then(BareItem::as_str)
    }

    /// Algorithm identifier
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.inner.get("alg").and_then(BareItem::as_str)
    }

    /// Nonce
    #[must_use]
    pub fn nonce(&self) -> Option<&str> {
        self.inner.get("nonce").and_then(BareItem::as_str)
    }

    /// Look up an arbitrary parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BareItem> {
        self.inner.get(name)
    }

    /// Iterate over the parameters in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BareItem)> {
        self.inner.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn as_parameters(&self) -> &Parameters {
        &self.inner
    }
}

impl From<Parameters> for Params {
    fn from(value: Parameters) -> Self {
        Self { inner: value }
    }
}

/// Builder for [`Params`]
///
/// Setting a parameter twice keeps its original position and overwrites the value.
/// Invalid values are reported by [`ParamsBuilder::build`]
#[derive(Debug, Default)]
#[must_use]
pub struct ParamsBuilder {
    params: Parameters,
    error: Option<ParseError>,
}

impl ParamsBuilder {
    fn push(mut self, key: &str, value: Result<BareItem, ParseError>) -> Self {
        if self.error.is_some() {
            return self;
        }

        match key.parse::<Key>().and_then(|key| Ok((key, value?))) {
            Ok((key, value)) => {
                self.params.insert(key, value);
            }
            Err(error) => self.error = Some(error),
        }

        self
    }

    fn timestamp(self, key: &str, timestamp: u64) -> Self {
        self.push(key, Integer::try_from(timestamp).map(BareItem::from))
    }

    fn string(self, key: &str, value: &str) -> Self {
        self.push(key, value.parse::<SfString>().map(BareItem::from))
    }

    /// Creation timestamp (UNIX seconds)
    pub fn created(self, timestamp: u64) -> Self {
        self.timestamp("created", timestamp)
    }

    /// Expiry timestamp (UNIX seconds)
    pub fn expires(self, timestamp: u64) -> Self {
        self.timestamp("expires", timestamp)
    }

    /// Key identifier
    pub fn keyid(self, key_id: &str) -> Self {
        self.string("keyid", key_id)
    }

    /// Signature algorithm
    pub fn alg(self, algorithm: Algorithm) -> Self {
        self.string("alg", algorithm.as_ref())
    }

    /// Nonce
    pub fn nonce(self, nonce: &str) -> Self {
        self.string("nonce", nonce)
    }

    /// Arbitrary parameter
    pub fn param(self, key: &str, value: impl Into<BareItem>) -> Self {
        self.push(key, Ok(value.into()))
    }

    /// Finish building. Fails with the first invalid key or value
    pub fn build(self) -> Result<Params, ParseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(Params { inner: self.params }),
        }
    }
}

/// Covered components plus named parameters
///
/// This is the inner list found in the `Signature-Input` header and on the `@signature-params` line.
/// Component identifiers keep any parameters they were parsed with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureParams {
    components: Vec<Item>,
    params: Params,
}

impl SignatureParams {
    /// Covered components must be valid structured field strings
    #[must_use]
    pub fn new(components: Vec<SfString>, params: Params) -> Self {
        Self {
            components: components.into_iter().map(Item::new).collect(),
            params,
        }
    }

    /// Covered component identifiers, in order, without their parameters
    pub fn covered_components(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .filter_map(|item| item.bare_item.as_str())
    }

    /// Covered components as structured field items, parameters included
    #[must_use]
    pub fn covered_items(&self) -> &[Item] {
        &self.components
    }

    /// Named parameters
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Structured field representation
    #[must_use]
    pub fn to_inner_list(&self) -> InnerList {
        InnerList::with_params(
            self.components.clone(),
            self.params.inner.clone(),
        )
    }
}

impl TryFrom<InnerList> for SignatureParams {
    type Error = Error;

    fn try_from(value: InnerList) -> Result<Self, Self::Error> {
        let components = value
            .items
            .into_iter()
            .map(|item| match item.bare_item {
                BareItem::String(..) => Ok(item),
                other => Err(Error::InvalidSignatureParams(other.to_string())),
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            components,
            params: Params::from(value.params),
        })
    }
}

impl FromStr for SignatureParams {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InnerList::parse(s)?.try_into()
    }
}

impl fmt::Display for SignatureParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_inner_list(), f)
    }
}
