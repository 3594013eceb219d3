//!
//! Construction of the signature base
//!
//! The signature base is the exact byte string that gets signed. Every covered component
//! contributes one line, in the order the caller listed them, followed by the
//! `@signature-params` line:
//!
//! ```text
//! "@request-target": get /foo?q=1
//! "host": example.com
//! "@signature-params": ("@request-target" "host");created=1618884473
//! ```
//!
//! The last line carries no trailing newline.
//!

use crate::{
    component::Component,
    message::Message,
    params::{Params, SignatureParams},
    Error, Result,
};
use std::fmt::Write;
use structured_fields::{FieldValue, Item};
use tracing::{debug, instrument};

/// Prefix of the last line of every signature base
const SIGNATURE_PARAMS_PREFIX: &str = "\"@signature-params\": ";

/// Canonical signature base
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureBase {
    base: String,
    params: SignatureParams,
}

impl SignatureBase {
    /// The signature base
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// The signature base as the bytes handed to the signature algorithm
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.base.as_bytes()
    }

    /// Signature parameters the base ends with
    #[must_use]
    pub fn params(&self) -> &SignatureParams {
        &self.params
    }

    #[must_use]
    pub fn into_parts(self) -> (String, SignatureParams) {
        (self.base, self.params)
    }
}

/// Construct the signature base over the covered components of a message
///
/// Components appear in exactly the order given. Every component has to be resolvable,
/// otherwise construction fails with the first one that isn't
#[instrument(skip_all)]
pub fn construct<I, S>(message: &Message, covered: I, params: Params) -> Result<SignatureBase>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut base = String::new();
    let mut components = Vec::new();

    for id in covered {
        let component = Component::parse(id.as_ref())?;
        let value = component.value(message)?;
        let id = component.to_sf_string()?;

        let _ = writeln!(base, "{}: {value}", Item::new(id.clone()).serialise());
        components.push(id);
    }

    let params = SignatureParams::new(components, params);
    base.push_str(SIGNATURE_PARAMS_PREFIX);
    let _ = write!(base, "{params}");

    debug!(covered = params.covered_components().count(), "constructed signature base");

    Ok(SignatureBase { base, params })
}

/// Reconstruct the signature base from previously serialised signature parameters
///
/// Used on the verifying side, where components and parameters come out of `Signature-Input`.
/// Component identifiers carrying parameters can't be resolved and are rejected
pub fn reconstruct(message: &Message, signature_params: &SignatureParams) -> Result<SignatureBase> {
    if let Some(item) = signature_params
        .covered_items()
        .iter()
        .find(|item| !item.params.is_empty())
    {
        return Err(Error::UnsupportedComponent(item.serialise()));
    }

    construct(
        message,
        signature_params.covered_components(),
        signature_params.params().clone(),
    )
}
