//!
//! Signing and verification of whole messages
//!

use crate::{
    base::{self, SignatureBase},
    crypto::{self, Algorithm, SigningKey, VerifyingKey},
    header::{self, SignatureHeaders, SIGNATURE, SIGNATURE_INPUT},
    input,
    message::Message,
    params::{Params, SignatureParams},
    Error, Result,
};
use http::HeaderValue;
use structured_fields::Key;
use tracing::{debug, instrument};

/// Fail if the parameters declare an algorithm other than the requested one
pub fn ensure_algorithm(params: &Params, requested: Algorithm) -> Result<()> {
    match params.alg() {
        Some(declared) if declared != requested.as_ref() => Err(Error::AlgorithmMismatch {
            declared: declared.to_owned(),
            requested: requested.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Algorithm declared through the `alg` parameter
pub fn declared_algorithm(params: &Params) -> Result<Algorithm> {
    params
        .alg()
        .ok_or(Error::MissingAlgorithm)
        .and_then(Algorithm::from_name)
}

/// Sign a signature base and compose the header values
#[instrument(skip_all, fields(%label, %algorithm))]
pub fn sign_base(
    base: &str,
    params: &SignatureParams,
    key: &SigningKey,
    algorithm: Algorithm,
    label: &Key,
) -> Result<(Vec<u8>, SignatureHeaders)> {
    ensure_algorithm(params.params(), algorithm)?;

    let signature = crypto::sign(base.as_bytes(), key, algorithm)?;
    let headers = header::compose(label, params, &signature);

    Ok((signature, headers))
}

/// Construct the signature base of a message and sign it
///
/// The algorithm is taken from the `alg` parameter, which therefore has to be present
pub fn sign_message<I, S>(
    message: &Message,
    label: &Key,
    covered: I,
    params: Params,
    key: &SigningKey,
) -> Result<(SignatureBase, SignatureHeaders)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let algorithm = declared_algorithm(&params)?;
    let base = base::construct(message, covered, params)?;
    let (_signature, headers) = sign_base(base.as_str(), base.params(), key, algorithm, label)?;

    Ok((base, headers))
}

/// Verify every signature of a message
///
/// Each label of `Signature-Input` needs a matching entry in `Signature` and an `alg` parameter.
/// Only returns `true` if all of them verify
#[instrument(skip_all)]
pub fn verify_message(
    message: &Message,
    signature_input: &str,
    signature: &str,
    key: &VerifyingKey,
) -> Result<bool> {
    let inputs = input::parse(signature_input)?;
    let mut signatures = header::parse_signature(signature)?;
    if inputs.is_empty() {
        return Err(Error::NoSignatures);
    }

    for (label, input) in &inputs {
        let signature = signatures
            .swap_remove(label)
            .ok_or_else(|| Error::MissingSignature(label.clone()))?;
        let algorithm = declared_algorithm(input.params().params())?;
        let base = base::reconstruct(message, input.params())?;

        if !crypto::verify(base.as_bytes(), &signature, key, algorithm) {
            debug!(%label, "signature didn't verify");
            return Ok(false);
        }
    }

    Ok(true)
}

/// Sign an HTTP request, attaching the `Signature-Input` and `Signature` headers
///
/// Existing signature headers are replaced
pub fn sign_request<B, I, S>(
    request: &mut http::Request<B>,
    label: &Key,
    covered: I,
    params: Params,
    key: &SigningKey,
) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let message = Message::from(&*request);
    let (_base, headers) = sign_message(&message, label, covered, params, key)?;

    let request_headers = request.headers_mut();
    request_headers.insert(
        SIGNATURE_INPUT.clone(),
        HeaderValue::from_str(&headers.signature_input)?,
    );
    request_headers.insert(SIGNATURE.clone(), HeaderValue::from_str(&headers.signature)?);

    Ok(())
}

/// Verify the signatures attached to an HTTP request
pub fn verify_request<B>(request: &http::Request<B>, key: &VerifyingKey) -> Result<bool> {
    let message = Message::from(request);
    let signature_input = message
        .header(SIGNATURE_INPUT.as_str())?
        .ok_or(Error::NoSignatures)?;
    let signature = message
        .header(SIGNATURE.as_str())?
        .ok_or(Error::NoSignatures)?;

    verify_message(&message, &signature_input, &signature, key)
}
