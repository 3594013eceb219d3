//!
//! Parse cryptographic keys for use in the HTTP signature implementations
//!

use super::{SigningKey, VerifyingKey};
use const_oid::db::rfc5912::RSA_ENCRYPTION;
use miette::Diagnostic;
use pkcs8::{Document, SecretDocument, SubjectPublicKeyInfoRef};
use ring::signature::RsaKeyPair;
use thiserror::Error;
use tracing::debug;

/// PEM label of a PKCS#1 `RSAPublicKey`
const PKCS1_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// Key parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Malformed PEM or DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// Key rejected by both the PKCS#8 and the PKCS#1 decoder
    #[error("Key rejected: {0}")]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// Unknown key type
    #[error("Unknown key type")]
    UnknownKeyType,
}

/// Parse an RSA private key from its PEM form
///
/// Accepts PKCS#8 (`PRIVATE KEY`) and PKCS#1 (`RSA PRIVATE KEY`) documents.
/// The modulus has to be between 2048 and 8192 bits.
///
/// This function uses constant-time PEM decoding and zeroizes any temporary allocations.
#[inline]
pub fn private_key(pem: &str) -> Result<SigningKey, Error> {
    let (_tag_line, document) = SecretDocument::from_pem(pem.trim())?;

    let key_pair = match RsaKeyPair::from_pkcs8(document.as_bytes()) {
        Ok(key_pair) => key_pair,
        Err(error) => {
            debug!(%error, "not a PKCS#8 key, trying PKCS#1");
            RsaKeyPair::from_der(document.as_bytes())?
        }
    };

    Ok(SigningKey::from(key_pair))
}

/// Parse an RSA public key from its PEM form
///
/// Accepts SPKI (`PUBLIC KEY`) and PKCS#1 (`RSA PUBLIC KEY`) documents.
/// Private keys are accepted as well, in which case their public half is used.
#[inline]
pub fn public_key(pem: &str) -> Result<VerifyingKey, Error> {
    let pem = pem.trim();
    if let Ok(signing_key) = private_key(pem) {
        return Ok(signing_key.verifying_key());
    }

    let (label, document) = Document::from_pem(pem)?;
    let raw_bytes = if let Ok(spki) = document.decode_msg::<SubjectPublicKeyInfoRef<'_>>() {
        if spki.algorithm.oid != RSA_ENCRYPTION {
            return Err(Error::UnknownKeyType);
        }

        spki.subject_public_key
            .as_bytes()
            .ok_or(Error::MalformedKey)?
            .to_vec()
    } else if label == PKCS1_PUBLIC_KEY_LABEL {
        document.as_bytes().to_vec()
    } else {
        return Err(Error::UnknownKeyType);
    };

    Ok(VerifyingKey::from_der(raw_bytes))
}
