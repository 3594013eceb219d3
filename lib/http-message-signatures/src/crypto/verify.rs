use super::{Algorithm, SignatureAlgorithm};
use tracing::{debug, instrument};

/// RSA public key, held as a DER-encoded PKCS#1 `RSAPublicKey`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    der: Vec<u8>,
}

impl VerifyingKey {
    pub(crate) fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// DER-encoded PKCS#1 `RSAPublicKey`
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// Verify that the message corresponds with the signature using the provided verifying key
///
/// Any failure, including malformed signatures and mismatching key sizes, yields `false`
#[inline]
#[instrument(skip_all, fields(%algorithm))]
pub fn verify(msg: &[u8], signature: &[u8], key: &VerifyingKey, algorithm: Algorithm) -> bool {
    let is_valid = algorithm.verify(key, msg, signature);
    if !is_valid {
        debug!("signature verification failed");
    }

    is_valid
}
