use super::{Algorithm, SignatureAlgorithm, VerifyingKey};
use ring::{error::Unspecified, signature::RsaKeyPair};
use tracing::instrument;

/// RSA private key
///
/// Obtained through [`crate::crypto::parse::private_key`]
#[derive(Debug)]
pub struct SigningKey {
    inner: RsaKeyPair,
}

impl SigningKey {
    pub(super) fn key_pair(&self) -> &RsaKeyPair {
        &self.inner
    }

    /// Public half of the key pair
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from_der(self.inner.public().as_ref().to_vec())
    }
}

impl From<RsaKeyPair> for SigningKey {
    fn from(value: RsaKeyPair) -> Self {
        Self { inner: value }
    }
}

/// Sign a message with the provided signing key
///
/// Returns the raw signature bytes
#[inline]
#[instrument(skip_all, fields(%algorithm))]
pub fn sign(payload: &[u8], key: &SigningKey, algorithm: Algorithm) -> Result<Vec<u8>, Unspecified> {
    algorithm.sign(key, payload)
}
