//!
//! Signature algorithms and key handling
//!
//! The set of algorithms is closed and fixed at compile time. Each one is reachable through
//! the [`SignatureAlgorithm`] capability so callers never have to match on the variants
//!

use crate::{Error, Result};
use ring::{
    error::Unspecified,
    rand::SystemRandom,
    signature::{
        RsaEncoding, UnparsedPublicKey, VerificationAlgorithm, RSA_PKCS1_2048_8192_SHA256,
        RSA_PKCS1_SHA256, RSA_PSS_2048_8192_SHA512, RSA_PSS_SHA512,
    },
};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

mod sign;
mod verify;

pub mod parse;

pub use self::sign::{sign, SigningKey};
pub use self::verify::{verify, VerifyingKey};

/// Capabilities every signature algorithm offers
pub trait SignatureAlgorithm {
    /// Identifier of the algorithm, as used in the `alg` parameter
    fn name(&self) -> &'static str;

    /// Sign a message
    fn sign(&self, key: &SigningKey, msg: &[u8]) -> Result<Vec<u8>, Unspecified>;

    /// Check whether the signature was created over the message with the private half of the key
    fn verify(&self, key: &VerifyingKey, msg: &[u8], signature: &[u8]) -> bool;
}

/// Supported signature algorithms
#[derive(
    AsRefStr, Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, IntoStaticStr, PartialEq,
)]
#[non_exhaustive]
pub enum Algorithm {
    /// RSASSA-PSS with SHA-512, MGF1-SHA-512 and a 64 byte salt
    #[strum(serialize = "rsa-pss-sha512")]
    RsaPssSha512,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    #[strum(serialize = "rsa-v1_5-sha256")]
    RsaV1_5Sha256,
}

impl Algorithm {
    /// Look the algorithm up by its identifier
    ///
    /// Identifiers are case-sensitive
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::UnsupportedAlgorithm(name.to_owned()))
    }

    /// Every algorithm in the registry
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    fn encoding(self) -> &'static dyn RsaEncoding {
        match self {
            Self::RsaPssSha512 => &RSA_PSS_SHA512,
            Self::RsaV1_5Sha256 => &RSA_PKCS1_SHA256,
        }
    }

    fn verification(self) -> &'static dyn VerificationAlgorithm {
        match self {
            Self::RsaPssSha512 => &RSA_PSS_2048_8192_SHA512,
            Self::RsaV1_5Sha256 => &RSA_PKCS1_2048_8192_SHA256,
        }
    }
}

impl SignatureAlgorithm for Algorithm {
    fn name(&self) -> &'static str {
        (*self).into()
    }

    fn sign(&self, key: &SigningKey, msg: &[u8]) -> Result<Vec<u8>, Unspecified> {
        let key_pair = key.key_pair();
        let mut buf = vec![0; key_pair.public().modulus_len()];

        let rng = SystemRandom::new();
        key_pair.sign(self.encoding(), &rng, msg, &mut buf)?;

        Ok(buf)
    }

    fn verify(&self, key: &VerifyingKey, msg: &[u8], signature: &[u8]) -> bool {
        UnparsedPublicKey::new(self.verification(), key.as_der())
            .verify(msg, signature)
            .is_ok()
    }
}
