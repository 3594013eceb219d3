use http::{
    header::{InvalidHeaderName, InvalidHeaderValue},
    method::InvalidMethod,
    status::InvalidStatusCode,
};
use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification of an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "easy", derive(serde::Serialize))]
#[cfg_attr(feature = "easy", serde(rename_all = "kebab-case"))]
pub enum ErrorKind {
    /// The cryptographic primitive failed
    Crypto,

    /// Signature material is missing, malformed or doesn't line up with its input
    InvalidSignature,

    /// Key couldn't be imported in any of the supported encodings
    KeyImport,

    /// Covered component isn't present in the message
    MissingComponent,

    /// Malformed structured field or HTTP message
    Parse,

    /// Algorithm is unknown, missing or conflicting
    UnsupportedAlgorithm,

    /// Covered component isn't supported
    UnsupportedComponent,
}

/// HTTP message signature error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// The signature parameters declare a different algorithm than the one requested
    #[error("Algorithm mismatch (parameters declare {declared:?}, requested {requested:?})")]
    AlgorithmMismatch {
        /// Algorithm found in the `alg` parameter
        declared: String,

        /// Algorithm the caller asked for
        requested: String,
    },

    /// Header had an invalid value (non UTF-8 value)
    #[error("Header value isn't valid UTF-8")]
    HeaderUtf8(#[from] std::str::Utf8Error),

    /// HTTP message ended before its header section was complete
    #[error("Incomplete HTTP message")]
    IncompleteMessage,

    #[error(transparent)]
    InvalidHeaderName(#[from] InvalidHeaderName),

    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    #[error(transparent)]
    InvalidMethod(#[from] InvalidMethod),

    /// `Signature` dictionary entry isn't a byte sequence
    #[error("Invalid signature for label {0:?}")]
    InvalidSignature(String),

    /// `Signature-Input` dictionary entry isn't an inner list
    #[error("Invalid signature input for label {0:?}")]
    InvalidSignatureInput(String),

    /// Signature parameters contain something that isn't a component identifier
    #[error("Invalid signature parameters: {0}")]
    InvalidSignatureParams(String),

    #[error(transparent)]
    InvalidStatusCode(#[from] InvalidStatusCode),

    /// Key import failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    KeyImport(#[from] crate::crypto::parse::Error),

    /// Wire-level parsing of the HTTP message failed
    #[error("Malformed HTTP message: {0}")]
    MalformedMessage(#[from] httparse::Error),

    /// Signature parameters carry no `alg` parameter
    #[error("Missing algorithm")]
    MissingAlgorithm,

    /// Covered component is absent from the message
    #[error("Missing component {0:?}")]
    MissingComponent(String),

    /// `Signature-Input` names a label that has no `Signature` entry
    #[error("Missing signature for label {0:?}")]
    MissingSignature(String),

    /// There was nothing to verify
    #[error("No signatures present")]
    NoSignatures,

    /// Structured field parsing failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] structured_fields::ParseError),

    /// Creating the signature failed
    #[error("Signing failed")]
    Signing(#[from] ring::error::Unspecified),

    /// Algorithm identifier isn't in the registry
    #[error("Unsupported algorithm {0:?}")]
    UnsupportedAlgorithm(String),

    /// Derived component we don't know how to resolve
    #[error("Unsupported component {0:?}")]
    UnsupportedComponent(String),
}

impl Error {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HeaderUtf8(..)
            | Self::IncompleteMessage
            | Self::InvalidHeaderName(..)
            | Self::InvalidHeaderValue(..)
            | Self::InvalidMethod(..)
            | Self::InvalidSignatureInput(..)
            | Self::InvalidSignatureParams(..)
            | Self::InvalidStatusCode(..)
            | Self::MalformedMessage(..)
            | Self::Parse(..) => ErrorKind::Parse,
            Self::InvalidSignature(..) | Self::MissingSignature(..) | Self::NoSignatures => {
                ErrorKind::InvalidSignature
            }
            Self::KeyImport(..) => ErrorKind::KeyImport,
            Self::MissingComponent(..) => ErrorKind::MissingComponent,
            Self::AlgorithmMismatch { .. }
            | Self::MissingAlgorithm
            | Self::UnsupportedAlgorithm(..) => ErrorKind::UnsupportedAlgorithm,
            Self::Signing(..) => ErrorKind::Crypto,
            Self::UnsupportedComponent(..) => ErrorKind::UnsupportedComponent,
        }
    }
}
