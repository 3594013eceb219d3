use miette::{Diagnostic, SourceSpan};
use std::ops::Range;
use thiserror::Error;

/// Classification of a parsing failure
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Decimal has too many integral or fractional digits
    #[error("Decimal out of range")]
    DecimalOutOfRange,

    /// Integer has more than 15 digits
    #[error("Integer out of range")]
    IntegerOutOfRange,

    /// Byte sequence isn't valid Base64
    #[error("Malformed byte sequence")]
    InvalidByteSequence,

    /// Key doesn't match `[a-z*][a-z0-9_.*-]*`
    #[error("Invalid key")]
    InvalidKey,

    /// String contains characters outside of printable ASCII
    #[error("Invalid string")]
    InvalidString,

    /// Token contains characters not allowed in tokens
    #[error("Invalid token")]
    InvalidToken,

    /// Input continues after a complete field value
    #[error("Trailing characters after field value")]
    TrailingCharacters,

    /// Encountered a character or construct the grammar doesn't allow at this position
    #[error("Unexpected character")]
    UnexpectedCharacter,

    /// Input ended in the middle of a value
    #[error("Unexpected end of input")]
    UnexpectedEnd,
}

/// Structured field parsing error
///
/// Points at the offending byte range of the input so it can be rendered with `miette`
#[derive(Clone, Debug, Diagnostic, Error)]
#[error("{kind}")]
pub struct ParseError {
    kind: ErrorKind,

    #[label("here")]
    span: SourceSpan,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span: span.into(),
        }
    }

    /// What went wrong
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Where in the input it went wrong
    #[must_use]
    pub fn span(&self) -> SourceSpan {
        self.span
    }
}
