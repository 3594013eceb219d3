//!
//! Bare item types
//!
//! Every scalar is validated when constructed, so serialising a value never fails
//!

use crate::error::{ErrorKind, ParseError};
use std::{borrow::Borrow, fmt, str::FromStr};

/// Largest magnitude an integer is allowed to have (15 digits)
const MAX_INTEGER: i64 = 999_999_999_999_999;

/// Largest magnitude of a decimal, in thousandths (12 integral digits, 3 fractional digits)
const MAX_DECIMAL_THOUSANDTHS: i64 = 999_999_999_999_999;

fn is_key_start(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte == b'*'
}

fn is_key_char(byte: u8) -> bool {
    byte.is_ascii_lowercase() || byte.is_ascii_digit() || matches!(byte, b'_' | b'-' | b'.' | b'*')
}

fn is_token_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'*'
}

fn is_token_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
                | b':'
                | b'/'
        )
}

/// Dictionary or parameter key
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Key as string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Key {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let is_valid = match s.as_bytes() {
            [first, rest @ ..] => is_key_start(*first) && rest.iter().copied().all(is_key_char),
            [] => false,
        };

        if is_valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseError::new(ErrorKind::InvalidKey, 0..s.len()))
        }
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token (an unquoted, case-sensitive identifier)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub(crate) fn new_unchecked(raw: &str) -> Self {
        Self(raw.to_owned())
    }

    /// Token as string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let is_valid = match s.as_bytes() {
            [first, rest @ ..] => {
                is_token_start(*first) && rest.iter().copied().all(is_token_char)
            }
            [] => false,
        };

        if is_valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseError::new(ErrorKind::InvalidToken, 0..s.len()))
        }
    }
}

/// String (printable ASCII only)
///
/// Holds the unescaped content. Quoting happens on serialisation
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SfString(String);

impl SfString {
    pub(crate) fn new_unchecked(content: String) -> Self {
        Self(content)
    }

    /// Unescaped content
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SfString {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(position) = s.bytes().position(|byte| !(0x20..=0x7e).contains(&byte)) {
            return Err(ParseError::new(
                ErrorKind::InvalidString,
                position..position + 1,
            ));
        }

        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for SfString {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse::<Self>()?;
        Ok(Self(value))
    }
}

/// Integer in the range of ±999,999,999,999,999
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Integer(i64);

impl Integer {
    /// The integer value
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Integer {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (-MAX_INTEGER..=MAX_INTEGER).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ParseError::new(ErrorKind::IntegerOutOfRange, 0..0))
        }
    }
}

impl TryFrom<u64> for Integer {
    type Error = ParseError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map_err(|_| ParseError::new(ErrorKind::IntegerOutOfRange, 0..0))
            .and_then(Self::try_from)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self(value.into())
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Self(value.into())
    }
}

/// Decimal with at most 12 integral and 3 fractional digits
///
/// Stored as an exact number of thousandths so equality and round-trips are lossless
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decimal(i64);

impl Decimal {
    /// Construct a decimal from a number of thousandths (`1500` is `1.5`)
    pub fn from_thousandths(thousandths: i64) -> Result<Self, ParseError> {
        if (-MAX_DECIMAL_THOUSANDTHS..=MAX_DECIMAL_THOUSANDTHS).contains(&thousandths) {
            Ok(Self(thousandths))
        } else {
            Err(ParseError::new(ErrorKind::DecimalOutOfRange, 0..0))
        }
    }

    /// Value in thousandths
    #[must_use]
    pub fn thousandths(self) -> i64 {
        self.0
    }

    /// Lossy conversion into a float
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl TryFrom<f64> for Decimal {
    type Error = ParseError;

    /// Rounds to three fractional digits
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let scaled = (value * 1000.0).round();
        if !scaled.is_finite() || scaled.abs() > MAX_DECIMAL_THOUSANDTHS as f64 {
            return Err(ParseError::new(ErrorKind::DecimalOutOfRange, 0..0));
        }

        Self::from_thousandths(scaled as i64)
    }
}

/// Value of an item or parameter
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BareItem {
    /// Boolean (`?1`/`?0`)
    Boolean(bool),

    /// Raw bytes, Base64 encoded on the wire
    ByteSequence(Vec<u8>),

    /// Decimal
    Decimal(Decimal),

    /// Integer
    Integer(Integer),

    /// Quoted string
    String(SfString),

    /// Token
    Token(Token),
}

impl BareItem {
    /// Boolean value, if this is a boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Bytes, if this is a byte sequence
    #[must_use]
    pub fn as_byte_sequence(&self) -> Option<&[u8]> {
        match self {
            Self::ByteSequence(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Decimal value, if this is a decimal
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(decimal) => Some(*decimal),
            _ => None,
        }
    }

    /// Integer value, if this is an integer
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(integer) => Some(integer.get()),
            _ => None,
        }
    }

    /// String content, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string.as_str()),
            _ => None,
        }
    }

    /// Token content, if this is a token
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(token) => Some(token.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for BareItem {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<u8>> for BareItem {
    fn from(value: Vec<u8>) -> Self {
        Self::ByteSequence(value)
    }
}

impl From<Decimal> for BareItem {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Integer> for BareItem {
    fn from(value: Integer) -> Self {
        Self::Integer(value)
    }
}

impl From<SfString> for BareItem {
    fn from(value: SfString) -> Self {
        Self::String(value)
    }
}

impl From<Token> for BareItem {
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}

#[cfg(test)]
mod test {
    use super::{Decimal, Integer, Key, SfString, Token};
    use crate::ErrorKind;

    #[test]
    fn key_grammar() {
        assert!("alg".parse::<Key>().is_ok());
        assert!("*x_1.-*".parse::<Key>().is_ok());

        for invalid in ["", "Alg", "1a", "a b", "a:b", "-a"] {
            let err = invalid.parse::<Key>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidKey, "{invalid:?}");
        }
    }

    #[test]
    fn token_grammar() {
        assert!("text/html".parse::<Token>().is_ok());
        assert!("*foo:bar".parse::<Token>().is_ok());
        assert!("1foo".parse::<Token>().is_err());
        assert!("foo bar".parse::<Token>().is_err());
    }

    #[test]
    fn string_rejects_control_characters() {
        assert!(r#"say "hi" \o/"#.parse::<SfString>().is_ok());

        let err = "line\nbreak".parse::<SfString>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidString);
        assert!("ünïcödé".parse::<SfString>().is_err());
    }

    #[test]
    fn integer_range() {
        assert!(Integer::try_from(999_999_999_999_999_i64).is_ok());
        assert!(Integer::try_from(-999_999_999_999_999_i64).is_ok());
        assert!(Integer::try_from(1_000_000_000_000_000_i64).is_err());
        assert!(Integer::try_from(u64::MAX).is_err());
    }

    #[test]
    fn decimal_from_float() {
        assert_eq!(Decimal::try_from(1.5).unwrap().thousandths(), 1500);
        assert_eq!(Decimal::try_from(-0.0004).unwrap().thousandths(), 0);
        assert_eq!(Decimal::try_from(2.2506).unwrap().thousandths(), 2251);
        assert!(Decimal::try_from(f64::NAN).is_err());
        assert!(Decimal::try_from(1e13).is_err());
    }
}
