//!
//! Structured Field Values for HTTP
//!
//! Parses and serialises items, inner lists, lists and dictionaries.
//! Serialisation is deterministic and `parse(serialise(value))` is structurally equal to `value`.
//!
//! ```
//! use structured_fields::{Dictionary, FieldValue};
//!
//! let dictionary = Dictionary::parse(r#"sig1=("@method" "host");created=1618884473"#).unwrap();
//! assert_eq!(
//!     dictionary.serialise(),
//!     r#"sig1=("@method" "host");created=1618884473"#
//! );
//! ```
//!

#![forbid(rust_2018_idioms)]

use indexmap::IndexMap;

pub use self::error::{ErrorKind, ParseError};
pub use self::item::{BareItem, Decimal, Integer, Key, SfString, Token};

mod error;
mod item;
mod parse;
mod serialise;

/// Ordered parameters of an item or inner list
pub type Parameters = IndexMap<Key, BareItem>;

/// List field value
pub type List = Vec<ListEntry>;

/// Dictionary field value. Ordered, lookup by key
pub type Dictionary = IndexMap<Key, ListEntry>;

/// Bare item with its parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// The value
    pub bare_item: BareItem,

    /// Parameters attached to the value
    pub params: Parameters,
}

impl Item {
    /// Item without any parameters
    #[must_use]
    pub fn new(bare_item: impl Into<BareItem>) -> Self {
        Self::with_params(bare_item, Parameters::new())
    }

    /// Item with parameters
    #[must_use]
    pub fn with_params(bare_item: impl Into<BareItem>, params: Parameters) -> Self {
        Self {
            bare_item: bare_item.into(),
            params,
        }
    }
}

/// Parenthesised list of items, with parameters attached to the list as a whole
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InnerList {
    /// Members of the list
    pub items: Vec<Item>,

    /// Parameters of the list
    pub params: Parameters,
}

impl InnerList {
    /// Inner list with parameters
    #[must_use]
    pub fn with_params(items: Vec<Item>, params: Parameters) -> Self {
        Self { items, params }
    }
}

/// Member of a list or dictionary
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEntry {
    /// Inner list
    InnerList(InnerList),

    /// Single item
    Item(Item),
}

impl From<InnerList> for ListEntry {
    fn from(value: InnerList) -> Self {
        Self::InnerList(value)
    }
}

impl From<Item> for ListEntry {
    fn from(value: Item) -> Self {
        Self::Item(value)
    }
}

/// Value that can be read from and written into a header field
pub trait FieldValue: Sized {
    /// Parse the value from the raw field value
    fn parse(input: &str) -> Result<Self, ParseError>;

    /// Serialise the value into its canonical field representation
    fn serialise(&self) -> String;
}

impl FieldValue for Item {
    fn parse(input: &str) -> Result<Self, ParseError> {
        self::parse::item(input)
    }

    fn serialise(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for InnerList {
    fn parse(input: &str) -> Result<Self, ParseError> {
        self::parse::inner_list(input)
    }

    fn serialise(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for List {
    fn parse(input: &str) -> Result<Self, ParseError> {
        self::parse::list(input)
    }

    fn serialise(&self) -> String {
        self::serialise::list(self)
    }
}

impl FieldValue for Dictionary {
    fn parse(input: &str) -> Result<Self, ParseError> {
        self::parse::dictionary(input)
    }

    fn serialise(&self) -> String {
        self::serialise::dictionary(self)
    }
}

/// Parse a field value of the requested type
#[inline]
pub fn parse<T>(input: &str) -> Result<T, ParseError>
where
    T: FieldValue,
{
    T::parse(input)
}

/// Serialise a field value
#[inline]
pub fn serialise<T>(value: &T) -> String
where
    T: FieldValue,
{
    value.serialise()
}
