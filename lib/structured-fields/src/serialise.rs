use crate::{
    item::{BareItem, Decimal, Integer},
    Dictionary, InnerList, Item, List, ListEntry, Parameters,
};
use std::fmt::{self, Write};

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let thousandths = self.thousandths();
        if thousandths < 0 {
            f.write_char('-')?;
        }

        let magnitude = thousandths.unsigned_abs();
        let fraction = format!("{:03}", magnitude % 1000);
        let fraction = fraction.trim_end_matches('0');

        write!(
            f,
            "{}.{}",
            magnitude / 1000,
            if fraction.is_empty() { "0" } else { fraction }
        )
    }
}

impl fmt::Display for BareItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(true) => f.write_str("?1"),
            Self::Boolean(false) => f.write_str("?0"),
            Self::ByteSequence(bytes) => {
                write!(f, ":{}:", base64_simd::STANDARD.encode_to_string(bytes))
            }
            Self::Decimal(decimal) => fmt::Display::fmt(decimal, f),
            Self::Integer(integer) => fmt::Display::fmt(integer, f),
            Self::String(string) => {
                f.write_char('"')?;
                for c in string.as_str().chars() {
                    if matches!(c, '"' | '\\') {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('"')
            }
            Self::Token(token) => f.write_str(token.as_str()),
        }
    }
}

fn write_parameters(f: &mut fmt::Formatter<'_>, params: &Parameters) -> fmt::Result {
    for (key, value) in params {
        write!(f, ";{key}")?;

        // `true` is implied by a bare key
        if *value != BareItem::Boolean(true) {
            write!(f, "={value}")?;
        }
    }

    Ok(())
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bare_item, f)?;
        write_parameters(f, &self.params)
    }
}

impl fmt::Display for InnerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for (idx, item) in self.items.iter().enumerate() {
            if idx > 0 {
                f.write_char(' ')?;
            }
            fmt::Display::fmt(item, f)?;
        }
        f.write_char(')')?;

        write_parameters(f, &self.params)
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InnerList(inner_list) => fmt::Display::fmt(inner_list, f),
            Self::Item(item) => fmt::Display::fmt(item, f),
        }
    }
}

pub(crate) fn list(list: &List) -> String {
    let mut buffer = String::new();
    for (idx, entry) in list.iter().enumerate() {
        if idx > 0 {
            buffer.push_str(", ");
        }
        let _ = write!(buffer, "{entry}");
    }

    buffer
}

pub(crate) fn dictionary(dictionary: &Dictionary) -> String {
    let mut buffer = String::new();
    for (idx, (key, member)) in dictionary.iter().enumerate() {
        if idx > 0 {
            buffer.push_str(", ");
        }

        buffer.push_str(key.as_str());
        match member {
            ListEntry::Item(Item {
                bare_item: BareItem::Boolean(true),
                params,
            }) => {
                let _ = write!(buffer, "{}", DisplayParameters(params));
            }
            member => {
                let _ = write!(buffer, "={member}");
            }
        }
    }

    buffer
}

struct DisplayParameters<'a>(&'a Parameters);

impl fmt::Display for DisplayParameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_parameters(f, self.0)
    }
}
