//!
//! Covered component identifiers and their resolution against a message
//!

use crate::{message::Message, Error, Result};
use http::HeaderName;
use std::fmt;
use structured_fields::SfString;

/// Identifier of the `@request-target` derived component
pub const REQUEST_TARGET: &str = "@request-target";

/// Identifier of the `@status-code` derived component
pub const STATUS_CODE: &str = "@status-code";

/// Covered component
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    /// `@request-target`: lowercased method, path and query of a request
    RequestTarget,

    /// `@status-code`: three digit status code of a response
    StatusCode,

    /// Header field, identified by its lowercased name
    Header(HeaderName),
}

impl Component {
    /// Parse a component identifier
    ///
    /// Header names are lowercased. Identifiers starting with `@` other than the ones this library
    /// can resolve are rejected.
    pub fn parse(id: &str) -> Result<Self> {
        match id {
            REQUEST_TARGET => Ok(Self::RequestTarget),
            STATUS_CODE => Ok(Self::StatusCode),
            derived if derived.starts_with('@') => {
                Err(Error::UnsupportedComponent(derived.to_owned()))
            }
            header => HeaderName::from_bytes(header.to_ascii_lowercase().as_bytes())
                .map(Self::Header)
                .map_err(|_| Error::UnsupportedComponent(header.to_owned())),
        }
    }

    /// Canonical identifier of the component
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::RequestTarget => REQUEST_TARGET,
            Self::StatusCode => STATUS_CODE,
            Self::Header(name) => name.as_str(),
        }
    }

    /// Identifier as it appears in the covered component list
    pub fn to_sf_string(&self) -> Result<SfString> {
        self.as_str().parse().map_err(Error::from)
    }

    /// Resolve the value of the component
    pub fn value(&self, message: &Message) -> Result<String> {
        let value = match self {
            Self::RequestTarget => message.request_target(),
            Self::StatusCode => message
                .status()
                .map(|status| status.as_str().to_owned()),
            Self::Header(name) => message.header(name.as_str())?,
        };

        value.ok_or_else(|| Error::MissingComponent(self.as_str().to_owned()))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::Component;
    use crate::{message::Message, ErrorKind};

    #[test]
    fn identifiers() {
        assert_eq!(
            Component::parse("@request-target").unwrap(),
            Component::RequestTarget
        );
        assert_eq!(Component::parse("@status-code").unwrap(), Component::StatusCode);
        assert_eq!(Component::parse("Content-Type").unwrap().as_str(), "content-type");

        let err = Component::parse("@method").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedComponent);
        let err = Component::parse("not a header").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedComponent);
    }

    #[test]
    fn derived_components_depend_on_message_kind() {
        let request = Message::parse(b"GET /foo HTTP/1.1\r\n\r\n").unwrap();
        let response = Message::parse(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();

        assert_eq!(Component::RequestTarget.value(&request).unwrap(), "get /foo");
        assert_eq!(Component::StatusCode.value(&response).unwrap(), "200");

        let err = Component::StatusCode.value(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingComponent);
        let err = Component::RequestTarget.value(&response).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingComponent);
    }
}
