//!
//! Read-only view of an HTTP message
//!

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use tracing::debug;

/// Upper bound of header fields read from a raw message
const MAX_HEADERS: usize = 128;

/// Terminator of the header section
const END_OF_HEADERS: &[u8] = b"\r\n\r\n";

/// Start line of the message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartLine {
    /// Request line
    Request {
        /// Request method
        method: Method,

        /// Path of the request target
        path: String,

        /// Query of the request target, without the leading `?`
        query: Option<String>,
    },

    /// Status line
    Response {
        /// Status code
        status: StatusCode,
    },
}

/// HTTP message the signature is computed over
///
/// Header field names are case-insensitive, values keep their field line order
#[derive(Clone, Debug)]
pub struct Message {
    start_line: StartLine,
    headers: HeaderMap,
}

impl Message {
    /// Parse the header section of a raw HTTP/1.x message
    ///
    /// A message that starts with `HTTP/` is treated as a response, everything else as a request.
    /// Input that ends before the empty line is treated as a complete header section.
    /// Obsolete line folding is rejected. The body is ignored.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if let Some(message) = parse_head(raw)? {
            return Ok(message);
        }

        debug!("header section not terminated, terminating it ourselves");
        let mut terminated = raw.to_vec();
        terminated.extend_from_slice(END_OF_HEADERS);
        parse_head(&terminated)?.ok_or(Error::IncompleteMessage)
    }

    /// Start line of the message
    #[must_use]
    pub fn start_line(&self) -> &StartLine {
        &self.start_line
    }

    /// Header fields of the message
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Is this a response?
    #[must_use]
    pub fn is_response(&self) -> bool {
        matches!(self.start_line, StartLine::Response { .. })
    }

    /// Request method
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        match self.start_line {
            StartLine::Request { ref method, .. } => Some(method),
            StartLine::Response { .. } => None,
        }
    }

    /// Path of the request target
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self.start_line {
            StartLine::Request { ref path, .. } => Some(path),
            StartLine::Response { .. } => None,
        }
    }

    /// Query of the request target
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match self.start_line {
            StartLine::Request { ref query, .. } => query.as_deref(),
            StartLine::Response { .. } => None,
        }
    }

    /// Response status code
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.start_line {
            StartLine::Request { .. } => None,
            StartLine::Response { status } => Some(status),
        }
    }

    /// Lowercased method, a space, the path and, if present, `?` followed by the query
    #[must_use]
    pub fn request_target(&self) -> Option<String> {
        let StartLine::Request {
            ref method,
            ref path,
            ref query,
        } = self.start_line
        else {
            return None;
        };

        let mut request_target = format!("{} {path}", method.as_str().to_lowercase());
        if let Some(query) = query {
            request_target.push('?');
            request_target.push_str(query);
        }

        Some(request_target)
    }

    /// Names of all header fields, lowercased, in order of first appearance
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(HeaderName::as_str)
    }

    /// Value of a header field
    ///
    /// Each field line is trimmed. Multiple field lines are combined with `, ` in message order.
    /// Values only have to be valid UTF-8
    pub fn header(&self, name: &str) -> Result<Option<String>> {
        let mut values = self.headers.get_all(name).iter().peekable();
        if values.peek().is_none() {
            return Ok(None);
        }

        let values = values
            .map(|value| std::str::from_utf8(value.as_bytes()).map(str::trim))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(itertools::intersperse(values, ", ").collect()))
    }
}

impl Message {
    fn from_request_head(method: &Method, uri: &http::Uri, headers: &HeaderMap) -> Self {
        Self {
            start_line: StartLine::Request {
                method: method.clone(),
                path: uri.path().to_owned(),
                query: uri
                    .query()
                    .filter(|query| !query.is_empty())
                    .map(str::to_owned),
            },
            headers: headers.clone(),
        }
    }

    fn from_response_head(status: StatusCode, headers: &HeaderMap) -> Self {
        Self {
            start_line: StartLine::Response { status },
            headers: headers.clone(),
        }
    }
}

impl From<&http::request::Parts> for Message {
    fn from(value: &http::request::Parts) -> Self {
        Self::from_request_head(&value.method, &value.uri, &value.headers)
    }
}

impl<B> From<&http::Request<B>> for Message {
    fn from(value: &http::Request<B>) -> Self {
        Self::from_request_head(value.method(), value.uri(), value.headers())
    }
}

impl From<&http::response::Parts> for Message {
    fn from(value: &http::response::Parts) -> Self {
        Self::from_response_head(value.status, &value.headers)
    }
}

impl<B> From<&http::Response<B>> for Message {
    fn from(value: &http::Response<B>) -> Self {
        Self::from_response_head(value.status(), value.headers())
    }
}

fn collect_headers(fields: &[httparse::Header<'_>]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(fields.len());
    for field in fields {
        headers.append(
            HeaderName::from_bytes(field.name.as_bytes())?,
            HeaderValue::from_bytes(field.value)?,
        );
    }

    Ok(headers)
}

/// Parse the head of the message. `None` means the header section is incomplete
fn parse_head(raw: &[u8]) -> Result<Option<Message>> {
    let mut fields = [httparse::EMPTY_HEADER; MAX_HEADERS];

    let message = if raw.starts_with(b"HTTP/") {
        let mut response = httparse::Response::new(&mut fields);
        if response.parse(raw)?.is_partial() {
            return Ok(None);
        }

        let status = StatusCode::from_u16(response.code.unwrap_or_default())?;
        Message {
            start_line: StartLine::Response { status },
            headers: collect_headers(response.headers)?,
        }
    } else {
        let mut request = httparse::Request::new(&mut fields);
        if request.parse(raw)?.is_partial() {
            return Ok(None);
        }

        let method = Method::from_bytes(request.method.unwrap_or_default().as_bytes())?;
        let target = request.path.unwrap_or_default();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query).filter(|query| !query.is_empty())),
            None => (target, None),
        };

        Message {
            start_line: StartLine::Request {
                method,
                path: path.to_owned(),
                query: query.map(str::to_owned),
            },
            headers: collect_headers(request.headers)?,
        }
    };

    Ok(Some(message))
}
