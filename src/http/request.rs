use crate::http::headers::{CapacityError, HeaderSet};
use crate::http::parser::ParseError;
use crate::limits::{MAX_BODY_LENGTH, MAX_HEADER_COUNT, MAX_PATH_LENGTH, MAX_VERB_LENGTH};

/// Represents a parsed HTTP request from a client.
///
/// Every part lives in a fixed-capacity buffer, so a request never takes
/// more memory than the limits in [`crate::limits`] allow. Handlers only ever
/// see it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub(crate) verb: heapless::String<MAX_VERB_LENGTH>,
    pub(crate) path: heapless::String<MAX_PATH_LENGTH>,
    pub(crate) headers: HeaderSet,
    pub(crate) body: heapless::Vec<u8, MAX_BODY_LENGTH>,
}

impl Request {
    pub(crate) fn empty(header_capacity: usize) -> Self {
        Self {
            verb: heapless::String::new(),
            path: heapless::String::new(),
            headers: HeaderSet::with_capacity(header_capacity),
            body: heapless::Vec::new(),
        }
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    /// The method token, e.g. `GET`.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Value of the first header named exactly `key`.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, if it is valid UTF-8.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Builder for constructing Request objects outside the parser.
///
/// Applies the same validation the parser does; the first problem found is
/// reported by [`RequestBuilder::build`].
pub struct RequestBuilder {
    request: Request,
    error: Option<ParseError>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            request: Request::empty(MAX_HEADER_COUNT),
            error: None,
        }
    }

    pub fn verb(mut self, verb: &str) -> Self {
        self.request.verb.clear();
        if let Err(err) = push_token(&mut self.request.verb, verb, ParseError::VerbTooLong) {
            self.fail(err);
        }
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.request.path.clear();
        if let Err(err) = push_token(&mut self.request.path, path, ParseError::PathTooLong) {
            self.fail(err);
        }
        self
    }

    pub fn header(mut self, key: &str, val: &str) -> Self {
        if let Err(err) = self.request.headers.append(key, val) {
            self.fail(match err {
                CapacityError::Full => ParseError::TooManyHeaders,
                CapacityError::TooLong => ParseError::HeaderTooLong,
                CapacityError::EmptyKey | CapacityError::EmptyValue | CapacityError::Invalid => {
                    ParseError::BadRequest
                }
            });
        }
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.request.body.clear();
        if self.request.body.extend_from_slice(body).is_err() {
            self.fail(ParseError::BodyTooLarge);
        }
        self
    }

    pub fn build(self) -> Result<Request, ParseError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.request.verb.is_empty() || self.request.path.is_empty() {
            return Err(ParseError::BadRequest);
        }
        Ok(self.request)
    }

    fn fail(&mut self, err: ParseError) {
        self.error.get_or_insert(err);
    }
}

/// Request-line tokens are printable ASCII without spaces.
pub(crate) fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_graphic()
}

fn push_token<const N: usize>(
    out: &mut heapless::String<N>,
    token: &str,
    overflow: ParseError,
) -> Result<(), ParseError> {
    if !token.bytes().all(is_token_byte) {
        return Err(ParseError::BadRequest);
    }
    out.push_str(token).map_err(|_| overflow)
}
