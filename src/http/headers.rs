//! Bounded, insertion-ordered header storage.

use std::fmt;

use crate::http::connection::{ByteStream, ReadUntil};
use crate::http::parser::ParseError;
use crate::http::request::is_token_byte;
use crate::limits::{MAX_HEADER_COUNT, MAX_HEADER_LENGTH, MAX_HEADER_LINE_LENGTH};

type HeaderText = heapless::String<MAX_HEADER_LENGTH>;

/// Why a header could not be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// The set already holds as many headers as it can.
    Full,
    EmptyKey,
    EmptyValue,
    /// A key that is not a token, or a value holding control characters.
    Invalid,
    /// A key, value or body is longer than its buffer.
    TooLong,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CapacityError::Full => "header set is full",
            CapacityError::EmptyKey => "empty header key",
            CapacityError::EmptyValue => "empty header value",
            CapacityError::Invalid => "header contains forbidden characters",
            CapacityError::TooLong => "value exceeds buffer capacity",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CapacityError {}

/// A single `Key: Value` pair. Neither side is ever empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    key: HeaderText,
    val: HeaderText,
}

impl Header {
    pub fn new(key: &str, val: &str) -> Result<Self, CapacityError> {
        if key.is_empty() {
            return Err(CapacityError::EmptyKey);
        }
        if val.is_empty() {
            return Err(CapacityError::EmptyValue);
        }
        if !key.bytes().all(is_key_byte) || !val.bytes().all(is_value_byte) {
            return Err(CapacityError::Invalid);
        }

        let mut header = Header {
            key: HeaderText::new(),
            val: HeaderText::new(),
        };
        header
            .key
            .push_str(key)
            .map_err(|_| CapacityError::TooLong)?;
        header
            .val
            .push_str(val)
            .map_err(|_| CapacityError::TooLong)?;

        Ok(header)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn val(&self) -> &str {
        &self.val
    }
}

/// Outcome of reading one line of the header section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    /// A header was parsed and appended; the set now holds this many.
    Header(usize),
    /// The blank line ending the header section.
    End,
}

/// Headers in the order they were received or appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet {
    headers: heapless::Vec<Header, MAX_HEADER_COUNT>,
    capacity: usize,
}

impl Default for HeaderSet {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HEADER_COUNT)
    }

    /// A set accepting at most `capacity` headers, clamped to [`MAX_HEADER_COUNT`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            headers: heapless::Vec::new(),
            capacity: capacity.min(MAX_HEADER_COUNT),
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.headers.len() >= self.capacity
    }

    /// Appends a header after the existing ones.
    pub fn append(&mut self, key: &str, val: &str) -> Result<(), CapacityError> {
        if self.is_full() {
            return Err(CapacityError::Full);
        }
        let header = Header::new(key, val)?;
        self.headers.push(header).map_err(|_| CapacityError::Full)
    }

    /// Index of the first header whose key matches exactly.
    pub fn find(&self, key: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.key() == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|i| self.headers[i].val())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.headers.iter()
    }

    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Reads one header line from `stream` and appends it.
    ///
    /// A blank line (or the end of the stream) ends the header section. A
    /// non-blank line arriving when the set is already full fails with
    /// [`ParseError::TooManyHeaders`].
    pub async fn read_line<S: ByteStream>(
        &mut self,
        stream: &mut S,
    ) -> Result<HeaderLine, ParseError> {
        let mut buf = [0u8; MAX_HEADER_LINE_LENGTH];
        let len = match stream
            .read_until(b'\n', &mut buf)
            .await
            .map_err(ParseError::from_io)?
        {
            ReadUntil::Found(n) | ReadUntil::Eof(n) => n,
            ReadUntil::Overflow(_) => return Err(ParseError::HeaderTooLong),
        };

        let line = trim_cr(&buf[..len]);
        if line.is_empty() {
            return Ok(HeaderLine::End);
        }
        if self.is_full() {
            return Err(ParseError::TooManyHeaders);
        }

        let line = std::str::from_utf8(line).map_err(|_| ParseError::BadRequest)?;
        let (key, val) = line.split_once(':').ok_or(ParseError::BadRequest)?;

        self.append(key.trim(), val.trim()).map_err(|err| match err {
            CapacityError::Full => ParseError::TooManyHeaders,
            CapacityError::TooLong => ParseError::HeaderTooLong,
            CapacityError::EmptyKey | CapacityError::EmptyValue | CapacityError::Invalid => {
                ParseError::BadRequest
            }
        })?;

        Ok(HeaderLine::Header(self.len()))
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn is_key_byte(byte: u8) -> bool {
    is_token_byte(byte) && byte != b':'
}

/// Horizontal tab and anything that is not an ASCII control character.
pub(crate) fn is_value_byte(byte: u8) -> bool {
    byte == b'\t' || !byte.is_ascii_control()
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
