use std::{fmt, io};

use crate::http::connection::{ByteStream, ReadUntil};
use crate::http::headers::HeaderLine;
use crate::http::request::{Request, is_token_byte};
use crate::http::response::StatusCode;
use crate::limits::{Limits, MAX_BODY_LENGTH};

/// Longest `HTTP/x.y` remainder of the request line we are willing to skip.
const MAX_VERSION_LENGTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed request line or header line.
    BadRequest,
    VerbTooLong,
    PathTooLong,
    HeaderTooLong,
    TooManyHeaders,
    /// More body bytes than the body buffer holds.
    BodyTooLarge,
    /// The client stopped sending before the request was complete.
    Timeout,
}

impl ParseError {
    /// The status code the client is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::BadRequest => StatusCode::BadRequest,
            ParseError::VerbTooLong
            | ParseError::PathTooLong
            | ParseError::HeaderTooLong
            | ParseError::TooManyHeaders => StatusCode::InternalServerError,
            ParseError::BodyTooLarge => StatusCode::ContentTooLarge,
            ParseError::Timeout => StatusCode::RequestTimeout,
        }
    }

    /// Whether the connection must be dropped after answering.
    pub fn closes_connection(&self) -> bool {
        matches!(self, ParseError::BodyTooLarge)
    }

    pub(crate) fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut => ParseError::Timeout,
            _ => ParseError::BadRequest,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::BadRequest => "malformed request",
            ParseError::VerbTooLong => "verb exceeds capacity",
            ParseError::PathTooLong => "path exceeds capacity",
            ParseError::HeaderTooLong => "header line exceeds capacity",
            ParseError::TooManyHeaders => "too many headers",
            ParseError::BodyTooLarge => "body exceeds capacity",
            ParseError::Timeout => "timed out waiting for client",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Where the parser is within a request.
///
/// ```text
/// Start → Verb → Path → RestOfLine → Headers* → Body → Done
///           └──────┴────────┴───────────┴────────┴──→ Failed(error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Start,
    Verb,
    Path,
    RestOfLine,
    Headers,
    Body,
    Done,
    Failed(ParseError),
}

/// Reads one request from a [`ByteStream`], strictly front to back.
#[derive(Debug, Clone)]
pub struct RequestParser {
    limits: Limits,
    state: ParseState,
}

impl RequestParser {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            state: ParseState::Start,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub async fn parse<S: ByteStream>(&mut self, stream: &mut S) -> Result<Request, ParseError> {
        let mut request = Request::empty(self.limits.header_count());
        self.state = ParseState::Start;

        match self.drive(stream, &mut request).await {
            Ok(()) => Ok(request),
            Err(err) => {
                self.state = ParseState::Failed(err);
                Err(err)
            }
        }
    }

    async fn drive<S: ByteStream>(
        &mut self,
        stream: &mut S,
        request: &mut Request,
    ) -> Result<(), ParseError> {
        loop {
            self.state = match self.state {
                ParseState::Start => ParseState::Verb,
                ParseState::Verb => {
                    read_token(stream, &mut request.verb, ParseError::VerbTooLong).await?;
                    ParseState::Path
                }
                ParseState::Path => {
                    read_token(stream, &mut request.path, ParseError::PathTooLong).await?;
                    ParseState::RestOfLine
                }
                ParseState::RestOfLine => {
                    skip_line(stream).await?;
                    ParseState::Headers
                }
                ParseState::Headers => match request.headers.read_line(stream).await? {
                    HeaderLine::Header(_) => ParseState::Headers,
                    HeaderLine::End => ParseState::Body,
                },
                ParseState::Body => {
                    read_body(stream, &mut request.body, self.limits.body_length()).await?;
                    ParseState::Done
                }
                ParseState::Done => return Ok(()),
                ParseState::Failed(err) => return Err(err),
            };
        }
    }
}

/// Reads a space-terminated request-line token.
async fn read_token<S: ByteStream, const N: usize>(
    stream: &mut S,
    out: &mut heapless::String<N>,
    overflow: ParseError,
) -> Result<(), ParseError> {
    loop {
        match stream.read_byte().await.map_err(ParseError::from_io)? {
            None => return Err(ParseError::BadRequest),
            Some(b' ') if !out.is_empty() => return Ok(()),
            // Covers a line break before the delimiter and a leading space.
            Some(byte) if !is_token_byte(byte) => return Err(ParseError::BadRequest),
            Some(byte) => out.push(char::from(byte)).map_err(|_| overflow)?,
        }
    }
}

/// Discards the protocol version and the line ending.
async fn skip_line<S: ByteStream>(stream: &mut S) -> Result<(), ParseError> {
    let mut scratch = [0u8; MAX_VERSION_LENGTH];
    match stream
        .read_until(b'\n', &mut scratch)
        .await
        .map_err(ParseError::from_io)?
    {
        ReadUntil::Found(_) => Ok(()),
        ReadUntil::Eof(_) | ReadUntil::Overflow(_) => Err(ParseError::BadRequest),
    }
}

/// Copies whatever the client has already sent, up to `limit` bytes.
///
/// There is no Content-Length framing: the body ends when the stream has
/// nothing more available.
async fn read_body<S: ByteStream>(
    stream: &mut S,
    body: &mut heapless::Vec<u8, MAX_BODY_LENGTH>,
    limit: usize,
) -> Result<(), ParseError> {
    while stream.available() > 0 {
        if body.len() >= limit {
            return Err(ParseError::BodyTooLarge);
        }
        match stream.read_byte().await.map_err(ParseError::from_io)? {
            Some(byte) => body.push(byte).map_err(|_| ParseError::BodyTooLarge)?,
            None => break,
        }
    }
    Ok(())
}
