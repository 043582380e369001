use std::fmt::Write as _;
use std::io;

use tracing::warn;

use crate::http::connection::ByteStream;
use crate::http::headers::{CapacityError, is_value_byte};
use crate::http::response::{Response, StatusCode};
use crate::limits::MAX_RESPONSE_LENGTH;

const HTTP_VERSION: &str = "HTTP/1.1";

type ResponseBuffer = heapless::Vec<u8, MAX_RESPONSE_LENGTH>;

/// Fills in whatever the handler left unset.
fn finalize(resp: &mut Response) {
    if resp.code == 0 {
        warn!("No status code set, sending 204");
        resp.code = StatusCode::NoContent.as_u16();
    }
    if resp.status.bytes().any(|b| !is_value_byte(b)) {
        warn!(code = resp.code, "Status message holds control characters, dropping them");
        let (code, status) = (resp.code, resp.status.clone());
        resp.set_code(code, &status);
    }
    if resp.status.is_empty() {
        warn!(code = resp.code, "No status message set, sending \"No Content\"");
        let code = resp.code;
        resp.set_code(code, StatusCode::NoContent.reason_phrase());
    }
}

fn put(buf: &mut ResponseBuffer, bytes: &[u8]) -> Result<(), CapacityError> {
    buf.extend_from_slice(bytes)
        .map_err(|_| CapacityError::TooLong)
}

fn put_header(buf: &mut ResponseBuffer, key: &str, val: &str) -> Result<(), CapacityError> {
    put(buf, key.as_bytes())?;
    put(buf, b": ")?;
    put(buf, val.as_bytes())?;
    put(buf, b"\r\n")
}

fn decimal(n: usize) -> heapless::String<20> {
    let mut digits = heapless::String::new();
    // 20 digits hold any u64.
    let _ = write!(digits, "{n}");
    digits
}

/// Headers the writer owns. A handler's copies are never sent.
fn is_framing_header(key: &str) -> bool {
    key.eq_ignore_ascii_case("Connection") || key.eq_ignore_ascii_case("Content-Length")
}

/// Serializes a finalized response.
///
/// The handler's headers come first, in the order they were appended, then
/// `Connection: close` and `Content-Length`, which every response carries.
/// Handler-set `Connection` or `Content-Length` headers are left out.
/// The body is sent as is.
fn serialize_response(resp: &Response) -> Result<ResponseBuffer, CapacityError> {
    let mut buf = ResponseBuffer::new();

    // Status line
    put(&mut buf, HTTP_VERSION.as_bytes())?;
    put(&mut buf, b" ")?;
    put(&mut buf, decimal(usize::from(resp.code)).as_bytes())?;
    put(&mut buf, b" ")?;
    put(&mut buf, resp.status.as_bytes())?;
    put(&mut buf, b"\r\n")?;

    // Headers
    for header in resp.headers.iter().filter(|h| !is_framing_header(h.key())) {
        put_header(&mut buf, header.key(), header.val())?;
    }
    put_header(&mut buf, "Connection", "close")?;
    put_header(&mut buf, "Content-Length", &decimal(resp.body.len()))?;

    // Header/body separator
    put(&mut buf, b"\r\n")?;

    // Body
    put(&mut buf, &resp.body)?;

    Ok(buf)
}

/// A response rendered to wire bytes, ready to be sent.
pub struct ResponseWriter {
    buffer: ResponseBuffer,
}

impl ResponseWriter {
    /// Defaults unset fields of `response` to `204 No Content` and renders it.
    pub fn new(response: &mut Response) -> Result<Self, CapacityError> {
        finalize(response);
        Ok(Self {
            buffer: serialize_response(response)?,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_stream<S: ByteStream>(&self, stream: &mut S) -> io::Result<()> {
        stream.write_all(&self.buffer).await
    }
}

/// Renders and sends `response` in one go.
pub async fn write_response<S: ByteStream>(
    response: &mut Response,
    stream: &mut S,
) -> io::Result<()> {
    let writer = ResponseWriter::new(response).map_err(io::Error::other)?;
    writer.write_to_stream(stream).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_renders_without_padding() {
        assert_eq!(decimal(0).as_str(), "0");
        assert_eq!(decimal(1024).as_str(), "1024");
    }

    #[test]
    fn finalize_keeps_handler_values() {
        let mut resp = Response::new();
        resp.set_code(418, "I'm a teapot");

        finalize(&mut resp);

        assert_eq!(resp.code, 418);
        assert_eq!(resp.status.as_str(), "I'm a teapot");
    }

    #[test]
    fn finalize_keeps_code_when_only_status_missing() {
        let mut resp = Response::new();
        resp.code = 200;

        finalize(&mut resp);

        assert_eq!(resp.code, 200);
        assert_eq!(resp.status.as_str(), "No Content");
    }

    #[test]
    fn framing_headers_match_any_case() {
        assert!(is_framing_header("content-length"));
        assert!(is_framing_header("CONNECTION"));
        assert!(!is_framing_header("Content-Type"));
    }

    #[test]
    fn finalize_strips_control_characters_from_status() {
        let mut resp = Response::new();
        resp.code = 200;
        resp.status.push_str("OK\r\nX-Evil: 1").unwrap();

        finalize(&mut resp);

        assert_eq!(resp.status.as_str(), "OKX-Evil: 1");
    }
}
