use crate::http::headers::{CapacityError, HeaderSet};
use crate::limits::{MAX_BODY_LENGTH, MAX_STATUS_LENGTH};

/// HTTP status codes the server produces itself or that handlers commonly set.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Resource created successfully
/// - `NoContent` (204): Successful request with no content
/// - `BadRequest` (400): Malformed request
/// - `NotFound` (404): No handler registered for the verb and path
/// - `MethodNotAllowed` (405): HTTP method not supported
/// - `RequestTimeout` (408): Client stopped sending mid-request
/// - `ContentTooLarge` (413): Body larger than the device can buffer
/// - `InternalServerError` (500): Capacity exhausted or handler failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    RequestTimeout,
    ContentTooLarge,
    InternalServerError,
}

impl StatusCode {
    /// The numeric code written on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use ninaweb::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::ContentTooLarge.as_u16(), 413);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::RequestTimeout => 408,
            StatusCode::ContentTooLarge => 413,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Standard reason phrase for the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use ninaweb::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::ContentTooLarge => "Content Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        let status = match code {
            200 => StatusCode::Ok,
            201 => StatusCode::Created,
            204 => StatusCode::NoContent,
            400 => StatusCode::BadRequest,
            404 => StatusCode::NotFound,
            405 => StatusCode::MethodNotAllowed,
            408 => StatusCode::RequestTimeout,
            413 => StatusCode::ContentTooLarge,
            500 => StatusCode::InternalServerError,
            _ => return None,
        };
        Some(status)
    }
}

/// The response a handler fills in.
///
/// Starts out with every field unset: `code` 0, empty `status`, no headers,
/// empty body. Whatever the handler leaves unset is defaulted by
/// [`ResponseWriter`](crate::http::writer::ResponseWriter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Numeric status code, 0 when unset.
    pub code: u16,
    /// Reason phrase, empty when unset.
    pub status: heapless::String<MAX_STATUS_LENGTH>,
    pub headers: HeaderSet,
    pub body: heapless::Vec<u8, MAX_BODY_LENGTH>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bodiless response carrying only a status, as sent for rejected requests.
    pub fn error(status: StatusCode) -> Self {
        let mut response = Self::new();
        response.set_status(status);
        response
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.set_code(status.as_u16(), status.reason_phrase());
    }

    /// Sets a status by number and reason.
    ///
    /// Control characters other than tab are dropped from `reason`. What
    /// remains is cut after the last character that fits in
    /// [`MAX_STATUS_LENGTH`] bytes.
    pub fn set_code(&mut self, code: u16, reason: &str) {
        self.code = code;
        self.status.clear();
        for c in reason.chars().filter(|&c| c == '\t' || !c.is_control()) {
            if self.status.push(c).is_err() {
                break;
            }
        }
    }

    pub fn append_header(&mut self, key: &str, val: &str) -> Result<(), CapacityError> {
        self.headers.append(key, val)
    }

    /// Replaces the body. On overflow the body is left empty.
    pub fn set_body(&mut self, body: &[u8]) -> Result<(), CapacityError> {
        self.body.clear();
        self.extend_body(body)
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), CapacityError> {
        self.set_body(text.as_bytes())
    }

    /// Appends to the body. On overflow the body is left unchanged.
    pub fn extend_body(&mut self, bytes: &[u8]) -> Result<(), CapacityError> {
        self.body
            .extend_from_slice(bytes)
            .map_err(|_| CapacityError::TooLong)
    }

    /// Returns every field to its unset state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
