//! Memory bounds for a single request.
//!
//! Every container used while serving a request has a capacity fixed at
//! compile time by the constants below. [`Limits`] lets configuration lower
//! those capacities at runtime, never raise them: each value is clamped to
//! its compile-time maximum when it is used.

use serde::Deserialize;
use std::time::Duration;

/// Longest accepted HTTP verb, in bytes.
pub const MAX_VERB_LENGTH: usize = 9;
/// Longest accepted request path, in bytes.
pub const MAX_PATH_LENGTH: usize = 128;
/// Longest header key or header value, in bytes.
pub const MAX_HEADER_LENGTH: usize = 128;
/// Most headers a request or response can carry.
pub const MAX_HEADER_COUNT: usize = 10;
/// Largest request or response body, in bytes.
pub const MAX_BODY_LENGTH: usize = 1024;
/// Most handlers a registry can hold.
pub const MAX_HANDLERS: usize = 16;
/// Longest response reason phrase, in bytes.
pub const MAX_STATUS_LENGTH: usize = 21;

/// Longest raw header line: key, separator, value and surrounding whitespace.
pub const MAX_HEADER_LINE_LENGTH: usize = 2 * MAX_HEADER_LENGTH + 4;

/// Upper bound on a serialized response.
///
/// Status line, the handler's headers plus `Connection` and `Content-Length`,
/// the blank line and the body.
pub const MAX_RESPONSE_LENGTH: usize =
    64 + (MAX_HEADER_COUNT + 2) * (MAX_HEADER_LENGTH * 2 + 4) + 2 + MAX_BODY_LENGTH;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime limits applied to each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Headers accepted per request (default and maximum: [`MAX_HEADER_COUNT`]).
    pub header_count: usize,

    /// Body bytes accepted per request (default and maximum: [`MAX_BODY_LENGTH`]).
    ///
    /// A larger body is answered with `413` and the connection is closed.
    pub body_length: usize,

    /// Handlers the registry accepts (default and maximum: [`MAX_HANDLERS`]).
    pub handler_count: usize,

    /// How long a single read may wait for the client, in milliseconds
    /// (default: 5000). A stalled client gets `408`.
    pub read_timeout_ms: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            header_count: MAX_HEADER_COUNT,
            body_length: MAX_BODY_LENGTH,
            handler_count: MAX_HANDLERS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Limits {
    pub fn header_count(&self) -> usize {
        self.header_count.min(MAX_HEADER_COUNT)
    }

    pub fn body_length(&self) -> usize {
        self.body_length.min(MAX_BODY_LENGTH)
    }

    pub fn handler_count(&self) -> usize {
        self.handler_count.min(MAX_HANDLERS)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_limits_never_exceed_capacity() {
        let limits = Limits {
            header_count: 64,
            body_length: 1 << 20,
            handler_count: 100,
            read_timeout_ms: 10,
        };

        assert_eq!(limits.header_count(), MAX_HEADER_COUNT);
        assert_eq!(limits.body_length(), MAX_BODY_LENGTH);
        assert_eq!(limits.handler_count(), MAX_HANDLERS);
        assert_eq!(limits.read_timeout(), Duration::from_millis(10));
    }

    #[test]
    fn lower_limits_are_kept() {
        let limits = Limits {
            header_count: 2,
            body_length: 16,
            ..Limits::default()
        };

        assert_eq!(limits.header_count(), 2);
        assert_eq!(limits.body_length(), 16);
    }
}
