//! HTTP/1.x protocol implementation.
//!
//! This module reads exactly one request per connection, under fixed memory
//! bounds, and writes exactly one response back. There is no keep-alive and
//! no chunked encoding.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The [`ByteStream`] abstraction over an accepted connection, with TCP and in-memory implementations
//! - **`headers`**: Bounded, insertion-ordered header storage and header-line parsing
//! - **`parser`**: The request state machine turning a byte stream into a [`Request`]
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation and status codes
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Request State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │    Verb     │ ← bytes up to the first space
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │    Path     │ ← bytes up to the next space
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │ RestOfLine  │ ← protocol version, discarded
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │  Headers    │ ← one `Key: Value` line at a time
//!        └──────┬──────┘
//!               │ blank line
//!               ▼
//!        ┌─────────────┐
//!        │    Body     │ ← whatever the client already sent
//!        └──────┬──────┘
//!               ▼
//!             Done
//! ```
//!
//! Any state can end in `Failed`, which maps to a status code: `400` for a
//! malformed request, `408` for a stalled client, `413` for an oversized body
//! (the connection is also closed) and `500` when a capacity is exhausted.

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

pub use connection::{ByteStream, MemoryStream, ReadUntil, TcpConnection};
pub use headers::{CapacityError, Header, HeaderLine, HeaderSet};
pub use parser::{ParseError, ParseState, RequestParser};
pub use request::{Request, RequestBuilder};
pub use response::{Response, StatusCode};
pub use writer::{ResponseWriter, write_response};
