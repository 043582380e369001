//! ninaweb - HTTP/1.x request handling for small network-attached devices
//!
//! Reads one request per connection into fixed-capacity buffers, routes it to
//! a handler by exact verb and path, and writes the handler's response back.
//! Memory used per request is bounded by [`limits`] no matter what the client
//! sends.

pub mod config;
pub mod http;
pub mod limits;
pub mod router;
pub mod server;
