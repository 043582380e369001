//! Handler registration and dispatch
//!
//! Routes are exact `(verb, path)` pairs, matched byte for byte in
//! registration order. Requests matching no route go to [`NotFound`].

pub mod handler;
pub mod registry;

pub use handler::{Handler, NotFound};
pub use registry::{HandlerRegistry, RegisterError, Registration};
