//! Fixed-capacity route table
//!
//! The table is filled once at start-up and only read afterwards. Lookup is a
//! linear scan; with at most [`MAX_HANDLERS`] entries that is cheaper than
//! hashing.

use std::fmt;

use tracing::{debug, info, warn};

use crate::http::request::Request;
use crate::limits::{MAX_HANDLERS, MAX_PATH_LENGTH, MAX_VERB_LENGTH};
use crate::router::handler::{Handler, NotFound};

static NOT_FOUND: NotFound = NotFound;

/// Why a registration was refused. The table is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    PathTooLong,
    EmptyVerb,
    VerbTooLong,
    MissingHandler,
    RegistryFull,
    /// The same verb and path are already registered.
    Duplicate,
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RegisterError::PathTooLong => "path exceeds capacity",
            RegisterError::EmptyVerb => "empty verb",
            RegisterError::VerbTooLong => "verb exceeds capacity",
            RegisterError::MissingHandler => "no handler given",
            RegisterError::RegistryFull => "handler table is full",
            RegisterError::Duplicate => "route already registered",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for RegisterError {}

/// One route: a verb and path mapped to a handler.
pub struct Registration<'h> {
    verb: heapless::String<MAX_VERB_LENGTH>,
    path: heapless::String<MAX_PATH_LENGTH>,
    handler: &'h dyn Handler,
}

impl Registration<'_> {
    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn matches(&self, verb: &str, path: &str) -> bool {
        self.verb.as_str() == verb && self.path.as_str() == path
    }
}

impl fmt::Debug for Registration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("verb", &self.verb.as_str())
            .field("path", &self.path.as_str())
            .finish_non_exhaustive()
    }
}

/// Maps `(verb, path)` pairs to handlers, in registration order.
#[derive(Debug)]
pub struct HandlerRegistry<'h> {
    entries: heapless::Vec<Registration<'h>, MAX_HANDLERS>,
    capacity: usize,
}

impl Default for HandlerRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> HandlerRegistry<'h> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HANDLERS)
    }

    /// A registry holding at most `capacity` routes, clamped to [`MAX_HANDLERS`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: heapless::Vec::new(),
            capacity: capacity.min(MAX_HANDLERS),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration<'h>> {
        self.entries.iter()
    }

    /// Adds a route, reporting why it was refused.
    pub fn try_register(
        &mut self,
        verb: &str,
        path: &str,
        handler: Option<&'h dyn Handler>,
    ) -> Result<(), RegisterError> {
        if path.len() > MAX_PATH_LENGTH {
            return Err(RegisterError::PathTooLong);
        }
        if verb.is_empty() {
            return Err(RegisterError::EmptyVerb);
        }
        if verb.len() > MAX_VERB_LENGTH {
            return Err(RegisterError::VerbTooLong);
        }
        let handler = handler.ok_or(RegisterError::MissingHandler)?;
        if self.entries.len() >= self.capacity {
            return Err(RegisterError::RegistryFull);
        }
        if self.lookup(verb, path).is_some() {
            return Err(RegisterError::Duplicate);
        }

        let mut entry = Registration {
            verb: heapless::String::new(),
            path: heapless::String::new(),
            handler,
        };
        entry
            .verb
            .push_str(verb)
            .map_err(|_| RegisterError::VerbTooLong)?;
        entry
            .path
            .push_str(path)
            .map_err(|_| RegisterError::PathTooLong)?;

        self.entries
            .push(entry)
            .map_err(|_| RegisterError::RegistryFull)
    }

    /// Adds a route. Returns `false`, leaving the table untouched, when the
    /// path is too long, the verb is empty or too long, the handler is
    /// missing, the table is full or the route already exists.
    pub fn register(&mut self, verb: &str, path: &str, handler: Option<&'h dyn Handler>) -> bool {
        match self.try_register(verb, path, handler) {
            Ok(()) => {
                info!("Registered handler for '{} {}'", verb, path);
                true
            }
            Err(e) => {
                warn!(verb, path, error = %e, "Handler registration rejected");
                false
            }
        }
    }

    /// Picks the handler for `req`: the first exact match, or [`NotFound`].
    pub fn dispatch(&self, req: &Request) -> &'h dyn Handler {
        match self.lookup(req.verb(), req.path()) {
            Some(handler) => handler,
            None => {
                debug!(verb = req.verb(), path = req.path(), "Using default handler: NotFound");
                &NOT_FOUND
            }
        }
    }

    fn lookup(&self, verb: &str, path: &str) -> Option<&'h dyn Handler> {
        self.entries
            .iter()
            .find(|entry| entry.matches(verb, path))
            .map(|entry| entry.handler)
    }
}
