//! Request orchestration
//!
//! A [`Server`] takes one connection at a time through parse, dispatch,
//! handler and write. Routes are registered on a [`ServerBuilder`]; once the
//! server is built its route table can no longer change.

pub mod listener;

use std::io;

use tracing::{debug, error, info, warn};

use crate::http::connection::ByteStream;
use crate::http::parser::RequestParser;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::write_response;
use crate::limits::Limits;
use crate::router::handler::Handler;
use crate::router::registry::HandlerRegistry;
use crate::server::listener::Listener;

/// What happened to the connection handed to [`Server::serve_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// There was no connection to serve.
    NoConnection,
    /// A response with this code was written.
    Responded { code: u16 },
    /// A response with this code was written and the connection was closed
    /// because the client sent more than can be buffered.
    Closed { code: u16 },
}

/// Collects routes before serving starts.
#[derive(Debug)]
pub struct ServerBuilder<'h> {
    registry: HandlerRegistry<'h>,
    limits: Limits,
}

impl<'h> ServerBuilder<'h> {
    pub fn new(limits: Limits) -> Self {
        Self {
            registry: HandlerRegistry::with_capacity(limits.handler_count()),
            limits,
        }
    }

    /// See [`HandlerRegistry::register`].
    pub fn register(&mut self, verb: &str, path: &str, handler: Option<&'h dyn Handler>) -> bool {
        self.registry.register(verb, path, handler)
    }

    /// Chaining form of [`register`](Self::register); a refused route is
    /// logged and skipped.
    pub fn route(mut self, verb: &str, path: &str, handler: &'h dyn Handler) -> Self {
        self.registry.register(verb, path, Some(handler));
        self
    }

    pub fn registry(&self) -> &HandlerRegistry<'h> {
        &self.registry
    }

    pub fn build(self) -> Server<'h> {
        info!(routes = self.registry.len(), "Server ready");
        Server {
            registry: self.registry,
            limits: self.limits,
        }
    }
}

/// Serves requests, one connection at a time.
#[derive(Debug)]
pub struct Server<'h> {
    registry: HandlerRegistry<'h>,
    limits: Limits,
}

impl<'h> Server<'h> {
    pub fn builder() -> ServerBuilder<'h> {
        ServerBuilder::new(Limits::default())
    }

    pub fn registry(&self) -> &HandlerRegistry<'h> {
        &self.registry
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Processes exactly one request on `conn` and writes the response.
    ///
    /// Errors only come from writing the response; every request-level
    /// failure is answered with a status code instead.
    pub async fn serve_one<S: ByteStream>(&self, conn: Option<&mut S>) -> io::Result<ServeOutcome> {
        let Some(stream) = conn else {
            return Ok(ServeOutcome::NoConnection);
        };

        let mut parser = RequestParser::new(self.limits);
        let request = match parser.parse(stream).await {
            Ok(request) => request,
            Err(e) => {
                let status = e.status();
                warn!(error = %e, code = status.as_u16(), "Rejecting request");

                let mut response = Response::error(status);
                write_response(&mut response, stream).await?;

                if e.closes_connection() {
                    stream.close().await?;
                    return Ok(ServeOutcome::Closed {
                        code: status.as_u16(),
                    });
                }
                return Ok(ServeOutcome::Responded {
                    code: status.as_u16(),
                });
            }
        };

        let handler = self.registry.dispatch(&request);
        let mut response = Response::new();
        if !handler.handle(&request, &mut response) {
            error!(
                verb = request.verb(),
                path = request.path(),
                "Error handling request"
            );
            response = Response::error(StatusCode::InternalServerError);
        }

        write_response(&mut response, stream).await?;

        debug!(
            verb = request.verb(),
            path = request.path(),
            code = response.code,
            "Request served"
        );
        Ok(ServeOutcome::Responded {
            code: response.code,
        })
    }

    /// Accepts the next connection from `listener` and serves it.
    pub async fn serve_next<L: Listener>(&self, listener: &mut L) -> io::Result<ServeOutcome> {
        let mut conn = listener.accept().await?;
        self.serve_one(conn.as_mut()).await
    }
}
