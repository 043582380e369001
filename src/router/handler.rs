use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Produces the response for a request.
///
/// Returning `false` reports a failure: whatever the handler put into the
/// response is discarded and the client gets `500 Internal Server Error`.
///
/// Plain functions and closures taking `(&Request, &mut Response)` and
/// returning `bool` are handlers already.
pub trait Handler {
    fn handle(&self, req: &Request, resp: &mut Response) -> bool;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response) -> bool,
{
    fn handle(&self, req: &Request, resp: &mut Response) -> bool {
        self(req, resp)
    }
}

/// Answers `404 Not Found` with an empty body. Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn handle(&self, _req: &Request, resp: &mut Response) -> bool {
        resp.set_status(StatusCode::NotFound);
        resp.body.clear();
        true
    }
}
