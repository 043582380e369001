use ninaweb::http::request::Request;
use ninaweb::http::response::{Response, StatusCode};
use ninaweb::limits::MAX_HANDLERS;
use ninaweb::router::{Handler, HandlerRegistry, NotFound, RegisterError};

fn request(verb: &str, path: &str) -> Request {
    Request::builder().verb(verb).path(path).build().unwrap()
}

/// Runs whatever `registry` dispatches `req` to and returns the response.
fn run(registry: &HandlerRegistry<'_>, req: &Request) -> Response {
    let mut resp = Response::new();
    assert!(registry.dispatch(req).handle(req, &mut resp));
    resp
}

fn labelled(label: &'static str) -> impl Fn(&Request, &mut Response) -> bool {
    move |_: &Request, resp: &mut Response| {
        resp.set_status(StatusCode::Ok);
        resp.set_text(label).is_ok()
    }
}

#[test]
fn test_dispatch_exact_match() {
    let ping = labelled("ping");
    let echo = labelled("echo");
    let mut registry = HandlerRegistry::new();

    assert!(registry.register("GET", "/ping", Some(&ping)));
    assert!(registry.register("POST", "/echo", Some(&echo)));

    assert_eq!(run(&registry, &request("GET", "/ping")).body.as_slice(), b"ping");
    assert_eq!(run(&registry, &request("POST", "/echo")).body.as_slice(), b"echo");
}

#[test]
fn test_dispatch_is_case_sensitive_and_exact() {
    let ping = labelled("ping");
    let mut registry = HandlerRegistry::new();
    registry.register("GET", "/ping", Some(&ping));

    for (verb, path) in [
        ("get", "/ping"),
        ("GET", "/Ping"),
        ("GET", "/ping/"),
        ("GET", "/pin"),
        ("POST", "/ping"),
    ] {
        let resp = run(&registry, &request(verb, path));
        assert_eq!(resp.code, 404, "{verb} {path}");
    }
}

#[test]
fn test_unmatched_request_goes_to_not_found() {
    let registry = HandlerRegistry::new();
    let req = Request::builder()
        .verb("DELETE")
        .path("/x")
        .header("Host", "x")
        .body(b"payload")
        .build()
        .unwrap();

    let resp = run(&registry, &req);

    assert_eq!(resp.code, 404);
    assert_eq!(resp.status.as_str(), "Not Found");
    assert!(resp.body.is_empty());
}

#[test]
fn test_not_found_handler_reports_success() {
    let mut resp = Response::new();
    resp.set_text("stale").unwrap();

    assert!(NotFound.handle(&request("GET", "/"), &mut resp));
    assert_eq!(resp.code, 404);
    assert!(resp.body.is_empty());
}

#[test]
fn test_register_rejects_long_path() {
    let h = labelled("h");
    let mut registry = HandlerRegistry::new();
    let path = format!("/{}", "a".repeat(199));

    assert!(!registry.register("GET", &path, Some(&h)));
    assert_eq!(registry.len(), 0);
    assert_eq!(
        registry.try_register("GET", &path, Some(&h)),
        Err(RegisterError::PathTooLong)
    );
}

#[test]
fn test_register_accepts_path_at_capacity() {
    let h = labelled("h");
    let mut registry = HandlerRegistry::new();
    let path = format!("/{}", "a".repeat(127));

    assert!(registry.register("GET", &path, Some(&h)));
    assert_eq!(run(&registry, &request("GET", &path)).code, 200);
}

#[test]
fn test_register_rejects_empty_verb() {
    let h = labelled("h");
    let mut registry = HandlerRegistry::new();

    assert!(!registry.register("", "/", Some(&h)));
    assert_eq!(
        registry.try_register("", "/", Some(&h)),
        Err(RegisterError::EmptyVerb)
    );
    assert!(registry.is_empty());
}

#[test]
fn test_register_rejects_missing_handler() {
    let mut registry = HandlerRegistry::new();

    assert!(!registry.register("GET", "/", None));
    assert_eq!(
        registry.try_register("GET", "/", None),
        Err(RegisterError::MissingHandler)
    );
    assert!(registry.is_empty());
}

#[test]
fn test_register_rejects_when_full() {
    let h = labelled("h");
    let mut registry = HandlerRegistry::new();
    let paths: Vec<String> = (0..=MAX_HANDLERS).map(|i| format!("/{i}")).collect();

    for path in &paths[..MAX_HANDLERS] {
        assert!(registry.register("GET", path, Some(&h)));
    }
    assert!(!registry.register("GET", &paths[MAX_HANDLERS], Some(&h)));
    assert_eq!(registry.len(), MAX_HANDLERS);
    assert_eq!(
        registry.try_register("GET", &paths[MAX_HANDLERS], Some(&h)),
        Err(RegisterError::RegistryFull)
    );
}

#[test]
fn test_register_respects_smaller_capacity() {
    let h = labelled("h");
    let mut registry = HandlerRegistry::with_capacity(1);

    assert!(registry.register("GET", "/a", Some(&h)));
    assert!(!registry.register("GET", "/b", Some(&h)));
    assert_eq!(registry.capacity(), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_register_rejects_duplicates() {
    let first = labelled("first");
    let second = labelled("second");
    let mut registry = HandlerRegistry::new();

    assert!(registry.register("GET", "/x", Some(&first)));
    assert_eq!(
        registry.try_register("GET", "/x", Some(&second)),
        Err(RegisterError::Duplicate)
    );
    assert_eq!(registry.len(), 1);
    assert_eq!(run(&registry, &request("GET", "/x")).body.as_slice(), b"first");
}

#[test]
fn test_registrations_keep_order() {
    let h = labelled("h");
    let mut registry = HandlerRegistry::new();
    registry.register("GET", "/b", Some(&h));
    registry.register("POST", "/a", Some(&h));

    let routes: Vec<(&str, &str)> = registry.iter().map(|r| (r.verb(), r.path())).collect();
    assert_eq!(routes, [("GET", "/b"), ("POST", "/a")]);
}
