use ninaweb::http::connection::MemoryStream;
use ninaweb::http::headers::CapacityError;
use ninaweb::http::response::{Response, StatusCode};
use ninaweb::http::writer::{ResponseWriter, write_response};

fn render(resp: &mut Response) -> Vec<u8> {
    ResponseWriter::new(resp).unwrap().as_bytes().to_vec()
}

fn pong() -> Response {
    let mut resp = Response::new();
    resp.set_status(StatusCode::Ok);
    resp.set_text("pong").unwrap();
    resp
}

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Created.as_u16(), 201);
    assert_eq!(StatusCode::NoContent.as_u16(), 204);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::RequestTimeout.as_u16(), 408);
    assert_eq!(StatusCode::ContentTooLarge.as_u16(), 413);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NoContent.reason_phrase(), "No Content");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(StatusCode::ContentTooLarge.reason_phrase(), "Content Too Large");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_status_code_from_u16() {
    assert_eq!(StatusCode::from_u16(413), Some(StatusCode::ContentTooLarge));
    assert_eq!(StatusCode::from_u16(200), Some(StatusCode::Ok));
    assert_eq!(StatusCode::from_u16(418), None);
}

#[test]
fn test_new_response_is_unset() {
    let resp = Response::new();

    assert_eq!(resp.code, 0);
    assert!(resp.status.is_empty());
    assert!(resp.headers.is_empty());
    assert!(resp.body.is_empty());
}

#[test]
fn test_set_code_truncates_long_reason() {
    let mut resp = Response::new();
    resp.set_code(299, "A Rather Long Reason Phrase");

    assert_eq!(resp.code, 299);
    assert_eq!(resp.status.as_str(), "A Rather Long Reason ");
}

#[test]
fn test_set_body_over_capacity() {
    let mut resp = pong();

    assert_eq!(resp.set_body(&[b'x'; 1025]), Err(CapacityError::TooLong));
    assert!(resp.body.is_empty());
}

#[test]
fn test_reset_clears_everything() {
    let mut resp = pong();
    resp.append_header("X-A", "1").unwrap();

    resp.reset();

    assert_eq!(resp, Response::new());
}

#[test]
fn test_serialize_simple_response() {
    let out = render(&mut pong());

    assert_eq!(
        out,
        b"HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Length: 4\r\n\r\npong"
    );
}

#[test]
fn test_serialize_defaults_unset_fields() {
    let mut resp = Response::new();
    let out = render(&mut resp);

    assert_eq!(resp.code, 204);
    assert_eq!(resp.status.as_str(), "No Content");
    assert_eq!(
        out,
        b"HTTP/1.1 204 No Content\r\nConnection: close\r\nContent-Length: 0\r\n\r\n"
    );
}

#[test]
fn test_serialize_handler_headers_first_in_order() {
    let mut resp = pong();
    resp.append_header("Content-Type", "text/plain").unwrap();
    resp.append_header("X-Device", "nina").unwrap();

    let out = String::from_utf8(render(&mut resp)).unwrap();

    assert_eq!(
        out,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/plain\r\n\
         X-Device: nina\r\n\
         Connection: close\r\n\
         Content-Length: 4\r\n\
         \r\n\
         pong"
    );
}

#[test]
fn test_serialize_full_response_fits() {
    let mut resp = Response::new();
    resp.set_code(500, &"r".repeat(64));
    for i in 0..10 {
        let key = format!("{i}{}", "k".repeat(127));
        resp.append_header(&key, &"v".repeat(128)).unwrap();
    }
    resp.set_body(&[b'b'; 1024]).unwrap();

    let out = render(&mut resp);

    assert!(out.starts_with(b"HTTP/1.1 500 rrrrrrrrrrrrrrrrrrrrr\r\n"));
    assert!(out.ends_with(&[b'b'; 1024]));
}

#[test]
fn test_error_response() {
    let out = render(&mut Response::error(StatusCode::BadRequest));

    assert_eq!(
        out,
        b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\nContent-Length: 0\r\n\r\n"
    );
}

#[test]
fn test_round_trip_through_client_parser() {
    let out = render(&mut pong());

    let mut headers = [httparse::EMPTY_HEADER; 16];
    let mut parsed = httparse::Response::new(&mut headers);
    let body_start = match parsed.parse(&out).unwrap() {
        httparse::Status::Complete(n) => n,
        httparse::Status::Partial => panic!("incomplete response"),
    };

    assert_eq!(parsed.code, Some(200));
    assert_eq!(parsed.reason, Some("OK"));
    let content_length = parsed
        .headers
        .iter()
        .find(|h| h.name == "Content-Length")
        .map(|h| std::str::from_utf8(h.value).unwrap().parse::<usize>().unwrap())
        .unwrap();
    assert_eq!(&out[body_start..body_start + content_length], b"pong");
    assert_eq!(out.len(), body_start + content_length);
}

#[tokio::test]
async fn test_write_response_to_stream() {
    let mut stream = MemoryStream::new("");
    let mut resp = pong();

    write_response(&mut resp, &mut stream).await.unwrap();

    assert_eq!(stream.output(), render(&mut pong()).as_slice());
}

#[test]
fn test_handler_framing_headers_are_replaced() {
    let mut resp = pong();
    resp.append_header("Content-Length", "99").unwrap();
    resp.append_header("connection", "keep-alive").unwrap();
    resp.append_header("X-Device", "nina").unwrap();

    let out = render(&mut resp);

    assert_eq!(
        out,
        b"HTTP/1.1 200 OK\r\nX-Device: nina\r\nConnection: close\r\nContent-Length: 4\r\n\r\npong"
    );
}

#[test]
fn test_append_header_rejects_line_breaks() {
    let mut resp = pong();

    assert_eq!(
        resp.append_header("X-Inject", "a\r\nSet-Cookie: evil=1"),
        Err(CapacityError::Invalid)
    );
    assert_eq!(
        resp.append_header("X-Inject\r\nSet-Cookie", "evil=1"),
        Err(CapacityError::Invalid)
    );
    assert!(resp.headers.is_empty());

    let out = String::from_utf8(render(&mut resp)).unwrap();
    assert!(!out.contains("Set-Cookie"));
}

#[test]
fn test_set_code_drops_control_characters() {
    let mut resp = Response::new();
    resp.set_code(200, "OK\r\nSet-Cookie: x");

    assert_eq!(resp.status.as_str(), "OKSet-Cookie: x");
    let out = render(&mut resp);
    assert!(out.starts_with(b"HTTP/1.1 200 OKSet-Cookie: x\r\nConnection: close\r\n"));
}
