use crate::tests::utils::{header, read_body, request, send, Fixture};
use http::Method;

const LOGO: &[u8] = b"0123456789abcdef";

fn with_logo() -> Fixture {
    let fx = Fixture::new();
    fx.write_image("acme.png", LOGO);
    fx
}

#[test]
fn serves_whole_file() {
    let fx = with_logo();
    let mut resp = send(request(Method::GET, "/images/acme.png", ""), &fx.state());
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), Some("image/png"));
    assert_eq!(header(&resp, "Accept-Ranges"), Some("bytes"));
    assert_eq!(read_body(&mut resp), LOGO);
}

#[test]
fn serves_byte_range() {
    let fx = with_logo();
    let mut req = request(Method::GET, "/images/acme.png", "");
    req.headers_mut().insert("Range", "bytes=4-7".parse().unwrap());

    let mut resp = send(req, &fx.state());
    assert_eq!(resp.status(), 206);
    assert_eq!(header(&resp, "Content-Range"), Some("bytes 4-7/16"));
    assert_eq!(read_body(&mut resp), b"4567");
}

#[test]
fn range_past_end_is_416() {
    let fx = with_logo();
    let mut req = request(Method::GET, "/images/acme.png", "");
    req.headers_mut().insert("Range", "bytes=100-".parse().unwrap());

    let resp = send(req, &fx.state());
    assert_eq!(resp.status(), 416);
    assert_eq!(header(&resp, "Content-Range"), Some("bytes */16"));
}

#[test]
fn missing_and_unsafe_names_are_404() {
    let fx = with_logo();
    let state = fx.state();
    for uri in ["/images/nope.png", "/images/", "/images/.hidden", "/images/sub/acme.png"] {
        assert_eq!(send(request(Method::GET, uri, ""), &state).status(), 404, "{uri}");
    }
}
