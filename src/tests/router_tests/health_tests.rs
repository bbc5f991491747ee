use crate::responses::with_cors;
use crate::tests::utils::{header, read_json, request, send, Fixture};
use http::Method;

#[test]
fn health_reports_listing_count_once_loaded() {
    let fx = Fixture::new();
    fx.insert(1, 1.0, 1.0, None);
    let state = fx.state();

    let resp = send(request(Method::GET, "/healthz", ""), &state);
    assert_eq!(resp.status(), 503);

    fx.load();
    let mut resp = send(request(Method::GET, "/healthz", ""), &state);
    assert_eq!(resp.status(), 200);
    let json = read_json(&mut resp);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["listings"], 1);
}

#[test]
fn preflight_and_cors() {
    let fx = Fixture::new();
    let resp = with_cors(send(request(Method::OPTIONS, "/getworks", ""), &fx.state()));
    assert_eq!(resp.status(), 204);
    assert_eq!(header(&resp, "Access-Control-Allow-Origin"), Some("*"));
    assert!(header(&resp, "Access-Control-Allow-Methods")
        .unwrap()
        .contains("POST"));
}

#[test]
fn unknown_routes_are_404() {
    let fx = Fixture::new();
    let state = fx.state();
    assert_eq!(send(request(Method::GET, "/", ""), &state).status(), 404);
    assert_eq!(send(request(Method::GET, "/getworks", ""), &state).status(), 404);
    assert_eq!(send(request(Method::DELETE, "/getworks", ""), &state).status(), 404);
}
