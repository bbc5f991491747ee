// src/tests/router_tests/getworks_tests.rs

use crate::tests::utils::{header, post_getworks, read_json, send, Fixture};
use serde_json::Value;
use std::time::Duration;

fn ids(json: &Value) -> Vec<i64> {
    json.as_array()
        .expect("response is an array")
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

/// Listing A in central Moscow, B about 93 km south-west.
fn moscow() -> Fixture {
    let fx = Fixture::new();
    fx.insert(1, 55.7558, 37.6173, None);
    fx.insert(2, 55.0, 37.0, None);
    fx.load();
    fx
}

const NEAR_A: &str = r#"{"latitude": 55.7600, "longitude": 37.6200}"#;

#[test]
fn small_radius_returns_only_the_near_listing() {
    let fx = moscow();
    let state = fx.state_with(|c| c.catchment_radius_m = 5_000.0);

    let mut resp = send(post_getworks(NEAR_A), &state);
    assert_eq!(resp.status(), 200);
    assert_eq!(ids(&read_json(&mut resp)), vec![1]);
}

#[test]
fn large_radius_returns_both_nearest_first() {
    let fx = moscow();
    let state = fx.state_with(|c| c.catchment_radius_m = 100_000.0);

    let mut resp = send(post_getworks(NEAR_A), &state);
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "X-Partial-Result"), None);

    let json = read_json(&mut resp);
    assert_eq!(ids(&json), vec![1, 2]);
    assert!(json[0]["distance_m"].as_f64().unwrap() < json[1]["distance_m"].as_f64().unwrap());
}

#[test]
fn listing_view_carries_the_stored_fields() {
    let fx = moscow();
    let mut resp = send(post_getworks(NEAR_A), &fx.state());
    let json = read_json(&mut resp);
    let a = &json[0];

    assert_eq!(a["company_name"], "Company 1");
    assert_eq!(a["address"], "Tverskaya 1");
    assert_eq!(a["work_type_name"], "Loader");
    assert_eq!(a["customer_rating"], 4.8);
    assert_eq!(a["customer_feedbacks_count"], 31);
    assert_eq!(a["current_workers"], 2);
    assert_eq!(a["plan_workers"], 5);
    assert_eq!(a["date_start"], "2024-05-17");
    // Overnight shift: start after end.
    assert_eq!(a["time_start"], "22:00");
    assert_eq!(a["time_end"], "06:00");
    assert_eq!(a["price_worker"], 3100.5);
    assert!(a["logo"].is_null());
}

#[test]
fn logo_resolves_only_when_the_file_exists() {
    let fx = Fixture::new();
    fx.insert(1, 10.0, 10.0, Some("acme.png"));
    fx.insert(2, 10.0, 10.001, Some("missing.png"));
    fx.write_image("acme.png", b"\x89PNG");
    fx.load();

    let mut resp = send(
        post_getworks(r#"{"latitude": 10.0, "longitude": 10.0}"#),
        &fx.state(),
    );
    assert_eq!(resp.status(), 200);
    let json = read_json(&mut resp);
    assert_eq!(json[0]["logo"], "/images/acme.png");
    assert!(json[1]["logo"].is_null());
}

#[test]
fn antimeridian_neighbours_are_both_found() {
    let fx = Fixture::new();
    fx.insert(1, 0.0, 179.9999, None);
    fx.insert(2, 0.0, -179.9999, None);
    fx.insert(3, 0.0, 179.0, None);
    fx.load();

    let mut resp = send(
        post_getworks(r#"{"latitude": 0.0, "longitude": 179.9999}"#),
        &fx.state(),
    );
    assert_eq!(ids(&read_json(&mut resp)), vec![1, 2]);
}

#[test]
fn malformed_coordinate_is_400() {
    let fx = moscow();
    let mut resp = send(post_getworks(r#"{"latitude": "x"}"#), &fx.state());
    assert_eq!(resp.status(), 400);
    assert_eq!(read_json(&mut resp)["code"], "malformed_input");
}

#[test]
fn out_of_range_coordinate_is_400() {
    let fx = moscow();
    let mut resp = send(
        post_getworks(r#"{"latitude": 95.0, "longitude": 0.0}"#),
        &fx.state(),
    );
    assert_eq!(resp.status(), 400);
    assert_eq!(read_json(&mut resp)["code"], "invalid_query");
}

#[test]
fn oversized_body_is_rejected() {
    let fx = moscow();
    let state = fx.state_with(|c| c.max_body_bytes = 16);
    let resp = send(post_getworks(NEAR_A), &state);
    assert_eq!(resp.status(), 400);
}

#[test]
fn empty_area_is_an_empty_array() {
    let fx = moscow();
    let mut resp = send(
        post_getworks(r#"{"latitude": -33.87, "longitude": 151.21}"#),
        &fx.state(),
    );
    assert_eq!(resp.status(), 200);
    assert_eq!(read_json(&mut resp), serde_json::json!([]));
}

#[test]
fn unloaded_store_is_503() {
    let fx = Fixture::new();
    fx.insert(1, 55.7558, 37.6173, None);

    let mut resp = send(post_getworks(NEAR_A), &fx.state());
    assert_eq!(resp.status(), 503);
    assert_eq!(read_json(&mut resp)["code"], "store_unavailable");
}

#[test]
fn overflowing_candidates_are_flagged_partial() {
    let fx = Fixture::new();
    for id in 0..10 {
        fx.insert(id, 55.7558, 37.6173 + id as f64 * 1e-4, None);
    }
    fx.load();
    let state = fx.state_with(|c| c.candidate_cap = 4);

    let mut resp = send(post_getworks(NEAR_A), &state);
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "X-Partial-Result"), Some("true"));
    assert_eq!(ids(&read_json(&mut resp)).len(), 4);
}

#[test]
fn paging_wraps_the_ranking() {
    let fx = Fixture::new();
    for id in 0..6 {
        fx.insert(id, 0.0, id as f64 * 0.001, None);
    }
    fx.load();

    let mut resp = send(
        post_getworks(r#"{"latitude": 0.0, "longitude": 0.0, "offset": 1, "limit": 2}"#),
        &fx.state(),
    );
    assert_eq!(ids(&read_json(&mut resp)), vec![1, 2]);
}

#[test]
fn late_result_is_discarded() {
    let fx = moscow();
    let state = fx.state_with(|c| c.request_timeout = Duration::from_nanos(1));

    let mut resp = send(post_getworks(NEAR_A), &state);
    assert_eq!(resp.status(), 503);
    assert_eq!(read_json(&mut resp)["code"], "deadline_exceeded");
}
