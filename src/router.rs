use std::io::Read;
use std::time::Instant;

use astra::{Body, Request, ResponseBuilder};
use serde_json::json;

use crate::assets::{serve_image, IMAGES_ROUTE};
use crate::errors::{ResultResp, ServerError};
use crate::responses::{json_response, set_header};
use crate::state::AppState;
use crate::store::RecordStore;

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();

    match (method.as_str(), path.as_str()) {
        ("OPTIONS", _) => preflight(),
        ("POST", "/getworks") => get_works(req, state),
        ("GET", "/healthz") => health(state),
        ("GET", p) if p.starts_with(IMAGES_ROUTE) => {
            let range = req
                .headers()
                .get("Range")
                .and_then(|v| v.to_str().ok());
            serve_image(&state.assets, &p[IMAGES_ROUTE.len()..], range)
        }
        _ => Err(ServerError::NotFound),
    }
}

fn get_works(mut req: Request, state: &AppState) -> ResultResp {
    let body = read_body(&mut req, state.max_body_bytes)?;

    let started = Instant::now();
    let outcome = state.service.handle(&body)?;
    let elapsed = started.elapsed();

    // Too late for the client; drop the result.
    if elapsed > state.request_timeout {
        tracing::warn!(
            elapsed_ms = elapsed.as_millis() as u64,
            timeout_ms = state.request_timeout.as_millis() as u64,
            "getworks exceeded deadline; result discarded"
        );
        return Err(ServerError::DeadlineExceeded(elapsed.as_millis()));
    }

    let mut resp = json_response(200, &outcome.listings)?;
    if outcome.partial {
        set_header(&mut resp, "X-Partial-Result", "true");
    }
    Ok(resp)
}

fn read_body(req: &mut Request, limit: u64) -> Result<Vec<u8>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::MalformedInput(format!("could not read body: {e}")))?;

    if body.len() as u64 > limit {
        return Err(ServerError::MalformedInput(format!(
            "request body larger than {limit} bytes"
        )));
    }
    Ok(body)
}

fn health(state: &AppState) -> ResultResp {
    let snapshot = state.service.store().snapshot()?;
    json_response(200, &json!({ "status": "ok", "listings": snapshot.len() }))
}

fn preflight() -> ResultResp {
    ResponseBuilder::new()
        .status(204)
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Range")
        .header("Access-Control-Max-Age", "86400")
        .body(Body::empty())
        .map_err(|e| ServerError::Internal(format!("response build failed: {e}")))
}
