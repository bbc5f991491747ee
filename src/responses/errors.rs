use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

/// Convert a ServerError into a JSON error response.
///
/// Body is `{"code": ..., "message": ...}`. Never fails.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    let body = json!({ "code": err.code(), "message": err.to_string() }).to_string();

    let mut builder = ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8");
    if let ServerError::RangeNotSatisfiable { len } = err {
        builder = builder.header("Content-Range", format!("bytes */{len}"));
    }
    if status == 503 {
        builder = builder.header("Retry-After", "1");
    }

    builder
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
