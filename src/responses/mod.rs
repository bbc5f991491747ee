pub mod errors;
pub mod json;

pub use errors::error_to_response;
pub use json::json_response;

use astra::Response;

/// Set (or replace) a header on a finished response.
///
/// Values that are not valid header text are dropped.
pub fn set_header(resp: &mut Response, name: &'static str, value: &str) {
    if let Ok(v) = value.parse() {
        resp.headers_mut().insert(name, v);
    }
}

/// Permissive CORS, as the mobile client expects.
pub fn with_cors(mut resp: Response) -> Response {
    set_header(&mut resp, "Access-Control-Allow-Origin", "*");
    resp
}
