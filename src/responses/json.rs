use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Serialize `body` as the JSON payload of a response with `status`.
/// Every API response is cross-origin readable.
pub fn json_response<T: Serialize>(status: u16, body: &T) -> ResultResp {
    let payload = serde_json::to_vec(body)
        .map_err(|e| ServerError::Internal(format!("Failed to encode response: {e}")))?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
        .body(Body::from(payload))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {e}")))
}

/// Answer a CORS preflight request.
pub fn preflight_response() -> ResultResp {
    ResponseBuilder::new()
        .status(204)
        .header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
        .header("Access-Control-Max-Age", "86400")
        .body(Body::empty())
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {e}")))
}
