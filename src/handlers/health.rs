use crate::responses::{json_response, ResultResp};
use serde_json::json;

/// GET /api/health-check
pub fn health_check() -> ResultResp {
    json_response(200, &json!({ "status": "ok" }))
}
