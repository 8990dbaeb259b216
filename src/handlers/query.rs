use crate::errors::ServerError;
use crate::extraction::ExtractError;
use crate::requests::{parse_json_body, read_body, MAX_JSON_BODY_BYTES};
use crate::responses::{json_response, ResultResp};
use crate::state::AppState;
use astra::Request;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

#[derive(Debug, Default, Deserialize)]
struct ProcessTranscriptionRequest {
    #[serde(default)]
    text: Option<String>,
}

/// POST /api/process-transcription
pub fn process_transcription(req: &mut Request, state: &AppState) -> ResultResp {
    let body = read_body(req, MAX_JSON_BODY_BYTES).map_err(|e| generic_error(&e))?;
    let payload: ProcessTranscriptionRequest = parse_json_body(&body)?;

    let text = payload
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("Please provide the text to process".into()))?;

    info!(chars = text.len(), "structuring search query");

    match state.extractor.extract(state.chat.as_ref(), &text) {
        Ok(fields) => json_response(200, &json!({ "success": true, "llm_output": fields })),
        Err(ExtractError::Provider(e)) => {
            error!(error = %e, "model provider call failed");
            Err(ServerError::Internal(format!("OpenAI Error: {e}")))
        }
        Err(e) => {
            warn!(error = %e, "could not structure query");
            Err(generic_error(&e))
        }
    }
}

fn generic_error(e: &dyn std::fmt::Display) -> ServerError {
    ServerError::Internal(format!(
        "An error occurred while processing the transcription: {e}"
    ))
}
