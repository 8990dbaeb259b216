use crate::errors::ServerError;
use crate::handlers;
use crate::responses::{error_to_response, preflight_response, ResultResp};
use crate::state::AppState;
use astra::{Request, Response};
use std::time::Instant;
use tracing::{error, info, warn};

const ROUTES: &[&str] = &[
    "/api/fetch_image",
    "/api/transcribe-audio",
    "/api/process-transcription",
    "/api/health-check",
];

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();

    match (method.as_str(), path.as_str()) {
        ("OPTIONS", _) => preflight_response(),
        ("GET" | "POST", "/api/fetch_image") => handlers::image::fetch_image(&mut req, state),
        ("POST", "/api/transcribe-audio") => {
            handlers::transcribe::transcribe_audio(&mut req, state)
        }
        ("POST", "/api/process-transcription") => {
            handlers::query::process_transcription(&mut req, state)
        }
        ("GET", "/api/health-check") => handlers::health::health_check(),
        (_, p) if ROUTES.contains(&p) => Err(ServerError::MethodNotAllowed),
        _ => Err(ServerError::NotFound),
    }
}

/// Route one request and always produce a response, logging the outcome.
pub fn respond(req: Request, state: &AppState) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = match handle(req, state) {
        Ok(resp) => resp,
        Err(err) => {
            if err.status() >= 500 {
                error!(%method, %path, error = %err, "request failed");
            } else {
                warn!(%method, %path, error = %err, "request rejected");
            }
            error_to_response(err)
        }
    };

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled request"
    );
    response
}
