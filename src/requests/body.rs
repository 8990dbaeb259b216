use crate::errors::ServerError;
use astra::Request;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

/// JSON endpoints only ever receive a URL or a sentence.
pub const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Io(#[from] std::io::Error),
}

/// Drain the request body, refusing anything longer than `limit` bytes.
pub fn read_body(req: &mut Request, limit: usize) -> Result<Vec<u8>, BodyError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut buf)?;

    if buf.len() > limit {
        return Err(BodyError::TooLarge { limit });
    }
    Ok(buf)
}

/// Decode a JSON body. An empty body decodes to `T::default()` so that
/// missing fields surface as presence errors rather than decode errors.
pub fn parse_json_body<T>(bytes: &[u8]) -> Result<T, ServerError>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))
}

pub fn header_str(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Percent-decoded query string parameters; later duplicates win.
pub fn query_params(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
