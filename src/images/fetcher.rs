// fetcher.rs
use crate::images::FetchError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::io::Read;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Downloads remote images for the front end, which cannot read
/// cross-origin pixels itself.
pub struct ImageFetcher {
    client: Client,
    max_bytes: usize,
}

impl ImageFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, max_bytes })
    }

    /// GET `url` and return the body as standard (padded) base64.
    /// Anything other than exactly 200 is a failure, as is a body longer
    /// than `max_bytes`.
    pub fn fetch_base64(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().map_err(FetchError::Request)?;

        if resp.status() != StatusCode::OK {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let limit = self.max_bytes;
        if resp.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::TooLarge { limit });
        }

        // Content-Length may be absent or wrong; cap the read itself too.
        let mut bytes = Vec::new();
        resp.take(limit as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(FetchError::Body)?;

        if bytes.len() > limit {
            return Err(FetchError::TooLarge { limit });
        }
        Ok(STANDARD.encode(&bytes))
    }
}
