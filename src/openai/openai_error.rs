use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenAiError {
    /// The provider answered with an error status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Decode(String),
    #[error("response contained no message content")]
    EmptyResponse,
}
