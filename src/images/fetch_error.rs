use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The host answered, but not with 200.
    #[error("image host answered with status {0}")]
    Status(u16),
    /// Connect, DNS, timeout or bad URL.
    #[error("{0}")]
    Request(reqwest::Error),
    /// The connection dropped or stalled while streaming the body.
    #[error("{0}")]
    Body(std::io::Error),
    #[error("Image exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}
