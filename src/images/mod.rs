mod fetch_error;
mod fetcher;

pub use fetch_error::FetchError;
pub use fetcher::ImageFetcher;
