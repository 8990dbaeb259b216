// state.rs
use crate::config::AppConfig;
use crate::extraction::{PromptError, QueryExtractor};
use crate::images::{FetchError, ImageFetcher};
use crate::openai::{ChatModel, OpenAiClient, OpenAiError, OpenAiSettings, SpeechToText};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("image fetcher: {0}")]
    Images(#[from] FetchError),
    #[error("model client: {0}")]
    OpenAi(#[from] OpenAiError),
    #[error("extraction prompt: {0}")]
    Prompt(#[from] PromptError),
}

/// Everything the handlers share. Built once, never mutated.
pub struct AppState {
    pub images: ImageFetcher,
    pub speech: Box<dyn SpeechToText>,
    pub chat: Box<dyn ChatModel>,
    pub extractor: QueryExtractor,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, StateError> {
        let images = ImageFetcher::new(config.image_fetch_timeout, config.max_image_bytes)?;
        let openai = OpenAiClient::new(OpenAiSettings {
            api_key: config.api_key.clone(),
            base_url: config.openai_base_url.clone(),
            chat_model: config.chat_model.clone(),
            transcription_timeout: config.transcription_timeout,
            chat_timeout: config.chat_timeout,
        })?;

        Ok(Self {
            images,
            speech: Box::new(openai.clone()),
            chat: Box::new(openai),
            extractor: QueryExtractor::property_search()?,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}
