mod client;
mod models;
mod openai_error;

pub use client::{OpenAiClient, OpenAiSettings};
pub use models::{AudioFile, ChatMessage};
pub use openai_error::OpenAiError;

/// Speech-to-text backend used by the transcription route.
pub trait SpeechToText: Send + Sync {
    fn transcribe(&self, audio: AudioFile) -> Result<String, OpenAiError>;
}

/// Chat-completion backend used by the query-structuring route.
pub trait ChatModel: Send + Sync {
    /// Send `messages` and return the text of the first choice.
    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, OpenAiError>;
}
