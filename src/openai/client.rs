// client.rs
use super::models::{
    ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, TranscriptionResponse,
};
use super::{AudioFile, ChatMessage, ChatModel, OpenAiError, SpeechToText};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const TRANSCRIPTION_MODEL: &str = "whisper-1";

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub transcription_timeout: Duration,
    pub chat_timeout: Duration,
}

/// Blocking client for the OpenAI-compatible speech and chat endpoints.
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Result<Self, OpenAiError> {
        // Per-request timeouts are set on each call; this one only bounds
        // anything that slips through.
        let client = Client::builder()
            .timeout(settings.transcription_timeout.max(settings.chat_timeout))
            .build()
            .map_err(OpenAiError::Request)?;

        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }
}

impl SpeechToText for OpenAiClient {
    /// Posts to the translations endpoint, which always answers in English.
    fn transcribe(&self, audio: AudioFile) -> Result<String, OpenAiError> {
        let size = audio.bytes.len();
        let part = Part::bytes(audio.bytes)
            .file_name(audio.file_name)
            .mime_str(audio.content_type.as_ref())
            .map_err(OpenAiError::Request)?;
        let form = Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        debug!(bytes = size, "sending audio for transcription");

        let resp = self
            .client
            .post(self.endpoint("audio/translations"))
            .bearer_auth(&self.settings.api_key)
            .timeout(self.settings.transcription_timeout)
            .multipart(form)
            .send()
            .map_err(OpenAiError::Request)?;

        let body: TranscriptionResponse = read_json(resp)?;
        Ok(body.text)
    }
}

impl ChatModel for OpenAiClient {
    fn complete(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, OpenAiError> {
        let request = ChatCompletionRequest {
            model: &self.settings.chat_model,
            temperature,
            messages,
        };

        debug!(model = %self.settings.chat_model, "sending chat completion");

        let resp = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.settings.api_key)
            .timeout(self.settings.chat_timeout)
            .json(&request)
            .send()
            .map_err(OpenAiError::Request)?;

        let body: ChatCompletionResponse = read_json(resp)?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(OpenAiError::EmptyResponse)
    }
}

/// Decode a success body, or turn an error status into `OpenAiError::Api`
/// carrying the provider's own message when it sent one.
fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, OpenAiError> {
    let status = resp.status();
    let text = resp.text().map_err(OpenAiError::Request)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or_else(|_| {
                if text.trim().is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });
        return Err(OpenAiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| OpenAiError::Decode(e.to_string()))
}
