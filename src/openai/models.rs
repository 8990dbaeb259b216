use mime::Mime;
use serde::{Deserialize, Serialize};

/// Uploaded audio on its way to the speech endpoint. The provider picks
/// the decoder from the file extension, so the name matters.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Mime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptionResponse {
    pub text: String,
}

// {"error": {"message": "...", "type": "...", "code": ...}}
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}
