use crate::errors::ServerError;
use crate::openai::AudioFile;
use crate::requests::{find_part, header_str, read_body, BodyError, MultipartError, UploadedPart};
use crate::responses::{json_response, ResultResp};
use crate::state::AppState;
use astra::Request;
use mime::Mime;
use serde_json::json;
use tracing::{error, info};

pub const AUDIO_FIELD: &str = "audioFile";
const FALLBACK_FILE_NAME: &str = "uploaded_audio.wav";

/// POST /api/transcribe-audio
///
/// The upload stays in memory from request to provider; nothing is staged
/// on disk, so concurrent uploads cannot see each other.
pub fn transcribe_audio(req: &mut Request, state: &AppState) -> ResultResp {
    let content_type = header_str(req, "Content-Type");

    let body = match read_body(req, state.max_upload_bytes) {
        Ok(body) => body,
        Err(BodyError::TooLarge { limit }) => {
            return Err(ServerError::BadRequest(format!(
                "Audio file exceeds the upload limit of {limit} bytes"
            )))
        }
        Err(e) => return Err(processing_error(e)),
    };

    let part = match find_part(content_type.as_deref(), body, AUDIO_FIELD) {
        Ok(Some(part)) if !part.data.is_empty() => part,
        Ok(_) | Err(MultipartError::NotMultipart) => {
            return Err(ServerError::BadRequest("No audio file provided".into()))
        }
        Err(e) => return Err(processing_error(e)),
    };

    let audio = audio_file(part);
    info!(file = %audio.file_name, bytes = audio.bytes.len(), "transcribing upload");

    let transcript = state.speech.transcribe(audio).map_err(|e| {
        error!(error = %e, "transcription failed");
        ServerError::Internal(format!("Failed to transcribe the audio: {e}"))
    })?;

    json_response(200, &json!({ "success": true, "transcript": transcript }))
}

fn audio_file(part: UploadedPart) -> AudioFile {
    AudioFile {
        file_name: part
            .file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string()),
        content_type: part.content_type.unwrap_or_else(wav_mime),
        bytes: part.data.to_vec(),
    }
}

fn wav_mime() -> Mime {
    "audio/wav".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

fn processing_error(e: impl std::fmt::Display) -> ServerError {
    ServerError::Internal(format!("An error occurred while processing the audio: {e}"))
}
