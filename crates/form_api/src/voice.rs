use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mail_integration::TranscodedAudio;
use shared::protocol::SubmitRequest;

use crate::FormError;

const DEFAULT_SOURCE_FORMAT: &str = "webm";
const DEFAULT_STEM: &str = "voice-memo";

/// A voice attachment as it will be attached to the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceMemo {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl VoiceMemo {
    /// Swaps in transcoded audio, renaming the file to the new codec's
    /// extension.
    pub fn into_transcoded(self, audio: TranscodedAudio) -> Self {
        Self {
            filename: with_extension(&self.filename, &audio.extension),
            bytes: audio.bytes,
            content_type: audio.content_type,
        }
    }
}

/// Decodes the base64 `voice` field, if any. Accepts a `data:` URL prefix and
/// embedded whitespace.
pub fn decode_voice(request: &SubmitRequest) -> Result<Option<VoiceMemo>, FormError> {
    let Some(raw) = request.voice.as_deref().filter(|_| request.has_voice()) else {
        return Ok(None);
    };

    let payload = match raw.trim().strip_prefix("data:") {
        Some(data_url) => data_url
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(data_url),
        None => raw,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(FormError::Decode)?;

    let content_type = match request.voice_mime.trim() {
        "" => "application/octet-stream".to_string(),
        mime => mime.to_string(),
    };
    let filename = match base_name(&request.voice_filename) {
        Some(name) => name,
        None => format!("{DEFAULT_STEM}.{}", source_format(request)),
    };

    Ok(Some(VoiceMemo {
        bytes,
        filename,
        content_type,
    }))
}

/// Codec hint for the transcoder: the MIME subtype when present, else the
/// filename extension, else `webm`.
pub fn source_format(request: &SubmitRequest) -> String {
    let from_mime = request
        .voice_mime
        .split(';')
        .next()
        .and_then(|essence| essence.trim().split_once('/'))
        .map(|(_, subtype)| subtype.trim().trim_start_matches("x-").to_ascii_lowercase())
        .filter(|subtype| !subtype.is_empty());
    let from_name = || {
        Path::new(request.voice_filename.trim())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| !ext.is_empty())
    };
    from_mime
        .or_else(from_name)
        .unwrap_or_else(|| DEFAULT_SOURCE_FORMAT.to_string())
}

/// `memo.webm` → `memo.mp3`; names without a usable stem fall back to
/// `voice-memo`.
pub fn with_extension(filename: &str, extension: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(DEFAULT_STEM);
    format!("{stem}.{extension}")
}

fn base_name(filename: &str) -> Option<String> {
    let trimmed = filename.trim().replace('\\', "/");
    Path::new(&trimmed)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
#[path = "tests/voice_tests.rs"]
mod tests;
