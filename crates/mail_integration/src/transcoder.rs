use std::{
    io,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

pub const TARGET_CONTENT_TYPE: &str = "audio/mpeg";
pub const TARGET_EXTENSION: &str = "mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodedAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: String,
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to prepare transcoder scratch space: {0}")]
    Scratch(#[source] io::Error),
    #[error("failed to start transcoder '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("transcoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("transcoder produced no output")]
    EmptyOutput,
}

/// Converts a recorded voice memo into the codec attached to outgoing mail.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn transcode(
        &self,
        input: &[u8],
        source_format: &str,
    ) -> Result<TranscodedAudio, TranscodeError>;
}

/// Shells out to `ffmpeg`: MP3 at roughly 64 kbps VBR, channel layout left
/// as recorded, two encoder threads. Input and output live in a per-call
/// temp directory that is removed when the call returns, whatever the
/// outcome. No timeout is applied.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    temp_root: Option<PathBuf>,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            temp_root: None,
        }
    }

    /// Scratch directories are created under `root` instead of the system
    /// temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    fn scratch_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("voice-memo-");
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-hide_banner", "-loglevel", "error", "-y", "-threads", "2", "-i"])
            .arg(input)
            .args(["-vn", "-c:a", "libmp3lame", "-q:a", "9"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &[u8],
        source_format: &str,
    ) -> Result<TranscodedAudio, TranscodeError> {
        // Dropping `scratch` removes both files on every return path below.
        let scratch = self.scratch_dir().map_err(TranscodeError::Scratch)?;
        let input_path = scratch
            .path()
            .join(format!("input.{}", sanitize_extension(source_format)));
        let output_path = scratch.path().join(format!("output.{TARGET_EXTENSION}"));

        tokio::fs::write(&input_path, input)
            .await
            .map_err(TranscodeError::Scratch)?;

        debug!(
            program = %self.program.display(),
            input_bytes = input.len(),
            source_format,
            "starting transcoder"
        );
        let output = self
            .command(&input_path, &output_path)
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, %stderr, "transcoder failed");
            return Err(TranscodeError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let bytes = match tokio::fs::read(&output_path).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return Err(TranscodeError::EmptyOutput),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(TranscodeError::EmptyOutput)
            }
            Err(error) => return Err(TranscodeError::Scratch(error)),
        };

        Ok(TranscodedAudio {
            bytes,
            content_type: TARGET_CONTENT_TYPE.to_string(),
            extension: TARGET_EXTENSION.to_string(),
        })
    }
}

/// Keeps the scratch file name tame whatever the client claimed.
fn sanitize_extension(source_format: &str) -> String {
    let cleaned: String = source_format
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(10)
        .collect::<String>()
        .to_ascii_lowercase();
    if cleaned.is_empty() {
        "bin".into()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[path = "tests/transcoder_tests.rs"]
mod tests;
