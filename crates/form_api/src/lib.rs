//! Contact/feedback form relay: one inbound request in, at most one email
//! out. Each submission is a single best-effort attempt with no retries.

use std::sync::Arc;

use http::{Method, StatusCode};
use mail_integration::{
    AudioTranscoder, ComposeError, MailTransport, MimeMessage, MimePart, OutboundEmail,
    TranscodeError, TransportError,
};
use serde_json::Value;
use shared::{
    domain::FormType,
    error::{ApiError, ErrorCode},
    protocol::{SubmitReceipt, SubmitRequest},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub mod templates;
pub mod voice;

pub use voice::{decode_voice, VoiceMemo};

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Clone)]
pub struct FormContext {
    pub mail: MailSettings,
    pub transcoder: Arc<dyn AudioTranscoder>,
    pub transport: Arc<dyn MailTransport>,
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid request body: {0}")]
    InvalidPayload(String),
    #[error("voice attachment is not valid base64: {0}")]
    Decode(#[source] base64::DecodeError),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FormError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) | Self::InvalidPayload(_) => ErrorCode::Validation,
            Self::Transport(_) => ErrorCode::Transport,
            Self::Decode(_) | Self::Transcode(_) | Self::Compose(_) => ErrorCode::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.code())
    }

    /// What the browser gets to see. Only validation and transport errors
    /// carry their own message.
    pub fn to_api_error(&self) -> ApiError {
        let message = match self {
            Self::Validation(message) => message.clone(),
            Self::InvalidPayload(_) | Self::Transport(_) => self.to_string(),
            Self::Decode(_) | Self::Transcode(_) | Self::Compose(_) => {
                "Failed to send message".to_string()
            }
        };
        ApiError::new(self.code(), message)
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::Transport | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Validated,
    Transcoded,
    Composed,
    Sent,
    Succeeded,
    Rejected,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Text(&'static str),
    Json(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl FormResponse {
    fn json(status: StatusCode, value: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(value),
        }
    }
}

/// Entry point for one invocation. Never fails: every outcome becomes a
/// status plus body.
pub async fn handle_request(ctx: &FormContext, method: &Method, body: &[u8]) -> FormResponse {
    if *method == Method::OPTIONS {
        return FormResponse {
            status: StatusCode::OK,
            body: ResponseBody::Empty,
        };
    }
    if *method != Method::POST {
        return FormResponse {
            status: status_for(ErrorCode::MethodNotAllowed),
            body: ResponseBody::Text("Method Not Allowed"),
        };
    }

    match submit_form(ctx, body).await {
        Ok(receipt) => {
            debug!(stage = ?PipelineStage::Succeeded, message_id = %receipt.message_id);
            FormResponse::json(StatusCode::OK, to_json(&receipt))
        }
        Err(err) => {
            if err.status() == StatusCode::BAD_REQUEST {
                warn!(stage = ?PipelineStage::Rejected, error = %err, "form submission rejected");
            } else {
                error!(stage = ?PipelineStage::Failed, error = %err, "form submission failed");
            }
            FormResponse::json(err.status(), to_json(&err.to_api_error()))
        }
    }
}

pub async fn submit_form(ctx: &FormContext, body: &[u8]) -> Result<SubmitReceipt, FormError> {
    let request = parse_request(body)?;
    debug!(stage = ?PipelineStage::Received, form_type = %request.form_type);

    validate(&request)?;
    debug!(stage = ?PipelineStage::Validated);

    let voice = match decode_voice(&request)? {
        Some(memo) => {
            let format = voice::source_format(&request);
            let audio = ctx.transcoder.transcode(&memo.bytes, &format).await?;
            let memo = memo.into_transcoded(audio);
            debug!(stage = ?PipelineStage::Transcoded, filename = %memo.filename, bytes = memo.bytes.len());
            Some(memo)
        }
        None => None,
    };

    let message = compose_message(&ctx.mail, &request, voice.as_ref())?;
    debug!(stage = ?PipelineStage::Composed, boundary = message.boundary());

    let email = OutboundEmail {
        from: ctx.mail.from.clone(),
        to: ctx.mail.to.clone(),
        raw: message.to_rfc822(),
    };
    let message_id = ctx.transport.send(&email).await?;
    debug!(stage = ?PipelineStage::Sent, %message_id);

    info!(form_type = %request.form_type, %message_id, "form submission relayed");
    Ok(SubmitReceipt::sent(message_id))
}

/// An empty body is an empty form; anything else must be a JSON object.
pub fn parse_request(body: &[u8]) -> Result<SubmitRequest, FormError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SubmitRequest::default());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FormError::InvalidPayload(e.to_string()))?;
    if !value.is_object() {
        return Err(FormError::InvalidPayload("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| FormError::InvalidPayload(e.to_string()))
}

/// Feedback needs some content; messages and other forms go through as-is.
pub fn validate(request: &SubmitRequest) -> Result<(), FormError> {
    if request.form_type != FormType::Feedback {
        return Ok(());
    }
    let has_text = [&request.like, &request.dislike, &request.think]
        .iter()
        .any(|field| !field.trim().is_empty());
    if has_text || request.has_voice() {
        Ok(())
    } else {
        Err(FormError::Validation(
            "Please share at least one thought or record a voice memo".into(),
        ))
    }
}

pub fn compose_message(
    mail: &MailSettings,
    request: &SubmitRequest,
    voice: Option<&VoiceMemo>,
) -> Result<MimeMessage, ComposeError> {
    let summary = templates::render_summary(request, voice.map(|memo| memo.filename.as_str()));
    let mut builder = MimeMessage::builder()
        .from(mail.from.as_str())
        .reply_to(reply_address(request))
        .subject(templates::subject_for(&request.form_type))
        .part(MimePart::html(summary));
    for to in &mail.to {
        builder = builder.to(to.as_str());
    }
    if let Some(memo) = voice {
        builder = builder.part(MimePart::attachment(
            memo.content_type.as_str(),
            memo.filename.as_str(),
            memo.bytes.clone(),
        ));
    }
    builder.build()
}

fn reply_address(request: &SubmitRequest) -> Option<String> {
    let candidate = match request.form_type {
        FormType::Feedback => request.reply_to.as_str(),
        FormType::Message => request.email.as_str(),
        FormType::Other(_) => [request.reply_to.as_str(), request.email.as_str()]
            .into_iter()
            .find(|value| !value.trim().is_empty())
            .unwrap_or_default(),
    };
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate.contains(['\r', '\n']) {
        None
    } else {
        Some(candidate.to_string())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
