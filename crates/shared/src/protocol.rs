use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::FormType;

/// Body of a `POST` from one of the site's forms. Every field is optional on
/// the wire; missing strings come through as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
    #[serde(rename = "formType", deserialize_with = "form_type_or_default")]
    pub form_type: FormType,
    #[serde(deserialize_with = "null_as_empty")]
    pub like: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub dislike: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub think: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub reply_to: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(rename = "voiceFilename", deserialize_with = "null_as_empty")]
    pub voice_filename: String,
    #[serde(rename = "voiceMime", deserialize_with = "null_as_empty")]
    pub voice_mime: String,
    /// Keys the known forms don't use, kept for the generic summary.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubmitRequest {
    /// Named text fields in display order, excluding the voice attachment.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("like", self.like.as_str()),
            ("dislike", self.dislike.as_str()),
            ("think", self.think.as_str()),
            ("reply_to", self.reply_to.as_str()),
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("msg", self.msg.as_str()),
        ]
    }

    pub fn has_voice(&self) -> bool {
        self.voice
            .as_deref()
            .is_some_and(|voice| !voice.trim().is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn form_type_or_default<'de, D>(deserializer: D) -> Result<FormType, D::Error>
where
    D: Deserializer<'de>,
{
    null_as_empty(deserializer).map(|raw| FormType::parse(&raw))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub ok: bool,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

impl SubmitReceipt {
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self {
            ok: true,
            message_id: message_id.into(),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
