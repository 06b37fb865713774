use std::time::SystemTime;

use chrono::{DateTime, Utc};
use lettre::{
    address::AddressError,
    message::{
        header::{ContentTransferEncoding, ContentType},
        Attachment, Body, Mailbox, MultiPart, SinglePart,
    },
    Message,
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("message is missing a {0} address")]
    MissingAddress(&'static str),
    #[error("invalid {field} address '{value}': {source}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        #[source]
        source: AddressError,
    },
    #[error("invalid content type '{0}'")]
    ContentType(String),
    #[error("message has no parts")]
    NoParts,
    #[error(transparent)]
    Build(#[from] lettre::error::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePart {
    pub content_type: String,
    pub body: Vec<u8>,
    pub filename: Option<String>,
}

impl MimePart {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            content_type: "text/html; charset=utf-8".into(),
            body: body.into().into_bytes(),
            filename: None,
        }
    }

    pub fn attachment(
        content_type: impl Into<String>,
        filename: impl Into<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            body,
            filename: Some(filename.into()),
        }
    }

    fn into_single_part(self) -> Result<SinglePart, ComposeError> {
        let content_type = ContentType::parse(&self.content_type)
            .map_err(|_| ComposeError::ContentType(self.content_type.clone()))?;
        let body = Body::new_with_encoding(self.body, ContentTransferEncoding::Base64)
            .unwrap_or_else(Body::new);
        Ok(match self.filename {
            Some(filename) => Attachment::new(sanitize_header(&filename)).body(body, content_type),
            None => SinglePart::builder().header(content_type).body(body),
        })
    }
}

/// A `multipart/mixed` email. Built once per submission, rendered with
/// [`MimeMessage::to_rfc822`], then dropped.
#[derive(Debug, Clone)]
pub struct MimeMessage {
    message: Message,
    boundary: String,
    part_count: usize,
}

impl MimeMessage {
    pub fn builder() -> MimeMessageBuilder {
        MimeMessageBuilder::default()
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn part_count(&self) -> usize {
        self.part_count
    }

    /// Unencoded header value, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.message.headers().get_raw(name)
    }

    pub fn to_rfc822(&self) -> String {
        String::from_utf8_lossy(&self.message.formatted()).into_owned()
    }
}

#[derive(Debug, Default)]
pub struct MimeMessageBuilder {
    from: Option<String>,
    to: Vec<String>,
    reply_to: Option<String>,
    subject: String,
    date: Option<DateTime<Utc>>,
    parts: Vec<MimePart>,
}

impl MimeMessageBuilder {
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn reply_to(mut self, address: Option<String>) -> Self {
        self.reply_to = address;
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn part(mut self, part: MimePart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn build(self) -> Result<MimeMessage, ComposeError> {
        let from = self
            .from
            .as_deref()
            .map(sanitize_header)
            .filter(|from| !from.is_empty())
            .ok_or(ComposeError::MissingAddress("From"))?;
        let to: Vec<String> = self
            .to
            .iter()
            .map(|to| sanitize_header(to))
            .filter(|to| !to.is_empty())
            .collect();
        if to.is_empty() {
            return Err(ComposeError::MissingAddress("To"));
        }

        let mut parts = self.parts.into_iter();
        let first = parts.next().ok_or(ComposeError::NoParts)?;
        let mut multipart = MultiPart::mixed().singlepart(first.into_single_part()?);
        let mut part_count = 1;
        for part in parts {
            multipart = multipart.singlepart(part.into_single_part()?);
            part_count += 1;
        }
        let boundary = multipart.boundary();

        let mut builder = Message::builder()
            .from(parse_mailbox("From", &from)?)
            .subject(sanitize_header(&self.subject))
            .date(SystemTime::from(self.date.unwrap_or_else(Utc::now)));
        for address in &to {
            builder = builder.to(parse_mailbox("To", address)?);
        }
        if let Some(reply_to) = self
            .reply_to
            .as_deref()
            .map(sanitize_header)
            .filter(|reply_to| !reply_to.is_empty())
        {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(err) => warn!(reply_to = %reply_to, error = %err, "dropping unusable reply-to"),
            }
        }

        Ok(MimeMessage {
            message: builder.multipart(multipart)?,
            boundary,
            part_count,
        })
    }
}

fn parse_mailbox(field: &'static str, value: &str) -> Result<Mailbox, ComposeError> {
    value
        .parse::<Mailbox>()
        .map_err(|source| ComposeError::InvalidAddress {
            field,
            value: value.to_string(),
            source,
        })
}

fn sanitize_header(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "tests/mime_tests.rs"]
mod tests;
