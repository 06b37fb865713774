use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which contact form produced a submission. Unrecognized names are kept
/// verbatim so the generic summary can still mention them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormType {
    Feedback,
    Message,
    Other(String),
}

impl FormType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "feedback" => Self::Feedback,
            "message" => Self::Message,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Feedback => "feedback",
            Self::Message => "message",
            Self::Other(name) => name,
        }
    }
}

impl Default for FormType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for FormType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FormType> for String {
    fn from(value: FormType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardId {
    Showreel,
    Experiments,
    Playground,
    Contact,
}

impl CardId {
    pub const ALL: [CardId; 4] = [
        CardId::Showreel,
        CardId::Experiments,
        CardId::Playground,
        CardId::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Showreel => "showreel",
            Self::Experiments => "experiments",
            Self::Playground => "playground",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown card '{0}'")]
pub struct UnknownCard(pub String);

impl FromStr for CardId {
    type Err = UnknownCard;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardId::ALL
            .into_iter()
            .find(|card| card.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCard(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelVariant {
    Full,
    Abridged,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
