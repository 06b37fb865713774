use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("invalid layout configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to parse layout configuration: {0}")]
    Parse(String),
}
