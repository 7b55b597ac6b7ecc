//! Error types for the class availability subsystem.

use std::fmt;
use thiserror::Error;

/// A field of the listing the assembler can fail to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CourseCode,
    Section,
    Title,
    Credits,
    Instructor,
    Seats,
    Days,
    StartTime,
    EndTime,
    Room,
    Dates,
}

impl Field {
    /// Human-readable name of the field, as used in failure reports.
    pub fn name(&self) -> &'static str {
        match self {
            Field::CourseCode => "Course code",
            Field::Section => "Section",
            Field::Title => "Title",
            Field::Credits => "Credits",
            Field::Instructor => "Instructor",
            Field::Seats => "Seats",
            Field::Days => "Days",
            Field::StartTime => "Start time",
            Field::EndTime => "End time",
            Field::Room => "Room",
            Field::Dates => "Dates",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token did not fit the field the assembler expected at its position.
///
/// `index` is 1-based. When the token stream ran out while a field was still
/// required, `current` is empty and `index` is one past the last token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {field} at token {index} (previous: {previous:?}, current: {current:?})")]
pub struct ParseFailure {
    pub field: Field,
    pub previous: String,
    pub current: String,
    pub index: usize,
}

/// Errors that can occur while loading and parsing department listings.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The listing did not match the expected layout
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    /// The department code is not part of the known set
    #[error("No such department: {code}")]
    UnknownDepartment { code: String },

    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server returned an unexpected response
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    Url { message: String },

    /// Configuration could not be read
    #[error("Config error: {message}")]
    Config { message: String },

    /// A batch load was cancelled between departments
    #[error("Load cancelled")]
    Cancelled,

    /// Circuit breaker is open due to repeated failures
    #[error("Circuit breaker open - too many recent failures")]
    CircuitBreakerOpen,
}

impl CatalogError {
    /// Returns true if this error is potentially transient and retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::Network { .. } | CatalogError::UnexpectedResponse { .. }
        )
    }

    /// Returns true if the listing itself was malformed.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, CatalogError::Parse(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::Url {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Config {
            message: err.to_string(),
        }
    }
}
