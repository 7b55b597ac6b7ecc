/// Class availability scraping and parsing module
mod assembler;
mod cache;
mod classify;
mod client;
mod config;
mod departments;
mod error;
mod extract;
mod search;
mod types;

pub use assembler::Assembler;
pub use cache::{CacheStats, CatalogCache, CircuitBreaker};
pub use classify::{department_of, has_requirement_tag, TokenKind, REQUIREMENT_TAGS, TBA};
pub use client::ClassAvailClient;
pub use config::CatalogConfig;
pub use departments::{is_valid_department, validate_department, DEPARTMENT_LIST};
pub use error::{CatalogError, Field, ParseFailure};
pub use extract::extract_tokens;
pub use search::{SearchCriteria, DIVERSIFICATION_TAGS, FOCUS_TAGS, GEN_ED_TAGS};
pub use types::*;

use tracing::debug;

/// Parses a department's token sequence into its courses.
///
/// The token buffer is consumed, so it is released whether parsing succeeds
/// or not. On failure nothing parsed so far is returned.
///
/// # Arguments
/// * `tokens` - One token per table cell, in reading order
///
/// # Returns
/// * `Ok(Vec<Course>)` - Courses in order of their CRN's first appearance
/// * `Err(ParseFailure)` - The first token that did not fit its field
pub fn parse_courses<S: AsRef<str>>(tokens: Vec<S>) -> Result<Vec<Course>, ParseFailure> {
    let courses = Assembler::new(tokens.as_slice()).assemble()?;
    debug!("Parsed {} courses from {} tokens", courses.len(), tokens.len());
    Ok(courses)
}

/// Parses tokens from a lazily produced source.
///
/// Errors from the source are returned unmodified before any parsing starts;
/// a parse failure is converted into the caller's error type.
pub fn parse_token_source<I, S, E>(source: I) -> Result<Vec<Course>, E>
where
    I: IntoIterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: From<ParseFailure>,
{
    let tokens = source.into_iter().collect::<Result<Vec<S>, E>>()?;
    Ok(parse_courses(tokens)?)
}
