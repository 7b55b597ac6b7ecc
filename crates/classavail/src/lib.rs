//! Reconstructs the UH Manoa class availability listing into typed courses.
//!
//! The availability page is a table; once its markup is stripped only the cell
//! texts remain, in reading order. [`catalog::parse_courses`] rebuilds
//! [`catalog::Course`] records and their meeting times from that flat
//! sequence, and [`catalog::ClassAvailClient`] fetches pages per department.

pub mod catalog;

pub use catalog::{
    extract_tokens, parse_courses, parse_token_source, CatalogError, Course, MeetingTime,
    ParseFailure,
};
