//! Token grammars for the class availability listing.
//!
//! Every check here looks at one token in isolation. A token can be valid for
//! several kinds at once (a section number and a seat count look alike); the
//! assembler decides which one applies from its position in the stream.

use regex::Regex;
use std::sync::LazyLock;

/// Sentinel used by the listing for undetermined values.
pub const TBA: &str = "TBA";

/// Requirement tags that may sit on the line right before a CRN.
pub const REQUIREMENT_TAGS: &[&str] = &[
    "FGA", "FGB", "FGC", "FS", "FW", "HSL", "NI", "DA", "DB", "DH", "DL", "DP", "DS", "DY", "ETH",
    "HAP", "OC", "WI",
];

// Static patterns - compiled once
static CRN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5}$").unwrap());
static COURSE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,4} [0-9]{3}[A-Z]?$").unwrap());
static SECTION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{2,3}$").unwrap());
static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z,\-()'&: ]+$").unwrap());
static CREDITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9./\-]+$").unwrap());
static INSTRUCTOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w'.\- ]+$").unwrap());
static SEATS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static DAYS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[MTWRFS]+$").unwrap());
static START_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}-$").unwrap());
static END_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}[ap]$").unwrap());
static ROOM_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9/\- ]+$").unwrap());
static DATES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}-[0-9]{2}/[0-9]{2}$").unwrap());
static DEPARTMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]{2,4}").unwrap());

/// The kinds of token the listing is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Crn,
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

impl TokenKind {
    /// Returns true if `token` is syntactically valid for this kind.
    pub fn matches(self, token: &str) -> bool {
        match self {
            TokenKind::Crn => CRN_REGEX.is_match(token),
            TokenKind::CourseCode => COURSE_CODE_REGEX.is_match(token),
            TokenKind::Section => SECTION_REGEX.is_match(token),
            TokenKind::Title => TITLE_REGEX.is_match(token),
            TokenKind::Credits => CREDITS_REGEX.is_match(token),
            TokenKind::Instructor => token == TBA || INSTRUCTOR_REGEX.is_match(token),
            TokenKind::Seats => SEATS_REGEX.is_match(token),
            TokenKind::Days => token == TBA || DAYS_REGEX.is_match(token),
            TokenKind::StartTime => token == TBA || START_TIME_REGEX.is_match(token),
            TokenKind::EndTime => END_TIME_REGEX.is_match(token),
            TokenKind::Room => token.contains(TBA) || ROOM_REGEX.is_match(token),
            TokenKind::Dates => token.contains(TBA) || DATES_REGEX.is_match(token),
        }
    }
}

/// Extracts the department prefix from a course code token ("ICS 111" -> "ICS").
pub fn department_of(course_code: &str) -> Option<&str> {
    DEPARTMENT_REGEX.find(course_code).map(|m| m.as_str())
}

/// Returns true if the token carries any known requirement tag.
///
/// This is a containment test: "DP,OC" and "WI" both qualify.
pub fn has_requirement_tag(token: &str) -> bool {
    REQUIREMENT_TAGS.iter().any(|tag| token.contains(tag))
}
