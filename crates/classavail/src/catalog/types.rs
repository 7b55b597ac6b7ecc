/// Types for class availability data
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;

/// Focus value used when no requirement tag precedes a CRN.
pub const NO_FOCUS: &str = "none";

/// One meeting pattern of a course (a row of days, times, room and dates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingTime {
    pub days: String,
    pub start_time: String,
    /// "TBA" whenever `start_time` is "TBA"
    pub end_time: String,
    pub room: String,
    pub dates: String,
}

impl MeetingTime {
    /// Returns true if the room marks an online meeting.
    pub fn is_online(&self) -> bool {
        self.room.contains("ONLINE") || self.room.contains("WWW")
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}\n{}",
            self.days, self.start_time, self.end_time, self.room, self.dates
        )
    }
}

/// One offered section, as listed on the availability page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub department: String,
    /// Requirement tag line (e.g. "OC", "DP,WI") or "none"
    pub focus: String,
    pub crn: String,
    /// Department plus number, e.g. "ICS 111"
    pub course_code: String,
    pub section: String,
    pub title: String,
    pub instructor: String,
    pub seats: String,
    pub credits: String,
    pub meeting_times: Vec<MeetingTime>,
}

impl Course {
    /// Parses the seat count.
    pub fn seats_available(&self) -> Result<u32, ParseIntError> {
        self.seats.parse()
    }

    /// Returns true if at least one seat is open.
    pub fn has_open_seats(&self) -> bool {
        self.seats_available().map(|n| n > 0).unwrap_or(false)
    }

    /// Returns true if any meeting is held online.
    pub fn is_online(&self) -> bool {
        self.meeting_times.iter().any(MeetingTime::is_online)
    }

    /// Start time of the first meeting as a number ("0930-" -> 930), 0 for TBA.
    pub fn start_time(&self) -> u16 {
        self.meeting_times
            .first()
            .and_then(|m| m.start_time.get(..4))
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }

    /// Days of the first meeting.
    pub fn days(&self) -> Option<&str> {
        self.meeting_times.first().map(|m| m.days.as_str())
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.crn)?;
        writeln!(f, "{}: {}", self.course_code, self.title)?;
        writeln!(f, "Gen. Ed./Div./Focus: {}", self.focus)?;
        writeln!(f, "Section: {}", self.section)?;
        writeln!(f, "Credits: {}", self.credits)?;
        writeln!(f, "{}", self.instructor)?;
        write!(f, "Seats: {}", self.seats)?;
        for meeting in &self.meeting_times {
            write!(f, "\n{meeting}")?;
        }
        Ok(())
    }
}

/// All courses parsed from one department's page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCatalog {
    pub department: String,
    pub courses: Vec<Course>,
    pub fetched_at: DateTime<Utc>,
}
