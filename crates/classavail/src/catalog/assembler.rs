//! Reassembles courses from the flat token stream of an availability page.
//!
//! The page is a table whose cells arrive as one token each, in reading order:
//!
//! ```text
//! [focus] CRN course section title [filler..] credits instructor seats
//!     days start [end] room dates      (one or more meeting rows)
//! ```
//!
//! Fields are recognized by grammar and position only. Lookahead never goes
//! further than two tokens past the current one.

use super::classify::{department_of, has_requirement_tag, TokenKind, TBA};
use super::error::{Field, ParseFailure};
use super::types::{Course, MeetingTime, NO_FOCUS};
use tracing::{debug, trace};

/// How far past the expected position a credits value may sit.
const CREDITS_LOOKAHEAD: usize = 2;

/// Focus-tag lines that also look like a days value.
const FOCUS_DAY_COLLISIONS: &[&str] = &["FW", "FS"];

/// Cursor over a borrowed token sequence.
pub struct Assembler<'a, S> {
    tokens: &'a [S],
    /// Index of the next unconsumed token
    pos: usize,
}

impl<'a, S: AsRef<str>> Assembler<'a, S> {
    pub fn new(tokens: &'a [S]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Runs the whole stream, returning courses in order of appearance.
    pub fn assemble(mut self) -> Result<Vec<Course>, ParseFailure> {
        let mut courses = Vec::new();

        while let Some(crn_index) = self.seek_crn() {
            let course = self.assemble_course(crn_index)?;
            debug!(
                crn = %course.crn,
                course = %course.course_code,
                meetings = course.meeting_times.len(),
                "Assembled course"
            );
            courses.push(course);
        }

        Ok(courses)
    }

    /// Token `offset` places past the cursor, if any.
    fn peek(&self, offset: usize) -> Option<&'a str> {
        self.tokens.get(self.pos + offset).map(|t| t.as_ref())
    }

    fn previous(&self) -> &'a str {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.as_ref())
            .unwrap_or("")
    }

    fn failure(&self, field: Field) -> ParseFailure {
        ParseFailure {
            field,
            previous: self.previous().to_string(),
            current: self.peek(0).unwrap_or("").to_string(),
            index: self.pos + 1,
        }
    }

    /// Consumes the current token if it fits `kind`.
    fn expect(&mut self, field: Field, kind: TokenKind) -> Result<String, ParseFailure> {
        match self.peek(0) {
            Some(token) if kind.matches(token) => {
                self.pos += 1;
                Ok(token.to_string())
            }
            _ => Err(self.failure(field)),
        }
    }

    /// Skips forward to the next CRN and consumes it. Noise lines are dropped.
    fn seek_crn(&mut self) -> Option<usize> {
        while let Some(token) = self.peek(0) {
            self.pos += 1;
            if TokenKind::Crn.matches(token) {
                return Some(self.pos - 1);
            }
            trace!(token, "Skipping line outside of a course");
        }
        None
    }

    fn assemble_course(&mut self, crn_index: usize) -> Result<Course, ParseFailure> {
        let crn = self.tokens[crn_index].as_ref().to_string();

        // The requirement tag line, when present, sits right before the CRN.
        let focus = crn_index
            .checked_sub(1)
            .map(|i| self.tokens[i].as_ref())
            .filter(|line| has_requirement_tag(line))
            .unwrap_or(NO_FOCUS)
            .to_string();

        let course_code = self.expect(Field::CourseCode, TokenKind::CourseCode)?;
        let department = department_of(&course_code).unwrap_or_default().to_string();
        let section = self.expect(Field::Section, TokenKind::Section)?;
        let title = self.expect(Field::Title, TokenKind::Title)?;
        let credits = self.credits()?;
        let instructor = self.expect(Field::Instructor, TokenKind::Instructor)?;
        let seats = self.expect(Field::Seats, TokenKind::Seats)?;

        let mut course = Course {
            department,
            focus,
            crn,
            course_code,
            section,
            title,
            instructor,
            seats,
            credits,
            meeting_times: Vec::new(),
        };

        loop {
            course.meeting_times.push(self.meeting_time()?);
            if !self.another_meeting_follows() {
                break;
            }
        }

        Ok(course)
    }

    /// Credits may be pushed right by blank spacer cells; the first candidate
    /// that fits wins and the skipped cells are dropped.
    fn credits(&mut self) -> Result<String, ParseFailure> {
        for offset in 0..=CREDITS_LOOKAHEAD {
            if let Some(token) = self.peek(offset) {
                if TokenKind::Credits.matches(token) {
                    self.pos += offset + 1;
                    return Ok(token.to_string());
                }
            }
        }
        Err(self.failure(Field::Credits))
    }

    fn meeting_time(&mut self) -> Result<MeetingTime, ParseFailure> {
        let days = self.expect(Field::Days, TokenKind::Days)?;
        let start_time = self.expect(Field::StartTime, TokenKind::StartTime)?;

        // A TBA start leaves the end-time cell blank, so nothing is consumed.
        let end_time = if start_time == TBA {
            TBA.to_string()
        } else {
            self.expect(Field::EndTime, TokenKind::EndTime)?
        };

        let room = self.expect(Field::Room, TokenKind::Room)?;
        let dates = self.expect(Field::Dates, TokenKind::Dates)?;

        Ok(MeetingTime {
            days,
            start_time,
            end_time,
            room,
            dates,
        })
    }

    /// A days-like token followed by a start time opens another meeting row.
    /// "FW" and "FS" are focus lines for the next course, not days.
    fn another_meeting_follows(&self) -> bool {
        match (self.peek(0), self.peek(1)) {
            (Some(days), Some(start)) => {
                TokenKind::Days.matches(days)
                    && !FOCUS_DAY_COLLISIONS.contains(&days)
                    && TokenKind::StartTime.matches(start)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(tokens: &[&str]) -> Result<Vec<Course>, ParseFailure> {
        Assembler::new(tokens).assemble()
    }

    const HEADER: [&str; 8] = [
        "OC",
        "12345",
        "ICS 111",
        "001",
        "Introduction to Computer Science",
        "4",
        "R. Narayan",
        "10",
    ];

    const MEETING: [&str; 5] = ["MWF", "0900-", "0950a", "POST 318", "08/23-12/10"];

    fn tokens<'a>(parts: &[&[&'a str]]) -> Vec<&'a str> {
        parts.concat()
    }

    #[test]
    fn test_single_course_single_meeting() {
        let input = tokens(&[&HEADER, &MEETING]);
        let courses = assemble(&input).unwrap();

        assert_eq!(courses.len(), 1);
        let course = &courses[0];
        assert_eq!(course.department, "ICS");
        assert_eq!(course.focus, "OC");
        assert_eq!(course.crn, "12345");
        assert_eq!(course.course_code, "ICS 111");
        assert_eq!(course.section, "001");
        assert_eq!(course.title, "Introduction to Computer Science");
        assert_eq!(course.credits, "4");
        assert_eq!(course.instructor, "R. Narayan");
        assert_eq!(course.seats, "10");
        assert_eq!(
            course.meeting_times,
            vec![MeetingTime {
                days: "MWF".to_string(),
                start_time: "0900-".to_string(),
                end_time: "0950a".to_string(),
                room: "POST 318".to_string(),
                dates: "08/23-12/10".to_string(),
            }]
        );
    }

    #[test]
    fn test_focus_defaults_to_none() {
        let input = tokens(&[&HEADER[1..], &MEETING]);
        let courses = assemble(&input).unwrap();
        assert_eq!(courses[0].focus, "none");

        let input = tokens(&[&["Class Availability"], &HEADER[1..], &MEETING]);
        let courses = assemble(&input).unwrap();
        assert_eq!(courses[0].focus, "none");
    }

    #[test]
    fn test_focus_is_whole_tag_line() {
        let input = tokens(&[&["DP,WI"], &HEADER[1..], &MEETING]);
        let courses = assemble(&input).unwrap();
        assert_eq!(courses[0].focus, "DP,WI");
    }

    #[test]
    fn test_multiple_meeting_times_in_order() {
        let lab = ["R", "1330-", "1520p", "KEL 310", "08/23-12/10"];
        let online = ["TBA", "TBA", "ONLINE", "TBA"];
        let input = tokens(&[&HEADER, &MEETING, &lab, &online]);
        let courses = assemble(&input).unwrap();

        assert_eq!(courses.len(), 1);
        let meetings = &courses[0].meeting_times;
        assert_eq!(meetings.len(), 3);
        assert_eq!(meetings[0].days, "MWF");
        assert_eq!(meetings[1].days, "R");
        assert_eq!(meetings[1].room, "KEL 310");
        assert_eq!(meetings[2].start_time, "TBA");
        assert_eq!(meetings[2].end_time, "TBA");
        assert_eq!(meetings[2].room, "ONLINE");
        assert!(courses[0].is_online());
    }

    #[test]
    fn test_tba_start_consumes_no_end_token() {
        let meeting = ["TBA", "TBA", "TBA", "TBA"];
        let input = tokens(&[&HEADER, &meeting]);
        let courses = assemble(&input).unwrap();

        let meeting = &courses[0].meeting_times[0];
        assert_eq!(meeting.start_time, "TBA");
        assert_eq!(meeting.end_time, "TBA");
        assert_eq!(meeting.room, "TBA");
        assert_eq!(meeting.dates, "TBA");
    }

    #[test]
    fn test_credits_lookahead_skips_fillers() {
        for fillers in [vec![], vec!["V"], vec!["V", "Arr"]] {
            let mut input: Vec<&str> = HEADER[..5].to_vec();
            input.extend(fillers.iter().copied());
            input.extend(["1-3", "Staff", "25"]);
            input.extend(MEETING);

            let courses = assemble(&input).unwrap();
            assert_eq!(courses[0].credits, "1-3", "fillers: {fillers:?}");
            assert_eq!(courses[0].instructor, "Staff");
            assert_eq!(courses[0].seats, "25");
        }
    }

    #[test]
    fn test_credits_beyond_lookahead_fails() {
        let mut input: Vec<&str> = HEADER[..5].to_vec();
        input.extend(["V", "Arr", "Var", "3", "Staff", "25"]);
        input.extend(MEETING);

        let failure = assemble(&input).unwrap_err();
        assert_eq!(failure.field, Field::Credits);
        assert_eq!(failure.previous, "Introduction to Computer Science");
        assert_eq!(failure.current, "V");
        assert_eq!(failure.index, 6);
    }

    #[test]
    fn test_bad_title_reports_index_and_discards_catalog() {
        let mut bad = HEADER;
        bad[1] = "54321";
        bad[4] = "Intro; Part One";
        let input = tokens(&[&HEADER, &MEETING, &bad, &MEETING]);

        let failure = assemble(&input).unwrap_err();
        assert_eq!(failure.field, Field::Title);
        assert_eq!(failure.previous, "001");
        assert_eq!(failure.current, "Intro; Part One");
        assert_eq!(failure.index, 18);
    }

    #[test]
    fn test_missing_end_time_after_fixed_start() {
        let meeting = ["MWF", "0900-", "POST 318", "08/23-12/10"];
        let input = tokens(&[&HEADER, &meeting]);

        let failure = assemble(&input).unwrap_err();
        assert_eq!(failure.field, Field::EndTime);
        assert_eq!(failure.previous, "0900-");
        assert_eq!(failure.current, "POST 318");
        assert_eq!(failure.index, 11);
    }

    #[test]
    fn test_truncated_stream_fails_past_end() {
        let input = tokens(&[&HEADER, &MEETING[..4]]);

        let failure = assemble(&input).unwrap_err();
        assert_eq!(failure.field, Field::Dates);
        assert_eq!(failure.previous, "POST 318");
        assert_eq!(failure.current, "");
        assert_eq!(failure.index, 13);
    }

    #[test]
    fn test_consecutive_courses_and_noise() {
        let second = [
            "67890",
            "ICS 211",
            "002",
            "Introduction to Computer Science II",
            "4",
            "TBA",
            "0",
        ];
        let input = tokens(&[
            &["Class Availability", "Spring"],
            &HEADER,
            &MEETING,
            &second,
            &["TR", "1030-", "1145a", "WEB 1410", "01/09-05/04"],
            &["* footnote"],
        ]);
        let courses = assemble(&input).unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].crn, "12345");
        assert_eq!(courses[1].crn, "67890");
        assert_eq!(courses[1].focus, "none");
        assert_eq!(courses[1].instructor, "TBA");
        assert_eq!(courses[1].meeting_times.len(), 1);
    }

    #[test]
    fn test_focus_line_is_not_another_meeting() {
        let mut next = HEADER;
        next[0] = "FW";
        next[1] = "67890";
        let input = tokens(&[&HEADER, &MEETING, &next, &MEETING]);
        let courses = assemble(&input).unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].meeting_times.len(), 1);
        assert_eq!(courses[1].focus, "FW");
    }

    #[test]
    fn test_fs_focus_line_is_not_another_meeting() {
        let mut next = HEADER;
        next[0] = "FS";
        next[1] = "67890";
        let input = tokens(&[&HEADER, &MEETING, &next, &MEETING]);
        let courses = assemble(&input).unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].meeting_times.len(), 1);
        assert_eq!(courses[1].crn, "67890");
        assert_eq!(courses[1].focus, "FS");
    }

    #[test]
    fn test_focus_collisions_never_continue_block() {
        // Even when followed by a start time, "FW" and "FS" are not days.
        for focus in ["FW", "FS"] {
            let input = [focus, "0900-"];
            assert!(!Assembler::new(&input[..]).another_meeting_follows());
        }
        let input = ["MW", "0900-"];
        assert!(Assembler::new(&input[..]).another_meeting_follows());
    }

    #[test]
    fn test_tba_start_ignores_end_shaped_token() {
        // The end time is TBA without consuming "0950a", which then fails as a room.
        let meeting = ["TBA", "TBA", "0950a", "ONLINE", "TBA"];
        let input = tokens(&[&HEADER, &meeting]);

        let failure = assemble(&input).unwrap_err();
        assert_eq!(failure.field, Field::Room);
        assert_eq!(failure.previous, "TBA");
        assert_eq!(failure.current, "0950a");
        assert_eq!(failure.index, 11);
    }

    #[test]
    fn test_days_like_line_without_start_ends_block() {
        // "TR" is days-shaped but is followed by a CRN, not a start time.
        let mut next = HEADER;
        next[0] = "TR";
        next[1] = "67890";
        let input = tokens(&[&HEADER, &MEETING, &next, &MEETING]);
        let courses = assemble(&input).unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].meeting_times.len(), 1);
        assert_eq!(courses[1].crn, "67890");
        assert_eq!(courses[1].focus, "none");
    }

    #[test]
    fn test_empty_and_noise_only_streams() {
        assert!(assemble(&[]).unwrap().is_empty());
        assert!(assemble(&["Class Availability", "Fall 2011"]).unwrap().is_empty());
    }
}
