/// Course filtering by requirement tags and delivery mode
use super::departments::DEPARTMENT_LIST;
use super::types::Course;
use serde::{Deserialize, Serialize};

/// General education tags.
pub const GEN_ED_TAGS: &[&str] = &["FGA", "FGB", "FGC", "FS", "FW", "HSL", "NI"];

/// Diversification tags.
pub const DIVERSIFICATION_TAGS: &[&str] = &["DA", "DB", "DH", "DL", "DP", "DS", "DY"];

/// Focus tags.
pub const FOCUS_TAGS: &[&str] = &["ETH", "HAP", "OC", "WI"];

/// What a user is looking for. `None` means "Any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub department: Option<String>,
    pub gen_ed: Option<String>,
    pub diversification: Option<String>,
    pub focus: Option<String>,
    #[serde(default)]
    pub online_only: bool,
}

impl SearchCriteria {
    /// Departments a load for these criteria has to cover.
    pub fn departments(&self) -> Vec<String> {
        match &self.department {
            Some(dept) => vec![dept.clone()],
            None => DEPARTMENT_LIST.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Returns true if no requirement narrows the results.
    pub fn is_unrestricted(&self) -> bool {
        self.gen_ed.is_none()
            && self.diversification.is_none()
            && self.focus.is_none()
            && !self.online_only
    }

    /// Checks a course against every requirement that is set.
    pub fn matches(&self, course: &Course) -> bool {
        let tags_ok = [&self.gen_ed, &self.diversification, &self.focus]
            .into_iter()
            .flatten()
            .all(|tag| course.focus.contains(tag.as_str()));

        tags_ok && (!self.online_only || course.is_online())
    }

    /// Keeps the courses that match, preserving order.
    pub fn filter(&self, mut courses: Vec<Course>) -> Vec<Course> {
        if !self.is_unrestricted() {
            courses.retain(|c| self.matches(c));
        }
        courses
    }
}
