//! Exam model.
//!
//! An exam occupies a half-open wall-clock window `[start, start + duration)`
//! and belongs to a coarse session bucket. Only candidates whose course is
//! in the exam's branch set are eligible to sit it.
//!
//! # Time Model
//! Start instants are naive local date-times at minute precision, matching
//! what operators type into a timetable (`2024-05-02T09:30`).

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Candidate;
use crate::validation::{ValidationError, ValidationErrorKind};

const START_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Coarse time-of-day bucket.
///
/// Two exams can only conflict when their sessions are equal, regardless
/// of their literal time windows. Equality compares labels: standard
/// labels match their variant (`Custom("morning") == Morning`) and custom
/// labels match case-insensitively. Serialized as the plain label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Session {
    /// Morning sitting.
    Morning,
    /// Afternoon sitting.
    Afternoon,
    /// Evening sitting.
    Evening,
    /// Institution-specific label.
    Custom(String),
}

impl Session {
    /// Parses a session label, case-insensitively for the standard buckets.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "morning" | "fn" | "forenoon" => Session::Morning,
            "afternoon" | "an" => Session::Afternoon,
            "evening" => Session::Evening,
            _ => Session::Custom(trimmed.to_string()),
        }
    }

    /// Comparison key: standard bucket index, or the lowercased custom label.
    fn key(&self) -> (u8, String) {
        match self {
            Session::Morning => (0, String::new()),
            Session::Afternoon => (1, String::new()),
            Session::Evening => (2, String::new()),
            Session::Custom(label) => match Session::from_label(label) {
                Session::Custom(label) => (3, label.to_lowercase()),
                standard => standard.key(),
            },
        }
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Session {}

impl Hash for Session {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<String> for Session {
    fn from(label: String) -> Self {
        Session::from_label(&label)
    }
}

impl From<Session> for String {
    fn from(session: Session) -> Self {
        session.to_string()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Morning => f.write_str("Morning"),
            Session::Afternoon => f.write_str("Afternoon"),
            Session::Evening => f.write_str("Evening"),
            Session::Custom(label) => f.write_str(label),
        }
    }
}

/// A scheduled exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    /// Unique exam identifier.
    pub id: String,
    /// Subject code (e.g. "CS301").
    pub subject_code: String,
    /// Subject name.
    pub subject_name: String,
    /// Start instant.
    pub start: NaiveDateTime,
    /// Duration in minutes.
    pub duration_minutes: u32,
    /// Session bucket.
    pub session: Session,
    /// Courses whose candidates sit this exam.
    pub branches: BTreeSet<String>,
}

impl Exam {
    /// Creates an exam with no eligible branches.
    pub fn new(
        id: impl Into<String>,
        subject_code: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: u32,
        session: Session,
    ) -> Self {
        Self {
            id: id.into(),
            subject_code: subject_code.into(),
            subject_name: String::new(),
            start,
            duration_minutes,
            session,
            branches: BTreeSet::new(),
        }
    }

    /// Sets the subject name.
    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    /// Adds an eligible branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branches.insert(branch.into());
        self
    }

    /// Replaces the eligible branches from a comma-separated list.
    pub fn with_branch_list(mut self, list: &str) -> Self {
        self.branches = parse_branches(list);
        self
    }

    /// End instant (exclusive).
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// The exam's `[start, end)` window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end())
    }

    /// Whether a candidate's course is in this exam's branch set.
    #[inline]
    pub fn is_eligible(&self, candidate: &Candidate) -> bool {
        self.branches.contains(&candidate.course)
    }

    /// Whether this exam shares at least one branch with another.
    pub fn shares_branch_with(&self, other: &Exam) -> bool {
        !self.branches.is_disjoint(&other.branches)
    }

    /// Parses a start instant.
    ///
    /// Accepts `YYYY-MM-DDTHH:MM` and `YYYY-MM-DD HH:MM`.
    pub fn parse_start(text: &str) -> Result<NaiveDateTime, ValidationError> {
        let normalized = text.trim().replacen(' ', "T", 1);
        NaiveDateTime::parse_from_str(&normalized, START_FORMAT).map_err(|e| {
            ValidationError::new(
                ValidationErrorKind::MalformedTime,
                format!("Invalid exam start '{text}': {e}"),
            )
        })
    }
}

/// Parses a comma-separated branch list into a set.
///
/// Entries are trimmed; empty entries are dropped.
pub fn parse_branches(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        Exam::parse_start(text).unwrap()
    }

    #[test]
    fn test_parse_start_formats() {
        let a = at("2024-05-02T09:30");
        let b = at("2024-05-02 09:30");
        assert_eq!(a, b);
        assert_eq!(a.format("%H:%M").to_string(), "09:30");
    }

    #[test]
    fn test_parse_start_malformed() {
        let err = Exam::parse_start("02/05/2024 9am").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MalformedTime);
        assert!(err.message.contains("02/05/2024"));
    }

    #[test]
    fn test_exam_window() {
        let e = Exam::new("E1", "CS301", at("2024-05-02T09:00"), 180, Session::Morning);
        assert_eq!(e.end(), at("2024-05-02T12:00"));
        assert_eq!(e.window(), TimeWindow::new(e.start, e.end()));
    }

    #[test]
    fn test_window_overlap_is_half_open() {
        let a = TimeWindow::new(at("2024-05-02T09:00"), at("2024-05-02T12:00"));
        let b = TimeWindow::new(at("2024-05-02T12:00"), at("2024-05-02T13:00"));
        let c = TimeWindow::new(at("2024-05-02T11:59"), at("2024-05-02T13:00"));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_parse_branches() {
        let set = parse_branches(" CSE, ECE ,,MECH ");
        let expected: BTreeSet<String> =
            ["CSE", "ECE", "MECH"].iter().map(|s| s.to_string()).collect();
        assert_eq!(set, expected);
        assert!(parse_branches("").is_empty());
    }

    #[test]
    fn test_eligibility() {
        let e = Exam::new("E1", "CS301", at("2024-05-02T09:00"), 60, Session::Morning)
            .with_branch_list("CSE,ECE");
        assert!(e.is_eligible(&Candidate::new("1", "CSE")));
        assert!(!e.is_eligible(&Candidate::new("2", "MECH")));
    }

    #[test]
    fn test_session_labels() {
        assert_eq!(Session::from_label("morning"), Session::Morning);
        assert_eq!(Session::from_label(" Afternoon "), Session::Afternoon);
        assert_eq!(Session::from_label("EVENING"), Session::Evening);
        assert_eq!(
            Session::from_label("Night"),
            Session::Custom("Night".to_string())
        );
        assert_eq!(Session::Custom("Night".into()).to_string(), "Night");
    }

    #[test]
    fn test_session_equality_by_label() {
        assert_eq!(Session::Custom("Morning".into()), Session::Morning);
        assert_eq!(Session::Custom(" afternoon".into()), Session::Afternoon);
        assert_eq!(Session::Custom("Night".into()), Session::Custom("night".into()));
        assert_ne!(Session::Custom("Night".into()), Session::Evening);
        assert_ne!(Session::Morning, Session::Afternoon);

        let set: std::collections::HashSet<Session> =
            [Session::Morning, Session::Custom("MORNING".into())].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_session_serde_uses_labels() {
        let parsed: Session = serde_json::from_str("\"morning\"").unwrap();
        assert_eq!(parsed, Session::Morning);
        assert!(matches!(parsed, Session::Morning));

        let night: Session = serde_json::from_str("\"Night\"").unwrap();
        assert!(matches!(&night, Session::Custom(label) if label == "Night"));
        assert_eq!(serde_json::to_string(&night).unwrap(), "\"Night\"");
        assert_eq!(serde_json::to_string(&Session::Evening).unwrap(), "\"Evening\"");
    }
}
