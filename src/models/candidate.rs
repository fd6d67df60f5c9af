//! Candidate model.
//!
//! A candidate is a student eligible to sit one or more exams. The
//! allocation core treats candidates as read-only values supplied by
//! the persistence layer.

use serde::{Deserialize, Serialize};

/// A student who may be seated for an exam.
///
/// The `course` label doubles as the branch used for exam eligibility
/// and as the mixing key for placement (same-course candidates are kept
/// further apart than different-course ones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate identifier (e.g. roll number).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Course / branch label (e.g. "CSE").
    pub course: String,
    /// Semester of study.
    pub semester: u8,
}

impl Candidate {
    /// Creates a candidate in the given course.
    pub fn new(id: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            course: course.into(),
            semester: 1,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = semester;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_builder() {
        let c = Candidate::new("21CS001", "CSE")
            .with_name("Asha Rao")
            .with_semester(4);

        assert_eq!(c.id, "21CS001");
        assert_eq!(c.name, "Asha Rao");
        assert_eq!(c.course, "CSE");
        assert_eq!(c.semester, 4);
    }

    #[test]
    fn test_candidate_defaults() {
        let c = Candidate::new("X", "ECE");
        assert!(c.name.is_empty());
        assert_eq!(c.semester, 1);
    }
}
