//! Input validation for seating problems.
//!
//! Checks structural integrity of candidates, rooms, exams, and seat
//! assignments before they reach the allocator or the store. Detects:
//! - Duplicate IDs
//! - Missing required fields
//! - Seats outside the room grid or shared by two candidates
//! - Candidates seated twice, or seated for an exam they are not eligible for
//!
//! All problems are collected; callers get the full list, not the first hit.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::models::{Assignment, Candidate, Exam, Room, Seat, Session};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A required field is empty.
    MissingField,
    /// A time value could not be parsed.
    MalformedTime,
    /// An exam has a zero duration.
    InvalidDuration,
    /// An allocator setting is out of range.
    InvalidConfig,
    /// An assignment belongs to a different exam.
    WrongExam,
    /// An assignment references a room that doesn't exist.
    UnknownRoom,
    /// An assignment references a candidate that doesn't exist.
    UnknownCandidate,
    /// A seat lies outside the room's rows × columns grid.
    SeatOutOfBounds,
    /// Two candidates share the same room seat.
    SeatCollision,
    /// A candidate holds more than one seat in the same exam.
    DuplicateCandidate,
    /// A candidate's course is not among the exam's branches.
    IneligibleCandidate,
    /// An assignment's recorded course differs from the candidate's.
    CourseMismatch,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates candidates and rooms handed to the allocator.
///
/// Checks:
/// 1. No duplicate candidate IDs
/// 2. No duplicate room IDs
/// 3. Every candidate has an ID and a course
pub fn validate_input(candidates: &[Candidate], rooms: &[Room]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut candidate_ids = HashSet::new();
    for c in candidates {
        if c.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                "Candidate with empty ID",
            ));
        } else if !candidate_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate candidate ID: {}", c.id),
            ));
        }
        if c.course.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Candidate '{}' has no course", c.id),
            ));
        }
    }

    finish(errors)
}

/// Validates an exam definition.
///
/// Checks:
/// 1. ID and subject code are present
/// 2. Duration is positive
/// 3. Session label is present
/// 4. At least one eligible branch
pub fn validate_exam(exam: &Exam) -> ValidationResult {
    let mut errors = Vec::new();

    if exam.id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            "Exam has no ID",
        ));
    }
    if exam.subject_code.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            format!("Exam '{}' has no subject code", exam.id),
        ));
    }
    if exam.duration_minutes == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDuration,
            format!("Exam '{}' has zero duration", exam.id),
        ));
    }
    if matches!(&exam.session, Session::Custom(label) if label.trim().is_empty()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            format!("Exam '{}' has no session", exam.id),
        ));
    }
    if exam.branches.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            format!("Exam '{}' has no eligible branches", exam.id),
        ));
    }

    finish(errors)
}

/// Validates a complete assignment set for one exam.
///
/// Checks:
/// 1. Every assignment belongs to `exam`
/// 2. Rooms and candidates exist
/// 3. Seats lie within the room grid
/// 4. No two assignments share a (room, seat)
/// 5. No candidate is seated twice
/// 6. Every candidate is eligible and the recorded course matches
pub fn validate_assignments(
    exam: &Exam,
    assignments: &[Assignment],
    rooms: &[Room],
    candidates: &[Candidate],
) -> ValidationResult {
    let mut errors = Vec::new();

    let rooms_by_id: HashMap<&str, &Room> = rooms.iter().map(|r| (r.id.as_str(), r)).collect();
    let candidates_by_id: HashMap<&str, &Candidate> =
        candidates.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut taken: HashSet<(&str, Seat)> = HashSet::new();
    let mut seated: HashSet<&str> = HashSet::new();

    for a in assignments {
        if a.exam_id != exam.id {
            errors.push(ValidationError::new(
                ValidationErrorKind::WrongExam,
                format!(
                    "Assignment for candidate '{}' belongs to exam '{}', not '{}'",
                    a.candidate_id, a.exam_id, exam.id
                ),
            ));
        }

        match rooms_by_id.get(a.room_id.as_str()) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::UnknownRoom,
                format!("Assignment references unknown room '{}'", a.room_id),
            )),
            Some(room) if !room.contains(a.seat) => errors.push(ValidationError::new(
                ValidationErrorKind::SeatOutOfBounds,
                format!(
                    "Seat {} is outside room '{}' ({}x{})",
                    a.seat, room.id, room.rows, room.columns
                ),
            )),
            Some(_) => {}
        }

        if !taken.insert((a.room_id.as_str(), a.seat)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SeatCollision,
                format!("Seat {} in room '{}' is assigned twice", a.seat, a.room_id),
            ));
        }

        if !seated.insert(a.candidate_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCandidate,
                format!("Candidate '{}' is seated more than once", a.candidate_id),
            ));
        }

        match candidates_by_id.get(a.candidate_id.as_str()) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCandidate,
                format!("Assignment references unknown candidate '{}'", a.candidate_id),
            )),
            Some(c) => {
                if !exam.is_eligible(c) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::IneligibleCandidate,
                        format!(
                            "Candidate '{}' ({}) is not eligible for exam '{}'",
                            c.id, c.course, exam.id
                        ),
                    ));
                }
                if c.course != a.course {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::CourseMismatch,
                        format!(
                            "Assignment records course '{}' for candidate '{}' of course '{}'",
                            a.course, c.id, c.course
                        ),
                    ));
                }
            }
        }
    }

    finish(errors)
}
