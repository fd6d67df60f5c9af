//! Error type for seating operations.
//!
//! Every failure is local to one call; nothing is recoverable across
//! calls. `PlacementExhausted` and `TransactionFailure` leave the
//! previously persisted assignments untouched, so both are safe to retry
//! once the cause (capacity, storage) is addressed.

use crate::models::Seat;
use crate::report::ExamSummary;
use crate::validation::ValidationError;

/// Unified error type covering allocation, conflict checks, and storage.
#[derive(Debug, thiserror::Error)]
pub enum SeatingError {
    /// A referenced exam, room, candidate, or seat does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of entity looked up.
        entity: &'static str,
        /// Identifier that was not found.
        id: String,
    },

    /// Input failed integrity checks.
    #[error("Validation failed: {}", join_errors(.errors))]
    Validation {
        /// Every detected problem.
        errors: Vec<ValidationError>,
    },

    /// The exam has no candidates left to seat in any of its branches.
    #[error("No eligible candidates for exam '{exam_id}'. Check the exam's branch list.")]
    NoEligibleCandidates {
        /// Exam being seated.
        exam_id: String,
    },

    /// No rooms are available.
    #[error("No rooms available. Add at least one room before generating seating.")]
    NoRooms,

    /// More candidates than seats.
    #[error(
        "Not enough seats: need {required} but only {available} available ({shortfall} short). Add rooms or exclude candidates."
    )]
    CapacityExceeded {
        /// Candidates to seat.
        required: usize,
        /// Total seats on offer.
        available: usize,
        /// `required - available`.
        shortfall: usize,
    },

    /// No spacing level could seat the whole sequence.
    #[error(
        "Unable to seat all candidates with safe spacing: placed {placed} of {total}. Nothing was saved; add room capacity and retry."
    )]
    PlacementExhausted {
        /// Best progress reached over all attempts (diagnostic only).
        placed: usize,
        /// Candidates in the sequence.
        total: usize,
    },

    /// A new exam overlaps existing exams on time, session, and branch.
    #[error("Exam time conflicts detected with {} existing exam(s)", .conflicts.len())]
    SchedulingConflict {
        /// Overlapping exams.
        conflicts: Vec<ExamSummary>,
    },

    /// The seat is already held by another candidate.
    #[error("Seat {} in room '{room_id}' is already taken", .seat.label())]
    SeatOccupied {
        /// Room holding the seat.
        room_id: String,
        /// Requested seat.
        seat: Seat,
    },

    /// The candidate already holds a seat for this exam.
    #[error("Candidate '{candidate_id}' is already assigned a seat for this exam")]
    AlreadySeated {
        /// Candidate that is already seated.
        candidate_id: String,
    },

    /// A store write failed; prior assignments were kept.
    #[error("Saving assignments for exam '{exam_id}' failed: {reason}. Previous seating kept; safe to retry.")]
    TransactionFailure {
        /// Exam whose assignments were being replaced.
        exam_id: String,
        /// What went wrong.
        reason: String,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SeatingError>;

impl SeatingError {
    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        SeatingError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<Vec<ValidationError>> for SeatingError {
    fn from(errors: Vec<ValidationError>) -> Self {
        SeatingError::Validation { errors }
    }
}

impl From<ValidationError> for SeatingError {
    fn from(error: ValidationError) -> Self {
        SeatingError::Validation {
            errors: vec![error],
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
