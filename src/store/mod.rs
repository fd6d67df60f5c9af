//! Entity store collaborator.
//!
//! The seating engine reads candidates, rooms, and exams through
//! [`SeatingStore`] and writes assignments back through it. Replacing an
//! exam's assignment set is the only write the allocator needs, and it
//! must be atomic: on error the previously stored set stays in place.
//!
//! | Type | Role |
//! |------|------|
//! | [`SeatingStore`] | data-access contract |
//! | [`InMemoryStore`] | transactional in-process implementation |

mod memory;

pub use memory::InMemoryStore;

use std::collections::{BTreeSet, HashSet};

use crate::error::Result;
use crate::models::{Assignment, Candidate, Exam, Room};

/// Data-access contract used by the seating service.
pub trait SeatingStore {
    /// Candidates, optionally restricted to the given courses.
    fn list_candidates(&self, courses: Option<&BTreeSet<String>>) -> Result<Vec<Candidate>>;

    /// Every room, in allocation order.
    fn list_rooms(&self) -> Result<Vec<Room>>;

    /// One exam, or `NotFound`.
    fn get_exam(&self, exam_id: &str) -> Result<Exam>;

    /// Every exam except `exclude`, if given.
    fn list_exams(&self, exclude: Option<&str>) -> Result<Vec<Exam>>;

    /// Stores a new exam. Duplicate ids are rejected.
    fn insert_exam(&mut self, exam: Exam) -> Result<()>;

    /// Current assignments of an exam (empty when none).
    fn assignments_for_exam(&self, exam_id: &str) -> Result<Vec<Assignment>>;

    /// Atomically replaces an exam's assignments.
    ///
    /// On error the prior set must be left untouched.
    fn replace_assignments(&mut self, exam_id: &str, assignments: Vec<Assignment>) -> Result<()>;

    /// Identifiers of candidates holding a seat in the exam.
    fn assigned_candidate_ids(&self, exam_id: &str) -> Result<HashSet<String>> {
        Ok(self
            .assignments_for_exam(exam_id)?
            .into_iter()
            .map(|a| a.candidate_id)
            .collect())
    }
}
