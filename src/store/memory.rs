//! In-process store.
//!
//! Assignment replacement is staged: the new set is checked against the
//! store's uniqueness rules first and swapped in only when it passes, so a
//! rejected write never leaves an exam half-seated.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{Result, SeatingError};
use crate::models::{Assignment, Candidate, Exam, Room, Seat};
use crate::validation::{ValidationError, ValidationErrorKind};

use super::SeatingStore;

/// Store backed by in-memory collections.
///
/// # Example
///
/// ```
/// use u_seating::models::{Candidate, Room};
/// use u_seating::store::{InMemoryStore, SeatingStore};
///
/// let store = InMemoryStore::new()
///     .with_candidate(Candidate::new("C1", "CSE"))
///     .with_room(Room::new("R1", 4, 5));
/// assert_eq!(store.list_rooms().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    candidates: Vec<Candidate>,
    rooms: Vec<Room>,
    exams: Vec<Exam>,
    assignments: HashMap<String, Vec<Assignment>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate.
    pub fn with_candidate(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Adds several candidates.
    pub fn with_candidates(mut self, candidates: impl IntoIterator<Item = Candidate>) -> Self {
        self.candidates.extend(candidates);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds an exam without conflict checks.
    pub fn with_exam(mut self, exam: Exam) -> Self {
        self.exams.push(exam);
        self
    }

    /// Every stored assignment, across exams.
    pub fn assignment_count(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }
}

impl SeatingStore for InMemoryStore {
    fn list_candidates(&self, courses: Option<&BTreeSet<String>>) -> Result<Vec<Candidate>> {
        Ok(self
            .candidates
            .iter()
            .filter(|c| courses.map_or(true, |set| set.contains(&c.course)))
            .cloned()
            .collect())
    }

    fn list_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.rooms.clone())
    }

    fn get_exam(&self, exam_id: &str) -> Result<Exam> {
        self.exams
            .iter()
            .find(|e| e.id == exam_id)
            .cloned()
            .ok_or_else(|| SeatingError::not_found("exam", exam_id))
    }

    fn list_exams(&self, exclude: Option<&str>) -> Result<Vec<Exam>> {
        Ok(self
            .exams
            .iter()
            .filter(|e| exclude != Some(e.id.as_str()))
            .cloned()
            .collect())
    }

    fn insert_exam(&mut self, exam: Exam) -> Result<()> {
        if self.exams.iter().any(|e| e.id == exam.id) {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Exam '{}' already exists", exam.id),
            )
            .into());
        }
        self.exams.push(exam);
        Ok(())
    }

    fn assignments_for_exam(&self, exam_id: &str) -> Result<Vec<Assignment>> {
        Ok(self.assignments.get(exam_id).cloned().unwrap_or_default())
    }

    fn replace_assignments(&mut self, exam_id: &str, assignments: Vec<Assignment>) -> Result<()> {
        let failure = |reason: String| SeatingError::TransactionFailure {
            exam_id: exam_id.to_string(),
            reason,
        };

        if !self.exams.iter().any(|e| e.id == exam_id) {
            return Err(failure(format!("exam '{exam_id}' is not stored")));
        }

        let mut seats: HashSet<(&str, Seat)> = HashSet::new();
        let mut seated: HashSet<&str> = HashSet::new();
        for a in &assignments {
            if a.exam_id != exam_id {
                return Err(failure(format!(
                    "assignment for '{}' targets exam '{}'",
                    a.candidate_id, a.exam_id
                )));
            }
            if !seats.insert((a.room_id.as_str(), a.seat)) {
                return Err(failure(format!(
                    "seat {} in room '{}' written twice",
                    a.seat.label(),
                    a.room_id
                )));
            }
            if !seated.insert(a.candidate_id.as_str()) {
                return Err(failure(format!(
                    "candidate '{}' written twice",
                    a.candidate_id
                )));
            }
        }

        if assignments.is_empty() {
            self.assignments.remove(exam_id);
        } else {
            self.assignments.insert(exam_id.to_string(), assignments);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;

    fn exam(id: &str) -> Exam {
        Exam::new(
            id,
            "CS301",
            Exam::parse_start("2024-05-02T09:00").unwrap(),
            180,
            Session::Morning,
        )
        .with_branch("CSE")
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_candidates(vec![
                Candidate::new("C1", "CSE"),
                Candidate::new("C2", "ECE"),
                Candidate::new("C3", "ME"),
            ])
            .with_room(Room::new("R1", 3, 3))
            .with_exam(exam("E1"))
            .with_exam(exam("E2"))
    }

    #[test]
    fn test_list_candidates_by_course() {
        let s = store();
        assert_eq!(s.list_candidates(None).unwrap().len(), 3);
        let courses = BTreeSet::from(["CSE".to_string(), "ME".to_string()]);
        let ids: Vec<String> = s
            .list_candidates(Some(&courses))
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["C1", "C3"]);
    }

    #[test]
    fn test_get_and_list_exams() {
        let s = store();
        assert_eq!(s.get_exam("E2").unwrap().id, "E2");
        assert!(matches!(
            s.get_exam("E9"),
            Err(SeatingError::NotFound { entity: "exam", .. })
        ));
        let others = s.list_exams(Some("E1")).unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, "E2");
    }

    #[test]
    fn test_insert_duplicate_exam() {
        let mut s = store();
        assert!(s.insert_exam(exam("E3")).is_ok());
        assert!(matches!(
            s.insert_exam(exam("E1")),
            Err(SeatingError::Validation { .. })
        ));
    }

    #[test]
    fn test_replace_and_read_back() {
        let mut s = store();
        let set = vec![
            Assignment::new("E1", "C1", "R1", Seat::new(0, 0), "CSE"),
            Assignment::new("E1", "C2", "R1", Seat::new(2, 2), "ECE"),
        ];
        s.replace_assignments("E1", set.clone()).unwrap();
        assert_eq!(s.assignments_for_exam("E1").unwrap(), set);
        assert!(s.assignments_for_exam("E2").unwrap().is_empty());
        assert_eq!(
            s.assigned_candidate_ids("E1").unwrap(),
            HashSet::from(["C1".to_string(), "C2".to_string()])
        );

        s.replace_assignments("E1", Vec::new()).unwrap();
        assert_eq!(s.assignment_count(), 0);
    }

    #[test]
    fn test_rejected_replace_keeps_prior_set() {
        let mut s = store();
        let prior = vec![Assignment::new("E1", "C1", "R1", Seat::new(0, 0), "CSE")];
        s.replace_assignments("E1", prior.clone()).unwrap();

        let colliding = vec![
            Assignment::new("E1", "C1", "R1", Seat::new(1, 1), "CSE"),
            Assignment::new("E1", "C2", "R1", Seat::new(1, 1), "ECE"),
        ];
        let err = s.replace_assignments("E1", colliding).unwrap_err();
        assert!(matches!(err, SeatingError::TransactionFailure { .. }));
        assert_eq!(s.assignments_for_exam("E1").unwrap(), prior);

        let twice = vec![
            Assignment::new("E1", "C1", "R1", Seat::new(0, 0), "CSE"),
            Assignment::new("E1", "C1", "R1", Seat::new(2, 2), "CSE"),
        ];
        assert!(s.replace_assignments("E1", twice).is_err());
        assert_eq!(s.assignments_for_exam("E1").unwrap(), prior);
    }

    #[test]
    fn test_replace_unknown_exam() {
        let mut s = store();
        let err = s
            .replace_assignments(
                "E9",
                vec![Assignment::new("E9", "C1", "R1", Seat::new(0, 0), "CSE")],
            )
            .unwrap_err();
        assert!(matches!(err, SeatingError::TransactionFailure { .. }));
        assert_eq!(s.assignment_count(), 0);
    }
}
