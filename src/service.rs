//! Seating operations over a store.
//!
//! [`SeatingService`] reads entities from a [`SeatingStore`], runs the
//! allocator or the conflict detector, and writes the outcome back in a
//! single `replace_assignments` call. Every operation is synchronous and
//! request-scoped.
//!
//! # Operations
//!
//! | Operation | Writes | Errors |
//! |-----------|--------|--------|
//! | `create_exam` | exam | `Validation`, `SchedulingConflict` |
//! | `generate_seating` | all assignments | capacity, placement, store |
//! | `fill_remaining_seats` | existing + new | capacity, placement, store |
//! | `save_seating_plan` | all assignments | `Validation`, store |
//! | `assign_seat` / `clear_seat` | one seat | `SeatOccupied`, `AlreadySeated`, `NotFound` |
//! | `seating_plan`, `available_candidates`, `check_conflicts`, `exam_conflicts` | nothing | `NotFound` |
//!
//! Concurrent regeneration of the same exam is last-write-wins.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::allocation::{assigned_ids, unassigned, Allocation, AllocatorConfig, SeatAllocator};
use crate::conflict::{find_overlaps, shared_candidates};
use crate::error::{Result, SeatingError};
use crate::models::{Assignment, Candidate, Exam, Seat};
use crate::report::{ConflictReport, ExamConflict, ExamSummary, GenerationReport, SeatingPlanView};
use crate::store::SeatingStore;
use crate::validation::{validate_assignments, validate_exam, ValidationError, ValidationErrorKind};

/// Seating engine bound to a store.
pub struct SeatingService<S: SeatingStore> {
    store: S,
    allocator: SeatAllocator,
    rng: StdRng,
}

impl<S: SeatingStore> SeatingService<S> {
    /// Creates a service.
    ///
    /// With `config.seed` set, candidate order is reproducible across runs;
    /// otherwise the RNG is seeded from the OS.
    pub fn new(store: S, config: AllocatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            store,
            allocator: SeatAllocator::new(config),
            rng,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the service, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Validates and stores a new exam unless it conflicts with a stored one.
    pub fn create_exam(&mut self, exam: Exam) -> Result<ExamSummary> {
        validate_exam(&exam)?;

        let overlapping = self.check_conflicts(&exam)?;
        if !overlapping.is_empty() {
            warn!(
                exam_id = %exam.id,
                conflicts = overlapping.len(),
                "exam creation refused: schedule conflict"
            );
            return Err(SeatingError::SchedulingConflict {
                conflicts: overlapping,
            });
        }

        let summary = ExamSummary::from(&exam);
        self.store.insert_exam(exam)?;
        info!(exam_id = %summary.id, "exam created");
        Ok(summary)
    }

    /// Stored exams that conflict with `exam` on time, session, and branch.
    ///
    /// Works for exams that are not stored yet (pre-creation gate).
    pub fn check_conflicts(&self, exam: &Exam) -> Result<Vec<ExamSummary>> {
        let others = self.store.list_exams(Some(&exam.id))?;
        Ok(find_overlaps(exam, &others)
            .into_iter()
            .map(ExamSummary::from)
            .collect())
    }

    /// Overlapping exams that double-book candidates seated in `exam_id`.
    pub fn exam_conflicts(&self, exam_id: &str) -> Result<ConflictReport> {
        let exam = self.store.get_exam(exam_id)?;
        let others = self.store.list_exams(Some(exam_id))?;
        let overlaps = find_overlaps(&exam, &others);
        if overlaps.is_empty() {
            return Ok(Vec::new());
        }

        let seated = self.store.assignments_for_exam(exam_id)?;
        let inspected: HashSet<String> = seated.iter().map(|a| a.candidate_id.clone()).collect();
        let shared = shared_candidates(&inspected, &overlaps, |other| {
            self.store.assigned_candidate_ids(&other.id)
        })?;
        if shared.is_empty() {
            return Ok(Vec::new());
        }

        let by_id: HashMap<String, Candidate> = self
            .store
            .list_candidates(None)?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let course_of: HashMap<&str, &str> = seated
            .iter()
            .map(|a| (a.candidate_id.as_str(), a.course.as_str()))
            .collect();

        // Candidates without a stored record are listed from their seat.
        let report: ConflictReport = shared
            .into_iter()
            .map(|s| ExamConflict {
                exam: ExamSummary::from(s.exam),
                candidates: s
                    .candidate_ids
                    .iter()
                    .map(|id| {
                        by_id.get(id).cloned().unwrap_or_else(|| {
                            let course = course_of.get(id.as_str()).copied().unwrap_or_default();
                            Candidate::new(id, course)
                        })
                    })
                    .collect(),
            })
            .collect();
        debug!(exam_id, conflicts = report.len(), "candidate conflicts found");
        Ok(report)
    }

    /// Reseats every eligible candidate from scratch.
    ///
    /// The previous seating is replaced only if allocation succeeds and the
    /// write goes through; otherwise it is kept.
    pub fn generate_seating(&mut self, exam_id: &str) -> Result<GenerationReport> {
        let exam = self.store.get_exam(exam_id)?;
        let candidates = self.store.list_candidates(Some(&exam.branches))?;
        let rooms = self.store.list_rooms()?;

        let allocation = self
            .allocator
            .allocate(&exam, &candidates, &rooms, &mut self.rng)?;
        let report = GenerationReport {
            exam_id: exam.id.clone(),
            placed: allocation.placed(),
            total: allocation.total,
            already_seated: 0,
            spacing: allocation.spacing,
        };

        self.commit(exam_id, allocation.assignments)?;
        info!(
            exam_id,
            placed = report.placed,
            spacing = ?report.spacing,
            "seating generated"
        );
        Ok(report)
    }

    /// Seats only eligible candidates without a seat, around existing ones.
    pub fn fill_remaining_seats(&mut self, exam_id: &str) -> Result<GenerationReport> {
        let exam = self.store.get_exam(exam_id)?;
        let candidates = self.store.list_candidates(Some(&exam.branches))?;
        let rooms = self.store.list_rooms()?;
        let existing = self.store.assignments_for_exam(exam_id)?;

        let Allocation {
            spacing,
            total,
            assignments,
            ..
        } = self
            .allocator
            .allocate_remaining(&exam, &candidates, &rooms, &existing, &mut self.rng)?;
        let report = GenerationReport {
            exam_id: exam.id.clone(),
            placed: assignments.len(),
            total,
            already_seated: existing.len(),
            spacing,
        };
        if assignments.is_empty() {
            return Ok(report);
        }

        let mut merged = existing;
        merged.extend(assignments);
        self.commit(exam_id, merged)?;
        info!(
            exam_id,
            placed = report.placed,
            already_seated = report.already_seated,
            "remaining seats filled"
        );
        Ok(report)
    }

    /// Eligible candidates that do not hold a seat in the exam.
    pub fn available_candidates(&self, exam_id: &str) -> Result<Vec<Candidate>> {
        let exam = self.store.get_exam(exam_id)?;
        let candidates = self.store.list_candidates(Some(&exam.branches))?;
        let existing = self.store.assignments_for_exam(exam_id)?;
        let assigned = assigned_ids(&existing);
        Ok(unassigned(&candidates, &assigned)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Current seating of every room for the exam.
    pub fn seating_plan(&self, exam_id: &str) -> Result<SeatingPlanView> {
        let exam = self.store.get_exam(exam_id)?;
        let rooms = self.store.list_rooms()?;
        let assignments = self.store.assignments_for_exam(exam_id)?;
        let candidates = self.store.list_candidates(None)?;
        Ok(SeatingPlanView::build(&exam, &rooms, &assignments, &candidates))
    }

    /// Replaces the exam's seating with a manually edited set.
    ///
    /// The whole set is validated first; nothing is written on error.
    /// Spacing is not enforced on manual plans.
    pub fn save_seating_plan(&mut self, exam_id: &str, assignments: Vec<Assignment>) -> Result<usize> {
        let exam = self.store.get_exam(exam_id)?;
        let rooms = self.store.list_rooms()?;
        let candidates = self.store.list_candidates(None)?;
        validate_assignments(&exam, &assignments, &rooms, &candidates)?;

        let saved = assignments.len();
        self.commit(exam_id, assignments)?;
        info!(exam_id, saved, "seating plan saved");
        Ok(saved)
    }

    /// Seats one candidate at a chosen seat.
    pub fn assign_seat(
        &mut self,
        exam_id: &str,
        candidate_id: &str,
        room_id: &str,
        seat: Seat,
    ) -> Result<Assignment> {
        let exam = self.store.get_exam(exam_id)?;
        let room = self
            .store
            .list_rooms()?
            .into_iter()
            .find(|r| r.id == room_id)
            .ok_or_else(|| SeatingError::not_found("room", room_id))?;
        let candidate = self
            .store
            .list_candidates(None)?
            .into_iter()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| SeatingError::not_found("candidate", candidate_id))?;

        if !room.contains(seat) {
            return Err(ValidationError::new(
                ValidationErrorKind::SeatOutOfBounds,
                format!(
                    "Seat {} is outside room '{}' ({}x{})",
                    seat, room.id, room.rows, room.columns
                ),
            )
            .into());
        }
        if !exam.is_eligible(&candidate) {
            return Err(ValidationError::new(
                ValidationErrorKind::IneligibleCandidate,
                format!(
                    "Candidate '{}' ({}) is not eligible for exam '{}'",
                    candidate.id, candidate.course, exam.id
                ),
            )
            .into());
        }

        let mut current = self.store.assignments_for_exam(exam_id)?;
        if current.iter().any(|a| a.room_id == room_id && a.seat == seat) {
            return Err(SeatingError::SeatOccupied {
                room_id: room_id.to_string(),
                seat,
            });
        }
        if current.iter().any(|a| a.candidate_id == candidate_id) {
            return Err(SeatingError::AlreadySeated {
                candidate_id: candidate_id.to_string(),
            });
        }

        let assignment = Assignment::new(exam_id, candidate_id, room_id, seat, &candidate.course);
        current.push(assignment.clone());
        self.commit(exam_id, current)?;
        debug!(exam_id, candidate_id, room_id, seat = %seat.label(), "seat assigned");
        Ok(assignment)
    }

    /// Frees one seat, returning the assignment that held it.
    pub fn clear_seat(&mut self, exam_id: &str, room_id: &str, seat: Seat) -> Result<Assignment> {
        self.store.get_exam(exam_id)?;
        let mut current = self.store.assignments_for_exam(exam_id)?;
        let index = current
            .iter()
            .position(|a| a.room_id == room_id && a.seat == seat)
            .ok_or_else(|| {
                SeatingError::not_found("seat assignment", format!("{room_id}/{}", seat.label()))
            })?;

        let removed = current.remove(index);
        self.commit(exam_id, current)?;
        debug!(exam_id, room_id, seat = %seat.label(), "seat cleared");
        Ok(removed)
    }

    /// Writes an exam's assignment set in one store call.
    fn commit(&mut self, exam_id: &str, assignments: Vec<Assignment>) -> Result<()> {
        self.store
            .replace_assignments(exam_id, assignments)
            .inspect_err(|e| warn!(exam_id, error = %e, "assignment write failed; prior seating kept"))
    }
}
