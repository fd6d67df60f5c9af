//! Result shapes handed to the request boundary.
//!
//! These are plain serializable values; the wire format is the
//! boundary's concern.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::models::{Assignment, Candidate, Exam, Room, Seat, Session};

/// Exam fields shown in plans and conflict listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSummary {
    /// Exam identifier.
    pub id: String,
    /// Subject code.
    pub subject_code: String,
    /// Subject name.
    pub subject_name: String,
    /// Start instant.
    pub start: NaiveDateTime,
    /// Duration in minutes.
    pub duration_minutes: u32,
    /// Session bucket.
    pub session: Session,
    /// Eligible branches.
    pub branches: BTreeSet<String>,
}

impl From<&Exam> for ExamSummary {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id.clone(),
            subject_code: exam.subject_code.clone(),
            subject_name: exam.subject_name.clone(),
            start: exam.start,
            duration_minutes: exam.duration_minutes,
            session: exam.session.clone(),
            branches: exam.branches.clone(),
        }
    }
}

/// One room of a seating plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPlan {
    /// Room identifier.
    pub room_id: String,
    /// Room name.
    pub name: String,
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub columns: usize,
    /// `seats[row][column]`: the seated candidate, or `None` for a free seat.
    pub seats: Vec<Vec<Option<Candidate>>>,
}

impl RoomPlan {
    /// Number of occupied seats.
    pub fn occupied(&self) -> usize {
        self.seats.iter().flatten().filter(|s| s.is_some()).count()
    }
}

/// An exam's seating across every room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingPlanView {
    /// Exam being shown.
    pub exam: ExamSummary,
    /// Every room, in room order, including empty ones.
    pub rooms: Vec<RoomPlan>,
}

impl SeatingPlanView {
    /// Lays assignments out on their room grids.
    ///
    /// Assignments whose candidate record is missing keep their seat with
    /// the identity and course recorded on the assignment. Assignments
    /// outside any listed room grid are dropped.
    pub fn build(
        exam: &Exam,
        rooms: &[Room],
        assignments: &[Assignment],
        candidates: &[Candidate],
    ) -> Self {
        let by_id: HashMap<&str, &Candidate> =
            candidates.iter().map(|c| (c.id.as_str(), c)).collect();

        let rooms = rooms
            .iter()
            .map(|room| {
                let mut seats = vec![vec![None; room.columns]; room.rows];
                for a in assignments
                    .iter()
                    .filter(|a| a.room_id == room.id && room.contains(a.seat))
                {
                    let candidate = by_id
                        .get(a.candidate_id.as_str())
                        .map(|c| (*c).clone())
                        .unwrap_or_else(|| Candidate::new(&a.candidate_id, &a.course));
                    seats[a.seat.row][a.seat.column] = Some(candidate);
                }
                RoomPlan {
                    room_id: room.id.clone(),
                    name: room.name.clone(),
                    rows: room.rows,
                    columns: room.columns,
                    seats,
                }
            })
            .collect();

        Self {
            exam: ExamSummary::from(exam),
            rooms,
        }
    }

    /// Total seated candidates.
    pub fn seated(&self) -> usize {
        self.rooms.iter().map(RoomPlan::occupied).sum()
    }

    /// Flattens the plan back into assignments (for a manual re-save).
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut out = Vec::new();
        for room in &self.rooms {
            for (row, cells) in room.seats.iter().enumerate() {
                for (column, cell) in cells.iter().enumerate() {
                    if let Some(c) = cell {
                        out.push(Assignment::new(
                            &self.exam.id,
                            &c.id,
                            &room.room_id,
                            Seat::new(row, column),
                            &c.course,
                        ));
                    }
                }
            }
        }
        out
    }
}

/// Outcome of a seating generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Exam that was seated.
    pub exam_id: String,
    /// Candidates seated by this run.
    pub placed: usize,
    /// Candidates this run had to seat.
    pub total: usize,
    /// Candidates that kept an earlier seat (incremental fill only).
    pub already_seated: usize,
    /// Spacing level that succeeded; `None` when nothing needed seating.
    pub spacing: Option<usize>,
}

/// Another exam that double-books candidates with the inspected exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConflict {
    /// The other exam.
    pub exam: ExamSummary,
    /// Candidates seated in both exams.
    pub candidates: Vec<Candidate>,
}

/// Conflict report for one exam.
pub type ConflictReport = Vec<ExamConflict>;
