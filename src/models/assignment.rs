//! Seat assignment model.
//!
//! An assignment binds one candidate to one seat of one room for one exam.
//! Within an exam a candidate holds at most one assignment and a seat
//! holds at most one candidate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based seat coordinate within a room grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat {
    /// Row index (0 = front row).
    pub row: usize,
    /// Column index.
    pub column: usize,
}

impl Seat {
    /// Creates a seat coordinate.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Chebyshev (king-move) distance to another seat.
    #[inline]
    pub fn chebyshev(self, other: Seat) -> usize {
        self.row.abs_diff(other.row).max(self.column.abs_diff(other.column))
    }

    /// Printable label, e.g. `A-01` for the first seat of the first row.
    ///
    /// Rows past `Z` continue as `AA`, `AB`, ...
    pub fn label(self) -> String {
        format!("{}-{:02}", row_letters(self.row), self.column + 1)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

fn row_letters(mut row: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (row % 26) as u8);
        if row < 26 {
            break;
        }
        row = row / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A candidate-room-seat assignment for one exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Exam the seat is assigned for.
    pub exam_id: String,
    /// Seated candidate.
    pub candidate_id: String,
    /// Room holding the seat.
    pub room_id: String,
    /// Seat within the room grid.
    pub seat: Seat,
    /// Candidate course (denormalized so grids can be rebuilt from
    /// persisted assignments without a candidate lookup).
    pub course: String,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        exam_id: impl Into<String>,
        candidate_id: impl Into<String>,
        room_id: impl Into<String>,
        seat: Seat,
        course: impl Into<String>,
    ) -> Self {
        Self {
            exam_id: exam_id.into(),
            candidate_id: candidate_id.into(),
            room_id: room_id.into(),
            seat,
            course: course.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chebyshev() {
        let a = Seat::new(2, 3);
        assert_eq!(a.chebyshev(a), 0);
        assert_eq!(a.chebyshev(Seat::new(3, 4)), 1);
        assert_eq!(a.chebyshev(Seat::new(0, 4)), 2);
        assert_eq!(Seat::new(0, 4).chebyshev(a), 2);
        assert_eq!(a.chebyshev(Seat::new(2, 9)), 6);
    }

    #[test]
    fn test_seat_label() {
        assert_eq!(Seat::new(0, 0).label(), "A-01");
        assert_eq!(Seat::new(1, 14).label(), "B-15");
        assert_eq!(Seat::new(25, 9).label(), "Z-10");
        assert_eq!(Seat::new(26, 0).label(), "AA-01");
        assert_eq!(Seat::new(27, 0).label(), "AB-01");
    }

    #[test]
    fn test_assignment_new() {
        let a = Assignment::new("E1", "C1", "R1", Seat::new(1, 2), "CSE");
        assert_eq!(a.exam_id, "E1");
        assert_eq!(a.candidate_id, "C1");
        assert_eq!(a.room_id, "R1");
        assert_eq!(a.seat, Seat::new(1, 2));
        assert_eq!(a.course, "CSE");
    }
}
