//! Per-room placement grid.
//!
//! A dense rows × columns matrix of cells, each empty or holding the
//! course and identity of its occupant. Grids are transient: the
//! allocator rebuilds them for every placement attempt.
//!
//! # Seat Rules
//!
//! For a candidate of course `k` at spacing `s` (Chebyshev distance):
//! - a same-course occupant within distance `s` invalidates the seat;
//! - a different-course occupant within distance 1 invalidates the seat.
//!
//! Same-course candidates therefore end up more than `s` seats apart and
//! different-course candidates keep at least one empty seat between them.
//!
//! # Complexity
//! `best_seat` scans every cell and scores each valid one against all
//! occupied cells: O((rows·cols)²) worst case, fine for rooms in the
//! tens-to-hundreds of seats.

use crate::models::{Assignment, Room, Seat};
use crate::validation::{ValidationError, ValidationErrorKind};

/// One grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    /// Free seat.
    #[default]
    Empty,
    /// Seat taken by a candidate.
    Occupied {
        /// Occupant's course.
        course: String,
        /// Occupant's identifier.
        candidate_id: String,
    },
}

impl Cell {
    /// Occupant course, if any.
    pub fn course(&self) -> Option<&str> {
        match self {
            Cell::Empty => None,
            Cell::Occupied { course, .. } => Some(course),
        }
    }

    /// Whether the cell is free.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Occupancy matrix for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementGrid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl PlacementGrid {
    /// Creates an empty grid.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
        }
    }

    /// Creates an empty grid sized for a room.
    pub fn for_room(room: &Room) -> Self {
        Self::new(room.rows, room.columns)
    }

    /// Rebuilds a room's grid from persisted assignments.
    ///
    /// Assignments for other rooms are ignored. A seat outside the grid or
    /// held twice is an error, so stale seats are never carried forward.
    pub fn from_assignments<'a>(
        room: &Room,
        assignments: impl IntoIterator<Item = &'a Assignment>,
    ) -> Result<Self, ValidationError> {
        let mut grid = Self::for_room(room);
        for a in assignments.into_iter().filter(|a| a.room_id == room.id) {
            if grid.occupy(a.seat, &a.course, &a.candidate_id) {
                continue;
            }
            let (kind, problem) = if room.contains(a.seat) {
                (ValidationErrorKind::SeatCollision, "is already taken")
            } else {
                (ValidationErrorKind::SeatOutOfBounds, "is outside the grid")
            };
            return Err(ValidationError::new(
                kind,
                format!(
                    "Stored seat {} of candidate '{}' in room '{}' ({}x{}) {problem}",
                    a.seat, a.candidate_id, room.id, room.rows, room.columns
                ),
            ));
        }
        Ok(grid)
    }

    #[inline]
    fn index(&self, seat: Seat) -> Option<usize> {
        (seat.row < self.rows && seat.column < self.columns)
            .then(|| seat.row * self.columns + seat.column)
    }

    /// Cell at a seat, `None` if out of bounds.
    pub fn cell(&self, seat: Seat) -> Option<&Cell> {
        self.index(seat).map(|i| &self.cells[i])
    }

    /// Places an occupant.
    ///
    /// Returns `false` (and changes nothing) if the seat is out of bounds
    /// or already taken.
    pub fn occupy(&mut self, seat: Seat, course: &str, candidate_id: &str) -> bool {
        match self.index(seat) {
            Some(i) if self.cells[i].is_empty() => {
                self.cells[i] = Cell::Occupied {
                    course: course.to_string(),
                    candidate_id: candidate_id.to_string(),
                };
                true
            }
            _ => false,
        }
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Occupied seats in row-major order.
    pub fn occupied_seats(&self) -> impl Iterator<Item = Seat> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(i, _)| Seat::new(i / self.columns, i % self.columns))
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Whether a candidate of `course` may sit at `seat` under `spacing`.
    ///
    /// Only neighbours are inspected; the caller checks that the seat
    /// itself is free. Out-of-bounds seats are never valid.
    pub fn is_valid_seat(&self, seat: Seat, course: &str, spacing: usize) -> bool {
        if self.index(seat).is_none() {
            return false;
        }
        let radius = spacing.max(1);
        let row_lo = seat.row.saturating_sub(radius);
        let row_hi = (seat.row + radius).min(self.rows - 1);
        let col_lo = seat.column.saturating_sub(radius);
        let col_hi = (seat.column + radius).min(self.columns - 1);

        for row in row_lo..=row_hi {
            for column in col_lo..=col_hi {
                let other = Seat::new(row, column);
                if other == seat {
                    continue;
                }
                let Some(occupant) = self.cells[row * self.columns + column].course() else {
                    continue;
                };
                let distance = seat.chebyshev(other);
                if occupant == course {
                    if distance <= spacing {
                        return false;
                    }
                } else if distance <= 1 {
                    return false;
                }
            }
        }
        true
    }

    /// Most isolated valid seat for a candidate of `course`.
    ///
    /// Each empty, valid cell scores the sum of Chebyshev distances to every
    /// occupied cell; the highest score wins and ties go to the first cell
    /// in row-major order. Returns `None` if no cell is valid.
    pub fn best_seat(&self, course: &str, spacing: usize) -> Option<Seat> {
        let occupied: Vec<Seat> = self.occupied_seats().collect();
        let mut best: Option<(usize, Seat)> = None;

        for (i, cell) in self.cells.iter().enumerate() {
            if !cell.is_empty() {
                continue;
            }
            let seat = Seat::new(i / self.columns, i % self.columns);
            if !self.is_valid_seat(seat, course, spacing) {
                continue;
            }
            let score: usize = occupied.iter().map(|&o| seat.chebyshev(o)).sum();
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, seat));
            }
        }

        best.map(|(_, seat)| seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_grid_first_seat_is_origin() {
        let grid = PlacementGrid::new(3, 4);
        // All scores are zero on an empty grid → first row-major cell.
        assert_eq!(grid.best_seat("CSE", 2), Some(Seat::new(0, 0)));
    }

    #[test]
    fn test_best_seat_maximizes_distance() {
        let mut grid = PlacementGrid::new(5, 8);
        assert!(grid.occupy(Seat::new(0, 0), "CSE", "c1"));
        assert_eq!(grid.best_seat("ECE", 2), Some(Seat::new(0, 7)));
    }

    #[test]
    fn test_occupy_rejects_taken_and_out_of_bounds() {
        let mut grid = PlacementGrid::new(2, 2);
        assert!(grid.occupy(Seat::new(1, 1), "CSE", "c1"));
        assert!(!grid.occupy(Seat::new(1, 1), "ECE", "c2"));
        assert!(!grid.occupy(Seat::new(2, 0), "ECE", "c2"));
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(
            grid.cell(Seat::new(1, 1)),
            Some(&Cell::Occupied {
                course: "CSE".into(),
                candidate_id: "c1".into()
            })
        );
        assert_eq!(grid.cell(Seat::new(5, 5)), None);
    }

    #[test]
    fn test_same_course_needs_more_than_spacing() {
        let mut grid = PlacementGrid::new(7, 7);
        grid.occupy(Seat::new(3, 3), "CSE", "c1");

        assert!(!grid.is_valid_seat(Seat::new(3, 5), "CSE", 2));
        assert!(!grid.is_valid_seat(Seat::new(1, 1), "CSE", 2));
        assert!(grid.is_valid_seat(Seat::new(3, 6), "CSE", 2));
        assert!(grid.is_valid_seat(Seat::new(3, 5), "CSE", 1));
    }

    #[test]
    fn test_different_course_needs_one_gap() {
        let mut grid = PlacementGrid::new(5, 5);
        grid.occupy(Seat::new(2, 2), "CSE", "c1");

        assert!(!grid.is_valid_seat(Seat::new(2, 3), "ECE", 2));
        assert!(!grid.is_valid_seat(Seat::new(1, 1), "ECE", 1));
        assert!(grid.is_valid_seat(Seat::new(2, 4), "ECE", 2));
        assert!(grid.is_valid_seat(Seat::new(0, 0), "ECE", 1));
    }

    #[test]
    fn test_no_valid_seat() {
        let mut grid = PlacementGrid::new(2, 2);
        grid.occupy(Seat::new(0, 0), "CSE", "c1");
        assert_eq!(grid.best_seat("CSE", 1), None);
        assert_eq!(grid.best_seat("ECE", 1), None);
    }

    #[test]
    fn test_zero_sized_grid() {
        let grid = PlacementGrid::new(0, 5);
        assert_eq!(grid.best_seat("CSE", 1), None);
        assert!(!grid.is_valid_seat(Seat::new(0, 0), "CSE", 1));
    }

    #[test]
    fn test_reset_and_rebuild() {
        let room = Room::new("R1", 3, 3);
        let assignments = vec![
            Assignment::new("E1", "c1", "R1", Seat::new(0, 0), "CSE"),
            Assignment::new("E1", "c2", "R1", Seat::new(2, 2), "ECE"),
            Assignment::new("E1", "c3", "R2", Seat::new(1, 1), "ECE"),
        ];
        let mut grid = PlacementGrid::from_assignments(&room, &assignments).unwrap();
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(
            grid.occupied_seats().collect::<Vec<_>>(),
            vec![Seat::new(0, 0), Seat::new(2, 2)]
        );

        grid.reset();
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.best_seat("CSE", 2), Some(Seat::new(0, 0)));
    }

    #[test]
    fn test_rebuild_rejects_stale_seats() {
        let room = Room::new("R1", 2, 3);
        let outside = vec![Assignment::new("E1", "c1", "R1", Seat::new(4, 0), "CSE")];
        let err = PlacementGrid::from_assignments(&room, &outside).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::SeatOutOfBounds);
        assert!(err.message.contains("c1"));

        let doubled = vec![
            Assignment::new("E1", "c1", "R1", Seat::new(1, 1), "CSE"),
            Assignment::new("E1", "c2", "R1", Seat::new(1, 1), "ECE"),
        ];
        let err = PlacementGrid::from_assignments(&room, &doubled).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::SeatCollision);
    }

    proptest! {
        #[test]
        fn same_course_within_spacing_rejected(
            spacing in 1usize..4,
            dr in 0usize..4,
            dc in 0usize..4,
        ) {
            prop_assume!((dr, dc) != (0, 0));
            let mut grid = PlacementGrid::new(9, 9);
            grid.occupy(Seat::new(4, 4), "CSE", "a");
            let target = Seat::new(4 + dr, 4 + dc);
            let distance = dr.max(dc);
            prop_assert_eq!(grid.is_valid_seat(target, "CSE", spacing), distance > spacing);
        }

        #[test]
        fn different_course_adjacent_rejected(
            spacing in 1usize..4,
            dr in 0usize..4,
            dc in 0usize..4,
        ) {
            prop_assume!((dr, dc) != (0, 0));
            let mut grid = PlacementGrid::new(9, 9);
            grid.occupy(Seat::new(4, 4), "CSE", "a");
            let target = Seat::new(4 - dr.min(4), 4 + dc);
            let distance = dr.min(4).max(dc);
            prop_assert_eq!(grid.is_valid_seat(target, "ECE", spacing), distance > 1);
        }
    }
}
