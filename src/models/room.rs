//! Room model.
//!
//! Rooms are uniform rows × columns seat grids with a declared capacity.
//! The capacity drives proportional distribution; the grid dimensions
//! bound placement. `rows * columns >= capacity` is assumed but not
//! enforced: a room whose grid is smaller than its capacity simply
//! exposes fewer reachable seats.

use serde::{Deserialize, Serialize};

use super::Seat;

/// An exam room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name (e.g. "LH-101").
    pub name: String,
    /// Number of candidates the room may receive.
    pub capacity: usize,
    /// Number of seat rows.
    pub rows: usize,
    /// Number of seat columns.
    pub columns: usize,
}

impl Room {
    /// Creates a room whose capacity equals its grid size.
    pub fn new(id: impl Into<String>, rows: usize, columns: usize) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity: rows * columns,
            rows,
            columns,
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Overrides the declared capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Number of physical seats in the grid.
    #[inline]
    pub fn seat_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Whether a seat coordinate lies inside this room's grid.
    #[inline]
    pub fn contains(&self, seat: Seat) -> bool {
        seat.row < self.rows && seat.column < self.columns
    }
}

/// Sum of declared capacities.
pub fn total_capacity(rooms: &[Room]) -> usize {
    rooms.iter().map(|r| r.capacity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("R1", 5, 8).with_name("LH-101").with_capacity(40);
        assert_eq!(r.id, "R1");
        assert_eq!(r.name, "LH-101");
        assert_eq!(r.capacity, 40);
        assert_eq!(r.seat_count(), 40);
    }

    #[test]
    fn test_room_contains() {
        let r = Room::new("R1", 2, 3);
        assert!(r.contains(Seat::new(0, 0)));
        assert!(r.contains(Seat::new(1, 2)));
        assert!(!r.contains(Seat::new(2, 0)));
        assert!(!r.contains(Seat::new(0, 3)));
    }

    #[test]
    fn test_capacity_not_tied_to_grid() {
        let r = Room::new("R1", 2, 2).with_capacity(5);
        assert_eq!(r.capacity, 5);
        assert_eq!(r.seat_count(), 4);
    }

    #[test]
    fn test_total_capacity() {
        let rooms = vec![
            Room::new("A", 5, 8),
            Room::new("B", 5, 10),
            Room::new("C", 6, 10),
        ];
        assert_eq!(total_capacity(&rooms), 150);
        assert_eq!(total_capacity(&[]), 0);
    }
}
