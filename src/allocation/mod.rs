//! Seat allocation engine.
//!
//! Turns an exam, its candidates, and a list of rooms into seat
//! assignments that keep same-course candidates apart.
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Distribute | `distributor` | per-room target counts |
//! | Sequence | `sequencer` | course-interleaved candidate order |
//! | Place | `grid` | most isolated valid seat per candidate |
//! | Retry | `spacing` | strictest spacing that seats everyone |
//! | Orchestrate | `allocator` | pending assignments or an error |
//!
//! The result is a greedy heuristic with bounded retries, not an optimal
//! seating.

mod allocator;
mod distributor;
mod grid;
mod sequencer;
mod spacing;

pub use allocator::{
    assigned_ids, unassigned, Allocation, AllocatorConfig, SeatAllocator,
};
pub use distributor::distribute;
pub use grid::{Cell, PlacementGrid};
pub use sequencer::{sequence, SequencingMode};
pub use spacing::{AttemptOutcome, AttemptState, SpacingSchedule};
