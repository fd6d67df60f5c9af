//! Greedy spacing-constrained seat allocator.
//!
//! # Algorithm
//!
//! 1. Reject empty candidate sets, missing rooms, and oversubscription.
//! 2. Compute per-room targets with [`distribute`](super::distribute).
//! 3. Order candidates with [`sequence`](super::sequence).
//! 4. For each spacing level (see [`SpacingSchedule`]): start from the base
//!    grids, then seat each candidate in the first room (in room order)
//!    that is below target and offers a valid seat. If a candidate cannot
//!    be seated anywhere, abandon the level and retry everyone at the next
//!    one.
//! 5. If no level seats the whole sequence, fail with `PlacementExhausted`.
//!
//! The allocator never writes anything; it returns the pending assignments
//! and leaves persistence to the caller.
//!
//! # Complexity
//! O(L · n · r · (rows·cols)²) where L = spacing levels, n = candidates,
//! r = rooms.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::{
    distribute, sequence, AttemptOutcome, AttemptState, PlacementGrid, SequencingMode,
    SpacingSchedule,
};
use crate::error::{Result, SeatingError};
use crate::models::{total_capacity, Assignment, Candidate, Exam, Room};
use crate::validation::{validate_input, ValidationError, ValidationErrorKind};

/// Allocator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Spacing levels to try, strictest first.
    pub spacing_schedule: SpacingSchedule,
    /// Candidate ordering.
    pub mode: SequencingMode,
    /// Seed for reproducible candidate order. `None` = seeded from the OS.
    pub seed: Option<u64>,
}

impl AllocatorConfig {
    /// Creates the default configuration (spacing 2 then 1, interleaved).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spacing schedule.
    pub fn with_spacing_schedule(mut self, schedule: SpacingSchedule) -> Self {
        self.spacing_schedule = schedule;
        self
    }

    /// Sets the sequencing mode.
    pub fn with_mode(mut self, mode: SequencingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Pending assignments produced by one allocation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Exam that was seated.
    pub exam_id: String,
    /// Spacing level that succeeded; `None` when nothing needed seating.
    pub spacing: Option<usize>,
    /// Candidates this run had to seat, counted before placement.
    pub total: usize,
    /// Newly created assignments, in placement order.
    pub assignments: Vec<Assignment>,
}

impl Allocation {
    /// Number of candidates seated by this run.
    pub fn placed(&self) -> usize {
        self.assignments.len()
    }
}

/// Spacing-constrained greedy seat allocator.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_seating::allocation::SeatAllocator;
/// use u_seating::models::{Candidate, Exam, Room, Session};
///
/// let exam = Exam::new(
///     "E1",
///     "CS301",
///     Exam::parse_start("2024-05-02T09:00").unwrap(),
///     180,
///     Session::Morning,
/// )
/// .with_branch_list("CSE,ECE");
/// let candidates = vec![Candidate::new("C1", "CSE"), Candidate::new("C2", "ECE")];
/// let rooms = vec![Room::new("R1", 3, 3)];
///
/// let allocator = SeatAllocator::default();
/// let allocation = allocator
///     .allocate(&exam, &candidates, &rooms, &mut StdRng::seed_from_u64(1))
///     .unwrap();
/// assert_eq!(allocation.placed(), 2);
/// assert_eq!(allocation.spacing, Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeatAllocator {
    config: AllocatorConfig,
}

impl SeatAllocator {
    /// Creates an allocator.
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Seats every eligible candidate from empty grids (full regeneration).
    ///
    /// Candidates whose course is not in the exam's branches are ignored.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        exam: &Exam,
        candidates: &[Candidate],
        rooms: &[Room],
        rng: &mut R,
    ) -> Result<Allocation> {
        validate_input(candidates, rooms)?;

        let eligible: Vec<&Candidate> = candidates.iter().filter(|c| exam.is_eligible(c)).collect();
        if eligible.is_empty() {
            return Err(SeatingError::NoEligibleCandidates {
                exam_id: exam.id.clone(),
            });
        }
        if rooms.is_empty() {
            return Err(SeatingError::NoRooms);
        }
        check_capacity(eligible.len(), total_capacity(rooms))?;
        for room in rooms.iter().filter(|r| r.capacity > r.seat_count()) {
            debug!(
                room_id = %room.id,
                capacity = room.capacity,
                seats = room.seat_count(),
                "declared capacity exceeds grid seats"
            );
        }

        let capacities: Vec<usize> = rooms.iter().map(|r| r.capacity).collect();
        let targets = distribute(&capacities, eligible.len());
        let order = sequence(eligible, self.config.mode, rng);
        let grids: Vec<PlacementGrid> = rooms.iter().map(PlacementGrid::for_room).collect();

        self.place(exam, &order, rooms, &targets, &grids)
    }

    /// Seats only eligible candidates without an existing assignment,
    /// into seats left free by `existing` (incremental fill).
    ///
    /// Existing assignments are never moved. Room targets are distributed
    /// over spare capacity (capacity minus seats already taken in the room).
    /// Existing seats outside their room grid, doubly held, or in an unknown
    /// room fail with `Validation` before anything is placed.
    pub fn allocate_remaining<R: Rng + ?Sized>(
        &self,
        exam: &Exam,
        candidates: &[Candidate],
        rooms: &[Room],
        existing: &[Assignment],
        rng: &mut R,
    ) -> Result<Allocation> {
        validate_input(candidates, rooms)?;

        let eligible: Vec<&Candidate> = candidates.iter().filter(|c| exam.is_eligible(c)).collect();
        if eligible.is_empty() {
            return Err(SeatingError::NoEligibleCandidates {
                exam_id: exam.id.clone(),
            });
        }
        if rooms.is_empty() {
            return Err(SeatingError::NoRooms);
        }

        let grids = rooms
            .iter()
            .map(|r| PlacementGrid::from_assignments(r, existing))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let room_ids: HashSet<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        if let Some(stray) = existing.iter().find(|a| !room_ids.contains(a.room_id.as_str())) {
            return Err(ValidationError::new(
                ValidationErrorKind::UnknownRoom,
                format!(
                    "Stored seat of candidate '{}' references unknown room '{}'",
                    stray.candidate_id, stray.room_id
                ),
            )
            .into());
        }

        let assigned = assigned_ids(existing);
        let pending = unassigned(eligible, &assigned);
        if pending.is_empty() {
            debug!(exam_id = %exam.id, "all eligible candidates already seated");
            return Ok(Allocation {
                exam_id: exam.id.clone(),
                spacing: None,
                total: 0,
                assignments: Vec::new(),
            });
        }

        let spare: Vec<usize> = rooms
            .iter()
            .zip(&grids)
            .map(|(r, g)| r.capacity.saturating_sub(g.occupied_count()))
            .collect();
        check_capacity(pending.len(), spare.iter().sum())?;

        let targets = distribute(&spare, pending.len());
        let order = sequence(pending, self.config.mode, rng);

        self.place(exam, &order, rooms, &targets, &grids)
    }

    /// Runs the spacing state machine over `order`.
    fn place(
        &self,
        exam: &Exam,
        order: &[&Candidate],
        rooms: &[Room],
        targets: &[usize],
        base: &[PlacementGrid],
    ) -> Result<Allocation> {
        let schedule = &self.config.spacing_schedule;
        let mut state = AttemptState::start();
        let mut pending = Vec::new();

        while let AttemptState::Trying { level, .. } = state {
            let Some(spacing) = schedule.spacing_at(level) else {
                break;
            };
            let (outcome, assignments) = attempt(exam, order, rooms, targets, base, spacing);
            match outcome {
                AttemptOutcome::Complete => pending = assignments,
                AttemptOutcome::Stuck { placed } => debug!(
                    exam_id = %exam.id,
                    spacing,
                    placed,
                    total = order.len(),
                    "placement attempt stuck; relaxing spacing"
                ),
            }
            state = state.advance(schedule, outcome);
        }

        match state {
            AttemptState::Seated { spacing } => {
                info!(
                    exam_id = %exam.id,
                    spacing,
                    placed = pending.len(),
                    "seating allocated"
                );
                Ok(Allocation {
                    exam_id: exam.id.clone(),
                    spacing: Some(spacing),
                    total: order.len(),
                    assignments: pending,
                })
            }
            AttemptState::Exhausted { best_placed } => {
                warn!(
                    exam_id = %exam.id,
                    placed = best_placed,
                    total = order.len(),
                    "no spacing level seated every candidate"
                );
                Err(SeatingError::PlacementExhausted {
                    placed: best_placed,
                    total: order.len(),
                })
            }
            AttemptState::Trying { .. } => Err(SeatingError::PlacementExhausted {
                placed: 0,
                total: order.len(),
            }),
        }
    }
}

/// One placement pass at a fixed spacing, starting from `base`.
fn attempt(
    exam: &Exam,
    order: &[&Candidate],
    rooms: &[Room],
    targets: &[usize],
    base: &[PlacementGrid],
    spacing: usize,
) -> (AttemptOutcome, Vec<Assignment>) {
    let mut grids = base.to_vec();
    let mut allocated = vec![0usize; rooms.len()];
    let mut assignments = Vec::with_capacity(order.len());

    for candidate in order {
        let slot = rooms.iter().enumerate().find_map(|(i, room)| {
            if allocated[i] >= targets[i] {
                return None;
            }
            grids[i]
                .best_seat(&candidate.course, spacing)
                .map(|seat| (i, room, seat))
        });

        let Some((i, room, seat)) = slot else {
            return (
                AttemptOutcome::Stuck {
                    placed: assignments.len(),
                },
                assignments,
            );
        };

        grids[i].occupy(seat, &candidate.course, &candidate.id);
        allocated[i] += 1;
        assignments.push(Assignment::new(
            &exam.id,
            &candidate.id,
            &room.id,
            seat,
            &candidate.course,
        ));
    }

    (AttemptOutcome::Complete, assignments)
}

fn check_capacity(required: usize, available: usize) -> Result<()> {
    if required > available {
        return Err(SeatingError::CapacityExceeded {
            required,
            available,
            shortfall: required - available,
        });
    }
    Ok(())
}

/// Identifiers of candidates already holding a seat.
pub fn assigned_ids(assignments: &[Assignment]) -> HashSet<&str> {
    assignments.iter().map(|a| a.candidate_id.as_str()).collect()
}

/// Candidates not in `assigned`, order preserved.
pub fn unassigned<'a>(
    candidates: impl IntoIterator<Item = &'a Candidate>,
    assigned: &HashSet<&str>,
) -> Vec<&'a Candidate> {
    candidates
        .into_iter()
        .filter(|c| !assigned.contains(c.id.as_str()))
        .collect()
}
