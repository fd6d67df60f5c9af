//! Proportional distribution of candidates across rooms.
//!
//! # Algorithm
//!
//! 1. Proportional pass: each room gets `floor(capacity * n / total_capacity)`,
//!    capped at the room's capacity and so the running sum never exceeds `n`.
//! 2. Remainder pass: the floor-rounding remainder is handed out in room
//!    order, each room taking up to its spare capacity.
//!
//! Deterministic for a fixed room order. The targets sum to
//! `min(n, total_capacity)` and no target exceeds its room's capacity.
//! Callers reject `n > total_capacity` before distributing.

/// Computes per-room targets for `total` candidates.
///
/// `capacities` is in room order; the result is parallel to it.
pub fn distribute(capacities: &[usize], total: usize) -> Vec<usize> {
    let total_capacity: usize = capacities.iter().sum();
    if total_capacity == 0 {
        return vec![0; capacities.len()];
    }

    let mut remaining = total;
    let mut targets: Vec<usize> = capacities
        .iter()
        .map(|&capacity| {
            let share = (capacity as u128 * total as u128 / total_capacity as u128) as usize;
            let share = share.min(capacity).min(remaining);
            remaining -= share;
            share
        })
        .collect();

    for (target, &capacity) in targets.iter_mut().zip(capacities) {
        if remaining == 0 {
            break;
        }
        let extra = capacity.saturating_sub(*target).min(remaining);
        *target += extra;
        remaining -= extra;
    }

    targets
}
