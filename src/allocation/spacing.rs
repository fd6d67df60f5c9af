//! Spacing relaxation schedule.
//!
//! Placement is attempted at each spacing level in turn, strictly
//! descending, until one attempt seats the whole sequence. The retry loop
//! is an explicit state machine:
//!
//! ```text
//! Trying(0) --stuck--> Trying(1) --stuck--> ... --stuck--> Exhausted
//!     |                    |
//!  complete             complete
//!     v                    v
//!  Seated(levels[0])    Seated(levels[1])
//! ```
//!
//! Spacing 0 is never attempted: different-course neighbours are always
//! at least one seat apart.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};

/// Descending list of spacing levels to try.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct SpacingSchedule {
    levels: Vec<usize>,
}

impl SpacingSchedule {
    /// Creates a schedule.
    ///
    /// Levels must be non-empty, strictly descending, and at least 1.
    pub fn new(levels: Vec<usize>) -> Result<Self, ValidationError> {
        if levels.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                "Spacing schedule is empty",
            ));
        }
        if levels.contains(&0) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                "Spacing levels must be at least 1",
            ));
        }
        if levels.windows(2).any(|w| w[0] <= w[1]) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                format!("Spacing schedule {levels:?} is not strictly descending"),
            ));
        }
        Ok(Self { levels })
    }

    /// Spacing levels in attempt order.
    pub fn levels(&self) -> &[usize] {
        &self.levels
    }

    /// Spacing at a level index.
    pub fn spacing_at(&self, level: usize) -> Option<usize> {
        self.levels.get(level).copied()
    }
}

impl Default for SpacingSchedule {
    fn default() -> Self {
        Self { levels: vec![2, 1] }
    }
}

impl TryFrom<Vec<usize>> for SpacingSchedule {
    type Error = String;

    fn try_from(levels: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(levels).map_err(|e| e.message)
    }
}

impl From<SpacingSchedule> for Vec<usize> {
    fn from(schedule: SpacingSchedule) -> Self {
        schedule.levels
    }
}

/// Result of one placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Every candidate in the sequence was seated.
    Complete,
    /// A candidate found no valid seat after `placed` were seated.
    Stuck {
        /// Candidates seated before the attempt stopped.
        placed: usize,
    },
}

/// State of the spacing retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// About to attempt placement at `schedule.levels()[level]`.
    Trying {
        /// Index into the schedule.
        level: usize,
        /// Best progress seen so far.
        best_placed: usize,
    },
    /// An attempt seated everyone.
    Seated {
        /// Spacing that succeeded.
        spacing: usize,
    },
    /// Every level got stuck.
    Exhausted {
        /// Best progress over all attempts.
        best_placed: usize,
    },
}

impl AttemptState {
    /// Initial state.
    pub fn start() -> Self {
        AttemptState::Trying {
            level: 0,
            best_placed: 0,
        }
    }

    /// Applies an attempt outcome.
    ///
    /// Terminal states ignore further outcomes.
    pub fn advance(self, schedule: &SpacingSchedule, outcome: AttemptOutcome) -> Self {
        let AttemptState::Trying { level, best_placed } = self else {
            return self;
        };
        match (outcome, schedule.spacing_at(level)) {
            (_, None) => AttemptState::Exhausted { best_placed },
            (AttemptOutcome::Complete, Some(spacing)) => AttemptState::Seated { spacing },
            (AttemptOutcome::Stuck { placed }, Some(_)) => {
                let best_placed = best_placed.max(placed);
                if level + 1 < schedule.levels().len() {
                    AttemptState::Trying {
                        level: level + 1,
                        best_placed,
                    }
                } else {
                    AttemptState::Exhausted { best_placed }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        assert_eq!(SpacingSchedule::default().levels(), &[2, 1]);
    }

    #[test]
    fn test_schedule_rejects_bad_levels() {
        assert!(SpacingSchedule::new(vec![]).is_err());
        assert!(SpacingSchedule::new(vec![2, 0]).is_err());
        assert!(SpacingSchedule::new(vec![1, 2]).is_err());
        assert!(SpacingSchedule::new(vec![2, 2]).is_err());
        assert!(SpacingSchedule::new(vec![3, 2, 1]).is_ok());
    }

    #[test]
    fn test_first_attempt_succeeds() {
        let schedule = SpacingSchedule::default();
        let state = AttemptState::start().advance(&schedule, AttemptOutcome::Complete);
        assert_eq!(state, AttemptState::Seated { spacing: 2 });
    }

    #[test]
    fn test_relax_then_succeed() {
        let schedule = SpacingSchedule::default();
        let state = AttemptState::start().advance(&schedule, AttemptOutcome::Stuck { placed: 7 });
        assert_eq!(
            state,
            AttemptState::Trying {
                level: 1,
                best_placed: 7
            }
        );

        let state = state.advance(&schedule, AttemptOutcome::Complete);
        assert_eq!(state, AttemptState::Seated { spacing: 1 });
    }

    #[test]
    fn test_exhausted_keeps_best_progress() {
        let schedule = SpacingSchedule::default();
        let state = AttemptState::start()
            .advance(&schedule, AttemptOutcome::Stuck { placed: 9 })
            .advance(&schedule, AttemptOutcome::Stuck { placed: 4 });
        assert_eq!(state, AttemptState::Exhausted { best_placed: 9 });

        // Terminal states are absorbing.
        let again = state.advance(&schedule, AttemptOutcome::Complete);
        assert_eq!(again, state);
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let json = serde_json::to_string(&SpacingSchedule::default()).unwrap();
        assert_eq!(json, "[2,1]");
        let parsed: SpacingSchedule = serde_json::from_str("[3,1]").unwrap();
        assert_eq!(parsed.levels(), &[3, 1]);
        assert!(serde_json::from_str::<SpacingSchedule>("[1,3]").is_err());
    }
}
