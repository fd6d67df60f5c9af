//! Exam scheduling conflict detection.
//!
//! # Rules
//!
//! Two exams conflict when all of the following hold:
//!
//! | Check | Test |
//! |-------|------|
//! | Time | `[start, start + duration)` windows overlap |
//! | Session | session labels are equal |
//! | Branch | eligible-branch sets intersect |
//!
//! The session check is a gate of its own: exams in different sessions
//! never conflict, even if their windows overlap on the wall clock.
//!
//! Step 1 ([`find_overlaps`]) is a pure schedule check and backs the
//! exam-creation gate. Step 2 ([`shared_candidates`]) narrows the step-1
//! result to exams that actually double-book seated candidates.

use std::collections::{BTreeSet, HashSet};

use crate::error::Result;
use crate::models::Exam;

/// Whether two exams conflict on time, session, and branch.
///
/// Symmetric in its arguments. An exam is not compared with itself by
/// [`find_overlaps`], but `conflicts(a, a)` is true for any exam with a
/// positive duration and at least one branch.
pub fn conflicts(a: &Exam, b: &Exam) -> bool {
    a.session == b.session && a.window().overlaps(&b.window()) && a.shares_branch_with(b)
}

/// Other exams that conflict with `exam` (step 1).
///
/// Exams with the same id as `exam` are skipped, so the inspected exam can
/// be passed inside `others`.
pub fn find_overlaps<'a>(exam: &Exam, others: &'a [Exam]) -> Vec<&'a Exam> {
    others
        .iter()
        .filter(|other| other.id != exam.id && conflicts(exam, other))
        .collect()
}

/// A step-1 overlap narrowed to candidates seated in both exams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedSeating<'a> {
    /// The other exam.
    pub exam: &'a Exam,
    /// Candidates assigned in both exams, sorted.
    pub candidate_ids: Vec<String>,
}

/// Narrows `overlaps` to exams sharing at least one seated candidate with
/// the inspected exam (step 2).
///
/// `inspected` holds the candidate ids assigned in the inspected exam.
/// `assigned_in` yields the assigned candidate ids of another exam; its
/// errors are propagated. Exams with no shared candidate are dropped.
pub fn shared_candidates<'a, F>(
    inspected: &HashSet<String>,
    overlaps: &[&'a Exam],
    mut assigned_in: F,
) -> Result<Vec<SharedSeating<'a>>>
where
    F: FnMut(&Exam) -> Result<HashSet<String>>,
{
    let mut out = Vec::new();
    if inspected.is_empty() {
        return Ok(out);
    }
    for &other in overlaps {
        let theirs = assigned_in(other)?;
        let shared: BTreeSet<&String> = inspected.intersection(&theirs).collect();
        if !shared.is_empty() {
            out.push(SharedSeating {
                exam: other,
                candidate_ids: shared.into_iter().cloned().collect(),
            });
        }
    }
    Ok(out)
}
