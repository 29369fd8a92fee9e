// SPDX-FileCopyrightText: 2026 Capreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared selection algorithm.
//!
//! Every index ranks the same way: effective score is the candidate's
//! intrinsic priority plus its penalty override (saturating), sorted
//! ascending, ties broken by registration sequence. Candidates whose score is
//! [`Score::INFINITE`] are dropped, so to every query they look unregistered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use capreg_core::{CapabilityKey, Implementation, Score};

use crate::penalty_table::PenaltyTable;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Hands out registration sequence numbers.
///
/// Process-global and shared by every index, so numbers are unique across
/// indexes and registries and are never reused.
pub fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// One registration of an implementation, optionally under a capability key.
pub struct RankedEntry<T: ?Sized> {
    implementation: Arc<T>,
    sequence: u64,
    key: Option<CapabilityKey>,
}

impl<T: ?Sized> Clone for RankedEntry<T> {
    fn clone(&self) -> Self {
        Self {
            implementation: Arc::clone(&self.implementation),
            sequence: self.sequence,
            key: self.key.clone(),
        }
    }
}

impl<T: ?Sized> RankedEntry<T> {
    /// Wraps `implementation`, assigning the next registration sequence.
    pub fn new(implementation: Arc<T>, key: Option<CapabilityKey>) -> Self {
        Self {
            implementation,
            sequence: next_sequence(),
            key,
        }
    }

    pub fn implementation(&self) -> &Arc<T> {
        &self.implementation
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn key(&self) -> Option<&CapabilityKey> {
        self.key.as_ref()
    }

    /// Reference equality with a registered handle.
    pub fn is(&self, other: &Arc<T>) -> bool {
        Arc::ptr_eq(&self.implementation, other)
    }
}

/// A candidate together with the score it was ranked by.
pub struct Ranked<T: ?Sized> {
    pub implementation: Arc<T>,
    pub score: Score,
    pub sequence: u64,
}

/// Effective score of `identity` with the given intrinsic priority.
pub fn score(intrinsic: i32, identity: &str, penalties: &PenaltyTable) -> Score {
    Score::of(intrinsic, penalties.get(identity))
}

/// Ranks entries ascending by `(score, sequence)` and drops excluded ones.
///
/// `intrinsic` reports each candidate's own priority or usage penalty. Called
/// on copies of index buckets, never while an index lock is held.
pub fn rank<T, F>(entries: &[RankedEntry<T>], penalties: &PenaltyTable, intrinsic: F) -> Vec<Ranked<T>>
where
    T: Implementation + ?Sized,
    F: Fn(&T) -> i32,
{
    let mut ranked: Vec<Ranked<T>> = entries
        .iter()
        .map(|entry| {
            let implementation = Arc::clone(entry.implementation());
            let score = score(intrinsic(&*implementation), implementation.identity(), penalties);
            Ranked {
                implementation,
                score,
                sequence: entry.sequence(),
            }
        })
        .filter(|candidate| !candidate.score.is_excluded())
        .collect();
    ranked.sort_by_key(|candidate| (candidate.score, candidate.sequence));
    ranked
}

/// Drops repeated registrations of the same instance, keeping the earliest.
pub fn dedup_by_instance<T: ?Sized>(entries: &mut Vec<RankedEntry<T>>) {
    entries.sort_by_key(RankedEntry::sequence);
    let mut kept: Vec<RankedEntry<T>> = Vec::with_capacity(entries.len());
    for entry in entries.drain(..) {
        if !kept.iter().any(|k| k.is(entry.implementation())) {
            kept.push(entry);
        }
    }
    *entries = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use capreg_core::Penalty;

    struct Named(&'static str, i32);

    impl Implementation for Named {
        fn identity(&self) -> &str {
            self.0
        }
    }

    fn entry(name: &'static str, priority: i32) -> RankedEntry<Named> {
        RankedEntry::new(Arc::new(Named(name, priority)), None)
    }

    fn names(ranked: &[Ranked<Named>]) -> Vec<&'static str> {
        ranked.iter().map(|r| r.implementation.0).collect()
    }

    #[test]
    fn sequences_strictly_increase() {
        let a = next_sequence();
        let b = next_sequence();
        assert!(b > a);
    }

    #[test]
    fn ranks_ascending_by_priority() {
        let entries = vec![entry("slow", 10), entry("fast", 5), entry("mid", 7)];
        let ranked = rank(&entries, &PenaltyTable::new(), |n| n.1);
        assert_eq!(names(&ranked), vec!["fast", "mid", "slow"]);
    }

    #[test]
    fn ties_break_by_registration_order() {
        let entries = vec![entry("first", 1), entry("second", 1), entry("third", 1)];
        let ranked = rank(&entries, &PenaltyTable::new(), |n| n.1);
        assert_eq!(names(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn penalty_reorders_and_infinite_excludes() {
        let entries = vec![entry("a", 1), entry("b", 2), entry("c", 3)];
        let penalties = PenaltyTable::new();
        penalties.set("a", Penalty::Finite(10));
        penalties.set("c", Penalty::Infinite);
        let ranked = rank(&entries, &penalties, |n| n.1);
        assert_eq!(names(&ranked), vec!["b", "a"]);
        assert_eq!(ranked[1].score, Score::of(1, Penalty::Finite(10)));
    }

    #[test]
    fn dedup_keeps_earliest_registration() {
        let shared = Arc::new(Named("shared", 0));
        let first = RankedEntry::new(Arc::clone(&shared), None);
        let other = entry("other", 0);
        let second = RankedEntry::new(Arc::clone(&shared), None);
        let mut entries = vec![second, other, first.clone()];
        dedup_by_instance(&mut entries);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sequence(), first.sequence());
    }
}
