//! Conflict detection between a candidate request's periods and approved
//! leave elsewhere in an approver's visibility scope.
//!
//! Inclusive-date semantics throughout: two periods sharing a boundary
//! calendar day conflict. Output is the full list of overlapping pairs,
//! not a boolean, so callers can report every conflict at once.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::VacationPeriod;
use crate::types::DbId;

/// An approved period belonging to some employee in the visibility scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedPeriod {
    pub request_id: DbId,
    pub owner_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One pairwise overlap between a subject period and another employee's
/// approved period. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub subject_request_id: DbId,
    pub subject_start: NaiveDate,
    pub subject_end: NaiveDate,
    pub other_request_id: DbId,
    pub other_owner_id: DbId,
    pub overlap_start: NaiveDate,
    pub overlap_end: NaiveDate,
}

/// Open-interval heap entry, ordered by end date so expired intervals
/// pop first.
type OpenEntry = Reverse<(NaiveDate, usize)>;

/// Find every overlap between `candidates` (the periods of request
/// `subject_request_id`, owned by `subject_owner_id`) and `existing`
/// (approved periods of employees in the approver's scope).
///
/// Sweep-line over both sets sorted by start date, keeping a min-heap of
/// currently-open intervals per side keyed by end date. Each interval,
/// when opened, first evicts the other side's intervals that ended
/// before its start, then pairs with everything still open there. Runs
/// in O((n+m) log (n+m) + k) for k reported conflicts, which matters
/// because scope can span an entire organizational subtree.
///
/// The subject's own periods in `existing` are ignored, so a request
/// never conflicts with its owner's other approved leave here (the
/// owner's periods are constrained by per-request validation and the
/// allowance instead).
pub fn detect_conflicts(
    subject_request_id: DbId,
    subject_owner_id: DbId,
    candidates: &[VacationPeriod],
    existing: &[ScopedPeriod],
) -> Vec<ConflictRecord> {
    let others: Vec<&ScopedPeriod> = existing
        .iter()
        .filter(|p| p.owner_id != subject_owner_id)
        .collect();

    // (start, is_candidate, index into the respective slice)
    let mut timeline: Vec<(NaiveDate, bool, usize)> = Vec::with_capacity(candidates.len() + others.len());
    timeline.extend(candidates.iter().enumerate().map(|(i, p)| (p.start_date, true, i)));
    timeline.extend(others.iter().enumerate().map(|(i, p)| (p.start_date, false, i)));
    timeline.sort();

    let mut open_candidates: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut open_others: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut conflicts = Vec::new();

    for (start, is_candidate, idx) in timeline {
        if is_candidate {
            let candidate = &candidates[idx];
            evict_closed(&mut open_others, start);
            for &Reverse((_, other_idx)) in open_others.iter() {
                conflicts.push(pair(subject_request_id, candidate, others[other_idx]));
            }
            open_candidates.push(Reverse((candidate.end_date, idx)));
        } else {
            let other = others[idx];
            evict_closed(&mut open_candidates, start);
            for &Reverse((_, cand_idx)) in open_candidates.iter() {
                conflicts.push(pair(subject_request_id, &candidates[cand_idx], other));
            }
            open_others.push(Reverse((other.end_date, idx)));
        }
    }

    conflicts.sort_by_key(|c| (c.overlap_start, c.other_request_id, c.subject_start));
    conflicts
}

/// Pop every open interval that ended strictly before `start`.
/// Inclusive dates: an interval ending exactly on `start` is still open.
fn evict_closed(open: &mut BinaryHeap<OpenEntry>, start: NaiveDate) {
    while let Some(&Reverse((end, _))) = open.peek() {
        if end < start {
            open.pop();
        } else {
            break;
        }
    }
}

fn pair(subject_request_id: DbId, candidate: &VacationPeriod, other: &ScopedPeriod) -> ConflictRecord {
    ConflictRecord {
        subject_request_id,
        subject_start: candidate.start_date,
        subject_end: candidate.end_date,
        other_request_id: other.request_id,
        other_owner_id: other.owner_id,
        overlap_start: candidate.start_date.max(other.start_date),
        overlap_end: candidate.end_date.min(other.end_date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::inclusive_day_count;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(start: NaiveDate, end: NaiveDate) -> VacationPeriod {
        VacationPeriod {
            start_date: start,
            end_date: end,
            day_count: inclusive_day_count(start, end),
        }
    }

    fn scoped(request_id: DbId, owner_id: DbId, start: NaiveDate, end: NaiveDate) -> ScopedPeriod {
        ScopedPeriod {
            request_id,
            owner_id,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn disjoint_periods_produce_no_conflicts() {
        let cands = [candidate(date(2025, 6, 1), date(2025, 6, 5))];
        let existing = [scoped(7, 2, date(2025, 6, 6), date(2025, 6, 10))];
        assert!(detect_conflicts(1, 1, &cands, &existing).is_empty());
    }

    #[test]
    fn overlap_bounds_are_max_start_min_end() {
        let cands = [candidate(date(2025, 6, 5), date(2025, 6, 7))];
        let existing = [scoped(7, 2, date(2025, 6, 1), date(2025, 6, 10))];

        let conflicts = detect_conflicts(1, 1, &cands, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].overlap_start, date(2025, 6, 5));
        assert_eq!(conflicts[0].overlap_end, date(2025, 6, 7));
        assert_eq!(conflicts[0].other_request_id, 7);
        assert_eq!(conflicts[0].other_owner_id, 2);
    }

    #[test]
    fn shared_boundary_day_conflicts() {
        let cands = [candidate(date(2025, 6, 1), date(2025, 6, 5))];
        let existing = [scoped(7, 2, date(2025, 6, 5), date(2025, 6, 9))];

        let conflicts = detect_conflicts(1, 1, &cands, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].overlap_start, date(2025, 6, 5));
        assert_eq!(conflicts[0].overlap_end, date(2025, 6, 5));
    }

    #[test]
    fn own_approved_periods_are_ignored() {
        let cands = [candidate(date(2025, 6, 1), date(2025, 6, 10))];
        let existing = [scoped(7, 1, date(2025, 6, 1), date(2025, 6, 10))];
        assert!(detect_conflicts(1, 1, &cands, &existing).is_empty());
    }

    #[test]
    fn every_overlapping_pair_is_reported_once() {
        let cands = [
            candidate(date(2025, 6, 1), date(2025, 6, 10)),
            candidate(date(2025, 7, 1), date(2025, 7, 5)),
        ];
        let existing = [
            scoped(7, 2, date(2025, 6, 5), date(2025, 6, 7)),
            scoped(8, 3, date(2025, 6, 9), date(2025, 6, 20)),
            scoped(9, 4, date(2025, 8, 1), date(2025, 8, 5)),
        ];

        let conflicts = detect_conflicts(1, 1, &cands, &existing);
        assert_eq!(conflicts.len(), 2);

        assert_eq!(conflicts[0].other_request_id, 7);
        assert_eq!(conflicts[0].overlap_start, date(2025, 6, 5));
        assert_eq!(conflicts[0].overlap_end, date(2025, 6, 7));

        assert_eq!(conflicts[1].other_request_id, 8);
        assert_eq!(conflicts[1].overlap_start, date(2025, 6, 9));
        assert_eq!(conflicts[1].overlap_end, date(2025, 6, 10));
    }

    #[test]
    fn identical_start_dates_still_pair() {
        let cands = [candidate(date(2025, 6, 1), date(2025, 6, 3))];
        let existing = [
            scoped(7, 2, date(2025, 6, 1), date(2025, 6, 2)),
            scoped(8, 3, date(2025, 6, 1), date(2025, 6, 9)),
        ];

        let conflicts = detect_conflicts(1, 1, &cands, &existing);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|c| c.overlap_start == date(2025, 6, 1)));
    }

    #[test]
    fn containment_overlap_is_the_inner_interval() {
        let cands = [candidate(date(2025, 6, 1), date(2025, 6, 30))];
        let existing = [scoped(7, 2, date(2025, 6, 10), date(2025, 6, 12))];

        let conflicts = detect_conflicts(1, 1, &cands, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].overlap_start, date(2025, 6, 10));
        assert_eq!(conflicts[0].overlap_end, date(2025, 6, 12));
    }

    #[test]
    fn dense_scope_reports_all_pairs() {
        // One candidate against many stacked approved periods.
        let cands = [candidate(date(2025, 6, 1), date(2025, 6, 30))];
        let existing: Vec<ScopedPeriod> = (0..10)
            .map(|i| {
                scoped(
                    10 + i,
                    2 + i,
                    date(2025, 6, 1 + i as u32),
                    date(2025, 6, 3 + i as u32),
                )
            })
            .collect();

        let conflicts = detect_conflicts(1, 1, &cands, &existing);
        assert_eq!(conflicts.len(), 10);
    }
}
