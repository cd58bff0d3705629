//! Vacation periods: inclusive calendar-date intervals and the
//! structural rules a request's period set must satisfy.
//!
//! Dates are timezone-naive calendar days. Day counts are inclusive
//! spans with no business-day exclusion; weekends and holidays count as
//! ordinary days unless an external calendar says otherwise, which this
//! core does not consult.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Minimum length of the statutory "long block": at least one period of
/// a request must span this many days before it may leave Draft.
pub const MIN_LONG_BLOCK_DAYS: i32 = 14;

/// A single leave interval, both endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count between the two dates.
    pub day_count: i32,
}

/// Caller-supplied period bounds, before validation.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PeriodInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Inclusive calendar-day count of `[start, end]`.
///
/// Callers must ensure `start <= end`; the count of a single day is 1.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> i32 {
    (end - start).num_days() as i32 + 1
}

/// Two inclusive intervals overlap iff each starts no later than the
/// other ends. Back-to-back periods sharing a boundary day overlap.
pub fn overlaps(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Validate raw period inputs against the structural rules of a request
/// and return them as [`VacationPeriod`]s sorted by start date.
///
/// Rules enforced here (checked at create and on every Draft edit):
/// - at least one period
/// - `start_date <= end_date` for each period
/// - every period falls entirely within `year`
/// - no two periods overlap (inclusive semantics)
///
/// The 14-day long-block rule is deliberately NOT checked here; it is a
/// submission-time rule (see [`validate_for_submit`]).
pub fn validate_periods(year: i32, inputs: &[PeriodInput]) -> Result<Vec<VacationPeriod>, CoreError> {
    if inputs.is_empty() {
        return Err(CoreError::Validation(
            "A request must contain at least one period".to_string(),
        ));
    }

    let mut periods = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.start_date > input.end_date {
            return Err(CoreError::Validation(format!(
                "Period start {} is after its end {}",
                input.start_date, input.end_date
            )));
        }
        if input.start_date.year() != year || input.end_date.year() != year {
            return Err(CoreError::Validation(format!(
                "Period {}..{} falls outside year {year}",
                input.start_date, input.end_date
            )));
        }
        periods.push(VacationPeriod {
            start_date: input.start_date,
            end_date: input.end_date,
            day_count: inclusive_day_count(input.start_date, input.end_date),
        });
    }

    periods.sort_by_key(|p| p.start_date);

    for pair in periods.windows(2) {
        // Sorted by start, so overlap reduces to prev.end >= next.start.
        if pair[0].end_date >= pair[1].start_date {
            return Err(CoreError::Validation(format!(
                "Periods {}..{} and {}..{} overlap",
                pair[0].start_date, pair[0].end_date, pair[1].start_date, pair[1].end_date
            )));
        }
    }

    Ok(periods)
}

/// Sum of day counts over a period set.
pub fn total_days(periods: &[VacationPeriod]) -> i32 {
    periods.iter().map(|p| p.day_count).sum()
}

/// Submission-time structural check: the long-block rule.
///
/// At least one period must span [`MIN_LONG_BLOCK_DAYS`] days. Validated
/// once when the request leaves Draft, not continuously.
pub fn validate_for_submit(periods: &[VacationPeriod]) -> Result<(), CoreError> {
    if periods.iter().any(|p| p.day_count >= MIN_LONG_BLOCK_DAYS) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "At least one period must span a minimum {MIN_LONG_BLOCK_DAYS}-day block"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(start: NaiveDate, end: NaiveDate) -> PeriodInput {
        PeriodInput {
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn single_day_counts_as_one() {
        let d = date(2025, 6, 1);
        assert_eq!(inclusive_day_count(d, d), 1);
    }

    #[test]
    fn day_count_is_inclusive_of_both_ends() {
        assert_eq!(inclusive_day_count(date(2025, 6, 1), date(2025, 6, 10)), 10);
        // Across a month boundary.
        assert_eq!(inclusive_day_count(date(2025, 6, 28), date(2025, 7, 4)), 7);
    }

    #[test]
    fn empty_period_set_rejected() {
        assert!(validate_periods(2025, &[]).is_err());
    }

    #[test]
    fn inverted_dates_rejected() {
        let result = validate_periods(2025, &[input(date(2025, 6, 10), date(2025, 6, 1))]);
        assert!(result.unwrap_err().to_string().contains("after its end"));
    }

    #[test]
    fn out_of_year_period_rejected() {
        let result = validate_periods(2025, &[input(date(2024, 12, 29), date(2025, 1, 3))]);
        assert!(result.unwrap_err().to_string().contains("outside year"));
    }

    #[test]
    fn overlapping_periods_rejected() {
        let result = validate_periods(
            2025,
            &[
                input(date(2025, 6, 1), date(2025, 6, 10)),
                input(date(2025, 6, 10), date(2025, 6, 15)),
            ],
        );
        assert!(result.unwrap_err().to_string().contains("overlap"));
    }

    #[test]
    fn valid_periods_sorted_with_day_counts() {
        let periods = validate_periods(
            2025,
            &[
                input(date(2025, 8, 1), date(2025, 8, 14)),
                input(date(2025, 6, 1), date(2025, 6, 5)),
            ],
        )
        .unwrap();

        assert_eq!(periods[0].start_date, date(2025, 6, 1));
        assert_eq!(periods[0].day_count, 5);
        assert_eq!(periods[1].start_date, date(2025, 8, 1));
        assert_eq!(periods[1].day_count, 14);
        assert_eq!(total_days(&periods), 19);
    }

    #[test]
    fn shared_boundary_day_is_an_overlap() {
        assert!(overlaps(
            date(2025, 6, 1),
            date(2025, 6, 5),
            date(2025, 6, 5),
            date(2025, 6, 9),
        ));
    }

    #[test]
    fn adjacent_but_disjoint_days_do_not_overlap() {
        assert!(!overlaps(
            date(2025, 6, 1),
            date(2025, 6, 5),
            date(2025, 6, 6),
            date(2025, 6, 9),
        ));
    }

    #[test]
    fn submit_requires_a_long_block() {
        let short = validate_periods(2025, &[input(date(2025, 6, 1), date(2025, 6, 5))]).unwrap();
        assert!(validate_for_submit(&short).is_err());

        let with_block = validate_periods(
            2025,
            &[
                input(date(2025, 6, 1), date(2025, 6, 5)),
                input(date(2025, 7, 1), date(2025, 7, 14)),
            ],
        )
        .unwrap();
        assert!(validate_for_submit(&with_block).is_ok());
    }

    #[test]
    fn exactly_fourteen_days_satisfies_the_long_block() {
        let periods = validate_periods(2025, &[input(date(2025, 7, 1), date(2025, 7, 14))]).unwrap();
        assert_eq!(periods[0].day_count, 14);
        assert!(validate_for_submit(&periods).is_ok());
    }
}
