//! Monthly due-date recurrence for recurring obligations.
//!
//! Every tracked obligation (partner payout, AI tool subscription, platform
//! fee) recurs on a fixed day of the month. Given an injected "now" anchored
//! to the business timezone, [`alert_level`] decides whether the obligation
//! is due today, due tomorrow, or neither — clamping the nominal due day to
//! the length of the month under evaluation, so a day-31 obligation is due
//! on April 30, not rolled into May.
//!
//! All functions here are pure: the caller provides the "now" anchor
//! (typically [`business_now`] in production, a fixed datetime in tests).

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// The civil timezone all due-date math is anchored to.
///
/// The agency operates in São Paulo; evaluating "is this due today" against
/// the host machine's timezone would shift alerts by a day for users
/// elsewhere.
pub const BUSINESS_TZ: Tz = chrono_tz::America::Sao_Paulo;

/// Urgency of a due obligation. Absence of an alert is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Due today.
    Red,
    /// Due tomorrow.
    Yellow,
}

/// The current instant in the business timezone.
pub fn business_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&BUSINESS_TZ)
}

/// Number of days in the given month, or 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Clamp a nominal due day to the last valid day of the given month.
///
/// Day 31 in April resolves to 30; day 29 in a non-leap February resolves
/// to 28. This is the "effective due date" rule: the obligation is due on
/// the last day the month actually has, never on the 1st of the next month.
pub fn effective_due_day(due_day: u32, year: i32, month: u32) -> u32 {
    due_day.min(days_in_month(year, month))
}

/// Compute the alert level for a monthly obligation due on `due_day`.
///
/// Returns `Some(Red)` when `now`'s date equals the effective due date of
/// the current month, `Some(Yellow)` when tomorrow (with month/year
/// rollover) equals the effective due date of tomorrow's month, and `None`
/// otherwise.
///
/// A `due_day` outside 1..=31, or any date that cannot be constructed,
/// yields `None` — a missed alert is lower-impact than a failed aggregation
/// pass.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use joia_core::recurrence::{alert_level, AlertLevel, BUSINESS_TZ};
///
/// // Day-31 obligation evaluated on April 30: due today (clamped).
/// let now = BUSINESS_TZ.with_ymd_and_hms(2026, 4, 30, 9, 0, 0).unwrap();
/// assert_eq!(alert_level(31, now), Some(AlertLevel::Red));
/// ```
pub fn alert_level(due_day: u32, now: DateTime<Tz>) -> Option<AlertLevel> {
    if !(1..=31).contains(&due_day) {
        return None;
    }

    let today = now.date_naive();
    if today.day() == effective_due_day(due_day, today.year(), today.month()) {
        return Some(AlertLevel::Red);
    }

    let tomorrow = today.succ_opt()?;
    if tomorrow.day() == effective_due_day(due_day, tomorrow.year(), tomorrow.month()) {
        return Some(AlertLevel::Yellow);
    }

    None
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Tz> {
        BUSINESS_TZ
            .with_ymd_and_hms(year, month, day, 10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_due_today_is_red() {
        assert_eq!(alert_level(15, at(2026, 3, 15)), Some(AlertLevel::Red));
    }

    #[test]
    fn test_due_tomorrow_is_yellow() {
        assert_eq!(alert_level(16, at(2026, 3, 15)), Some(AlertLevel::Yellow));
    }

    #[test]
    fn test_not_due_is_none() {
        assert_eq!(alert_level(20, at(2026, 3, 15)), None);
        assert_eq!(alert_level(14, at(2026, 3, 15)), None);
    }

    #[test]
    fn test_day_31_clamps_to_april_30() {
        // April has 30 days: a day-31 obligation is due on the 30th.
        assert_eq!(alert_level(31, at(2026, 4, 30)), Some(AlertLevel::Red));
    }

    #[test]
    fn test_day_31_in_april_yellow_on_the_29th() {
        assert_eq!(alert_level(31, at(2026, 4, 29)), Some(AlertLevel::Yellow));
    }

    #[test]
    fn test_day_31_does_not_roll_into_may() {
        assert_eq!(alert_level(31, at(2026, 5, 1)), None);
    }

    #[test]
    fn test_day_29_in_non_leap_february() {
        // 2026 is not a leap year: February ends on the 28th.
        assert_eq!(alert_level(29, at(2026, 2, 28)), Some(AlertLevel::Red));
        assert_eq!(alert_level(29, at(2026, 2, 27)), Some(AlertLevel::Yellow));
    }

    #[test]
    fn test_day_31_in_february() {
        assert_eq!(alert_level(31, at(2026, 2, 28)), Some(AlertLevel::Red));
        assert_eq!(alert_level(31, at(2026, 3, 1)), None);
    }

    #[test]
    fn test_day_29_in_leap_february() {
        assert_eq!(alert_level(29, at(2028, 2, 29)), Some(AlertLevel::Red));
        assert_eq!(alert_level(29, at(2028, 2, 28)), Some(AlertLevel::Yellow));
    }

    #[test]
    fn test_year_rollover_on_december_31() {
        // Tomorrow is January 1 of the next year.
        assert_eq!(alert_level(1, at(2026, 12, 31)), Some(AlertLevel::Yellow));
        assert_eq!(alert_level(31, at(2026, 12, 31)), Some(AlertLevel::Red));
    }

    #[test]
    fn test_month_rollover_on_last_day() {
        // March 31 → April 1 for the tomorrow check.
        assert_eq!(alert_level(1, at(2026, 3, 31)), Some(AlertLevel::Yellow));
    }

    #[test]
    fn test_out_of_range_due_day_is_none() {
        assert_eq!(alert_level(0, at(2026, 3, 15)), None);
        assert_eq!(alert_level(32, at(2026, 3, 15)), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1), 31);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2028, 2), 29);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
    }

    #[test]
    fn test_effective_due_day() {
        assert_eq!(effective_due_day(31, 2026, 4), 30);
        assert_eq!(effective_due_day(29, 2026, 2), 28);
        assert_eq!(effective_due_day(29, 2028, 2), 29);
        assert_eq!(effective_due_day(15, 2026, 2), 15);
    }

    proptest! {
        #[test]
        fn prop_red_iff_today_is_effective_due_date(
            due_day in 1u32..=31,
            year in 2024i32..=2030,
            month in 1u32..=12,
            day in 1u32..=31,
        ) {
            prop_assume!(day <= days_in_month(year, month));
            let now = at(year, month, day);
            let is_red = alert_level(due_day, now) == Some(AlertLevel::Red);
            prop_assert_eq!(is_red, day == effective_due_day(due_day, year, month));
        }

        #[test]
        fn prop_yellow_iff_tomorrow_is_effective_due_date(
            due_day in 1u32..=31,
            year in 2024i32..=2030,
            month in 1u32..=12,
            day in 1u32..=31,
        ) {
            prop_assume!(day <= days_in_month(year, month));
            let now = at(year, month, day);
            let today = now.date_naive();
            let tomorrow = today.succ_opt().unwrap();

            let due_today =
                today.day() == effective_due_day(due_day, today.year(), today.month());
            let due_tomorrow = tomorrow.day()
                == effective_due_day(due_day, tomorrow.year(), tomorrow.month());

            let is_yellow = alert_level(due_day, now) == Some(AlertLevel::Yellow);
            prop_assert_eq!(is_yellow, !due_today && due_tomorrow);
        }
    }
}
