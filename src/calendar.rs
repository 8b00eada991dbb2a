//! Shop calendar: lateness, weekend and public-holiday rules.
//!
//! Everything here is pure over local wall-clock time (`NaiveDateTime`);
//! callers supply `Local::now().naive_local()`. Holidays are the fixed
//! Kenyan public holidays the shop observes, matched by (month, day)
//! regardless of year.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};

/// Grace period after scheduled start before an arrival counts as late.
pub const GRACE_MINUTES: i64 = 20;

/// Staff may not log in before this hour, on any day.
pub const LOGIN_OPENS_HOUR: u32 = 7;

/// (month, day) pairs of observed public holidays: Labour Day, Madaraka
/// Day, Mashujaa Day, Jamhuri Day.
const HOLIDAYS: [(u32, u32); 4] = [(5, 1), (6, 1), (10, 20), (12, 12)];

#[must_use]
pub fn is_weekend(at: NaiveDateTime) -> bool {
    matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}

#[must_use]
pub fn is_holiday(at: NaiveDateTime) -> bool {
    HOLIDAYS.contains(&(at.month(), at.day()))
}

/// Scheduled shift start for the calendar date of `at`: 09:00 on weekends
/// and holidays, 08:00 otherwise.
#[must_use]
pub fn scheduled_start(at: NaiveDateTime) -> NaiveDateTime {
    let hour = if is_weekend(at) || is_holiday(at) { 9 } else { 8 };
    at.date().and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default())
}

/// An arrival is late once it is past scheduled start plus the grace
/// period. The grace period is the same for every day type.
#[must_use]
pub fn is_late_arrival(at: NaiveDateTime) -> bool {
    at > scheduled_start(at) + Duration::minutes(GRACE_MINUTES)
}

/// Day category stored on a shift. Holidays fold into `Weekend`.
#[must_use]
pub fn day_type(at: NaiveDateTime) -> crate::domain::DayType {
    if is_weekend(at) || is_holiday(at) {
        crate::domain::DayType::Weekend
    } else {
        crate::domain::DayType::Weekday
    }
}

/// Whether the staff login door is open yet (07:00 on every day).
/// Admins are exempt; that exemption lives in the attendance engine.
#[must_use]
pub fn login_is_open(at: NaiveDateTime) -> bool {
    at.hour() >= LOGIN_OPENS_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayType;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn weekend_detection() {
        // 2025-03-01 is a Saturday, 2025-03-02 a Sunday, 2025-03-03 a Monday.
        assert!(is_weekend(at(2025, 3, 1, 10, 0)));
        assert!(is_weekend(at(2025, 3, 2, 10, 0)));
        assert!(!is_weekend(at(2025, 3, 3, 10, 0)));
    }

    #[test]
    fn holidays_match_in_any_year() {
        assert!(is_holiday(at(2024, 12, 12, 8, 0)));
        assert!(is_holiday(at(2031, 12, 12, 8, 0)));
        assert!(is_holiday(at(2025, 6, 1, 8, 0)));
        assert!(is_holiday(at(2025, 10, 20, 8, 0)));
        assert!(is_holiday(at(2025, 5, 1, 8, 0)));
        assert!(!is_holiday(at(2025, 12, 11, 8, 0)));
        assert!(!is_holiday(at(2025, 1, 1, 8, 0)));
    }

    #[test]
    fn scheduled_start_shifts_on_weekends_and_holidays() {
        // Weekday: 08:00.
        assert_eq!(scheduled_start(at(2025, 3, 3, 12, 0)), at(2025, 3, 3, 8, 0));
        // Saturday: 09:00.
        assert_eq!(scheduled_start(at(2025, 3, 1, 12, 0)), at(2025, 3, 1, 9, 0));
        // Jamhuri Day on a weekday still starts at 09:00.
        assert_eq!(
            scheduled_start(at(2025, 12, 12, 12, 0)),
            at(2025, 12, 12, 9, 0)
        );
    }

    #[test]
    fn grace_period_boundary() {
        // Monday, start 08:00, grace until 08:20 inclusive.
        assert!(!is_late_arrival(at(2025, 3, 3, 8, 0)));
        assert!(!is_late_arrival(at(2025, 3, 3, 8, 20)));
        assert!(is_late_arrival(at(2025, 3, 3, 8, 21)));
        // Saturday, start 09:00.
        assert!(!is_late_arrival(at(2025, 3, 1, 9, 20)));
        assert!(is_late_arrival(at(2025, 3, 1, 9, 21)));
    }

    #[test]
    fn day_type_folds_holiday_into_weekend() {
        assert_eq!(day_type(at(2025, 3, 3, 8, 0)), DayType::Weekday);
        assert_eq!(day_type(at(2025, 3, 1, 8, 0)), DayType::Weekend);
        // Madaraka Day 2026-06-01 is a Monday.
        assert_eq!(day_type(at(2026, 6, 1, 8, 0)), DayType::Weekend);
    }

    #[test]
    fn login_door_opens_at_seven() {
        assert!(!login_is_open(at(2025, 3, 3, 6, 59)));
        assert!(login_is_open(at(2025, 3, 3, 7, 0)));
        // Same rule on weekends.
        assert!(!login_is_open(at(2025, 3, 1, 6, 30)));
    }
}
