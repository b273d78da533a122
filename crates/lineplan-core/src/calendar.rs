//! The working-hours clock: shift windows and working-minute arithmetic.

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::{add_days, at_minutes_from_midnight, minutes_from_midnight, weekday_ordinal, TimeRange};

/// A single-shift working-hours calendar.
///
/// Default shift is 08:00-16:00 (480 minutes), operating every day of the
/// week: this line runs a single continuous shift with no weekend shutdown
/// (see Non-goals — holiday/weekend calendars are out of scope).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursClock {
    shift: TimeRange,
    operating_days: [bool; 7],
}

impl Default for WorkingHoursClock {
    fn default() -> Self {
        Self { shift: TimeRange { start: 8 * 60, end: 16 * 60 }, operating_days: [true; 7] }
    }
}

impl WorkingHoursClock {
    /// A clock with a custom shift window, given as minutes-from-midnight.
    /// Operates every day of the week.
    pub fn with_shift(start_minutes: u16, end_minutes: u16) -> Self {
        assert!(start_minutes < end_minutes, "shift start must precede shift end");
        Self { shift: TimeRange { start: start_minutes, end: end_minutes }, operating_days: [true; 7] }
    }

    /// Mark `day` as non-operating (closed).
    pub fn close_on(mut self, day: Weekday) -> Self {
        self.operating_days[usize::from(weekday_ordinal(day))] = false;
        self
    }

    fn is_operating_day(&self, t: DateTime<Utc>) -> bool {
        self.operating_days[usize::from(weekday_ordinal(t.weekday()))]
    }

    fn shift_start_on(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        at_minutes_from_midnight(t, self.shift.start)
    }

    fn shift_end_on(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        at_minutes_from_midnight(t, self.shift.end)
    }

    fn next_operating_day_start(&self, mut t: DateTime<Utc>) -> DateTime<Utc> {
        loop {
            t = add_days(t, 1);
            if self.is_operating_day(t) {
                return self.shift_start_on(t);
            }
        }
    }

    /// Round `t` up to the next in-shift instant: if `t` already falls
    /// within an operating day's shift window, `t` is returned unchanged.
    /// Otherwise the result is the start of the next operating shift.
    pub fn ceil_to_shift(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        if self.is_operating_day(t) {
            let minutes = minutes_from_midnight(t);
            if minutes < self.shift.start {
                return self.shift_start_on(t);
            }
            if minutes < self.shift.end {
                return t;
            }
        }
        self.next_operating_day_start(t)
    }

    /// Add `minutes` of working time to `t`, skipping non-operating days and
    /// time outside the shift window. `minutes` must be non-negative.
    pub fn add_working_minutes(&self, t: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
        assert!(minutes >= 0, "add_working_minutes requires a non-negative duration");
        let mut cursor = self.ceil_to_shift(t);
        let mut remaining = minutes;
        loop {
            let end_of_shift = self.shift_end_on(cursor);
            let available = (end_of_shift - cursor).num_minutes();
            if remaining <= available {
                return cursor + chrono::Duration::minutes(remaining);
            }
            remaining -= available;
            cursor = self.next_operating_day_start(cursor);
        }
    }

    /// Signed count of working minutes from `a` to `b`: positive when `b` is
    /// later than `a`, negative when `b` precedes `a`, zero when equal.
    ///
    /// Both endpoints are first rounded forward to the next in-shift instant,
    /// so the result measures working time actually available between them.
    pub fn working_minutes_between(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
        match a.cmp(&b) {
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Less => self.forward_minutes(a, b),
            std::cmp::Ordering::Greater => -self.forward_minutes(b, a),
        }
    }

    fn forward_minutes(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
        let mut cursor = self.ceil_to_shift(a);
        let end = self.ceil_to_shift(b);
        let mut total = 0i64;
        loop {
            let end_of_shift = self.shift_end_on(cursor);
            if end <= end_of_shift {
                return total + (end - cursor).num_minutes().max(0);
            }
            total += (end_of_shift - cursor).num_minutes();
            cursor = self.next_operating_day_start(cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> WorkingHoursClock {
        WorkingHoursClock::default()
    }

    #[test]
    fn ceil_to_shift_within_window_is_identity() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        assert_eq!(clock().ceil_to_shift(t), t);
    }

    #[test]
    fn ceil_to_shift_before_window_rolls_to_shift_start() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        assert_eq!(clock().ceil_to_shift(t), expected);
    }

    #[test]
    fn ceil_to_shift_after_window_rolls_to_next_day() {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 18, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap();
        assert_eq!(clock().ceil_to_shift(t), expected);
    }

    #[test]
    fn add_working_minutes_spans_shift_boundary() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();
        assert_eq!(clock().add_working_minutes(start, 120), expected);
    }

    #[test]
    fn working_minutes_between_is_signed() {
        let a = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        assert_eq!(clock().working_minutes_between(a, b), 120);
        assert_eq!(clock().working_minutes_between(b, a), -120);
        assert_eq!(clock().working_minutes_between(a, a), 0);
    }

    #[test]
    fn closed_day_is_skipped() {
        let monday = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(monday.weekday(), Weekday::Mon);
        let c = WorkingHoursClock::default().close_on(Weekday::Tue);
        let friday_evening = Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap();
        let next = c.add_working_minutes(friday_evening, 120);
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap());
    }
}
