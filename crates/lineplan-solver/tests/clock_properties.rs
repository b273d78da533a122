//! Clock-closure and round-trip invariants (5 and 6).

use chrono::{TimeZone, Utc};
use lineplan_solver::WorkingHoursClock;

#[test]
fn add_zero_minutes_equals_ceil_to_shift() {
    let clock = WorkingHoursClock::default();
    let t = Utc.with_ymd_and_hms(2026, 2, 28, 18, 0, 0).unwrap();
    assert_eq!(clock.add_working_minutes(t, 0), clock.ceil_to_shift(t));
}

#[test]
fn adding_minutes_in_two_steps_equals_adding_in_one() {
    let clock = WorkingHoursClock::default();
    let t = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
    let (a, b) = (300i64, 600i64);
    let in_one = clock.add_working_minutes(t, a + b);
    let in_two = clock.add_working_minutes(clock.add_working_minutes(t, a), b);
    assert_eq!(in_one, in_two);
}

#[test]
fn working_minutes_between_round_trips_with_add_working_minutes() {
    let clock = WorkingHoursClock::default();
    let t = clock.ceil_to_shift(Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap());
    for m in [0i64, 30, 294, 480, 1000] {
        let t_prime = clock.add_working_minutes(t, m);
        assert_eq!(clock.working_minutes_between(t, t_prime), m, "round-trip failed for m={m}");
    }
}

#[test]
fn worked_sanity_check_so_001() {
    // SO-001 = PCB-IND-100 x 2 = 294 working minutes, per the worked example:
    // starting 2026-02-28 08:00 UTC, add_working_minutes(start, 294) =
    // 2026-02-28 12:54 UTC.
    let clock = WorkingHoursClock::default();
    let start = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
    let expected = Utc.with_ymd_and_hms(2026, 2, 28, 12, 54, 0).unwrap();
    assert_eq!(clock.add_working_minutes(start, 294), expected);
}
