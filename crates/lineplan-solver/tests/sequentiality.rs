//! Sequentiality and phase-monotonicity: invariants 1 and 2.

use chrono::{TimeZone, Utc};
use lineplan_core::{BomPhase, Customer, CustomerRank, PhaseType, Product, SalesOrder, WorkingHoursClock};
use lineplan_solver::PhasePlanner;

fn product(id: &str) -> Product {
    Product::new(
        id,
        "widget",
        vec![BomPhase::new(PhaseType::Smt, 40), BomPhase::new(PhaseType::Reflow, 20), BomPhase::new(PhaseType::Test, 10)],
    )
    .unwrap()
}

fn order(id: &str, product_id: &str, deadline: chrono::DateTime<Utc>) -> SalesOrder {
    SalesOrder::new(id, product_id, 3, deadline, 1, Customer::new("Acme", CustomerRank::new(1)))
}

#[test]
fn entries_never_overlap_on_the_single_line() {
    let clock = WorkingHoursClock::default();
    let now = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
    let deadline = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
    let orders =
        vec![order("SO-001", "P-1", deadline), order("SO-002", "P-1", deadline), order("SO-003", "P-1", deadline)];
    let entries = PhasePlanner::plan(&orders, |_| Some(product("P-1")), &clock, now).unwrap();

    for pair in entries.windows(2) {
        let end_i = pair[0].planned_end().unwrap();
        let start_j = pair[1].planned_start().unwrap();
        assert!(end_i <= start_j, "entry {} ends after entry {} starts", pair[0].sales_order_id, pair[1].sales_order_id);
    }
}

#[test]
fn phases_within_an_entry_never_overlap_and_bound_the_entry_window() {
    let clock = WorkingHoursClock::default();
    let now = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
    let deadline = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
    let orders = vec![order("SO-001", "P-1", deadline)];
    let entries = PhasePlanner::plan(&orders, |_| Some(product("P-1")), &clock, now).unwrap();
    let entry = &entries[0];

    for pair in entry.phases.windows(2) {
        assert!(pair[0].planned_end <= pair[1].planned_start);
    }
    assert_eq!(entry.phases.first().unwrap().planned_start, entry.planned_start().unwrap());
    assert_eq!(entry.phases.last().unwrap().planned_end, entry.planned_end().unwrap());
}
