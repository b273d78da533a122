//! Production-order resolution: given an approved
//! schedule and an optional explicit PO id, identify the PO a factory-floor
//! failure event is reporting against.

use chrono::{DateTime, Utc};
use lineplan_core::{ProductionPhaseStatus, SalesOrderId, Schedule, ScheduleEntry};

use crate::error::IntakeError;

/// The SO/PO pair a failure event was resolved against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub sales_order_id: SalesOrderId,
    pub production_order_id: String,
}

impl From<&ScheduleEntry> for ResolvedOrder {
    fn from(entry: &ScheduleEntry) -> Self {
        Self { sales_order_id: entry.sales_order_id.clone(), production_order_id: entry.production_order_id.clone() }
    }
}

fn is_in_progress(entry: &ScheduleEntry) -> bool {
    entry.phases.iter().any(|p| p.status == ProductionPhaseStatus::Started)
}

fn is_ready(entry: &ScheduleEntry) -> bool {
    !entry.phases.is_empty() && entry.phases.iter().all(|p| p.status == ProductionPhaseStatus::Ready)
}

fn window_contains(entry: &ScheduleEntry, now: DateTime<Utc>) -> bool {
    match (entry.planned_start(), entry.planned_end()) {
        (Some(start), Some(end)) => start <= now && now <= end,
        _ => false,
    }
}

/// Resolves the currently-executing production order per the fallback chain:
/// explicit id (if ready|in_progress) → the sole in_progress PO → the PO
/// whose window contains `now` → the earliest-starting ready PO.
pub fn resolve_production_order(
    schedule: &Schedule,
    explicit_po_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ResolvedOrder, IntakeError> {
    if let Some(po_id) = explicit_po_id {
        if let Some(entry) = schedule.entries.iter().find(|e| e.production_order_id == po_id) {
            if is_in_progress(entry) || is_ready(entry) {
                return Ok(entry.into());
            }
        }
    }

    let in_progress: Vec<&ScheduleEntry> = schedule.entries.iter().filter(|e| is_in_progress(e)).collect();
    if in_progress.len() == 1 {
        return Ok(in_progress[0].into());
    }

    if let Some(entry) = schedule.entries.iter().find(|e| window_contains(e, now)) {
        return Ok(entry.into());
    }

    let earliest_ready = schedule
        .entries
        .iter()
        .filter(|e| is_ready(e) && !is_in_progress(e))
        .min_by_key(|e| e.planned_start());
    if let Some(entry) = earliest_ready {
        return Ok(entry.into());
    }

    Err(IntakeError::Resolution("no currently-executing production order could be identified".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lineplan_core::{Policy, ProductionPhase};

    fn phase(id: &str, start: DateTime<Utc>, end: DateTime<Utc>, status: ProductionPhaseStatus) -> ProductionPhase {
        let mut p = ProductionPhase::new(id, lineplan_core::PhaseType::Smt, 0, start, end);
        p.status = status;
        p
    }

    fn schedule(entries: Vec<ScheduleEntry>) -> Schedule {
        Schedule::new(1, Policy::Edf, Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap(), entries)
    }

    #[test]
    fn explicit_id_wins_when_the_po_is_ready_or_in_progress() {
        let t0 = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap();
        let entry = ScheduleEntry::new("SO-1", "PO-1", vec![phase("ph-1", t0, t1, ProductionPhaseStatus::Ready)], 10);
        let s = schedule(vec![entry]);

        let resolved = resolve_production_order(&s, Some("PO-1"), t0).unwrap();
        assert_eq!(resolved.production_order_id, "PO-1");
    }

    #[test]
    fn sole_in_progress_po_wins_when_no_explicit_id_given() {
        let t0 = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let running = ScheduleEntry::new("SO-1", "PO-1", vec![phase("ph-1", t0, t1, ProductionPhaseStatus::Started)], 10);
        let queued = ScheduleEntry::new("SO-2", "PO-2", vec![phase("ph-2", t2, t3, ProductionPhaseStatus::Ready)], 10);
        let s = schedule(vec![running, queued]);

        let resolved = resolve_production_order(&s, None, t0).unwrap();
        assert_eq!(resolved.production_order_id, "PO-1");
    }

    #[test]
    fn falls_back_to_the_po_whose_window_contains_now() {
        let t0 = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 2, 28, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap();
        let entry = ScheduleEntry::new("SO-1", "PO-1", vec![phase("ph-1", t0, t1, ProductionPhaseStatus::Ready)], 10);
        let s = schedule(vec![entry]);

        let resolved = resolve_production_order(&s, None, now).unwrap();
        assert_eq!(resolved.production_order_id, "PO-1");
    }

    #[test]
    fn falls_back_to_the_earliest_starting_ready_po() {
        let t_early_start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let t_early_end = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        let t_late_start = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let t_late_end = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
        let late = ScheduleEntry::new("SO-2", "PO-2", vec![phase("ph-2", t_late_start, t_late_end, ProductionPhaseStatus::Ready)], 10);
        let early = ScheduleEntry::new("SO-1", "PO-1", vec![phase("ph-1", t_early_start, t_early_end, ProductionPhaseStatus::Ready)], 10);
        let s = schedule(vec![late, early]);

        let resolved = resolve_production_order(&s, None, now).unwrap();
        assert_eq!(resolved.production_order_id, "PO-1");
    }

    #[test]
    fn empty_schedule_is_unresolved() {
        let now = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
        let s = schedule(vec![]);
        assert!(matches!(resolve_production_order(&s, None, now), Err(IntakeError::Resolution(_))));
    }
}
