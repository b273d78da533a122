//! The Conflict Analyzer: per-order slack, lateness, and deadline-violation
//! flags, rolled up across a schedule.

use lineplan_core::{SalesOrderId, ScheduleEntry};

/// Aggregate conflict/slack statistics for a set of planned entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictReport {
    pub late_order_ids: Vec<SalesOrderId>,
    /// Minimum (tightest/most negative) slack across all entries; `None` if
    /// there are no entries.
    pub worst_slack_minutes: Option<i64>,
    /// Truncating average slack across all entries; `None` if there are no
    /// entries.
    pub average_slack_minutes: Option<i64>,
    pub on_time_count: usize,
}

impl ConflictReport {
    /// A schedule is clean iff no entry is late.
    pub fn is_clean(&self) -> bool {
        self.late_order_ids.is_empty()
    }
}

/// Analyze `entries` (already carrying `slack_minutes`/`late` from the
/// Phase Planner) and roll up the aggregates the Orchestrator snapshots
/// alongside each schedule.
pub fn analyze(entries: &[ScheduleEntry]) -> ConflictReport {
    let late_order_ids: Vec<SalesOrderId> =
        entries.iter().filter(|e| e.late).map(|e| e.sales_order_id.clone()).collect();

    let worst_slack_minutes = entries.iter().map(|e| e.slack_minutes).min();
    let average_slack_minutes = if entries.is_empty() {
        None
    } else {
        let sum: i64 = entries.iter().map(|e| e.slack_minutes).sum();
        Some(sum / entries.len() as i64)
    };
    let on_time_count = entries.iter().filter(|e| !e.late).count();

    ConflictReport { late_order_ids, worst_slack_minutes, average_slack_minutes, on_time_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lineplan_core::{PhaseType, ProductionPhase};

    fn entry(so_id: &str, slack: i64) -> ScheduleEntry {
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let phases = vec![ProductionPhase::new("ph-1", PhaseType::Smt, 0, t, t)];
        ScheduleEntry::new(so_id, "PO-1", phases, slack)
    }

    #[test]
    fn empty_schedule_has_no_slack_stats() {
        let report = analyze(&[]);
        assert!(report.worst_slack_minutes.is_none());
        assert!(report.average_slack_minutes.is_none());
        assert!(report.is_clean());
    }

    #[test]
    fn late_orders_are_flagged_and_rolled_up() {
        let entries = vec![entry("SO-1", 30), entry("SO-2", -10), entry("SO-3", -40)];
        let report = analyze(&entries);
        assert_eq!(report.late_order_ids, vec!["SO-2".to_string(), "SO-3".to_string()]);
        assert_eq!(report.worst_slack_minutes, Some(-40));
        assert_eq!(report.on_time_count, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn average_slack_is_computed_across_all_entries() {
        let entries = vec![entry("SO-1", 10), entry("SO-2", -10)];
        let report = analyze(&entries);
        assert_eq!(report.average_slack_minutes, Some(0));
    }
}
