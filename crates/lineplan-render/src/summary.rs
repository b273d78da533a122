//! Plain-text schedule summaries, delivered to the operator channel
//! alongside the rendered Gantt image.

use std::fmt::Write as _;

use lineplan_core::Schedule;

/// Render `schedule` as a human-readable text summary: one line per entry,
/// plus a closing conflict tally.
pub fn render_text_summary(schedule: &Schedule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Schedule #{} ({}) — {}", schedule.id, schedule.policy, schedule.status);
    let _ = writeln!(out, "generated at {}", schedule.generated_at.to_rfc3339());
    let _ = writeln!(out);

    for entry in &schedule.entries {
        let start = entry.planned_start().map(|t| t.to_rfc3339()).unwrap_or_else(|| "?".into());
        let end = entry.planned_end().map(|t| t.to_rfc3339()).unwrap_or_else(|| "?".into());
        let flag = if entry.late { "LATE" } else { "on-time" };
        let _ = writeln!(
            out,
            "{:<10} {:<12} {start} -> {end}  slack={:>6}min  [{flag}]",
            entry.sales_order_id, entry.production_order_id, entry.slack_minutes
        );
    }

    let _ = writeln!(out);
    if schedule.is_clean() {
        let _ = writeln!(out, "clean: no deadline conflicts");
    } else {
        let _ = writeln!(out, "conflicts ({}): {}", schedule.conflicts.len(), schedule.conflicts.join(", "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lineplan_core::{PhaseType, Policy, ProductionPhase, ScheduleEntry};

    #[test]
    fn summary_lists_every_entry_and_flags_lateness() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let phases = vec![ProductionPhase::new("ph-1", PhaseType::Smt, 0, t0, t0)];
        let entries = vec![
            ScheduleEntry::new("SO-1", "PO-1", phases.clone(), 60),
            ScheduleEntry::new("SO-2", "PO-2", phases, -30),
        ];
        let schedule = Schedule::new(1, Policy::Edf, t0, entries);
        let summary = render_text_summary(&schedule);
        assert!(summary.contains("SO-1"));
        assert!(summary.contains("SO-2"));
        assert!(summary.contains("LATE"));
        assert!(summary.contains("conflicts (1): SO-2"));
    }

    #[test]
    fn clean_schedule_reports_no_conflicts() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let phases = vec![ProductionPhase::new("ph-1", PhaseType::Smt, 0, t0, t0)];
        let entries = vec![ScheduleEntry::new("SO-1", "PO-1", phases, 60)];
        let schedule = Schedule::new(1, Policy::Edf, t0, entries);
        assert!(render_text_summary(&schedule).contains("clean: no deadline conflicts"));
    }
}
