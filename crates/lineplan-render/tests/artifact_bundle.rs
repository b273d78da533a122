//! Integration tests for the rendered artifact bundle: text summary + SVG
//! Gantt chart over a multi-entry schedule.

use chrono::{TimeZone, Utc};
use lineplan_core::{PhaseType, Policy, ProductionPhase, Schedule, ScheduleEntry};
use lineplan_render::{render_text_summary, SvgGanttRenderer};

fn multi_entry_schedule() -> Schedule {
    let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 3, 3, 10, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2026, 3, 5, 16, 0, 0).unwrap();

    let phases_a = vec![ProductionPhase::new("a-1", PhaseType::Smt, 0, t0, t1)];
    let phases_b = vec![ProductionPhase::new("b-1", PhaseType::Smt, 0, t1, t2)];

    let entries = vec![
        ScheduleEntry::new("SO-001", "PO-001", phases_a, 120),
        ScheduleEntry::new("SO-002", "PO-002", phases_b, -90),
    ];
    Schedule::new(1, Policy::Edf, t0, entries)
}

#[test]
fn text_summary_and_svg_gantt_agree_on_entry_set() {
    let schedule = multi_entry_schedule();

    let summary = render_text_summary(&schedule);
    assert!(summary.contains("SO-001"));
    assert!(summary.contains("SO-002"));
    assert!(summary.contains("LATE"));
    assert!(summary.contains("conflicts (1): SO-002"));

    let svg = SvgGanttRenderer::new().render(&schedule).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("PO-001"));
    assert!(svg.contains("PO-002"));
}

#[test]
fn svg_gantt_spans_the_full_schedule_window() {
    let schedule = multi_entry_schedule();
    let svg = SvgGanttRenderer::new().chart_width(1000).render(&schedule).unwrap();
    assert!(svg.contains("Schedule #1 (EDF)"));
}
