//! A schedule: the ordered assignment of sales orders to the production line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::production::ProductionPhase;
use crate::{Policy, ProductionOrderId, SalesOrderId, ScheduleId};

/// Lifecycle status of a `Schedule` proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    Proposed,
    Approved,
    Rejected,
    Superseded,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Proposed => "Proposed",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Superseded => "Superseded",
        };
        write!(f, "{s}")
    }
}

/// One production order's position in a `Schedule`: the PO, its phases, and
/// its computed slack against the sales order's deadline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub sales_order_id: SalesOrderId,
    pub production_order_id: ProductionOrderId,
    pub phases: Vec<ProductionPhase>,
    /// `working_minutes_between(e_last, deadline)`, signed; negative = late.
    pub slack_minutes: i64,
    pub late: bool,
}

impl ScheduleEntry {
    pub fn new(
        sales_order_id: impl Into<String>,
        production_order_id: impl Into<String>,
        phases: Vec<ProductionPhase>,
        slack_minutes: i64,
    ) -> Self {
        Self {
            sales_order_id: sales_order_id.into(),
            production_order_id: production_order_id.into(),
            phases,
            slack_minutes,
            late: slack_minutes < 0,
        }
    }

    /// The PO's planned start: its first phase's planned start.
    pub fn planned_start(&self) -> Option<DateTime<Utc>> {
        self.phases.first().map(|p| p.planned_start)
    }

    /// The PO's planned end: its last phase's planned end.
    pub fn planned_end(&self) -> Option<DateTime<Utc>> {
        self.phases.last().map(|p| p.planned_end)
    }
}

/// A proposed or approved ordering of sales orders on the line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub policy: Policy,
    pub generated_at: DateTime<Utc>,
    pub status: ScheduleStatus,
    pub entries: Vec<ScheduleEntry>,
    /// Ids of sales orders flagged late by the Conflict Analyzer.
    pub conflicts: Vec<SalesOrderId>,
}

impl Schedule {
    pub fn new(id: ScheduleId, policy: Policy, generated_at: DateTime<Utc>, entries: Vec<ScheduleEntry>) -> Self {
        let conflicts = entries.iter().filter(|e| e.late).map(|e| e.sales_order_id.clone()).collect();
        Self { id, policy, generated_at, status: ScheduleStatus::Proposed, entries, conflicts }
    }

    pub fn with_status(mut self, status: ScheduleStatus) -> Self {
        self.status = status;
        self
    }

    /// A schedule is clean iff no entry is late.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Entries whose sales order is projected to miss its deadline.
    pub fn late_entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(|e| e.late)
    }

    /// The entry with the least slack (the tightest order in the schedule),
    /// if any entries are present.
    pub fn tightest_entry(&self) -> Option<&ScheduleEntry> {
        self.entries.iter().min_by_key(|e| e.slack_minutes)
    }
}
