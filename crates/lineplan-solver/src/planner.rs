//! The Phase Planner: walks a sorted order sequence through its BOM and
//! assigns every phase a start and end time on the single line.

use chrono::{DateTime, Utc};
use lineplan_core::{
    PhaseId, PlanningError, Product, ProductionPhase, SalesOrder, Schedule, ScheduleEntry, ScheduleId,
    WorkingHoursClock,
};

/// Pure phase planner: consumes a pre-sorted order sequence and a start
/// cursor, and produces one `ScheduleEntry` per order. Never writes
/// anywhere and never consults wall-clock time itself.
pub struct PhasePlanner;

impl PhasePlanner {
    /// Plan `sorted_orders` starting at `start_cursor` (normally
    /// `clock.ceil_to_shift(now)`).
    ///
    /// Each production order is assigned a provisional id derived from its
    /// sales order id (`"PO-draft-<sales_order_id>"`); the real,
    /// externally-assigned id is substituted by the caller once the
    /// production order has been materialised through the Gateway —
    /// this function never writes anywhere, so it cannot know that id up
    /// front.
    pub fn plan(
        sorted_orders: &[SalesOrder],
        product_lookup: impl Fn(&str) -> Option<Product>,
        clock: &WorkingHoursClock,
        start_cursor: DateTime<Utc>,
    ) -> Result<Vec<ScheduleEntry>, PlanningError> {
        if sorted_orders.is_empty() {
            return Err(PlanningError::EmptyOrderSet);
        }

        let mut cursor = start_cursor;
        let mut entries = Vec::with_capacity(sorted_orders.len());

        for order in sorted_orders {
            let product = product_lookup(&order.product_id)
                .ok_or_else(|| PlanningError::UnknownProduct(order.product_id.clone()))?;

            let mut phases = Vec::with_capacity(product.phases().len());
            let mut phase_cursor = cursor;
            for (index, bom_phase) in product.phases().iter().enumerate() {
                let minutes = i64::from(bom_phase.duration_per_unit_minutes) * i64::from(order.quantity);
                let start = phase_cursor;
                let end = clock.add_working_minutes(start, minutes);
                let id: PhaseId = format!("{}-phase-{index}", order.id);
                phases.push(ProductionPhase::new(id, bom_phase.phase_type, index as u32, start, end));
                phase_cursor = end;
            }

            let e_last = phase_cursor;
            cursor = e_last;

            let slack_minutes = clock.working_minutes_between(e_last, order.deadline);
            let production_order_id = format!("PO-draft-{}", order.id);
            entries.push(ScheduleEntry::new(order.id.clone(), production_order_id, phases, slack_minutes));
        }

        Ok(entries)
    }
}

/// Assemble a `Schedule` snapshot from planned entries.
pub fn snapshot(
    id: ScheduleId,
    policy: lineplan_core::Policy,
    generated_at: DateTime<Utc>,
    entries: Vec<ScheduleEntry>,
) -> Schedule {
    Schedule::new(id, policy, generated_at, entries)
}
