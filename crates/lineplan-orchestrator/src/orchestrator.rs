//! The `Orchestrator` aggregate: owns the proposed/approved schedule slots
//! and the SO↔PO tracking map, and drives the compute/approve/reject/
//! revise/cancel/restart pipeline.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use lineplan_core::{
    Policy, ProductId, ProductionOrderId, SalesOrder, SalesOrderId, SalesOrderStatus, Schedule, ScheduleId,
    WorkingHoursClock,
};
use lineplan_gateway::types::{CreateProductionOrderRequest, SalesOrderUpdate};
use lineplan_gateway::Gateway;
use lineplan_render::{render_text_summary, SvgGanttRenderer};
use lineplan_solver::{analyze, sort_orders, PhasePlanner};

use crate::advisor::{AiAdvice, AiAdviceRequest, AiAdvisor};
use crate::channel::{ArtifactBundle, FactoryFailureNotice, OperatorChannel};
use crate::error::OrchestratorError;
use crate::notifier::EmailNotifier;
use crate::persistence::PersistedState;
use crate::proposal::Proposal;

struct State {
    proposed: Option<Proposal>,
    approved: Option<Schedule>,
    tracking: HashMap<SalesOrderId, ProductionOrderId>,
    next_schedule_id: ScheduleId,
    last_policy: Policy,
}

/// Owns schedule lifecycle for one production line. All mutation goes
/// through its methods; no long-lived I/O is performed while the internal
/// mutex is held.
pub struct Orchestrator {
    gateway: Arc<dyn Gateway>,
    advisor: Arc<dyn AiAdvisor>,
    channel: Arc<dyn OperatorChannel>,
    notifier: Arc<dyn EmailNotifier>,
    clock: WorkingHoursClock,
    state_path: Option<PathBuf>,
    state: Mutex<State>,
}

impl Orchestrator {
    pub async fn new(
        gateway: Arc<dyn Gateway>,
        advisor: Arc<dyn AiAdvisor>,
        channel: Arc<dyn OperatorChannel>,
        notifier: Arc<dyn EmailNotifier>,
        clock: WorkingHoursClock,
        state_path: Option<PathBuf>,
    ) -> Result<Self, OrchestratorError> {
        let persisted = match &state_path {
            Some(path) => PersistedState::load(path).await?,
            None => PersistedState { next_schedule_id: 1, ..Default::default() },
        };
        Ok(Self {
            gateway,
            advisor,
            channel,
            notifier,
            clock,
            state_path,
            state: Mutex::new(State {
                proposed: None,
                approved: persisted.approved,
                tracking: persisted.tracking,
                next_schedule_id: persisted.next_schedule_id,
                last_policy: Policy::default(),
            }),
        })
    }

    async fn persist(&self, state: &State) -> Result<(), OrchestratorError> {
        let Some(path) = &self.state_path else { return Ok(()) };
        let snapshot = PersistedState {
            tracking: state.tracking.clone(),
            approved: state.approved.clone(),
            next_schedule_id: state.next_schedule_id,
        };
        snapshot.save(path).await
    }

    /// The current approved schedule, if any.
    pub async fn approved_schedule(&self) -> Option<Schedule> {
        self.state.lock().await.approved.clone()
    }

    /// The currently outstanding proposal, if any.
    pub async fn proposed_schedule(&self) -> Option<Schedule> {
        self.state.lock().await.proposed.as_ref().map(|p| p.schedule.clone())
    }

    /// Compute a fresh proposal. Rejects any outstanding proposal first
    /// (at most one in flight). `ordering_override`, when
    /// present, is an AI-hinted SO-id ordering (used by `revise`); orders
    /// it omits are appended, sorted by `policy`.
    pub async fn compute_proposal(
        &self,
        policy: Policy,
        ordering_override: Option<Vec<SalesOrderId>>,
    ) -> Result<Proposal, OrchestratorError> {
        if let Some(outstanding) = self.state.lock().await.proposed.take() {
            self.reject_internal(outstanding).await?;
        }

        let orders = self.gateway.list_sales_orders(SalesOrderStatus::Accepted).await?;
        let product_cache = self.fetch_products(&orders).await?;
        let product_lookup = |product_id: &str| product_cache.get(product_id).cloned();

        let ordered = match ordering_override {
            Some(ids) => reorder_by_ids(&orders, &ids, &product_cache, policy),
            None => sort_orders(&orders, |id| product_cache.get(id), policy, Utc::now()),
        };

        let clock = self.clock.clone();
        let start_cursor = clock.ceil_to_shift(Utc::now());
        let planned = PhasePlanner::plan(&ordered, product_lookup, &clock, start_cursor)?;

        match self.materialise(&ordered, planned, policy).await {
            Ok(proposal) => {
                let mut state = self.state.lock().await;
                state.last_policy = policy;
                state.proposed = Some(proposal.clone());
                self.persist(&state).await?;
                drop(state);
                if let Err(e) = self.channel.push_schedule(&proposal.schedule, &proposal.artifact).await {
                    warn!(error = %e, "failed to push proposal to operator channel");
                }
                Ok(proposal)
            }
            Err(e) => {
                let _ = self
                    .notifier
                    .notify_failure("proposal computation failed", &e.to_string())
                    .await;
                Err(e)
            }
        }
    }

    async fn fetch_products(
        &self,
        orders: &[SalesOrder],
    ) -> Result<HashMap<ProductId, lineplan_core::Product>, OrchestratorError> {
        let mut cache = HashMap::new();
        for order in orders {
            if cache.contains_key(&order.product_id) {
                continue;
            }
            let product = self.gateway.get_product(&order.product_id).await?;
            cache.insert(order.product_id.clone(), product);
        }
        Ok(cache)
    }

    /// Creates POs in the Gateway, pushes planned windows, and assembles
    /// the final `Schedule`. On any failure, best-effort deletes every PO
    /// created this run.
    async fn materialise(
        &self,
        ordered: &[SalesOrder],
        planned: Vec<lineplan_core::ScheduleEntry>,
        policy: Policy,
    ) -> Result<Proposal, OrchestratorError> {
        let mut created_po_ids = Vec::new();
        let mut final_entries = Vec::with_capacity(planned.len());

        for (order, entry) in ordered.iter().zip(planned.into_iter()) {
            let result = self.materialise_one(order, &entry).await;
            match result {
                Ok((po_id, phases)) => {
                    created_po_ids.push(po_id.clone());
                    final_entries.push(lineplan_core::ScheduleEntry::new(
                        order.id.clone(),
                        po_id,
                        phases,
                        entry.slack_minutes,
                    ));
                }
                Err(e) => {
                    self.cleanup(&created_po_ids).await;
                    return Err(e);
                }
            }
        }

        let id = {
            let mut state = self.state.lock().await;
            let id = state.next_schedule_id;
            state.next_schedule_id += 1;
            id
        };

        let schedule = lineplan_core::Schedule::new(id, policy, Utc::now(), final_entries);
        let report = analyze(&schedule.entries);
        info!(
            schedule_id = id,
            late = report.late_order_ids.len(),
            on_time = report.on_time_count,
            "computed schedule proposal"
        );

        let summary = render_text_summary(&schedule);
        let gantt_svg = match SvgGanttRenderer::default().render(&schedule) {
            Ok(svg) => svg.into_bytes(),
            Err(e) => {
                warn!(error = %e, "failed to render gantt chart; shipping proposal without one");
                Vec::new()
            }
        };

        Ok(Proposal { schedule, artifact: ArtifactBundle { summary, gantt_svg } })
    }

    async fn materialise_one(
        &self,
        order: &SalesOrder,
        entry: &lineplan_core::ScheduleEntry,
    ) -> Result<(ProductionOrderId, Vec<lineplan_core::ProductionPhase>), OrchestratorError> {
        let starts_at = entry.planned_start().unwrap_or_else(Utc::now);
        let ends_at = entry.planned_end().unwrap_or_else(Utc::now);

        let po_id = self
            .gateway
            .create_production_order(CreateProductionOrderRequest {
                sales_order_id: order.id.clone(),
                product_id: order.product_id.clone(),
                quantity: order.quantity,
                starts_at,
                ends_at,
            })
            .await?;

        let materialised = self.gateway.schedule_production_order(&po_id).await?;

        let mut phases = Vec::with_capacity(materialised.len());
        for (mut gateway_phase, planned_phase) in materialised.into_iter().zip(entry.phases.iter()) {
            self.gateway
                .update_phase_window(&gateway_phase.id, planned_phase.planned_start, planned_phase.planned_end)
                .await?;
            gateway_phase.planned_start = planned_phase.planned_start;
            gateway_phase.planned_end = planned_phase.planned_end;
            gateway_phase.status = lineplan_core::ProductionPhaseStatus::Ready;
            phases.push(gateway_phase);
        }
        self.gateway.update_po_window(&po_id, starts_at, ends_at).await?;

        {
            let mut state = self.state.lock().await;
            state.tracking.insert(order.id.clone(), po_id.clone());
        }

        Ok((po_id, phases))
    }

    async fn cleanup(&self, po_ids: &[ProductionOrderId]) {
        for po_id in po_ids {
            if let Err(e) = self.gateway.delete_production_order(po_id).await {
                error!(po_id = %po_id, error = %e, "failed to clean up partially-created production order");
            }
        }
    }

    async fn reject_internal(&self, proposal: Proposal) -> Result<(), OrchestratorError> {
        self.cleanup(&proposal.schedule.entries.iter().map(|e| e.production_order_id.clone()).collect::<Vec<_>>())
            .await;
        Ok(())
    }

    /// Transitions every PO in the proposal to `ready`. Idempotent: calling
    /// twice with the same id after the first succeeds is a no-op.
    pub async fn approve(&self, proposal_id: ScheduleId) -> Result<Schedule, OrchestratorError> {
        let entries = {
            let state = self.state.lock().await;
            match &state.proposed {
                Some(p) if p.id() == proposal_id => p.schedule.entries.clone(),
                _ => {
                    if let Some(approved) = &state.approved {
                        if approved.id == proposal_id {
                            return Ok(approved.clone());
                        }
                    }
                    return Err(OrchestratorError::NoProposal);
                }
            }
        };

        for entry in &entries {
            self.gateway.confirm_production_order(&entry.production_order_id).await?;
        }

        let mut state = self.state.lock().await;
        let proposal = state.proposed.take().ok_or(OrchestratorError::NoProposal)?;
        let approved = proposal.schedule.with_status(lineplan_core::ScheduleStatus::Approved);
        state.approved = Some(approved.clone());
        self.persist(&state).await?;
        Ok(approved)
    }

    /// Deletes every PO created by the outstanding proposal. No partial
    /// state remains.
    pub async fn reject(&self, proposal_id: ScheduleId) -> Result<(), OrchestratorError> {
        let proposal = {
            let mut state = self.state.lock().await;
            match &state.proposed {
                Some(p) if p.id() == proposal_id => state.proposed.take(),
                _ => return Err(OrchestratorError::NoProposal),
            }
        };
        if let Some(proposal) = proposal {
            self.reject_internal(proposal).await?;
        }
        let state = self.state.lock().await;
        self.persist(&state).await
    }

    /// Discards the current proposal, consults the AI Advisor with the
    /// operator's free text, applies any priority updates, and recomputes
    /// with the AI-hinted ordering (falling back to pure EDF on AI failure).
    pub async fn revise(&self, proposal_id: ScheduleId, operator_text: String) -> Result<Proposal, OrchestratorError> {
        let (policy, outgoing) = {
            let mut state = self.state.lock().await;
            match &state.proposed {
                Some(p) if p.id() == proposal_id => (state.last_policy, state.proposed.take()),
                _ => return Err(OrchestratorError::NoProposal),
            }
        };
        if let Some(proposal) = outgoing {
            self.reject_internal(proposal).await?;
        }

        let orders = self.gateway.list_sales_orders(SalesOrderStatus::Accepted).await?;
        let product_cache = self.fetch_products(&orders).await?;
        let edf_baseline: Vec<SalesOrderId> =
            sort_orders(&orders, |id| product_cache.get(id), Policy::Edf, Utc::now())
                .into_iter()
                .map(|o| o.id)
                .collect();

        let request = AiAdviceRequest {
            operator_text: Some(operator_text),
            current_schedule: self.approved_schedule().await,
            pending_orders: orders,
            edf_baseline: edf_baseline.clone(),
        };

        let advice: AiAdvice = match self.advisor.advise(request).await {
            Ok(advice) => advice,
            Err(e) => {
                warn!(error = %e.0, "AI advisor failed during revise; falling back to pure EDF");
                AiAdvice { ordering: edf_baseline, priority_updates: Vec::new(), explanation: format!("AI fallback: {}", e.0) }
            }
        };

        for update in &advice.priority_updates {
            self.gateway
                .update_sales_order(&update.sales_order_id, SalesOrderUpdate::default().priority(update.priority))
                .await?;
        }

        self.compute_proposal(policy, Some(advice.ordering)).await
    }

    /// Marks the SO cancelled (removed from future schedules) and
    /// recomputes a fresh proposal from the remaining accepted SOs.
    pub async fn cancel_order(&self, sales_order_id: &SalesOrderId, _production_order_id: &ProductionOrderId) -> Result<Proposal, OrchestratorError> {
        self.gateway
            .update_sales_order(sales_order_id, SalesOrderUpdate::default().status(SalesOrderStatus::Cancelled))
            .await?;
        let policy = self.state.lock().await.last_policy;
        self.compute_proposal(policy, None).await
    }

    /// Leaves the SO intact, hard-deletes the failed PO, and recomputes a
    /// fresh proposal that will give the SO a new PO.
    pub async fn restart_order(&self, _sales_order_id: &SalesOrderId, production_order_id: &ProductionOrderId) -> Result<Proposal, OrchestratorError> {
        self.gateway.delete_production_order(production_order_id).await?;
        let policy = self.state.lock().await.last_policy;
        self.compute_proposal(policy, None).await
    }

    /// Forwards a factory-floor failure notice to the operator channel.
    pub async fn notify_factory_failure(&self, notice: FactoryFailureNotice) -> Result<(), OrchestratorError> {
        self.channel.push_failure_notice(&notice).await.map_err(|e| OrchestratorError::Validation(e.0))
    }
}

/// Reorders `orders` to follow `ids` (an AI-hinted SO-id permutation),
/// appending any order the hint omits, sorted by `policy`.
fn reorder_by_ids(
    orders: &[SalesOrder],
    ids: &[SalesOrderId],
    product_cache: &HashMap<ProductId, lineplan_core::Product>,
    policy: Policy,
) -> Vec<SalesOrder> {
    let mut by_id: HashMap<&SalesOrderId, &SalesOrder> = orders.iter().map(|o| (&o.id, o)).collect();
    let mut ordered = Vec::with_capacity(orders.len());
    for id in ids {
        if let Some(order) = by_id.remove(id) {
            ordered.push(order.clone());
        }
    }
    let remaining: Vec<SalesOrder> = by_id.into_values().cloned().collect();
    let remaining_sorted = sort_orders(&remaining, |id| product_cache.get(id), policy, Utc::now());
    ordered.extend(remaining_sorted);
    ordered
}
