//! Proposal lifecycle invariants: uniqueness, idempotent approval, and
//! cleanup on rejection.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use lineplan_core::{BomPhase, Customer, CustomerRank, PhaseType, Policy, Product, SalesOrder};
use lineplan_gateway::InMemoryGateway;
use lineplan_orchestrator::{LoggingOperatorChannel, NoopNotifier, NullAdvisor, Orchestrator};

fn product() -> Product {
    Product::new("P-1", "Widget", vec![BomPhase::new(PhaseType::Smt, 30), BomPhase::new(PhaseType::Test, 20)]).unwrap()
}

fn order(id: &str, deadline: chrono::DateTime<Utc>) -> SalesOrder {
    SalesOrder::new(id, "P-1", 2, deadline, 1, Customer::new("Acme", CustomerRank::new(1)))
}

async fn setup(orders: Vec<SalesOrder>) -> (Arc<InMemoryGateway>, Orchestrator) {
    let gateway = Arc::new(InMemoryGateway::new());
    gateway.seed_product(product()).await;
    for o in orders {
        gateway.seed_sales_order(o).await;
    }
    let orch = Orchestrator::new(
        Arc::clone(&gateway),
        Arc::new(NullAdvisor),
        Arc::new(LoggingOperatorChannel),
        Arc::new(NoopNotifier),
        lineplan_core::WorkingHoursClock::default(),
        None,
    )
    .await
    .unwrap();
    (gateway, orch)
}

#[tokio::test]
async fn only_one_proposal_is_outstanding_at_a_time() {
    let today = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
    let (_gateway, orch) = setup(vec![order("SO-1", today + chrono::Duration::days(5))]).await;

    let first = orch.compute_proposal(Policy::Edf, None).await.unwrap();
    let second = orch.compute_proposal(Policy::Edf, None).await.unwrap();

    assert!(orch.proposed_schedule().await.is_some());
    assert_ne!(first.schedule.id, second.schedule.id);
}

#[tokio::test]
async fn approve_is_idempotent() {
    let today = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
    let (_gateway, orch) = setup(vec![order("SO-1", today + chrono::Duration::days(5))]).await;

    let proposal = orch.compute_proposal(Policy::Edf, None).await.unwrap();
    let approved_once = orch.approve(proposal.schedule.id).await.unwrap();
    let approved_twice = orch.approve(proposal.schedule.id).await.unwrap();

    assert_eq!(approved_once.id, approved_twice.id);
    assert_eq!(approved_twice.status, lineplan_core::ScheduleStatus::Approved);
}

#[tokio::test]
async fn reject_leaves_no_production_orders_behind() {
    let today = Utc.with_ymd_and_hms(2026, 2, 28, 8, 0, 0).unwrap();
    let (gateway, orch) = setup(vec![order("SO-1", today + chrono::Duration::days(5))]).await;

    let proposal = orch.compute_proposal(Policy::Edf, None).await.unwrap();
    let po_id = proposal.schedule.entries[0].production_order_id.clone();

    orch.reject(proposal.schedule.id).await.unwrap();

    assert!(gateway.production_order_phases(&po_id).await.is_none());
    assert!(orch.proposed_schedule().await.is_none());
}
