//! HTTP-level coverage of the factory-failure intake endpoint.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use lineplan_core::{BomPhase, Customer, CustomerRank, PhaseType, Policy, Product, SalesOrder};
use lineplan_factory::router;
use lineplan_gateway::InMemoryGateway;
use lineplan_orchestrator::{LoggingOperatorChannel, NoopNotifier, NullAdvisor, Orchestrator};

async fn spawn_server(orchestrator: Arc<Orchestrator>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(orchestrator)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn orchestrator_with_one_approved_order() -> (Arc<Orchestrator>, String) {
    let gateway = Arc::new(InMemoryGateway::new());
    gateway
        .seed_product(Product::new("PCB-IND-100", "Industrial PCB", vec![BomPhase::new(PhaseType::Smt, 60), BomPhase::new(PhaseType::Test, 87)]).unwrap())
        .await;
    let deadline = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
    gateway.seed_sales_order(SalesOrder::new("SO-001", "PCB-IND-100", 2, deadline, 1, Customer::new("Acme", CustomerRank::new(1)))).await;

    let orch = Orchestrator::new(
        Arc::clone(&gateway) as Arc<dyn lineplan_gateway::Gateway>,
        Arc::new(NullAdvisor),
        Arc::new(LoggingOperatorChannel),
        Arc::new(NoopNotifier),
        lineplan_core::WorkingHoursClock::default(),
        None,
    )
    .await
    .unwrap();

    let proposal = orch.compute_proposal(Policy::Edf, None).await.unwrap();
    let po_id = proposal.schedule.entries[0].production_order_id.clone();
    orch.approve(proposal.schedule.id).await.unwrap();
    (Arc::new(orch), po_id)
}

#[tokio::test]
async fn an_explicit_po_id_resolves_and_is_accepted() {
    let (orch, po_id) = orchestrator_with_one_approved_order().await;
    let base_url = spawn_server(orch).await;

    let form = reqwest::multipart::Form::new()
        .text("po_id", po_id)
        .text("description", "SMT feeder jammed")
        .part("image", reqwest::multipart::Part::bytes(vec![0xFFu8, 0xD8, 0xFF]).file_name("failure.jpg"));

    let resp = reqwest::Client::new().post(format!("{base_url}/factory/failure")).multipart(form).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "accepted");
}

#[tokio::test]
async fn no_po_can_resolve_when_nothing_is_approved() {
    let gateway = Arc::new(InMemoryGateway::new());
    let orch = Arc::new(
        Orchestrator::new(
            gateway as Arc<dyn lineplan_gateway::Gateway>,
            Arc::new(NullAdvisor),
            Arc::new(LoggingOperatorChannel),
            Arc::new(NoopNotifier),
            lineplan_core::WorkingHoursClock::default(),
            None,
        )
        .await
        .unwrap(),
    );
    let base_url = spawn_server(orch).await;

    let form = reqwest::multipart::Form::new().part("image", reqwest::multipart::Part::bytes(vec![1, 2, 3]).file_name("x.jpg"));
    let resp = reqwest::Client::new().post(format!("{base_url}/factory/failure")).multipart(form).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "unresolved");
}

#[tokio::test]
async fn a_missing_image_field_is_a_bad_request() {
    let (orch, _po_id) = orchestrator_with_one_approved_order().await;
    let base_url = spawn_server(orch).await;

    let form = reqwest::multipart::Form::new().text("description", "no image attached");
    let resp = reqwest::Client::new().post(format!("{base_url}/factory/failure")).multipart(form).send().await.unwrap();
    assert_eq!(resp.status(), 400);
}
