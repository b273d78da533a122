//! `InMemoryGateway`: a `Gateway` test double backed by a `tokio::sync::Mutex`,
//! used by orchestrator and CLI tests in place of a live manufacturing API.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use lineplan_core::{
    PhaseId, Product, ProductId, ProductionOrderId, ProductionPhase, SalesOrder, SalesOrderId, SalesOrderStatus,
};

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::types::{CreateProductionOrderRequest, SalesOrderUpdate};

#[derive(Default)]
struct State {
    sales_orders: HashMap<SalesOrderId, SalesOrder>,
    products: HashMap<ProductId, Product>,
    production_orders: HashMap<ProductionOrderId, ProductionOrderRecord>,
    next_po_seq: u64,
}

#[derive(Clone)]
struct ProductionOrderRecord {
    sales_order_id: SalesOrderId,
    phases: Vec<ProductionPhase>,
    confirmed: bool,
}

/// An in-memory stand-in for the real manufacturing API. Never errors on
/// its own account; seed it via `seed_sales_order`/`seed_product` and it
/// behaves like a well-functioning backend.
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()) }
    }

    pub async fn seed_sales_order(&self, order: SalesOrder) {
        let mut state = self.state.lock().await;
        state.sales_orders.insert(order.id.clone(), order);
    }

    pub async fn seed_product(&self, product: Product) {
        let mut state = self.state.lock().await;
        state.products.insert(product.id.clone(), product);
    }

    pub async fn production_order_phases(&self, po_id: &ProductionOrderId) -> Option<Vec<ProductionPhase>> {
        let state = self.state.lock().await;
        state.production_orders.get(po_id).map(|r| r.phases.clone())
    }

    pub async fn is_confirmed(&self, po_id: &ProductionOrderId) -> bool {
        let state = self.state.lock().await;
        state.production_orders.get(po_id).map(|r| r.confirmed).unwrap_or(false)
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn list_sales_orders(&self, status: SalesOrderStatus) -> Result<Vec<SalesOrder>, GatewayError> {
        let state = self.state.lock().await;
        Ok(state.sales_orders.values().filter(|o| o.status == status).cloned().collect())
    }

    async fn get_product(&self, product_id: &ProductId) -> Result<Product, GatewayError> {
        let state = self.state.lock().await;
        state
            .products
            .get(product_id)
            .cloned()
            .ok_or_else(|| GatewayError::Permanent(format!("unknown product {product_id}")))
    }

    async fn update_sales_order(&self, id: &SalesOrderId, update: SalesOrderUpdate) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        let order = state
            .sales_orders
            .get_mut(id)
            .ok_or_else(|| GatewayError::Permanent(format!("unknown sales order {id}")))?;
        if let Some(priority) = update.priority {
            order.priority = priority;
        }
        if let Some(quantity) = update.quantity {
            order.quantity = quantity;
        }
        if let Some(status) = update.status {
            order.status = status;
        }
        Ok(())
    }

    async fn create_production_order(
        &self,
        request: CreateProductionOrderRequest,
    ) -> Result<ProductionOrderId, GatewayError> {
        let mut state = self.state.lock().await;
        state.next_po_seq += 1;
        let po_id = format!("PO-{:06}", state.next_po_seq);
        state.production_orders.insert(
            po_id.clone(),
            ProductionOrderRecord { sales_order_id: request.sales_order_id, phases: Vec::new(), confirmed: false },
        );
        Ok(po_id)
    }

    async fn schedule_production_order(&self, po_id: &ProductionOrderId) -> Result<Vec<ProductionPhase>, GatewayError> {
        let mut state = self.state.lock().await;
        let record = state
            .production_orders
            .get_mut(po_id)
            .ok_or_else(|| GatewayError::Permanent(format!("unknown production order {po_id}")))?;
        let sales_order_id = record.sales_order_id.clone();
        let order = state
            .sales_orders
            .get(&sales_order_id)
            .ok_or_else(|| GatewayError::Permanent(format!("unknown sales order {sales_order_id}")))?;
        let product = state
            .products
            .get(&order.product_id)
            .ok_or_else(|| GatewayError::Permanent(format!("unknown product {}", order.product_id)))?;
        let phases: Vec<ProductionPhase> = product
            .phases()
            .iter()
            .enumerate()
            .map(|(index, bom_phase)| {
                ProductionPhase::new(
                    format!("{po_id}-phase-{index}"),
                    bom_phase.phase_type,
                    index as u32,
                    Utc::now(),
                    Utc::now(),
                )
            })
            .collect();
        state.production_orders.get_mut(po_id).expect("checked above").phases = phases.clone();
        Ok(phases)
    }

    async fn update_phase_window(
        &self,
        phase_id: &PhaseId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        for record in state.production_orders.values_mut() {
            if let Some(phase) = record.phases.iter_mut().find(|p| &p.id == phase_id) {
                phase.planned_start = starts_at;
                phase.planned_end = ends_at;
                return Ok(());
            }
        }
        Err(GatewayError::Permanent(format!("unknown phase {phase_id}")))
    }

    async fn update_po_window(
        &self,
        po_id: &ProductionOrderId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        let record = state
            .production_orders
            .get_mut(po_id)
            .ok_or_else(|| GatewayError::Permanent(format!("unknown production order {po_id}")))?;
        if !record.phases.is_empty() {
            let total = (ends_at - starts_at).num_minutes().max(1);
            let count = record.phases.len() as i64;
            for (index, phase) in record.phases.iter_mut().enumerate() {
                let offset = total * index as i64 / count;
                phase.planned_start = starts_at + chrono::Duration::minutes(offset);
                phase.planned_end = phase.planned_start;
            }
        }
        Ok(())
    }

    async fn confirm_production_order(&self, po_id: &ProductionOrderId) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        let record = state
            .production_orders
            .get_mut(po_id)
            .ok_or_else(|| GatewayError::Permanent(format!("unknown production order {po_id}")))?;
        record.confirmed = true;
        Ok(())
    }

    async fn delete_production_order(&self, po_id: &ProductionOrderId) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state
            .production_orders
            .remove(po_id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::Permanent(format!("unknown production order {po_id}")))
    }
}
