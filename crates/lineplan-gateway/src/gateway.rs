//! The `Gateway` trait: exactly the operations the core needs from the
//! external manufacturing system-of-record, so the Orchestrator
//! depends on a trait object and tests can supply an in-memory fake.

use async_trait::async_trait;

use lineplan_core::{
    PhaseId, Product, ProductId, ProductionOrderId, ProductionPhase, SalesOrder, SalesOrderId, SalesOrderStatus,
};

use crate::error::GatewayError;
use crate::types::{CreateProductionOrderRequest, SalesOrderUpdate};

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_sales_orders(&self, status: SalesOrderStatus) -> Result<Vec<SalesOrder>, GatewayError>;

    async fn get_product(&self, product_id: &ProductId) -> Result<Product, GatewayError>;

    async fn update_sales_order(&self, id: &SalesOrderId, update: SalesOrderUpdate) -> Result<(), GatewayError>;

    async fn create_production_order(
        &self,
        request: CreateProductionOrderRequest,
    ) -> Result<ProductionOrderId, GatewayError>;

    /// Instructs the system-of-record to materialise phases from the BOM;
    /// returns the resulting phase list.
    async fn schedule_production_order(&self, po_id: &ProductionOrderId) -> Result<Vec<ProductionPhase>, GatewayError>;

    async fn update_phase_window(
        &self,
        phase_id: &PhaseId,
        starts_at: chrono::DateTime<chrono::Utc>,
        ends_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), GatewayError>;

    async fn update_po_window(
        &self,
        po_id: &ProductionOrderId,
        starts_at: chrono::DateTime<chrono::Utc>,
        ends_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), GatewayError>;

    async fn confirm_production_order(&self, po_id: &ProductionOrderId) -> Result<(), GatewayError>;

    async fn delete_production_order(&self, po_id: &ProductionOrderId) -> Result<(), GatewayError>;
}
