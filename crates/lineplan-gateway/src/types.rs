//! Request/response shapes for the Gateway operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lineplan_core::{ProductId, SalesOrderId, SalesOrderStatus};

/// A partial update to a `SalesOrder`; `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SalesOrderUpdate {
    pub priority: Option<i32>,
    pub quantity: Option<u32>,
    pub notes: Option<String>,
    pub status: Option<SalesOrderStatus>,
}

impl SalesOrderUpdate {
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: SalesOrderStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Parameters to create a draft `ProductionOrder`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateProductionOrderRequest {
    pub sales_order_id: SalesOrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}
