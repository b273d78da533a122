//! Production orders and phases: the materialised execution of a sales order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::sales_order::PhaseType;
use crate::{PhaseId, ProductId, ProductionOrderId, SalesOrderId};

/// Lifecycle status of a `ProductionOrder`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionOrderStatus {
    #[default]
    Draft,
    Scheduled,
    Ready,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for ProductionOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Ready => "Ready",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of a `ProductionPhase`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionPhaseStatus {
    #[default]
    NotReady,
    Ready,
    Started,
    Completed,
}

/// One phase of a production order's execution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductionPhase {
    pub id: PhaseId,
    pub phase_type: PhaseType,
    pub sequence_index: u32,
    pub planned_start: DateTime<Utc>,
    pub planned_end: DateTime<Utc>,
    pub status: ProductionPhaseStatus,
}

impl ProductionPhase {
    pub fn new(
        id: impl Into<String>,
        phase_type: PhaseType,
        sequence_index: u32,
        planned_start: DateTime<Utc>,
        planned_end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            phase_type,
            sequence_index,
            planned_start,
            planned_end,
            status: ProductionPhaseStatus::NotReady,
        }
    }
}

/// A materialised execution of one `SalesOrder` on the single production line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: ProductionOrderId,
    pub sales_order_id: SalesOrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub planned_start: DateTime<Utc>,
    pub planned_end: DateTime<Utc>,
    pub status: ProductionOrderStatus,
    pub phases: Vec<ProductionPhase>,
}

impl ProductionOrder {
    /// Construct a PO from its phase chain.
    ///
    /// `planned_start`/`planned_end` are derived from the phase chain per the
    /// invariant that a PO's window equals its first phase's start and its
    /// last phase's end.
    pub fn new(
        id: impl Into<String>,
        sales_order_id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: u32,
        phases: Vec<ProductionPhase>,
    ) -> Self {
        let planned_start = phases.first().map_or_else(Utc::now, |p| p.planned_start);
        let planned_end = phases.last().map_or_else(Utc::now, |p| p.planned_end);
        Self {
            id: id.into(),
            sales_order_id: sales_order_id.into(),
            product_id: product_id.into(),
            quantity,
            planned_start,
            planned_end,
            status: ProductionOrderStatus::Draft,
            phases,
        }
    }

    pub fn with_status(mut self, status: ProductionOrderStatus) -> Self {
        self.status = status;
        self
    }
}
