//! Sales orders, customers and the product BOM.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PlanningError, ProductId, SalesOrderId};

/// A customer's rank, used by the CUSTOMER policy's tie-break table.
///
/// Lower ranks are scheduled first. An unknown customer sorts as if its
/// rank were 99 (see `Customer::rank_or_default`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerRank(pub u32);

impl CustomerRank {
    pub const UNKNOWN: CustomerRank = CustomerRank(99);

    pub const fn new(rank: u32) -> Self {
        Self(rank)
    }
}

/// A customer on a sales order: name plus a rank used by the CUSTOMER policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub rank: CustomerRank,
}

impl Customer {
    pub fn new(name: impl Into<String>, rank: CustomerRank) -> Self {
        Self { name: name.into(), rank }
    }

    /// Rank to use for sorting; unknown customers sort last (99).
    pub fn rank_or_default(&self) -> CustomerRank {
        self.rank
    }
}

/// Lifecycle status of a `SalesOrder`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderStatus {
    #[default]
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for SalesOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "Accepted"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A customer commitment: product, quantity, deadline and priority.
///
/// Immutable to the core except `priority` (may be bumped on re-plan) and
/// `status`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: SalesOrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub deadline: DateTime<Utc>,
    pub priority: i32,
    pub customer: Customer,
    pub notes: String,
    pub status: SalesOrderStatus,
}

impl SalesOrder {
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        quantity: u32,
        deadline: DateTime<Utc>,
        priority: i32,
        customer: Customer,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            quantity,
            deadline,
            priority,
            customer,
            notes: String::new(),
            status: SalesOrderStatus::Accepted,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_status(mut self, status: SalesOrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// The closed set of manufacturing phase types a BOM may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseType {
    Smt,
    Reflow,
    Tht,
    Aoi,
    Test,
    Coating,
    Pack,
}

impl std::fmt::Display for PhaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Smt => "SMT",
            Self::Reflow => "Reflow",
            Self::Tht => "THT",
            Self::Aoi => "AOI",
            Self::Test => "Test",
            Self::Coating => "Coating",
            Self::Pack => "Pack",
        };
        write!(f, "{s}")
    }
}

/// One phase of a product's bill of materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomPhase {
    pub phase_type: PhaseType,
    /// Minutes of working time per unit of quantity.
    pub duration_per_unit_minutes: u32,
}

impl BomPhase {
    pub const fn new(phase_type: PhaseType, duration_per_unit_minutes: u32) -> Self {
        Self { phase_type, duration_per_unit_minutes }
    }
}

/// A product definition: identifier, name and its ordered BOM.
///
/// Read-only to the core. The BOM is a finite ordered sequence of 2 to 7
/// phases; not every product uses every phase type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    phases: Vec<BomPhase>,
}

impl Product {
    /// Construct a product, validating the BOM has 2..=7 phases.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        phases: Vec<BomPhase>,
    ) -> Result<Self, PlanningError> {
        let id = id.into();
        if !(2..=7).contains(&phases.len()) {
            return Err(PlanningError::InvalidBom {
                product_id: id,
                reason: format!("BOM must have 2..=7 phases, got {}", phases.len()),
            });
        }
        Ok(Self { id, name: name.into(), phases })
    }

    pub fn phases(&self) -> &[BomPhase] {
        &self.phases
    }

    /// Total working minutes to produce `quantity` units through the full BOM.
    pub fn production_minutes(&self, quantity: u32) -> i64 {
        self.phases
            .iter()
            .map(|p| i64::from(p.duration_per_unit_minutes) * i64::from(quantity))
            .sum()
    }
}
