//! # lineplan-core
//!
//! Core domain model for the lineplan production-scheduling engine.
//!
//! This crate provides:
//! - Domain types: `SalesOrder`, `Product`, `ProductionOrder`, `Schedule`
//! - The working-hours clock (`WorkingHoursClock`)
//! - Shared error types
//!
//! ## Example
//!
//! ```rust
//! use lineplan_core::{SalesOrder, Customer, CustomerRank};
//! use chrono::{TimeZone, Utc};
//!
//! let order = SalesOrder::new(
//!     "SO-001",
//!     "PCB-IND-100",
//!     2,
//!     Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap(),
//!     1,
//!     Customer::new("Acme Robotics", CustomerRank::new(10)),
//! );
//! assert_eq!(order.id, "SO-001");
//! ```

use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod calendar;
pub mod policy;
pub mod production;
pub mod sales_order;
pub mod schedule;

pub use calendar::WorkingHoursClock;
pub use policy::Policy;
pub use production::{
    PhaseType, ProductionOrder, ProductionOrderStatus, ProductionPhase, ProductionPhaseStatus,
};
pub use sales_order::{BomPhase, Customer, CustomerRank, Product, SalesOrder, SalesOrderStatus};
pub use schedule::{Schedule, ScheduleEntry, ScheduleStatus};

/// Unique identifier for a sales order
pub type SalesOrderId = String;

/// Unique identifier for a product
pub type ProductId = String;

/// Unique identifier for a production order (assigned by the external system)
pub type ProductionOrderId = String;

/// Unique identifier for a production phase
pub type PhaseId = String;

/// Monotonic identifier for a Schedule snapshot
pub type ScheduleId = u64;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while planning a schedule
#[derive(Debug, Clone, Error)]
pub enum PlanningError {
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    #[error("invalid BOM for product {product_id}: {reason}")]
    InvalidBom { product_id: ProductId, reason: String },

    #[error("cannot plan an empty order set")]
    EmptyOrderSet,
}

pub(crate) fn weekday_ordinal(w: Weekday) -> u8 {
    w.num_days_from_sunday() as u8
}

pub(crate) fn naive_time_from_minutes(minutes: u16) -> NaiveTime {
    NaiveTime::from_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
        .expect("minutes-from-midnight is always a valid time of day")
}

pub(crate) fn minutes_from_midnight(t: DateTime<Utc>) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

pub(crate) fn at_minutes_from_midnight(t: DateTime<Utc>, minutes: u16) -> DateTime<Utc> {
    t.date_naive()
        .and_time(naive_time_from_minutes(minutes))
        .and_utc()
}

pub(crate) fn add_days(t: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    t + ChronoDuration::days(days)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TimeRange {
    /// Minutes from midnight, inclusive
    pub start: u16,
    /// Minutes from midnight, exclusive
    pub end: u16,
}

impl TimeRange {
    pub(crate) fn minutes(&self) -> i64 {
        i64::from(self.end) - i64::from(self.start)
    }
}
