//! Re-exports the working-hours clock from `lineplan-core`.
//!
//! Kept as its own module so the kernel's public surface reads as
//! policy/clock/planner/conflict, even though the clock itself carries no
//! behaviour beyond what `lineplan_core::WorkingHoursClock` already provides.

pub use lineplan_core::WorkingHoursClock;
