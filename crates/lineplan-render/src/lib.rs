//! # lineplan-render
//!
//! Rendering backends for lineplan schedules: a plain-text summary and an
//! SVG Gantt chart, bundled together as the artifact the Orchestrator hands
//! to the operator channel alongside every proposal.

pub mod gantt;
pub mod summary;

pub use gantt::SvgGanttRenderer;
pub use summary::render_text_summary;

use thiserror::Error;

/// Errors raised while rendering a schedule.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("render format error: {0}")]
    Format(String),
}
