//! The orchestrator's error taxonomy: every failure mode a
//! caller of `Orchestrator` can observe, in one enum.

use lineplan_core::PlanningError;
use lineplan_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OrchestratorError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("planning error: {0}")]
    Planning(#[from] PlanningError),

    #[error("invalid operator input: {0}")]
    Validation(String),

    #[error("AI advisor error: {0}")]
    Ai(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no proposal is outstanding")]
    NoProposal,

    #[error("persistence error: {0}")]
    Persistence(String),
}
