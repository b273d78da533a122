//! The AI Advisor boundary: an optional, advisory permutation
//! and priority-adjustment hint. The deterministic pipeline always has the
//! final say; a failed or timed-out call just falls back to the EDF baseline.

use async_trait::async_trait;
use lineplan_core::{Schedule, SalesOrder, SalesOrderId};

/// A request for AI-assisted re-ordering advice.
#[derive(Clone, Debug)]
pub struct AiAdviceRequest {
    /// Operator free text, present for `revise` calls.
    pub operator_text: Option<String>,
    pub current_schedule: Option<Schedule>,
    pub pending_orders: Vec<SalesOrder>,
    pub edf_baseline: Vec<SalesOrderId>,
}

/// A priority bump the advisor recommends applying before re-planning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityUpdate {
    pub sales_order_id: SalesOrderId,
    pub priority: i32,
}

/// The advisor's response: a suggested ordering, priority updates to apply
/// first, and a human-readable rationale.
#[derive(Clone, Debug)]
pub struct AiAdvice {
    pub ordering: Vec<SalesOrderId>,
    pub priority_updates: Vec<PriorityUpdate>,
    pub explanation: String,
}

/// Errors from the AI boundary; always recoverable by falling back to EDF.
#[derive(Debug, Clone, thiserror::Error)]
#[error("AI advisor error: {0}")]
pub struct AIError(pub String);

#[async_trait]
pub trait AiAdvisor: Send + Sync {
    async fn advise(&self, request: AiAdviceRequest) -> Result<AiAdvice, AIError>;
}

/// The default advisor: always recommends the EDF baseline unchanged, no
/// priority updates. Used when no real advisor is configured and in tests.
pub struct NullAdvisor;

#[async_trait]
impl AiAdvisor for NullAdvisor {
    async fn advise(&self, request: AiAdviceRequest) -> Result<AiAdvice, AIError> {
        Ok(AiAdvice {
            ordering: request.edf_baseline,
            priority_updates: Vec::new(),
            explanation: "no AI advisor configured; EDF baseline unchanged".to_string(),
        })
    }
}
