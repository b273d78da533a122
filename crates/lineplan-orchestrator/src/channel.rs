//! The operator-channel boundary: a bidirectional push/receive
//! surface the core treats abstractly, so chat-UI framing never leaks in.

use async_trait::async_trait;
use lineplan_core::{ProductionOrderId, SalesOrderId, Schedule};
use tracing::info;

/// Text summary + rendered Gantt image handed to the operator alongside
/// every proposal.
#[derive(Clone, Debug)]
pub struct ArtifactBundle {
    pub summary: String,
    pub gantt_svg: Vec<u8>,
}

/// A factory-floor failure needing operator attention.
#[derive(Clone, Debug)]
pub struct FactoryFailureNotice {
    pub sales_order_id: SalesOrderId,
    pub production_order_id: ProductionOrderId,
    pub image: Vec<u8>,
    pub description: Option<String>,
}

/// The closed set of actions the operator channel may deliver back to the
/// core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorAction {
    Approve,
    Reject,
    Revise(String),
    CancelOrder { sales_order_id: SalesOrderId, production_order_id: ProductionOrderId },
    RestartOrder { sales_order_id: SalesOrderId, production_order_id: ProductionOrderId },
    RequestNewSchedule,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("operator channel error: {0}")]
pub struct ChannelError(pub String);

#[async_trait]
pub trait OperatorChannel: Send + Sync {
    async fn push_schedule(&self, schedule: &Schedule, artifact: &ArtifactBundle) -> Result<(), ChannelError>;

    async fn push_failure_notice(&self, notice: &FactoryFailureNotice) -> Result<(), ChannelError>;

    /// Polls for the next operator action, if any arrived since the last
    /// call. Returns `Ok(None)` when there is nothing to act on yet; the
    /// poller task calls this in a loop.
    async fn poll_action(&self) -> Result<Option<OperatorAction>, ChannelError>;
}

/// A dev/test channel that logs via `tracing` instead of calling out to a
/// real chat backend.
pub struct LoggingOperatorChannel;

#[async_trait]
impl OperatorChannel for LoggingOperatorChannel {
    async fn push_schedule(&self, schedule: &Schedule, artifact: &ArtifactBundle) -> Result<(), ChannelError> {
        info!(
            schedule_id = schedule.id,
            entries = schedule.entries.len(),
            conflicts = schedule.conflicts.len(),
            summary_bytes = artifact.summary.len(),
            "pushed schedule to operator channel"
        );
        Ok(())
    }

    async fn push_failure_notice(&self, notice: &FactoryFailureNotice) -> Result<(), ChannelError> {
        info!(
            sales_order_id = %notice.sales_order_id,
            production_order_id = %notice.production_order_id,
            "pushed factory failure notice to operator channel"
        );
        Ok(())
    }

    async fn poll_action(&self) -> Result<Option<OperatorAction>, ChannelError> {
        Ok(None)
    }
}
