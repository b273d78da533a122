//! # lineplan-orchestrator
//!
//! Owns the schedule lifecycle: computing proposals against the external
//! Gateway, the approve/reject/revise state machine, and the factory-event
//! recovery actions. The only crate that talks to the AI Advisor, the
//! operator channel, and the email notifier.

pub mod advisor;
pub mod channel;
pub mod error;
pub mod notifier;
pub mod orchestrator;
pub mod persistence;
pub mod proposal;

pub use advisor::{AiAdvice, AiAdviceRequest, AiAdvisor, AIError, NullAdvisor, PriorityUpdate};
pub use channel::{ArtifactBundle, ChannelError, FactoryFailureNotice, LoggingOperatorChannel, OperatorAction, OperatorChannel};
pub use error::OrchestratorError;
pub use notifier::{EmailNotifier, NoopNotifier, NotifyError};
pub use orchestrator::Orchestrator;
pub use proposal::Proposal;
