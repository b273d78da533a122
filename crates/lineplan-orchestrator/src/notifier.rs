//! The email notifier boundary: a second channel for informing operators
//! of failed proposals, kept narrow since the real notifier is external.

use async_trait::async_trait;
use tracing::warn;

#[derive(Debug, Clone, thiserror::Error)]
#[error("notifier error: {0}")]
pub struct NotifyError(pub String);

#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn notify_failure(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// A dev/test notifier that does nothing but log; real deployments inject
/// an SMTP-backed implementation.
pub struct NoopNotifier;

#[async_trait]
impl EmailNotifier for NoopNotifier {
    async fn notify_failure(&self, subject: &str, _body: &str) -> Result<(), NotifyError> {
        warn!(subject, "email notifier not configured; failure not emailed");
        Ok(())
    }
}
