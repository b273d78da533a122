//! SMTP-backed `EmailNotifier`. Used whenever the CLI
//! is configured with SMTP credentials; falls back to `NoopNotifier`
//! otherwise.

use async_trait::async_trait;
use lettre::message::Message;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use lineplan_orchestrator::{EmailNotifier, NotifyError};

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    to: String,
}

impl SmtpNotifier {
    pub fn new(host: &str, port: u16, user: &str, password: &str, to: String) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError(format!("failed to configure SMTP relay {host}: {e}")))?
            .port(port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();
        Ok(Self { transport, from: user.to_string(), to })
    }
}

#[async_trait]
impl EmailNotifier for SmtpNotifier {
    async fn notify_failure(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.parse().map_err(|e| NotifyError(format!("invalid from address: {e}")))?)
            .to(self.to.parse().map_err(|e| NotifyError(format!("invalid to address: {e}")))?)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| NotifyError(format!("failed to build email: {e}")))?;

        self.transport.send(message).await.map_err(|e| NotifyError(format!("SMTP send failed: {e}")))?;
        Ok(())
    }
}
