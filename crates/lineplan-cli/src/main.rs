//! lineplan CLI - single-line contract-manufacturer scheduling engine
//!
//! Wires the Gateway, AI Advisor, operator channel, and email notifier into
//! a shared `Orchestrator`, then either serves the factory-event listener
//! and operator-channel poller, or runs a one-shot command.

mod advisor;
mod config;
mod notifier;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lineplan_core::Policy;
use lineplan_gateway::{Gateway, ManufacturingApiGateway, NoRefresh};
use lineplan_orchestrator::{
    EmailNotifier, LoggingOperatorChannel, NoopNotifier, NullAdvisor, OperatorAction, OperatorChannel, Orchestrator,
};
use lineplan_render::render_text_summary;

use crate::advisor::HttpAiAdvisor;
use crate::config::{Command, Config};
use crate::notifier::SmtpNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry().with(fmt::layer()).with(EnvFilter::from_default_env()).init();

    let config = Config::parse();
    let orchestrator = Arc::new(build_orchestrator(&config).await?);

    match config.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => serve(config, orchestrator).await,
        Command::Plan { policy } => cmd_plan(orchestrator, &policy).await,
        Command::ShowSchedule => cmd_show_schedule(orchestrator).await,
    }
}

async fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let gateway: Arc<dyn Gateway> = Arc::new(
        ManufacturingApiGateway::new(config.gateway_url.clone(), config.gateway_token.clone(), Box::new(NoRefresh))
            .context("failed to configure the manufacturing API gateway")?,
    );

    let advisor: Arc<dyn lineplan_orchestrator::AiAdvisor> = match &config.ai_api_key {
        Some(key) => Arc::new(HttpAiAdvisor::new(key.clone(), config.ai_model.clone())),
        None => {
            info!("no AI API key configured; running with the deterministic EDF-only advisor");
            Arc::new(NullAdvisor)
        }
    };

    let channel: Arc<dyn OperatorChannel> = Arc::new(LoggingOperatorChannel);

    let notifier: Arc<dyn EmailNotifier> = match (&config.smtp_host, &config.smtp_user, &config.smtp_password, &config.smtp_to) {
        (Some(host), Some(user), Some(password), Some(to)) => {
            Arc::new(SmtpNotifier::new(host, config.smtp_port, user, password, to.clone()).context("failed to configure SMTP notifier")?)
        }
        _ => {
            info!("SMTP not fully configured; failure escalation emails are disabled");
            Arc::new(NoopNotifier)
        }
    };

    let clock = lineplan_core::WorkingHoursClock::with_shift(
        config.shift_start_minutes.try_into().context("shift_start_minutes must fit in u16")?,
        config.shift_end_minutes.try_into().context("shift_end_minutes must fit in u16")?,
    );

    Orchestrator::new(gateway, advisor, channel, notifier, clock, Some(config.state_path.clone()))
        .await
        .context("failed to initialise the orchestrator")
}

/// Runs the factory-event HTTP listener and the operator-channel poller
/// side by side, both sharing the same `Orchestrator`.
async fn serve(config: Config, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.factory_port))
        .await
        .with_context(|| format!("failed to bind factory listener on port {}", config.factory_port))?;
    info!(port = config.factory_port, "factory-event listener bound");

    let app = lineplan_factory::router(Arc::clone(&orchestrator));
    let http_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
            error!(error = %e, "factory HTTP listener exited with an error");
        }
    });

    let poller_orchestrator = Arc::clone(&orchestrator);
    let poller_task = tokio::spawn(async move { operator_poll_loop(poller_orchestrator).await });

    tokio::select! {
        _ = http_task => {}
        _ = poller_task => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Polls the operator channel for actions and applies them to the
/// orchestrator; this loop just relays actions through.
async fn operator_poll_loop(orchestrator: Arc<Orchestrator>) {
    let channel = LoggingOperatorChannel;
    loop {
        match channel.poll_action().await {
            Ok(Some(action)) => {
                if let Err(e) = apply_operator_action(&orchestrator, action).await {
                    warn!(error = %e, "operator action failed");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "operator channel poll failed"),
        }
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    }
}

async fn apply_operator_action(orchestrator: &Orchestrator, action: OperatorAction) -> Result<()> {
    match action {
        OperatorAction::Approve => {
            let proposed = orchestrator.proposed_schedule().await.context("no outstanding proposal to approve")?;
            orchestrator.approve(proposed.id).await?;
        }
        OperatorAction::Reject => {
            let proposed = orchestrator.proposed_schedule().await.context("no outstanding proposal to reject")?;
            orchestrator.reject(proposed.id).await?;
        }
        OperatorAction::Revise(text) => {
            let proposed = orchestrator.proposed_schedule().await.context("no outstanding proposal to revise")?;
            orchestrator.revise(proposed.id, text).await?;
        }
        OperatorAction::CancelOrder { sales_order_id, production_order_id } => {
            orchestrator.cancel_order(&sales_order_id, &production_order_id).await?;
        }
        OperatorAction::RestartOrder { sales_order_id, production_order_id } => {
            orchestrator.restart_order(&sales_order_id, &production_order_id).await?;
        }
        OperatorAction::RequestNewSchedule => {
            orchestrator.compute_proposal(Policy::default(), None).await?;
        }
    }
    Ok(())
}

async fn cmd_plan(orchestrator: Arc<Orchestrator>, policy: &str) -> Result<()> {
    let policy = Policy::from_str(policy).map_err(|e| anyhow::anyhow!(e))?;
    let proposal = orchestrator.compute_proposal(policy, None).await.context("failed to compute proposal")?;
    println!("{}", proposal.artifact.summary);
    Ok(())
}

async fn cmd_show_schedule(orchestrator: Arc<Orchestrator>) -> Result<()> {
    match orchestrator.approved_schedule().await {
        Some(schedule) => println!("{}", render_text_summary(&schedule)),
        None => println!("No approved schedule."),
    }
    Ok(())
}
