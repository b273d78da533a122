//! Environment-sourced configuration.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "lineplan")]
#[command(author, version, about = "Single-line contract-manufacturer scheduling engine", long_about = None)]
pub struct Config {
    /// Manufacturing API base URL.
    #[arg(long, env = "LINEPLAN_GATEWAY_URL")]
    pub gateway_url: String,

    /// Manufacturing API bearer token.
    #[arg(long, env = "LINEPLAN_GATEWAY_TOKEN")]
    pub gateway_token: String,

    /// Operator channel access token (chat backend, SMS gateway, etc).
    #[arg(long, env = "LINEPLAN_OPERATOR_CHANNEL_TOKEN")]
    pub operator_channel_token: Option<String>,

    /// AI Advisor API key. Omit to run with the deterministic EDF-only advisor.
    #[arg(long, env = "LINEPLAN_AI_API_KEY")]
    pub ai_api_key: Option<String>,

    /// AI Advisor model name.
    #[arg(long, env = "LINEPLAN_AI_MODEL", default_value = "gpt-4o-mini")]
    pub ai_model: String,

    /// Factory-event HTTP listener port.
    #[arg(long, env = "LINEPLAN_FACTORY_PORT", default_value_t = 8080)]
    pub factory_port: u16,

    /// Shift start, minutes after midnight (default 08:00).
    #[arg(long, env = "LINEPLAN_SHIFT_START_MINUTES", default_value_t = 8 * 60)]
    pub shift_start_minutes: u32,

    /// Shift end, minutes after midnight (default 16:00, an 8-hour shift).
    #[arg(long, env = "LINEPLAN_SHIFT_END_MINUTES", default_value_t = 16 * 60)]
    pub shift_end_minutes: u32,

    /// SMTP host for failure-escalation email.
    #[arg(long, env = "LINEPLAN_SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP port.
    #[arg(long, env = "LINEPLAN_SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// SMTP username.
    #[arg(long, env = "LINEPLAN_SMTP_USER")]
    pub smtp_user: Option<String>,

    /// SMTP password.
    #[arg(long, env = "LINEPLAN_SMTP_PASSWORD")]
    pub smtp_password: Option<String>,

    /// Escalation recipient for failure-notification email.
    #[arg(long, env = "LINEPLAN_SMTP_TO")]
    pub smtp_to: Option<String>,

    /// Where the SO↔PO tracking map and approved-schedule snapshot persist
    /// across restarts.
    #[arg(long, env = "LINEPLAN_STATE_PATH", default_value = "lineplan-state.json")]
    pub state_path: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full system: factory HTTP listener + operator-channel poller.
    Serve,
    /// Compute one proposal against the configured Gateway and print its summary.
    Plan {
        /// Sorting policy: edf, sjf, priority, or customer.
        #[arg(long, default_value = "edf")]
        policy: String,
    },
    /// Print the current approved schedule, if any.
    ShowSchedule,
}
