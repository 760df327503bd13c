//! # GatherBot
//!
//! WhatsApp group scheduling bot: members propose a date/time, vote with
//! `vote <id> yes|no` (or 👍/👎), and the bot confirms once five approvals
//! arrive, then reminds the group daily.
//!
//! Usage:
//!   gatherbot                      # Start with ~/.gatherbot/config.toml
//!   gatherbot --config bot.toml    # Custom config
//!   gatherbot --port 8080 -v       # Port override, verbose logging

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gatherbot_channels::{ConsoleChannel, TwilioWhatsAppChannel};
use gatherbot_core::GatherBotConfig;
use gatherbot_core::traits::Channel;
use gatherbot_gateway::AppState;
use gatherbot_proposals::reminder::run_reminder_loop;
use gatherbot_proposals::schedule::Schedule;
use gatherbot_proposals::{CommandRouter, ProposalEngine, ProposalStore, ReminderJob};

#[derive(Parser)]
#[command(
    name = "gatherbot",
    version,
    about = "📅 GatherBot: propose, vote, and confirm group dates over WhatsApp"
)]
struct Cli {
    /// Path to the config file (default: ~/.gatherbot/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the gateway port
    #[arg(long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug,hyper=info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => GatherBotConfig::load_from(path)?,
        None => GatherBotConfig::load()?,
    };

    // Outbound channel: Twilio when configured, console fallback otherwise.
    let channel: Arc<dyn Channel> = match config.channel.twilio.clone() {
        Some(twilio) if twilio.enabled => {
            let mut channel = TwilioWhatsAppChannel::new(twilio);
            channel.connect().await?;
            Arc::new(channel)
        }
        _ => {
            tracing::warn!("Twilio not configured, broadcasting to console only");
            Arc::new(ConsoleChannel::new())
        }
    };

    let store = ProposalStore::new(
        &config.store.path,
        Duration::from_secs(config.store.lock_timeout_secs),
    );
    let proposal_count = store.load_all().await?.len();
    if proposal_count > 0 {
        tracing::info!("📋 Loaded {proposal_count} proposal(s) from {}", config.store.path.display());
    }

    let engine = Arc::new(ProposalEngine::new(store.clone(), channel.clone()));
    let router = Arc::new(CommandRouter::new(engine, channel.clone()));

    // Daily reminder loop for confirmed dates.
    if config.reminder.enabled {
        match Schedule::parse(&config.reminder.schedule) {
            Some(schedule) => {
                let job = ReminderJob::new(store.clone(), channel.clone());
                tokio::spawn(run_reminder_loop(job, schedule));
            }
            None => tracing::warn!(
                "Reminder schedule '{}' is invalid, reminders disabled",
                config.reminder.schedule
            ),
        }
    }

    let mut gateway_config = config.gateway.clone();
    if let Some(port) = cli.port {
        gateway_config.port = port;
    }
    gatherbot_gateway::start(&gateway_config, AppState::new(router)).await?;
    Ok(())
}
