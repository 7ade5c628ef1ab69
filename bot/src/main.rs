//! Homework status bot.
//!
//! Polls the Practicum homework statuses API and sends a Telegram message
//! whenever the review status of the latest submission changes. Secrets
//! come from the environment (a `.env` file is honoured); a missing one
//! stops the bot before the first poll.

use anyhow::{Context, Result};
use clap::Parser;
use common::config::{BotConfig, DEFAULT_RETRY_SECS, PRACTICUM_ENDPOINT};
use poller::practicum::PracticumClient;
use poller::Poller;
use std::sync::Arc;
use std::time::Duration;
use telegram::TelegramSender;
use tracing::{error, info};

const MAX_RETRY_SECS: u64 = 86_400;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Homework statuses endpoint
    #[arg(long, default_value = PRACTICUM_ENDPOINT)]
    endpoint: String,

    /// Seconds to sleep between polls (at most one day)
    #[arg(long, default_value_t = DEFAULT_RETRY_SECS, value_parser = clap::value_parser!(u64).range(1..=MAX_RETRY_SECS))]
    retry_secs: u64,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Debug logging when RUST_LOG is not set
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("Homework bot v{}", env!("CARGO_PKG_VERSION"));

    let config = BotConfig::from_env()
        .map_err(|e| {
            error!("{}, bot stopped", e);
            e
        })
        .context("Failed to load configuration")?
        .with_endpoint(args.endpoint)
        .with_retry_interval(Duration::from_secs(args.retry_secs));
    info!(?config, "Configuration loaded");

    let source = Arc::new(PracticumClient::new(&config.endpoint, &config.practicum_token));
    let sender = Arc::new(TelegramSender::new(&config.telegram_token));
    let mut poller = Poller::new(
        source,
        sender,
        &config.telegram_chat_id,
        config.retry_interval,
    );

    if args.once {
        let outcome = poller.poll_once().await.context("Poll cycle failed")?;
        info!(?outcome, "Single poll finished");
        return Ok(());
    }

    tokio::select! {
        _ = poller.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Ctrl-C received, shutting down");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "homework_bot=debug,poller=debug,telegram=debug"
    } else {
        "homework_bot=info,poller=info,telegram=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with_target(false)
        .init();
}
