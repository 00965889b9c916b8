//! promowatch binary: checks the configured social accounts on an interval
//! and announces newly spotted promocodes to Discord.

mod watch;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use promowatch_notify::WebhookClient;
use promowatch_ocr::TesseractEngine;

#[derive(Debug, Parser)]
#[command(name = "promowatch")]
#[command(about = "Watches social accounts for new promocodes and announces them to Discord")]
struct Cli {
    /// Prompt for platform credentials and log in fresh on the first pass.
    #[arg(long)]
    force_login: bool,

    /// Directory holding the code ledger, platform sessions, and the
    /// browser profile.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Seconds between passes, measured start to start.
    #[arg(long, default_value_t = 3600)]
    interval: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = promowatch_core::load_app_config()?;
    tokio::fs::create_dir_all(&cli.data_dir).await?;

    let engine = TesseractEngine::new(config.tesseract_bin.clone(), config.tesseract_lang.clone());
    let webhook = WebhookClient::new(
        &config.webhook_url,
        &config.user_agent,
        config.request_timeout_secs,
        config.mention_role.clone(),
    )?;

    watch::run_watch_loop(
        &config,
        &engine,
        &webhook,
        &cli.data_dir,
        Duration::from_secs(cli.interval),
        cli.force_login,
    )
    .await;

    Ok(())
}
