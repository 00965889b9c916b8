//! The watch loop: one pass per interval until shutdown.
//!
//! Pass failures are logged and the loop keeps going; a broken pass at
//! 3am should not take the watcher down for the rest of the night.

use std::path::Path;
use std::time::Duration;

use tokio::time::Instant;

use promowatch_core::AppConfig;
use promowatch_notify::WebhookClient;
use promowatch_ocr::TesseractEngine;
use promowatch_pipeline::{run_pass, PassOptions};

/// Runs passes forever, `interval` apart measured start to start. Returns
/// when a shutdown signal arrives during the wait between passes.
///
/// `force_login` applies to the first pass only; later passes reuse the
/// sessions that login stored.
pub(crate) async fn run_watch_loop(
    config: &AppConfig,
    engine: &TesseractEngine,
    webhook: &WebhookClient,
    data_dir: &Path,
    interval: Duration,
    mut force_login: bool,
) {
    loop {
        let started = Instant::now();
        tracing::info!(interval = %format_duration(interval), "checking for new promocodes");
        let options = PassOptions {
            data_dir,
            force_login,
        };
        match run_pass(config, engine, webhook, options).await {
            Ok(summary) => {
                tracing::info!(
                    posts_found = summary.posts_found,
                    candidates = summary.candidates,
                    announced = summary.announced,
                    "pass finished"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "pass failed");
            }
        }
        force_login = false;

        let wait = interval.saturating_sub(started.elapsed());
        tracing::info!(wait = %format_duration(wait), "next pass scheduled");
        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            () = shutdown_signal() => {
                tracing::info!("received shutdown signal, exiting");
                return;
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Formats a wait as `1h 23m 45s`, skipping zero units. A zero duration
/// is `0s` rather than an empty string.
fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 {
        parts.push(format!("{seconds}s"));
    }

    if parts.is_empty() {
        return "0s".to_string();
    }
    parts.join(" ")
}
