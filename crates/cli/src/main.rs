// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `pilot`: the process that assembles `pilot-engine`'s Poller and
//! `pilot-daemon`'s Cleaner behind the collaborators spec.md carves out
//! (tracker transport, persistence, notification text, board sync) and
//! drives them for the life of the process.

mod config;
mod handler;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use config::Config;
use handler::ProcessHandler;
use pilot_board::BoardSync;
use pilot_core::Clock;
use pilot_daemon::{Cleaner, InProcessExecutionIndex, Lifecycle};
use pilot_engine::{
    OnPrCreated, OnStatusChanged, Poller, PollerBuilder, PrCreatedEvent,
};
use pilot_storage::FileProcessedStore;
use pilot_tracker::{GithubBoardTransport, GithubRateLimitRecognizer, GithubTracker, PathTokenScopeExtractor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// An autonomous ticket-execution controller: polls GitHub Issues for a
/// sentinel label, dispatches each to a code-writing worker, and drives
/// the resulting pull request to a terminal outcome.
#[derive(Parser, Debug)]
#[command(name = "pilot", version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"))]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "pilot.toml")]
    config: PathBuf,

    /// Read the bearer token from this file instead of `PILOT_GITHUB_TOKEN`.
    #[arg(long)]
    token_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "pilot exited with an error");
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let token = resolve_token(cli.token_file.as_deref())?;

    let client = Arc::new(
        octocrab::Octocrab::builder()
            .personal_token(token)
            .build()
            .context("building GitHub client")?,
    );
    let tracker: Arc<dyn pilot_core::TrackerPort> = Arc::new(GithubTracker::from_client(client.clone()));

    let store = Arc::new(
        FileProcessedStore::open(config.processed_store_path.clone())
            .with_context(|| format!("opening processed-set store at {}", config.processed_store_path))?,
    );

    let board = match &config.board {
        Some(board_section) => {
            let transport = Arc::new(GithubBoardTransport::new(client.clone()));
            Some(Arc::new(BoardSync::new(transport, config.owner.clone(), board_section.project_number)))
        }
        None => None,
    };

    let execution_index = Arc::new(InProcessExecutionIndex::new());
    let handler = Arc::new(ProcessHandler::new(config.handler_command.clone()));

    let mut builder = PollerBuilder::new()
        .tracker(Arc::clone(&tracker))
        .store(store)
        .handler(handler)
        .on_pr_created(Arc::new(LoggingPrCreated))
        .on_dispatch_started(execution_index.clone())
        .on_dispatch_finished(execution_index.clone())
        .retry_queue(Arc::new(pilot_engine::InProcessRetryQueue::new()))
        .rate_limit(Arc::new(GithubRateLimitRecognizer))
        .scope_extractor(Arc::new(PathTokenScopeExtractor))
        .config(config.poller_config());

    if let Some(board) = &board {
        builder = builder.on_status_changed(Arc::new(BoardStatusSync { board: Arc::clone(board) }));
    }

    let poller = Arc::new(builder.build().await.context("assembling poller")?);

    let cleaner = Cleaner::new(Arc::clone(&tracker), execution_index, config.cleaner_config())
        .on_failed_cleaned(Arc::new(ClearProcessedOnFailedCleaned { poller: Arc::clone(&poller) }));

    let lifecycle = Lifecycle::new(poller, Arc::new(cleaner));
    lifecycle.start().await.context("starting lifecycle")?;

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, draining in-flight handlers (press again to stop immediately)");

    tokio::select! {
        _ = lifecycle.drain() => {}
        _ = wait_for_shutdown_signal() => {
            tracing::warn!("second shutdown signal received, stopping immediately");
            lifecycle.stop();
        }
    }

    Ok(())
}

fn resolve_token(token_file: Option<&std::path::Path>) -> Result<String> {
    if let Some(path) = token_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading token file {}", path.display()))?;
        return Ok(contents.trim().to_string());
    }
    std::env::var("PILOT_GITHUB_TOKEN")
        .map_err(|_| anyhow!("no bearer token: set PILOT_GITHUB_TOKEN or pass --token-file"))
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "failed to install SIGTERM handler, falling back to Ctrl+C only");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Logs PR creation; the core only requires that the host be told once
/// per successful PR (spec §6.3) — notification formatting and any
/// further routing is a collaborator's job, not this binary's.
struct LoggingPrCreated;

#[async_trait]
impl OnPrCreated for LoggingPrCreated {
    async fn on_pr_created(&self, event: PrCreatedEvent) {
        tracing::info!(
            issue = event.issue_number,
            pr = event.pr_number,
            pr_url = %event.pr_url,
            head_sha = %event.head_sha,
            branch = %event.branch_name,
            "pull request created"
        );
    }
}

/// Wires spec §2's "`BoardSync` is invoked opportunistically on state
/// transitions" to the Poller's `OnStatusChanged` callback.
struct BoardStatusSync {
    board: Arc<BoardSync>,
}

#[async_trait]
impl OnStatusChanged for BoardStatusSync {
    async fn on_status_changed(&self, issue_node_id: &str, status_name: &str) {
        if let Err(e) = self.board.update_project_item_status(issue_node_id, status_name).await {
            tracing::warn!(issue_node_id, status_name, error = %e, "board sync failed (best-effort)");
        }
    }
}

/// Wires spec §4.3 step 5 / §6.3: the Cleaner's `OnFailedCleaned` callback
/// clears the Poller's processed-set entry so the issue is immediately
/// retryable once the stale `failed` label is gone.
struct ClearProcessedOnFailedCleaned<C: Clock> {
    poller: Arc<Poller<C>>,
}

#[async_trait]
impl<C: Clock> pilot_daemon::OnFailedCleaned for ClearProcessedOnFailedCleaned<C> {
    async fn on_failed_cleaned(&self, issue_number: u64) {
        if let Err(e) = self.poller.clear_processed(issue_number).await {
            tracing::warn!(issue_number, error = %e, "failed to clear processed flag after stale-failed cleanup");
        }
    }
}
