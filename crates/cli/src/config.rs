// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML config loading (SPEC_FULL.md §3 "Config"). The bearer credential
//! is deliberately absent from this struct — it only ever comes from
//! `PILOT_GITHUB_TOKEN` or `--token-file` (see `main.rs::resolve_token`).

use pilot_daemon::CleanerConfig;
use pilot_engine::{ExecutionMode, PollerConfig};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("could not parse config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeConfig {
    Sequential,
    Parallel,
    Auto,
}

impl From<ModeConfig> for ExecutionMode {
    fn from(mode: ModeConfig) -> Self {
        match mode {
            ModeConfig::Sequential => ExecutionMode::Sequential,
            ModeConfig::Parallel => ExecutionMode::Parallel,
            ModeConfig::Auto => ExecutionMode::Auto,
        }
    }
}

fn default_mode() -> ModeConfig {
    ModeConfig::Sequential
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_max_concurrent() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_pr_poll_interval_secs() -> u64 {
    30
}

fn default_pr_timeout_secs() -> u64 {
    3600
}

fn default_max_merge_wait_retries() -> u32 {
    6
}

fn default_work_ready_label() -> String {
    "pilot".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_work_ready_label")]
    pub work_ready_label: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_mode")]
    pub mode: ModeConfig,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_true")]
    pub wait_for_merge: bool,
    #[serde(default = "default_pr_poll_interval_secs")]
    pub pr_poll_interval_secs: u64,
    #[serde(default = "default_pr_timeout_secs")]
    pub pr_timeout_secs: u64,
    #[serde(default = "default_max_merge_wait_retries")]
    pub max_merge_wait_retries: u32,
    /// The code-writing worker to invoke per issue (argv[0] plus any fixed
    /// arguments); see `handler::ProcessHandler`.
    pub handler_command: Vec<String>,
    /// Path the processed-set snapshot is persisted to
    /// (`pilot_storage::FileProcessedStore`).
    pub processed_store_path: String,
    #[serde(default)]
    pub cleaner: CleanerSection,
    pub board: Option<BoardSection>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CleanerSection {
    #[serde(default = "default_cleaner_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_in_progress_threshold_secs")]
    pub in_progress_threshold_secs: u64,
    #[serde(default = "default_failed_threshold_secs")]
    pub failed_threshold_secs: u64,
}

fn default_cleaner_interval_secs() -> u64 {
    30 * 60
}

fn default_in_progress_threshold_secs() -> u64 {
    60 * 60
}

fn default_failed_threshold_secs() -> u64 {
    24 * 60 * 60
}

#[derive(Debug, Deserialize)]
pub struct BoardSection {
    pub project_number: u64,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig::default()
            .owner(self.owner.clone())
            .repo(self.repo.clone())
            .work_ready_label(self.work_ready_label.clone())
            .poll_interval(Duration::from_secs(self.poll_interval_secs))
            .mode(self.mode.into())
            .max_concurrent(self.max_concurrent)
            .wait_for_merge(self.wait_for_merge)
            .pr_poll_interval(Duration::from_secs(self.pr_poll_interval_secs))
            .pr_timeout(Duration::from_secs(self.pr_timeout_secs))
            .max_merge_wait_retries(self.max_merge_wait_retries)
    }

    pub fn cleaner_config(&self) -> CleanerConfig {
        CleanerConfig {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            interval: Duration::from_secs(self.cleaner.interval_secs),
            in_progress_threshold: Duration::from_secs(self.cleaner.in_progress_threshold_secs),
            failed_threshold: Duration::from_secs(self.cleaner.failed_threshold_secs),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
