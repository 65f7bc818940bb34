//! Command-line parsing and validation helpers.

use anyhow::{bail, Result};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_REPLY_LATENCY_MS: u64 = 500;
pub const MAX_REPLY_LATENCY_MS: u64 = 60_000;

/// Reply returned by the canned provider when none is configured.
pub const DEFAULT_CANNED_REPLY: &str = "Thank you for the opportunity! If you have any more \
questions or if there's anything else I can help you with, feel free to ask.";

/// Core options shared by every frontend. Validated values keep the
/// pipeline and log setup sane before any thread is spawned.
#[derive(Debug, Parser, Clone)]
#[command(about = "Replypad core", author, version)]
pub struct AppConfig {
    /// Simulated generation latency in milliseconds
    #[arg(long = "reply-latency-ms", default_value_t = DEFAULT_REPLY_LATENCY_MS)]
    pub reply_latency_ms: u64,

    /// Reply text produced by the canned provider
    #[arg(long = "canned-reply", default_value = DEFAULT_CANNED_REPLY)]
    pub canned_reply: String,

    /// Enable debug logging to the temp log file
    #[arg(long = "logs", default_value_t = false)]
    pub logs: bool,

    /// Disable all logging even if other flags enable it
    #[arg(long = "no-logs", default_value_t = false)]
    pub no_logs: bool,

    /// Emit structured JSON trace events alongside the debug log
    #[arg(long = "log-timings", default_value_t = false)]
    pub log_timings: bool,

    /// Allow prompt/draft text in logs
    #[arg(long = "log-content", default_value_t = false)]
    pub log_content: bool,
}

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before they reach the pipeline.
    pub fn validate(&mut self) -> Result<()> {
        if self.reply_latency_ms > MAX_REPLY_LATENCY_MS {
            bail!(
                "--reply-latency-ms must be at most {MAX_REPLY_LATENCY_MS}, got {}",
                self.reply_latency_ms
            );
        }
        if self.canned_reply.trim().is_empty() {
            bail!("--canned-reply must not be blank");
        }
        Ok(())
    }

    pub fn reply_latency(&self) -> Duration {
        Duration::from_millis(self.reply_latency_ms)
    }
}
