//! CLI options for the replypad overlay binary.

use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

use replypad::config::AppConfig;
use replypad::host::HostProfile;

#[derive(Debug, Parser, Clone)]
#[command(about = "Replypad", author, version)]
pub(crate) struct OverlayConfig {
    #[command(flatten)]
    pub(crate) app: AppConfig,

    /// YAML file overriding the host selector profile
    #[arg(long = "host-profile")]
    pub(crate) host_profile: Option<PathBuf>,

    /// Treat any element class matching this regex as the editable field
    #[arg(long = "field-regex")]
    pub(crate) field_regex: Option<String>,

    /// Milliseconds between scripted interaction steps
    #[arg(long = "step-ms", default_value_t = 40)]
    pub(crate) step_ms: u64,

    /// Close the overlay before generation finishes (stale-result walkthrough)
    #[arg(long = "close-early", default_value_t = false)]
    pub(crate) close_early: bool,

    /// Use glyph icons instead of bundled SVG identifiers
    #[arg(long = "glyph-icons", default_value_t = false)]
    pub(crate) glyph_icons: bool,
}

impl OverlayConfig {
    /// Parse CLI arguments and validate them right away.
    pub(crate) fn parse_validated() -> Result<Self> {
        let mut config = Self::parse();
        config.app.validate()?;
        Ok(config)
    }

    pub(crate) fn resolve_profile(&self) -> Result<HostProfile> {
        match &self.host_profile {
            Some(path) => HostProfile::from_yaml_file(path),
            None => Ok(HostProfile::default()),
        }
    }

    pub(crate) fn resolve_field_regex(&self) -> Result<Option<Regex>> {
        self.field_regex
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).with_context(|| format!("invalid --field-regex {pattern:?}"))
            })
            .transpose()
    }

    pub(crate) fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}
