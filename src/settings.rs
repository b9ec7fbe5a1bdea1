//! Program settings.
//!
//! Resolved in layers: built-in defaults, then a TOML file, then
//! `FERMWATCH_*` environment variables. CLI flags are applied on top by
//! `main`, so the precedence a user sees is defaults < file < env < flag.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Theme selection. `Auto` probes the terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend stream endpoint (host:port).
    pub endpoint: String,
    /// Number of fermentation units to track.
    pub units: u32,
    pub theme: ThemeChoice,
    /// Write tracing output here; unset means logging stays off
    /// (stderr is owned by the TUI).
    pub log_file: Option<PathBuf>,
    /// Milliseconds between frames when replaying a capture.
    pub replay_cadence_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:4455".to_string(),
            units: 4,
            theme: ThemeChoice::Auto,
            log_file: None,
            replay_cadence_ms: 500,
        }
    }
}

impl Settings {
    /// Load settings from `config_path` (or `fermwatch.toml` in the
    /// working directory, if present) and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder();
        let builder = match config_path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("fermwatch").required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix("FERMWATCH"))
            .build()
            .context("could not load settings")?;

        config.try_deserialize().context("invalid settings")
    }
}
