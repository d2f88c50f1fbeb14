//! Configuration loading and parsing for the sequencer.
//!
//! Parses `lacquer.toml` (or an override path provided by the binary) into
//! the timing constants and line capacities. Every field is optional and
//! defaults to the reference plant values; unknown fields are ignored so the
//! file can grow without breaking older binaries. Group membership (L1–L4
//! versus L5–L9) is structural and deliberately not configurable.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "lacquer.toml";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulated seconds of base processing per body.
    pub base_seconds_per_body: f64,
    /// Seconds charged when an O1 body lands in the O2-preferred group.
    pub o1_cross_penalty: f64,
    /// Seconds charged per color change on the main conveyor.
    pub color_change_penalty: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_seconds_per_body: 1.0,
            o1_cross_penalty: 1.0,
            color_change_penalty: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LinesConfig {
    /// Capacity of each O1-preferred line (L1–L4).
    pub o1_capacity: usize,
    /// Capacity of each O2-preferred line (L5–L9).
    pub o2_capacity: usize,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            o1_capacity: 14,
            o2_capacity: 16,
        }
    }
}

/// Parsed (or defaulted) simulator configuration.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct SimConfig {
    pub timing: TimingConfig,
    pub lines: LinesConfig,
}

impl SimConfig {
    fn validate(self) -> Result<Self> {
        if self.lines.o1_capacity == 0 || self.lines.o2_capacity == 0 {
            bail!("line capacities must be positive");
        }
        if self.timing.base_seconds_per_body <= 0.0 {
            bail!("base_seconds_per_body must be positive");
        }
        if self.timing.o1_cross_penalty < 0.0 || self.timing.color_change_penalty < 0.0 {
            bail!("penalty times must not be negative");
        }
        Ok(self)
    }
}

/// Parse a config from TOML text.
pub fn parse(text: &str) -> Result<SimConfig> {
    let config: SimConfig = toml::from_str(text).context("failed to parse config")?;
    config.validate()
}

/// Load a config from an explicit path.
pub fn load_from(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    let config = parse(&text)?;
    info!(target: "config", path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `lacquer.toml` from the working directory, falling back to the
/// reference defaults when the file does not exist.
pub fn discover() -> Result<SimConfig> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        load_from(path)
    } else {
        info!(target: "config", "no config file, using reference defaults");
        Ok(SimConfig::default())
    }
}
