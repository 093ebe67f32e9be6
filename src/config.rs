use crate::collectors::{diskstats::DISKSTATS_PATH, leds::LEDS_DIR};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for the poll interval and pulse width; shutdown waits for both.
pub const MAX_WAIT_MS: u64 = 10_000;

/// On-disk configuration (`~/.config/diskled/diskled.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub led: LedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// How often /proc/diskstats is re-read, in milliseconds
    pub poll_interval_ms: u64,
    /// How long the LED stays lit per detected change, in milliseconds
    pub pulse_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub diskstats: PathBuf,
    pub leds_dir:  PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedConfig {
    /// Brightness written to light the LED (must be positive)
    pub on_brightness: u32,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 100, pulse_ms: 50 }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            diskstats: PathBuf::from(DISKSTATS_PATH),
            leds_dir:  PathBuf::from(LEDS_DIR),
        }
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self { on_brightness: 1 }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load `explicit` if given (it must exist), otherwise the per-user file,
    /// falling back to defaults when that file does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cfg = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("diskled").join("diskled.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WAIT_MS).contains(&self.general.poll_interval_ms) {
            bail!("poll_interval_ms must be between 1 and {}", MAX_WAIT_MS);
        }
        if !(1..=MAX_WAIT_MS).contains(&self.general.pulse_ms) {
            bail!("pulse_ms must be between 1 and {}", MAX_WAIT_MS);
        }
        if self.led.on_brightness == 0 {
            bail!("on_brightness must be positive, 0 turns the LED off");
        }
        Ok(())
    }

    /// Freeze this configuration into the settings one monitoring run uses.
    pub fn monitor_config(&self, disk: &str, led: &str, verbose: bool) -> MonitorConfig {
        MonitorConfig {
            disk:            disk.to_string(),
            led:             led.to_string(),
            verbose,
            diskstats_path:  self.paths.diskstats.clone(),
            leds_dir:        self.paths.leds_dir.clone(),
            poll_interval:   Duration::from_millis(self.general.poll_interval_ms),
            pulse_width:     Duration::from_millis(self.general.pulse_ms),
            on_brightness:   self.led.on_brightness,
        }
    }
}

/// Immutable settings for one monitoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Record key searched for in the statistics source, e.g. `sda`
    pub disk:           String,
    /// LED name under `leds_dir`, e.g. `led0`
    pub led:            String,
    pub verbose:        bool,
    pub diskstats_path: PathBuf,
    pub leds_dir:       PathBuf,
    pub poll_interval:  Duration,
    pub pulse_width:    Duration,
    pub on_brightness:  u32,
}
