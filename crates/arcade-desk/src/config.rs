//! # Desk Configuration
//!
//! Configuration for the rental desk runtime.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ARCADE_TICK_INTERVAL_MS=500                                        │
//! │     ARCADE_ALLOW_NEGATIVE_STOCK=false                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/arcade-desk/desk.toml (Linux)                            │
//! │     ~/Library/Application Support/com.arcade.desk/desk.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     1 s tick, negative stock allowed, "Rp", 15 min warning, uuid ids   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # desk.toml
//! [clock]
//! tick_interval_ms = 1000
//!
//! [billing]
//! allow_negative_stock = true
//!
//! [display]
//! currency_symbol = "Rp"
//! low_time_warning_minutes = 15
//!
//! [ids]
//! strategy = "uuid"  # uuid | sequential
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use arcade_core::ids::{IdGenerator, SequentialIds, UuidIds};
use arcade_core::Money;

/// Longest tick period accepted. Anything slower makes the countdown useless.
const MAX_TICK_INTERVAL_MS: u64 = 60_000;

// =============================================================================
// Config Error
// =============================================================================

/// Failures while loading or validating [`DeskConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid desk configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[clock]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSettings {
    /// Period of the countdown refresh.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval() -> u64 {
    1_000
}

impl Default for ClockSettings {
    fn default() -> Self {
        ClockSettings {
            tick_interval_ms: default_tick_interval(),
        }
    }
}

/// `[billing]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSettings {
    /// When false, settlement clamps stock at zero and reports the shortfall.
    #[serde(default = "default_true")]
    pub allow_negative_stock: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BillingSettings {
    fn default() -> Self {
        BillingSettings {
            allow_negative_stock: true,
        }
    }
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Remaining time below this raises the "time low" flag. 0 disables it.
    #[serde(default = "default_low_time_warning")]
    pub low_time_warning_minutes: u32,
}

fn default_currency_symbol() -> String {
    "Rp".to_string()
}

fn default_low_time_warning() -> u32 {
    15
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            low_time_warning_minutes: default_low_time_warning(),
        }
    }
}

/// How fresh ids are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `S-<uuid v4>`
    #[default]
    Uuid,
    /// `S000001`, reproducible across runs.
    Sequential,
}

impl std::str::FromStr for IdStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "sequential" | "seq" => Ok(IdStrategy::Sequential),
            other => Err(ConfigError::Invalid(format!(
                "Unknown id strategy: '{}'. Valid options: uuid, sequential",
                other
            ))),
        }
    }
}

/// `[ids]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSettings {
    #[serde(default)]
    pub strategy: IdStrategy,
}

// =============================================================================
// Desk Configuration
// =============================================================================

/// Complete desk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub clock: ClockSettings,

    #[serde(default)]
    pub billing: BillingSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub ids: IdSettings,
}

impl DeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (desk.toml), explicit path or the platform default
    /// 3. `ARCADE_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading desk config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load desk config: {}. Using defaults.", e);
            Self::default()
        })
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let tick = self.clock.tick_interval_ms;
        if tick == 0 || tick > MAX_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_ms must be between 1 and {}, got {}",
                MAX_TICK_INTERVAL_MS, tick
            )));
        }

        if self.display.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "currency_symbol must not be empty".into(),
            ));
        }

        if self.display.low_time_warning_minutes > 24 * 60 {
            return Err(ConfigError::Invalid(
                "low_time_warning_minutes must be at most one day".into(),
            ));
        }

        Ok(())
    }

    /// Applies `ARCADE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("ARCADE_TICK_INTERVAL_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => {
                    debug!(ms, "Overriding tick interval from environment");
                    self.clock.tick_interval_ms = ms;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid ARCADE_TICK_INTERVAL_MS"),
            }
        }

        if let Some(raw) = lookup("ARCADE_ALLOW_NEGATIVE_STOCK") {
            match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.billing.allow_negative_stock = true,
                "0" | "false" | "no" => self.billing.allow_negative_stock = false,
                _ => warn!(value = %raw, "Ignoring invalid ARCADE_ALLOW_NEGATIVE_STOCK"),
            }
        }

        if let Some(symbol) = lookup("ARCADE_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(raw) = lookup("ARCADE_LOW_TIME_WARNING_MINUTES") {
            if let Ok(minutes) = raw.parse::<u32>() {
                self.display.low_time_warning_minutes = minutes;
            }
        }

        if let Some(raw) = lookup("ARCADE_ID_STRATEGY") {
            match raw.parse() {
                Ok(strategy) => self.ids.strategy = strategy,
                Err(e) => warn!(error = %e, "Ignoring ARCADE_ID_STRATEGY"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "arcade", "desk")
            .map(|dirs| dirs.config_dir().join("desk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.clock.tick_interval_ms)
    }

    pub fn low_time_warning_ms(&self) -> i64 {
        i64::from(self.display.low_time_warning_minutes) * 60_000
    }

    /// Formats an amount with the configured symbol: `Rp 15.000`.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!("{}{} {}", sign, self.display.currency_symbol, amount.grouped())
    }

    /// A fresh id generator for the configured strategy.
    pub fn id_generator(&self) -> Box<dyn IdGenerator> {
        match self.ids.strategy {
            IdStrategy::Uuid => Box::new(UuidIds),
            IdStrategy::Sequential => Box::new(SequentialIds::new()),
        }
    }
}
