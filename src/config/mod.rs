//! Configuration Module - TOML-based Runtime Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! Every TTL and threshold the runtime uses is externalized here;
//! nothing is hardcoded in the cache or the clients.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::cache::RuntimeTtls;
use crate::usecases::SimulationConfig;

/// Top-level configuration.
///
/// Loaded from `config.toml` at startup. Every section is optional and
/// falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  #[serde(default)]
  pub bot: BotConfig,
  /// Runtime registry TTLs.
  #[serde(default)]
  pub runtime: RuntimeConfig,
  /// Ladder venue client.
  #[serde(default)]
  pub ladder: LadderConfig,
  /// Quote simulation client.
  #[serde(default)]
  pub simulation: SimulationSection,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Human-readable process name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// Runtime registry TTLs, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
  #[serde(default = "default_bank_ttl")]
  pub bank_ttl_ms: u64,
  #[serde(default = "default_gas_ttl")]
  pub gas_ttl_ms: u64,
  #[serde(default = "default_venue_metadata_ttl")]
  pub venue_metadata_ttl_ms: u64,
  #[serde(default = "default_limits_ttl")]
  pub limits_ttl_ms: u64,
  #[serde(default = "default_sequencer_ttl")]
  pub sequencer_ttl_ms: u64,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      bank_ttl_ms: default_bank_ttl(),
      gas_ttl_ms: default_gas_ttl(),
      venue_metadata_ttl_ms: default_venue_metadata_ttl(),
      limits_ttl_ms: default_limits_ttl(),
      sequencer_ttl_ms: default_sequencer_ttl(),
    }
  }
}

impl RuntimeConfig {
  pub const fn ttls(&self) -> RuntimeTtls {
    RuntimeTtls {
      bank: Duration::from_millis(self.bank_ttl_ms),
      gas: Duration::from_millis(self.gas_ttl_ms),
      venue_metadata: Duration::from_millis(self.venue_metadata_ttl_ms),
      limits: Duration::from_millis(self.limits_ttl_ms),
      sequencer: Duration::from_millis(self.sequencer_ttl_ms),
    }
  }
}

/// Ladder venue client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LadderConfig {
  /// Metadata slot TTL (milliseconds).
  #[serde(default = "default_ladder_metadata_ttl")]
  pub metadata_ttl_ms: u64,
}

impl Default for LadderConfig {
  fn default() -> Self {
    Self {
      metadata_ttl_ms: default_ladder_metadata_ttl(),
    }
  }
}

impl LadderConfig {
  pub const fn metadata_ttl(&self) -> Duration {
    Duration::from_millis(self.metadata_ttl_ms)
  }
}

/// Quote simulation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSection {
  /// Largest accepted `|marginal - quoted|` odds delta.
  #[serde(default = "default_delta_odd_reject")]
  pub delta_odd_reject: f64,
  /// Quote margin stamped on engine-derived limits snapshots.
  #[serde(default)]
  pub limits_margin: f64,
}

impl Default for SimulationSection {
  fn default() -> Self {
    Self {
      delta_odd_reject: default_delta_odd_reject(),
      limits_margin: 0.0,
    }
  }
}

impl SimulationSection {
  pub const fn simulation_config(&self) -> SimulationConfig {
    SimulationConfig {
      delta_odd_reject: self.delta_odd_reject,
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "venue-runtime".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_bank_ttl() -> u64 {
  5_000
}

const fn default_gas_ttl() -> u64 {
  2_000
}

const fn default_venue_metadata_ttl() -> u64 {
  800
}

const fn default_limits_ttl() -> u64 {
  2_500
}

const fn default_sequencer_ttl() -> u64 {
  1_000
}

const fn default_ladder_metadata_ttl() -> u64 {
  800
}

const fn default_delta_odd_reject() -> f64 {
  0.02
}
