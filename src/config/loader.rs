//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    bank_ttl_ms = config.runtime.bank_ttl_ms,
    gas_ttl_ms = config.runtime.gas_ttl_ms,
    ladder_metadata_ttl_ms = config.ladder.metadata_ttl_ms,
    delta_odd_reject = config.simulation.delta_odd_reject,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Strictly positive TTLs
/// - A finite, positive odds delta threshold
/// - A finite, non-negative limits margin
fn validate_config(config: &AppConfig) -> Result<()> {
  let runtime = &config.runtime;
  for (field, ttl_ms) in [
    ("runtime.bank_ttl_ms", runtime.bank_ttl_ms),
    ("runtime.gas_ttl_ms", runtime.gas_ttl_ms),
    ("runtime.venue_metadata_ttl_ms", runtime.venue_metadata_ttl_ms),
    ("runtime.limits_ttl_ms", runtime.limits_ttl_ms),
    ("runtime.sequencer_ttl_ms", runtime.sequencer_ttl_ms),
    ("ladder.metadata_ttl_ms", config.ladder.metadata_ttl_ms),
  ] {
    anyhow::ensure!(ttl_ms > 0, "{field} must be positive, got {ttl_ms}");
  }

  let delta = config.simulation.delta_odd_reject;
  anyhow::ensure!(
    delta.is_finite() && delta > 0.0,
    "simulation.delta_odd_reject must be finite and positive, got {}",
    delta
  );

  let margin = config.simulation.limits_margin;
  anyhow::ensure!(
    margin.is_finite() && margin >= 0.0,
    "simulation.limits_margin must be finite and non-negative, got {}",
    margin
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.bot.log_level, "info");
    assert_eq!(config.runtime.bank_ttl_ms, 5_000);
    assert_eq!(config.runtime.venue_metadata_ttl_ms, 800);
    assert_eq!(config.ladder.metadata_ttl_ms, 800);
    assert_eq!(config.simulation.delta_odd_reject, 0.02);
    assert!(config.runtime.ttls().validate().is_ok());
  }

  #[test]
  fn test_sections_override_defaults() {
    let config = parse_config(
      r#"
        [runtime]
        gas_ttl_ms = 500

        [simulation]
        delta_odd_reject = 0.005
        limits_margin = 0.03
      "#,
    )
    .unwrap();
    assert_eq!(config.runtime.ttls().gas.as_millis(), 500);
    assert_eq!(config.runtime.limits_ttl_ms, 2_500);
    assert_eq!(config.simulation.simulation_config().delta_odd_reject, 0.005);
  }

  #[test]
  fn test_zero_ttl_rejected() {
    let err = parse_config("[ladder]\nmetadata_ttl_ms = 0\n").unwrap_err();
    assert!(err.to_string().contains("ladder.metadata_ttl_ms"));
  }

  #[test]
  fn test_non_positive_delta_rejected() {
    assert!(parse_config("[simulation]\ndelta_odd_reject = 0.0\n").is_err());
    assert!(parse_config("[simulation]\nlimits_margin = -0.1\n").is_err());
  }
}
