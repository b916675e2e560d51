//! Venue Runtime - Entry Point
//!
//! Loads configuration, initializes logging, and checks that every TTL and
//! threshold would be accepted by the runtime cache and both venue clients.
//! Venue transports are wired by the embedding service; this binary only
//! validates and reports the effective runtime parameters.
//!
//! Wiring sequence:
//! 1. Load config.toml (path from the first argument) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Validate runtime TTLs and simulation thresholds
//! 4. Report effective parameters

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use anyhow::{Context, Result};
use tracing::info;

use venue_runtime::config;

fn main() -> Result<()> {
    // ── 1. Load configuration ────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config =
        config::loader::load_config(&path).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.bot.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %path,
        "Starting venue runtime"
    );

    // ── 3. Validate with the same rules the runtime enforces ─
    let ttls = config.runtime.ttls();
    ttls.validate().context("Invalid runtime TTLs")?;
    let simulation = config.simulation.simulation_config();
    simulation
        .validate()
        .context("Invalid simulation thresholds")?;

    // ── 4. Report effective parameters ───────────────────────
    info!(
        bank_ttl_ms = ttls.bank.as_millis(),
        gas_ttl_ms = ttls.gas.as_millis(),
        venue_metadata_ttl_ms = ttls.venue_metadata.as_millis(),
        limits_ttl_ms = ttls.limits.as_millis(),
        sequencer_ttl_ms = ttls.sequencer.as_millis(),
        "Runtime registry parameters"
    );
    info!(
        metadata_ttl_ms = config.ladder.metadata_ttl().as_millis(),
        delta_odd_reject = simulation.delta_odd_reject,
        limits_margin = config.simulation.limits_margin,
        "Venue client parameters"
    );

    info!("Configuration valid");
    Ok(())
}
