use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI
/// flags override these per invocation; the env vars set the defaults.
pub struct Config {
    /// Path to the SQLite snapshot store (GRAPHITE_DB_PATH).
    pub db_path: String,
    /// Default decay factor for composite profiles (GRAPHITE_DECAY).
    pub decay_factor: f64,
    /// Default drift threshold (GRAPHITE_DRIFT_THRESHOLD).
    pub drift_threshold: f64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Ranges are validated here so a bad value fails at startup, not
    /// halfway through a batch scan.
    pub fn load() -> Result<Self> {
        let db_path =
            env::var("GRAPHITE_DB_PATH").unwrap_or_else(|_| "./graphite.db".to_string());

        let decay_factor = parse_f64("GRAPHITE_DECAY", 0.5)?;
        if !(decay_factor > 0.0 && decay_factor <= 1.0) {
            anyhow::bail!("GRAPHITE_DECAY must be in (0, 1], got {decay_factor}");
        }

        let drift_threshold = parse_f64("GRAPHITE_DRIFT_THRESHOLD", 0.1)?;
        if !(drift_threshold >= 0.0) {
            anyhow::bail!("GRAPHITE_DRIFT_THRESHOLD must be >= 0, got {drift_threshold}");
        }

        Ok(Self {
            db_path,
            decay_factor,
            drift_threshold,
        })
    }
}

fn parse_f64(var: &str, default: f64) -> Result<f64> {
    match env::var(var) {
        Ok(raw) => raw
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("{var} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
