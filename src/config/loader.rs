//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::RailConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
///
/// ```rust,ignore
/// use stacking_rail::load_config;
///
/// let config = load_config("rail.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RailConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = truncated(&e.to_string());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<RailConfig> {
    let config: RailConfig = toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    info!(
        "rail config loaded: travel={} speed={}",
        config.rail.travel_limit_steps,
        config.rail.max_speed_steps_per_sec
    );

    Ok(config)
}

/// Copy as much of `msg` as fits, cutting on a char boundary.
fn truncated(msg: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
