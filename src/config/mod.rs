//! Configuration module for stacking-rail.
//!
//! Provides the rail configuration loaded from TOML files (with `std` feature)
//! or built in code, plus the unit types shared by the rest of the crate.

mod limits;
#[cfg(feature = "std")]
mod loader;
mod rail;
pub mod units;
mod validation;

pub use limits::TravelLimits;
pub use rail::{DriveConfig, RailConfig, ShutterConfig, TelemetryConfig, WatchdogConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Instant, Steps};
