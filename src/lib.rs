//! # stacking-rail
//!
//! Controller for a motorised focus-stacking camera rail, with embedded-hal
//! 1.0 support.
//!
//! ## Features
//!
//! - **Text command protocol**: finite and continuous jogs, stacking sessions,
//!   manual shutter release
//! - **Cooperative**: one non-blocking [`RailController::tick`] per main-loop
//!   iteration; every wait is a deadline
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR and the shutter, `DelayNs`
//!   for the STEP pulse
//! - **no_std compatible**: core library works without standard library
//! - **Bounded travel**: every target is clamped into `[0, travel_limit]`
//! - **Round trips**: a session that returns to start goes back to the
//!   position it took its first picture from, even when the travel bound cut
//!   its moves short
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stacking_rail::{CommandSlot, Endpoint, PinShutter, RailController, StepperRailBuilder};
//!
//! static COMMANDS: CommandSlot<CriticalSectionRawMutex> = CommandSlot::new();
//!
//! let config = stacking_rail::load_config("rail.toml")?;
//!
//! let rail = StepperRailBuilder::new()
//!     .from_config(&config)
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .delay(delay)
//!     .build()?;
//! let shutter = PinShutter::new(shutter_pin, config.shutter_pulse());
//!
//! let mut controller = RailController::new(rail, shutter, notifier, &config)?;
//!
//! // BLE write callback
//! COMMANDS.post(Endpoint::Stacking, "PRE2;PST3;STP1;STS100;DIRFWD;NST5;RTStrue")?;
//!
//! // main loop
//! loop {
//!     controller.tick(clock.now(), COMMANDS.take());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

// Core modules
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod jog;
pub mod motion;
pub mod motor;
pub mod shutter;
pub mod stacking;
pub mod telemetry;

// Re-exports for ergonomic API
pub use command::{Command, CommandSlot, Endpoint, Inbound};
pub use config::{validate_config, RailConfig, TravelLimits};
pub use controller::RailController;
pub use error::{Error, Result};
pub use jog::{JogController, JogState};
pub use motion::{Direction, MotionPhase, MotionProfile};
pub use motor::{RailMotion, StepperRail, StepperRailBuilder};
pub use shutter::{PinShutter, Shutter};
pub use stacking::{Phase, SessionConfig, SessionOutcome, SessionRequest, StackingSession};
pub use telemetry::{Progress, StackingUpdate, TelemetryFrame, TelemetrySink};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Instant, Steps};
