//! Motion module for stacking-rail.
//!
//! Provides motion profile calculation and step scheduling.

mod executor;
mod profile;

pub use executor::MotionExecutor;
pub use profile::{Direction, MotionPhase, MotionProfile};
