//! Camera trigger.
//!
//! The controller only needs to start a pulse and later learn that it is
//! over; [`PinShutter`] does that over a single embedded-hal output pin.

mod pin;

pub use pin::PinShutter;

use crate::config::units::Instant;
use crate::error::ShutterError;

/// Shutter interface of the camera.
pub trait Shutter {
    /// Start one trigger pulse of the configured length.
    fn fire(&mut self, now: Instant) -> Result<(), ShutterError>;

    /// End the pulse once its deadline has passed.
    fn poll(&mut self, now: Instant) -> Result<(), ShutterError>;

    /// Whether a pulse is still in progress.
    fn is_busy(&self) -> bool;
}
