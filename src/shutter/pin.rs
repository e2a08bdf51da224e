//! GPIO-driven shutter release.

use core::time::Duration;

use embedded_hal::digital::OutputPin;

use crate::config::units::Instant;
use crate::error::ShutterError;

use super::Shutter;

/// Shutter release wired to one output pin, active high.
pub struct PinShutter<P: OutputPin> {
    pin: P,
    pulse: Duration,
    release_at: Option<Instant>,
}

impl<P: OutputPin> PinShutter<P> {
    /// Create a shutter holding the pin active for `pulse` per release.
    pub fn new(pin: P, pulse: Duration) -> Self {
        Self {
            pin,
            pulse,
            release_at: None,
        }
    }

    /// Pulse length.
    #[inline]
    pub fn pulse(&self) -> Duration {
        self.pulse
    }

    /// Release the pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Shutter for PinShutter<P> {
    fn fire(&mut self, now: Instant) -> Result<(), ShutterError> {
        if self.release_at.is_some() {
            return Ok(());
        }

        self.pin.set_high().map_err(|_| ShutterError::PinError)?;
        self.release_at = Some(now + self.pulse);
        Ok(())
    }

    fn poll(&mut self, now: Instant) -> Result<(), ShutterError> {
        match self.release_at {
            Some(due) if now >= due => {
                self.pin.set_low().map_err(|_| ShutterError::PinError)?;
                self.release_at = None;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    #[inline]
    fn is_busy(&self) -> bool {
        self.release_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::millis;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn test_pulse_ends_after_deadline() {
        let mut pin = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut shutter = PinShutter::new(pin.clone(), millis(50));

        shutter.fire(Instant::from_millis(100)).unwrap();
        assert!(shutter.is_busy());

        shutter.poll(Instant::from_millis(149)).unwrap();
        assert!(shutter.is_busy());

        shutter.poll(Instant::from_millis(150)).unwrap();
        assert!(!shutter.is_busy());

        pin.done();
    }

    #[test]
    fn test_fire_while_busy_is_ignored() {
        let mut pin = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut shutter = PinShutter::new(pin.clone(), millis(50));

        shutter.fire(Instant::ZERO).unwrap();
        shutter.fire(Instant::from_millis(10)).unwrap();
        assert!(shutter.is_busy());

        pin.done();
    }
}
