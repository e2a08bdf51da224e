//! Physical travel bound of the rail.

use super::units::Steps;

/// Hard travel bound `[0, max]` in steps.
///
/// Every absolute target handed to the rail is clamped into this range; a
/// target outside it is never surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TravelLimits {
    max: Steps,
}

impl TravelLimits {
    /// Create limits spanning `[0, max]`. Negative maxima collapse to zero.
    pub const fn new(max: Steps) -> Self {
        Self {
            max: if max.0 < 0 { Steps(0) } else { max },
        }
    }

    /// Home end of travel.
    #[inline]
    pub const fn min(&self) -> Steps {
        Steps::ZERO
    }

    /// Far end of travel.
    #[inline]
    pub const fn max(&self) -> Steps {
        self.max
    }

    /// Check if a position is within limits.
    #[inline]
    pub fn contains(&self, position: Steps) -> bool {
        position >= self.min() && position <= self.max
    }

    /// Clamp a target into the travel bound.
    #[inline]
    pub fn clamp(&self, target: Steps) -> Steps {
        Steps(target.0.clamp(0, self.max.0))
    }
}
