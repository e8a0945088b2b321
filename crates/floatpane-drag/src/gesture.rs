//! Shared gesture constants for touch-intent classification.
//!
//! Intent is decided from the raw down and up coordinates of a touch
//! sequence, never from intermediate move events: some devices emit spurious
//! moves while the finger is stationary, so "did a move event arrive" is not
//! a usable signal.

use floatpane_core::{DensityProvider, Dp};

/// Minimum travel between touch-down and touch-up for the sequence to count
/// as a drag rather than a tap.
///
/// Down and up coordinates never match exactly on real digitizers; across a
/// range of devices the observed error stays inside 1dp. Platform touch-slop
/// constants are tuned for scroll disambiguation and come out roughly an
/// order of magnitude larger (8dp-class), which misclassifies short
/// deliberate drags as taps. The threshold is resolved against the *system*
/// density so that UI-scaling frameworks overriding the per-context density
/// cannot change the physical distance.
pub const MIN_TOUCH_DISTANCE: Dp = Dp(1.0);

/// [`MIN_TOUCH_DISTANCE`] converted to raw pixels for the given display.
pub fn min_touch_distance(density: &dyn DensityProvider) -> f32 {
    MIN_TOUCH_DISTANCE.to_px(density.system_density())
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatpane_core::FixedDensity;

    #[test]
    fn threshold_scales_with_system_density() {
        assert_eq!(min_touch_distance(&FixedDensity(1.0)), 1.0);
        assert_eq!(min_touch_distance(&FixedDensity(3.0)), 3.0);
    }
}
