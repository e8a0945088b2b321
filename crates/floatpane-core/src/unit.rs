//! Unit types: Dp and display-density conversion

/// Density-independent pixels
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Dp(pub f32);

impl Dp {
    pub fn to_px(&self, density: f32) -> f32 {
        self.0 * density
    }

    pub fn from_px(px: f32, density: f32) -> Self {
        Self(px / density)
    }
}

/// Source of the display's physical pixel density.
///
/// Implementations must report the *system* density, not any per-context
/// value an application-level scaling framework may have substituted.
/// Gesture thresholds are physical distances; resolving them against an
/// overridden density would make the same finger travel register
/// differently depending on UI-scaling configuration. Injecting the
/// provider also lets tests supply deterministic values.
pub trait DensityProvider {
    fn system_density(&self) -> f32;
}

/// A density provider returning a fixed scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedDensity(pub f32);

impl DensityProvider for FixedDensity {
    fn system_density(&self) -> f32 {
        self.0
    }
}
