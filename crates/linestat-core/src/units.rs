//! Unit newtypes for the electrical quantities handled by the classifier.
//!
//! Ratings, angles and sampling parameters are easy to mix up when they are all
//! bare `f64`s (a rated current passed where a rated voltage belongs, degrees fed to
//! `sin`). These wrappers make such mistakes a compile error.
//!
//! All types are `#[repr(transparent)]` over `f64`.
//!
//! ```
//! use linestat_core::units::{Amperes, Degrees, Volts};
//!
//! let rated = Volts(250_000.0);
//! let angle = Degrees(390.0).wrapped();
//! assert_eq!(angle, Degrees(30.0));
//! assert_eq!(rated / Volts(125_000.0), 2.0);
//! let _ = Amperes(25.0) + Amperes(5.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Angles further than this from zero are pre-reduced with `%` before the
/// ±360° stepping in [`Degrees::wrapped`].
const WRAP_STEP_LIMIT: f64 = 360.0 * 8.0;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

// =============================================================================
// Electrical Units
// =============================================================================

/// Voltage in volts (V), RMS
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Volts(pub f64);

impl_unit_ops!(Volts, "V");

/// Current in amperes (A), RMS
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Amperes(pub f64);

impl_unit_ops!(Amperes, "A");

// =============================================================================
// Angle Units
// =============================================================================

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(pub f64);

impl_unit_ops!(Radians, "rad");

/// Angle in degrees
///
/// Phase angles are stored and reported in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl_unit_ops!(Degrees, "deg");

impl Radians {
    /// Convert to degrees
    #[inline]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }
}

impl Degrees {
    /// Convert to radians
    #[inline]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }

    /// Fold the angle into the canonical range (-180°, 180°].
    ///
    /// Steps by whole turns so that 180° stays 180° and -180° becomes 180°.
    /// Non-finite angles are returned unchanged.
    pub fn wrapped(self) -> Self {
        let mut angle = self.0;
        if !angle.is_finite() {
            return self;
        }
        if angle.abs() > WRAP_STEP_LIMIT {
            angle %= 360.0;
        }
        while angle > 180.0 {
            angle -= 360.0;
        }
        while angle <= -180.0 {
            angle += 360.0;
        }
        Degrees(angle)
    }
}

impl From<Radians> for Degrees {
    fn from(r: Radians) -> Self {
        r.to_degrees()
    }
}

impl From<Degrees> for Radians {
    fn from(d: Degrees) -> Self {
        d.to_radians()
    }
}

// =============================================================================
// Sampling Units
// =============================================================================

/// Time in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(pub f64);

impl_unit_ops!(Seconds, "s");

/// Frequency in hertz
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hertz(pub f64);

impl_unit_ops!(Hertz, "Hz");

impl Hertz {
    /// Sampling period for this rate.
    #[inline]
    pub fn period(self) -> Seconds {
        Seconds(1.0 / self.0)
    }
}
