//! Phasor arithmetic.
//!
//! A [`Phasor`] is the complex representation of a steady-state sinusoid: an RMS
//! magnitude and a phase angle in degrees. Each value carries both its polar and
//! Cartesian forms; every constructor derives one from the other so they never
//! disagree beyond floating-point rounding.
//!
//! ## Algebra
//!
//! | Operation | Computed in | Angle handling |
//! |-----------|-------------|----------------|
//! | `a + b`, `a - b` | Cartesian | recovered from the components |
//! | `a * b` | polar | `θa + θb`, wrapped into (-180°, 180°] |
//! | `a / b` | polar | `θa - θb`, wrapped |
//! | `a.pow(p)` | polar | `θa · p`, wrapped |
//!
//! ## Edge cases
//!
//! Division by the zero phasor and raising the zero phasor to a non-positive power are
//! undefined. [`Phasor::checked_div`] and [`Phasor::checked_pow`] report them as
//! [`PhasorError`]; the `/` operator and [`Phasor::pow`] log a warning and return
//! [`Phasor::ZERO`] instead.
//!
//! ```
//! use linestat_core::{Degrees, Phasor};
//!
//! let v = Phasor::new(120.0, Degrees(30.0));
//! let i = Phasor::new(10.0, Degrees(-15.0));
//! let z = v / i;
//! assert!((z.rms() - 12.0).abs() < 1e-12);
//! assert!((z.angle().0 - 45.0).abs() < 1e-12);
//!
//! assert_eq!(v / Phasor::ZERO, Phasor::ZERO);
//! ```

use crate::error::PhasorError;
use crate::units::Degrees;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use tracing::warn;

/// Complex representation of a sinusoidal quantity.
///
/// Serialized in polar form as `{ "rms": .., "angle_deg": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolarForm", into = "PolarForm")]
pub struct Phasor {
    rms: f64,
    angle_deg: f64,
    cartesian: Complex64,
}

/// Wire form of a phasor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PolarForm {
    rms: f64,
    angle_deg: f64,
}

impl From<PolarForm> for Phasor {
    fn from(p: PolarForm) -> Self {
        Phasor::new(p.rms, Degrees(p.angle_deg))
    }
}

impl From<Phasor> for PolarForm {
    fn from(p: Phasor) -> Self {
        PolarForm {
            rms: p.rms,
            angle_deg: p.angle_deg,
        }
    }
}

impl Default for Phasor {
    fn default() -> Self {
        Phasor::ZERO
    }
}

impl Phasor {
    /// The zero phasor: magnitude 0, angle 0.
    pub const ZERO: Phasor = Phasor {
        rms: 0.0,
        angle_deg: 0.0,
        cartesian: Complex64::new(0.0, 0.0),
    };

    /// Build a phasor from its RMS magnitude (base units) and phase angle.
    ///
    /// The angle is folded into (-180°, 180°]. The magnitude is taken as given;
    /// a negative magnitude is not rejected.
    pub fn new(rms: f64, angle: Degrees) -> Self {
        Self::from_wrapped_polar(rms, angle.wrapped().0)
    }

    /// Build a phasor from its real and imaginary parts.
    pub fn from_rectangular(re: f64, im: f64) -> Self {
        Self::from_complex(Complex64::new(re, im))
    }

    /// Build a phasor from a complex number.
    ///
    /// The angle is recovered quadrant by quadrant from `atan(im / re)`. A zero real
    /// part maps to -90°, 0° or 90° depending on the sign of the imaginary part.
    pub fn from_complex(cartesian: Complex64) -> Self {
        Phasor {
            rms: cartesian.re.hypot(cartesian.im),
            angle_deg: angle_of(cartesian),
            cartesian,
        }
    }

    fn from_wrapped_polar(rms: f64, angle_deg: f64) -> Self {
        let theta = angle_deg.to_radians();
        Phasor {
            rms,
            angle_deg,
            cartesian: Complex64::new(rms * theta.cos(), rms * theta.sin()),
        }
    }

    /// RMS magnitude in base units
    #[inline]
    pub fn rms(&self) -> f64 {
        self.rms
    }

    /// Phase angle, always in (-180°, 180°] for finite inputs
    #[inline]
    pub fn angle(&self) -> Degrees {
        Degrees(self.angle_deg)
    }

    /// Real part of the Cartesian form
    #[inline]
    pub fn re(&self) -> f64 {
        self.cartesian.re
    }

    /// Imaginary part of the Cartesian form
    #[inline]
    pub fn im(&self) -> f64 {
        self.cartesian.im
    }

    /// Cartesian form as a complex number
    #[inline]
    pub fn to_complex(&self) -> Complex64 {
        self.cartesian
    }

    /// True when the magnitude is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.rms == 0.0
    }

    /// True when both the magnitude and the angle are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.rms.is_finite() && self.angle_deg.is_finite()
    }

    /// Divide, reporting division by the zero phasor.
    pub fn checked_div(self, rhs: Phasor) -> Result<Phasor, PhasorError> {
        if rhs.rms == 0.0 {
            return Err(PhasorError::DivisionByZero);
        }
        Ok(Self::new(
            self.rms / rhs.rms,
            Degrees(self.angle_deg - rhs.angle_deg),
        ))
    }

    /// Raise to a real power, reporting the zero phasor raised to a non-positive power.
    pub fn checked_pow(self, exponent: f64) -> Result<Phasor, PhasorError> {
        if self.rms == 0.0 && exponent <= 0.0 {
            return Err(PhasorError::InvalidPower { exponent });
        }
        Ok(Self::new(
            self.rms.powf(exponent),
            Degrees(self.angle_deg * exponent),
        ))
    }

    /// Raise to a real power, falling back to [`Phasor::ZERO`] when undefined.
    pub fn pow(self, exponent: f64) -> Phasor {
        self.checked_pow(exponent).unwrap_or_else(|err| {
            warn!(base = %self, exponent, "{err}; using the zero phasor");
            Phasor::ZERO
        })
    }
}

/// Angle in degrees of a Cartesian pair.
fn angle_of(c: Complex64) -> f64 {
    if c.re == 0.0 {
        return if c.im < 0.0 {
            -90.0
        } else if c.im > 0.0 {
            90.0
        } else {
            0.0
        };
    }
    let angle = (c.im / c.re).atan().to_degrees();
    match (c.re < 0.0, c.im >= 0.0) {
        (true, true) => angle + 180.0,
        (true, false) => angle - 180.0,
        _ => angle,
    }
}

impl Add for Phasor {
    type Output = Phasor;
    fn add(self, rhs: Phasor) -> Phasor {
        Phasor::from_complex(self.cartesian + rhs.cartesian)
    }
}

impl Sub for Phasor {
    type Output = Phasor;
    fn sub(self, rhs: Phasor) -> Phasor {
        Phasor::from_complex(self.cartesian - rhs.cartesian)
    }
}

impl Mul for Phasor {
    type Output = Phasor;
    fn mul(self, rhs: Phasor) -> Phasor {
        Phasor::new(self.rms * rhs.rms, Degrees(self.angle_deg + rhs.angle_deg))
    }
}

/// Scale by a real factor (a phasor at 0°).
impl Mul<f64> for Phasor {
    type Output = Phasor;
    fn mul(self, rhs: f64) -> Phasor {
        self * Phasor::new(rhs, Degrees(0.0))
    }
}

impl Div for Phasor {
    type Output = Phasor;
    fn div(self, rhs: Phasor) -> Phasor {
        self.checked_div(rhs).unwrap_or_else(|err| {
            warn!(dividend = %self, "{err}; using the zero phasor");
            Phasor::ZERO
        })
    }
}

/// Divide by a real divisor (a phasor at 0°). Used for per-unit normalization.
impl Div<f64> for Phasor {
    type Output = Phasor;
    fn div(self, rhs: f64) -> Phasor {
        self / Phasor::new(rhs, Degrees(0.0))
    }
}

impl From<Complex64> for Phasor {
    fn from(c: Complex64) -> Self {
        Phasor::from_complex(c)
    }
}

impl From<Phasor> for Complex64 {
    fn from(p: Phasor) -> Self {
        p.cartesian
    }
}

impl fmt::Display for Phasor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} @ {:.*}deg", p, self.rms, p, self.angle_deg),
            None => write!(f, "{} @ {}deg", self.rms, self.angle_deg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn assert_phasor_close(actual: Phasor, rms: f64, angle: f64) {
        assert!(
            (actual.rms() - rms).abs() < TOL,
            "rms {} != {}",
            actual.rms(),
            rms
        );
        assert!(
            (actual.angle().0 - angle).abs() < TOL,
            "angle {} != {}",
            actual.angle().0,
            angle
        );
    }

    #[test]
    fn test_polar_round_trip() {
        for &(rms, angle) in &[
            (0.0, 0.0),
            (1.0, 180.0),
            (120.0, 30.0),
            (25.0, -165.0),
            (250_000.0, 15.0),
            (3.5, -179.999),
            (7.0, 90.0),
            (7.0, -90.0),
        ] {
            let p = Phasor::new(rms, Degrees(angle));
            assert_phasor_close(p, rms, angle);
            let back = Phasor::from_rectangular(p.re(), p.im());
            if rms > 0.0 {
                assert!((back.rms() - rms).abs() < 1e-9 * rms.max(1.0));
                assert!((back.angle().0 - angle).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_rectangular_round_trip() {
        for &(re, im) in &[(3.0, 4.0), (-3.0, 4.0), (-3.0, -4.0), (3.0, -4.0), (0.0, 2.0)] {
            let p = Phasor::from_rectangular(re, im);
            let q = Phasor::new(p.rms(), p.angle());
            assert!((q.re() - re).abs() < TOL);
            assert!((q.im() - im).abs() < TOL);
        }
    }

    #[test]
    fn test_angle_of_axes() {
        assert_phasor_close(Phasor::from_rectangular(0.0, 5.0), 5.0, 90.0);
        assert_phasor_close(Phasor::from_rectangular(0.0, -5.0), 5.0, -90.0);
        assert_phasor_close(Phasor::from_rectangular(-5.0, 0.0), 5.0, 180.0);
        assert_phasor_close(Phasor::from_rectangular(5.0, 0.0), 5.0, 0.0);
        assert_eq!(Phasor::from_rectangular(0.0, 0.0), Phasor::ZERO);
    }

    #[test]
    fn test_negative_zero_imaginary_stays_at_180() {
        let p = Phasor::from_rectangular(-2.0, -0.0);
        assert_phasor_close(p, 2.0, 180.0);
    }

    #[test]
    fn test_new_wraps_angle() {
        assert_phasor_close(Phasor::new(1.0, Degrees(-180.0)), 1.0, 180.0);
        assert_phasor_close(Phasor::new(1.0, Degrees(370.0)), 1.0, 10.0);
    }

    #[test]
    fn test_add_and_sub() {
        let a = Phasor::from_rectangular(1.0, 2.0);
        let b = Phasor::from_rectangular(3.0, -1.0);
        let sum = a + b;
        assert!((sum.re() - 4.0).abs() < TOL);
        assert!((sum.im() - 1.0).abs() < TOL);

        let diff = a - b;
        assert!((diff.re() + 2.0).abs() < TOL);
        assert!((diff.im() - 3.0).abs() < TOL);
    }

    #[test]
    fn test_sub_to_pure_imaginary() {
        let a = Phasor::from_rectangular(2.0, 1.0);
        let b = Phasor::from_rectangular(2.0, 4.0);
        assert_phasor_close(a - b, 3.0, -90.0);
    }

    #[test]
    fn test_self_difference_is_zero() {
        let p = Phasor::new(25.0, Degrees(-165.0));
        assert_eq!((p - p).rms(), 0.0);
    }

    #[test]
    fn test_mul_wraps() {
        let a = Phasor::new(2.0, Degrees(170.0));
        let b = Phasor::new(3.0, Degrees(20.0));
        assert_phasor_close(a * b, 6.0, -170.0);
    }

    #[test]
    fn test_div_wraps() {
        let a = Phasor::new(6.0, Degrees(-170.0));
        let b = Phasor::new(3.0, Degrees(20.0));
        assert_phasor_close(a / b, 2.0, 170.0);
    }

    #[test]
    fn test_mul_div_angles_canonical() {
        let angles = [-179.5, -120.0, -90.0, -1.0, 0.0, 45.0, 90.0, 135.0, 180.0];
        for &x in &angles {
            for &y in &angles {
                let a = Phasor::new(2.0, Degrees(x));
                let b = Phasor::new(0.5, Degrees(y));
                for p in [a * b, a / b] {
                    let angle = p.angle().0;
                    assert!(angle > -180.0 && angle <= 180.0, "angle {angle} out of range");
                }
            }
        }
    }

    #[test]
    fn test_division_by_zero() {
        let a = Phasor::new(120.0, Degrees(30.0));
        assert_eq!(a.checked_div(Phasor::ZERO), Err(PhasorError::DivisionByZero));
        assert_eq!(a / Phasor::ZERO, Phasor::ZERO);

        // A zero magnitude with a non-zero angle is still the zero phasor
        let zero_at_angle = Phasor::new(0.0, Degrees(45.0));
        assert_eq!(a / zero_at_angle, Phasor::ZERO);
        assert_eq!(a / 0.0, Phasor::ZERO);
    }

    #[test]
    fn test_zero_to_non_positive_power() {
        for exponent in [0.0, -1.0, -0.5] {
            assert_eq!(
                Phasor::ZERO.checked_pow(exponent),
                Err(PhasorError::InvalidPower { exponent })
            );
            assert_eq!(Phasor::ZERO.pow(exponent), Phasor::ZERO);
        }
    }

    #[test]
    fn test_zero_to_positive_power() {
        let p = Phasor::ZERO.checked_pow(2.0).unwrap();
        assert_eq!(p.rms(), 0.0);
    }

    #[test]
    fn test_pow() {
        let p = Phasor::new(2.0, Degrees(100.0));
        assert_phasor_close(p.pow(2.0), 4.0, -160.0);
        assert_phasor_close(p.pow(0.5), 2f64.sqrt(), 50.0);
        assert_phasor_close(p.pow(-1.0), 0.5, -100.0);
    }

    #[test]
    fn test_is_finite() {
        assert!(Phasor::new(1.0, Degrees(30.0)).is_finite());
        assert!(Phasor::ZERO.is_finite());
        assert!(!Phasor::new(f64::NAN, Degrees(0.0)).is_finite());
        assert!(!Phasor::new(1.0, Degrees(f64::INFINITY)).is_finite());
    }

    #[test]
    fn test_scalar_normalization_keeps_angle() {
        let i = Phasor::new(25.0, Degrees(15.0));
        let pu = i / 25.0;
        assert_eq!(pu.rms(), 1.0);
        assert_eq!(pu.angle(), Degrees(15.0));
        assert_phasor_close(i * 2.0, 50.0, 15.0);
    }

    #[test]
    fn test_complex_conversion() {
        let c = Complex64::new(0.0, -3.0);
        let p: Phasor = c.into();
        assert_phasor_close(p, 3.0, -90.0);
        let back: Complex64 = p.into();
        assert_eq!(back, c);
    }

    #[test]
    fn test_display() {
        let p = Phasor::new(120.0, Degrees(30.0));
        assert_eq!(p.to_string(), "120 @ 30deg");
        assert_eq!(format!("{:.2}", p), "120.00 @ 30.00deg");
    }

    #[test]
    fn test_serde_polar_form() {
        let p = Phasor::new(25.0, Degrees(-165.0));
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"rms":25.0,"angle_deg":-165.0}"#);
        let back: Phasor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
