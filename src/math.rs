//! Shared numeric primitives and guard helpers.

use num_complex::Complex;

use crate::errors::{CascadeError, Result};

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for phasors.
pub type C = Complex<Scalar>;

/// Absolute magnitude below which a denominator is treated as singular.
pub const DENOM_GUARD: Scalar = 1e-20;
/// Default tolerance for matrix predicates (reciprocal, symmetric, lossless).
pub const DEFAULT_TOLERANCE: Scalar = 1e-10;

/// Complex division guarded against vanishing denominators.
///
/// Returns [`CascadeError::Singular`] with the given context when the
/// denominator magnitude falls below [`DENOM_GUARD`].
pub fn guarded_div(numerator: C, denominator: C, context: &str) -> Result<C> {
    if denominator.norm() < DENOM_GUARD {
        return Err(CascadeError::Singular(context.to_owned()));
    }
    Ok(numerator / denominator)
}

/// Clamps a Smith-chart coordinate to the closed unit interval `[-1, 1]`.
///
/// A non-finite coordinate (an infinite impedance pushed through the bilinear
/// map) collapses to the +1 bound.
#[must_use]
pub fn clamp_unit(value: Scalar) -> Scalar {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(-1.0, 1.0)
}

/// Magnitude in dB, `20·log10(mag)`, with the very-small floor the plotting
/// accessors use to keep the result finite.
#[must_use]
pub fn db20_floored(mag: Scalar) -> Scalar {
    const MIN: Scalar = 1e-300;
    20.0 * mag.max(MIN).log10()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn guarded_div_rejects_small_denominators() {
        let num = C::new(1.0, 0.0);
        let den = C::new(1e-21, 0.0);
        assert!(matches!(
            guarded_div(num, den, "test"),
            Err(CascadeError::Singular(_))
        ));
    }

    #[test]
    fn guarded_div_passes_regular_values() {
        let q = guarded_div(C::new(1.0, 0.0), C::new(2.0, 0.0), "test").unwrap();
        assert_relative_eq!(q.re, 0.5, epsilon = 1e-15);
    }

    #[test]
    fn clamp_unit_bounds_and_nan() {
        assert_relative_eq!(clamp_unit(0.25), 0.25);
        assert_relative_eq!(clamp_unit(3.0), 1.0);
        assert_relative_eq!(clamp_unit(-7.5), -1.0);
        assert_relative_eq!(clamp_unit(Scalar::NAN), 1.0);
    }

    #[test]
    fn db20_of_unity_is_zero() {
        assert_relative_eq!(db20_floored(1.0), 0.0, epsilon = 1e-12);
    }
}
