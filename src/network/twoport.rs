//! ABCD two-port value type, cascade composition, and parameter conversions.

use std::ops::Mul;

use crate::errors::{CascadeError, Result};
use crate::math::{guarded_div, C, DEFAULT_TOLERANCE, DENOM_GUARD};

use super::params::{SParameters, YParameters, ZParameters};

/// ABCD-based two-port network.
///
/// Represents the chain relation `[V1, I1] = [[A, B], [C, D]] · [V2, -I2]`.
/// The value is immutable; every operation returns a new `TwoPort`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPort {
    /// A element of the ABCD matrix.
    pub a: C,
    /// B element of the ABCD matrix.
    pub b: C,
    /// C element of the ABCD matrix.
    pub c: C,
    /// D element of the ABCD matrix.
    pub d: C,
}

impl TwoPort {
    /// Identity two-port (through connection): `[[1, 0], [0, 1]]`.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            a: C::new(1.0, 0.0),
            b: C::new(0.0, 0.0),
            c: C::new(0.0, 0.0),
            d: C::new(1.0, 0.0),
        }
    }

    /// Constructs a two-port from explicit ABCD elements.
    #[must_use]
    pub fn from_abcd(a: C, b: C, c: C, d: C) -> Self {
        Self { a, b, c, d }
    }

    /// Series impedance `Z` represented as a two-port: `[[1, Z], [0, 1]]`.
    #[must_use]
    pub fn series_impedance(z: C) -> Self {
        Self::from_abcd(C::new(1.0, 0.0), z, C::new(0.0, 0.0), C::new(1.0, 0.0))
    }

    /// Shunt admittance `Y` represented as a two-port: `[[1, 0], [Y, 1]]`.
    #[must_use]
    pub fn shunt_admittance(y: C) -> Self {
        Self::from_abcd(C::new(1.0, 0.0), C::new(0.0, 0.0), y, C::new(1.0, 0.0))
    }

    /// ABCD determinant `AD - BC`.
    #[must_use]
    pub fn determinant(&self) -> C {
        self.a * self.d - self.b * self.c
    }

    /// Cascades this two-port with `rhs` (self followed by rhs).
    #[must_use]
    pub fn cascade(&self, rhs: &Self) -> Self {
        Self {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
        }
    }

    /// Cascades a sequence of two-ports from first to last.
    /// Returns identity for an empty sequence.
    #[must_use]
    pub fn cascade_all<'a>(list: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut acc = Self::identity();
        for t in list {
            acc = acc.cascade(t);
        }
        acc
    }

    /// T-section builder: series `za`, shunt `yb`, series `zc`.
    #[must_use]
    pub fn t_section(za: C, yb: C, zc: C) -> Self {
        Self::series_impedance(za)
            .cascade(&Self::shunt_admittance(yb))
            .cascade(&Self::series_impedance(zc))
    }

    /// Π-section builder: shunt `y1`, series `z2`, shunt `y3`.
    #[must_use]
    pub fn pi_section(y1: C, z2: C, y3: C) -> Self {
        Self::shunt_admittance(y1)
            .cascade(&Self::series_impedance(z2))
            .cascade(&Self::shunt_admittance(y3))
    }

    /// True when the network is reciprocal, `|det - 1| < tolerance`.
    #[must_use]
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        (self.determinant() - C::new(1.0, 0.0)).norm() < tolerance
    }

    /// True when the network is symmetric, `|A - D| < tolerance`.
    #[must_use]
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (self.a - self.d).norm() < tolerance
    }

    /// True when the network is lossless: `A`, `D` purely real, `B`, `C`
    /// purely imaginary, and `||det| - 1| < tolerance`.
    #[must_use]
    pub fn is_lossless(&self, tolerance: f64) -> bool {
        self.a.im.abs() < tolerance
            && self.d.im.abs() < tolerance
            && self.b.re.abs() < tolerance
            && self.c.re.abs() < tolerance
            && (self.determinant().norm() - 1.0).abs() < tolerance
    }

    /// Input impedance at port 1 when port 2 is terminated by `z_load`:
    /// `(A·Z_L + B) / (C·Z_L + D)`.
    pub fn input_impedance(&self, z_load: C) -> Result<C> {
        guarded_div(
            self.a * z_load + self.b,
            self.c * z_load + self.d,
            "input impedance",
        )
    }

    /// Output impedance at port 2 when port 1 is driven from `z_source`:
    /// `(D·Z_S + B) / (C·Z_S + A)`.
    pub fn output_impedance(&self, z_source: C) -> Result<C> {
        guarded_div(
            self.d * z_source + self.b,
            self.c * z_source + self.a,
            "output impedance",
        )
    }

    /// Characteristic impedance `sqrt(B/C)`, defined for symmetric networks.
    ///
    /// Returns [`CascadeError::Nonsymmetric`] when `A != D` at the default
    /// tolerance, [`CascadeError::Singular`] when `C` vanishes.
    pub fn characteristic_impedance(&self) -> Result<C> {
        if !self.is_symmetric(DEFAULT_TOLERANCE) {
            return Err(CascadeError::Nonsymmetric);
        }
        Ok(guarded_div(self.b, self.c, "characteristic impedance")?.sqrt())
    }

    /// Voltage transfer `V2/V1` under load `z_load`: `1 / (A + B/Z_L)`.
    pub fn voltage_gain(&self, z_load: C) -> Result<C> {
        let b_over_zl = guarded_div(self.b, z_load, "voltage gain load")?;
        guarded_div(C::new(1.0, 0.0), self.a + b_over_zl, "voltage gain")
    }

    /// Current transfer `I2/I1` under load `z_load`: `1 / (C·Z_L + D)`.
    pub fn current_gain(&self, z_load: C) -> Result<C> {
        guarded_div(C::new(1.0, 0.0), self.c * z_load + self.d, "current gain")
    }

    /// Power gain under a source and load termination.
    ///
    /// Computes `|V2/Vs|² · Re(Z_S) / Re(Z_L)` with the source voltage
    /// divider folded into the voltage transfer.
    pub fn power_gain(&self, z_source: C, z_load: C) -> Result<f64> {
        let vg = self.voltage_gain(z_load)?;
        let z_in = self.input_impedance(z_load)?;
        let divider = guarded_div(z_in, z_source + z_in, "power gain source divider")?;
        if z_load.re.abs() < DENOM_GUARD {
            return Err(CascadeError::Singular(String::from("power gain load")));
        }
        let total = divider * vg;
        Ok(total.norm_sqr() * z_source.re / z_load.re)
    }

    /// Converts to S-parameters referenced to `z0` (real or complex).
    pub fn to_s_parameters(&self, z0: impl Into<C>) -> Result<SParameters> {
        let z0 = z0.into();
        if z0.norm() < DENOM_GUARD {
            return Err(CascadeError::Singular(String::from(
                "S-parameter reference impedance",
            )));
        }
        let b_over_z0 = self.b / z0;
        let c_z0 = self.c * z0;
        let den = self.a + b_over_z0 + c_z0 + self.d;
        if den.norm() < DENOM_GUARD {
            return Err(CascadeError::Singular(String::from(
                "S-parameter conversion",
            )));
        }
        Ok(SParameters {
            s11: (self.a + b_over_z0 - c_z0 - self.d) / den,
            s12: C::new(2.0, 0.0) * self.determinant() / den,
            s21: C::new(2.0, 0.0) / den,
            s22: (-self.a + b_over_z0 - c_z0 + self.d) / den,
        })
    }

    /// Converts to Z-parameters. Requires `|C| >= 1e-20`.
    pub fn to_z_parameters(&self) -> Result<ZParameters> {
        if self.c.norm() < DENOM_GUARD {
            return Err(CascadeError::Singular(String::from(
                "Z-parameter conversion",
            )));
        }
        let det = self.determinant();
        Ok(ZParameters {
            z11: self.a / self.c,
            z12: det / self.c,
            z21: C::new(1.0, 0.0) / self.c,
            z22: self.d / self.c,
        })
    }

    /// Converts to Y-parameters. Requires `|B| >= 1e-20`.
    pub fn to_y_parameters(&self) -> Result<YParameters> {
        if self.b.norm() < DENOM_GUARD {
            return Err(CascadeError::Singular(String::from(
                "Y-parameter conversion",
            )));
        }
        let det = self.determinant();
        Ok(YParameters {
            y11: self.d / self.b,
            y12: -det / self.b,
            y21: -C::new(1.0, 0.0) / self.b,
            y22: self.a / self.b,
        })
    }

    /// Reconstructs the ABCD matrix from S-parameters referenced to `z0`.
    /// Requires `|S21| >= 1e-20`.
    pub fn from_s_parameters(s: &SParameters, z0: impl Into<C>) -> Result<Self> {
        let z0 = z0.into();
        if z0.norm() < DENOM_GUARD {
            return Err(CascadeError::Singular(String::from(
                "S-parameter reference impedance",
            )));
        }
        let one = C::new(1.0, 0.0);
        let den = C::new(2.0, 0.0) * s.s21;
        if den.norm() < DENOM_GUARD {
            return Err(CascadeError::Singular(String::from(
                "ABCD reconstruction from S-parameters",
            )));
        }
        let a = ((one + s.s11) * (one - s.s22) + s.s12 * s.s21) / den;
        let b = z0 * ((one + s.s11) * (one + s.s22) - s.s12 * s.s21) / den;
        let c = ((one - s.s11) * (one - s.s22) - s.s12 * s.s21) / (den * z0);
        let d = ((one - s.s11) * (one + s.s22) + s.s12 * s.s21) / den;
        Ok(Self { a, b, c, d })
    }
}

impl Default for TwoPort {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for TwoPort {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.cascade(&rhs)
    }
}
