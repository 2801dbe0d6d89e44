//! S/Z/Y parameter bundles and their derived scalar figures of merit.

use crate::math::{Scalar, C};

/// Scattering parameters of a two-port, referenced to the impedance the
/// producing conversion was given. The bundle itself does not record `Z0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SParameters {
    /// Reflection at port 1.
    pub s11: C,
    /// Reverse transmission.
    pub s12: C,
    /// Forward transmission.
    pub s21: C,
    /// Reflection at port 2.
    pub s22: C,
}

impl SParameters {
    /// Constructs the bundle from its four entries.
    #[must_use]
    pub fn new(s11: C, s12: C, s21: C, s22: C) -> Self {
        Self { s11, s12, s21, s22 }
    }

    /// Determinant `S11·S22 - S12·S21`.
    #[must_use]
    pub fn determinant(&self) -> C {
        self.s11 * self.s22 - self.s12 * self.s21
    }

    /// Return loss in dB, `-20·log10|S11|`. Positive for passive networks,
    /// `+inf` at a perfect match.
    #[must_use]
    pub fn return_loss_db(&self) -> Scalar {
        -20.0 * self.s11.norm().log10()
    }

    /// Insertion loss in dB, `-20·log10|S21|`.
    #[must_use]
    pub fn insertion_loss_db(&self) -> Scalar {
        -20.0 * self.s21.norm().log10()
    }

    /// Voltage standing-wave ratio `(1 + |S11|) / (1 - |S11|)`.
    /// `+inf` at total reflection.
    #[must_use]
    pub fn vswr(&self) -> Scalar {
        let mag = self.s11.norm();
        if mag >= 1.0 {
            return Scalar::INFINITY;
        }
        (1.0 + mag) / (1.0 - mag)
    }

    /// Returns `|S11|` in dB.
    #[must_use]
    pub fn s11_db(&self) -> Scalar {
        crate::math::db20_floored(self.s11.norm())
    }

    /// Returns `|S21|` in dB.
    #[must_use]
    pub fn s21_db(&self) -> Scalar {
        crate::math::db20_floored(self.s21.norm())
    }

    /// Phase of `S11` in degrees.
    #[must_use]
    pub fn s11_phase_deg(&self) -> Scalar {
        self.s11.arg().to_degrees()
    }

    /// Phase of `S21` in degrees.
    #[must_use]
    pub fn s21_phase_deg(&self) -> Scalar {
        self.s21.arg().to_degrees()
    }
}

/// Open-circuit impedance parameters of a two-port.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZParameters {
    /// Driving-point impedance at port 1.
    pub z11: C,
    /// Reverse transfer impedance.
    pub z12: C,
    /// Forward transfer impedance.
    pub z21: C,
    /// Driving-point impedance at port 2.
    pub z22: C,
}

impl ZParameters {
    /// Determinant `Z11·Z22 - Z12·Z21`.
    #[must_use]
    pub fn determinant(&self) -> C {
        self.z11 * self.z22 - self.z12 * self.z21
    }
}

/// Short-circuit admittance parameters of a two-port.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YParameters {
    /// Driving-point admittance at port 1.
    pub y11: C,
    /// Reverse transfer admittance.
    pub y12: C,
    /// Forward transfer admittance.
    pub y21: C,
    /// Driving-point admittance at port 2.
    pub y22: C,
}

impl YParameters {
    /// Determinant `Y11·Y22 - Y12·Y21`.
    #[must_use]
    pub fn determinant(&self) -> C {
        self.y11 * self.y22 - self.y12 * self.y21
    }
}
