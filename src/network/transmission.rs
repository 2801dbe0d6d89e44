//! Transmission line primitives, stubs, and the shunt-tee adapter.

use std::f64::consts::LN_10;

use crate::constants::{SPEED_OF_LIGHT, VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
use crate::errors::{CascadeError, Result};
use crate::math::{Scalar, C, DENOM_GUARD};

use super::twoport::TwoPort;

/// Uniform transmission line descriptor.
///
/// The line is parameterized by physical length, (possibly complex)
/// characteristic impedance, velocity factor, and attenuation in nepers per
/// meter. The ABCD matrix at a given frequency is
/// `[[cosh(γℓ), Z0·sinh(γℓ)], [sinh(γℓ)/Z0, cosh(γℓ)]]` with `γ = α + jβ`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionLine {
    length_m: Scalar,
    z0: C,
    velocity_factor: Scalar,
    alpha_np_per_m: Scalar,
}

impl TransmissionLine {
    /// Line of length `length_m` with characteristic impedance `z0`
    /// (real or complex), velocity factor `vf ∈ (0, 1]`, and attenuation in
    /// nepers per meter.
    pub fn new(
        length_m: Scalar,
        z0: impl Into<C>,
        velocity_factor: Scalar,
        alpha_np_per_m: Scalar,
    ) -> Result<Self> {
        let z0 = z0.into();
        if length_m < 0.0 {
            return Err(CascadeError::InvalidComponent(format!(
                "line length must be non-negative, got {length_m}"
            )));
        }
        if velocity_factor <= 0.0 || velocity_factor > 1.0 {
            return Err(CascadeError::InvalidComponent(format!(
                "velocity factor must be in (0, 1], got {velocity_factor}"
            )));
        }
        if alpha_np_per_m < 0.0 {
            return Err(CascadeError::InvalidComponent(format!(
                "attenuation must be non-negative, got {alpha_np_per_m}"
            )));
        }
        if z0.norm() < DENOM_GUARD {
            return Err(CascadeError::InvalidComponent(String::from(
                "characteristic impedance must be non-zero",
            )));
        }
        Ok(Self {
            length_m,
            z0,
            velocity_factor,
            alpha_np_per_m,
        })
    }

    /// Lossy line with a real characteristic impedance and loss given in
    /// dB per meter, converted to `α = loss · ln(10) / 20` nepers per meter.
    pub fn with_loss_db(
        length_m: Scalar,
        z0_ohms: Scalar,
        velocity_factor: Scalar,
        loss_db_per_m: Scalar,
    ) -> Result<Self> {
        Self::new(
            length_m,
            C::new(z0_ohms, 0.0),
            velocity_factor,
            loss_db_per_m * LN_10 / 20.0,
        )
    }

    /// Lossless line whose physical length realizes an electrical length of
    /// `theta_degrees` at `freq_hz`: `ℓ = (θ/360) · c/(f·vf)`.
    pub fn from_electrical_length(
        theta_degrees: Scalar,
        z0: impl Into<C>,
        freq_hz: Scalar,
        velocity_factor: Scalar,
    ) -> Result<Self> {
        if freq_hz <= 0.0 {
            return Err(CascadeError::InvalidComponent(format!(
                "electrical length needs a positive frequency, got {freq_hz}"
            )));
        }
        if theta_degrees < 0.0 {
            return Err(CascadeError::InvalidComponent(format!(
                "electrical length must be non-negative, got {theta_degrees}"
            )));
        }
        let wavelength = SPEED_OF_LIGHT / (freq_hz * velocity_factor);
        Self::new(
            (theta_degrees / 360.0) * wavelength,
            z0,
            velocity_factor,
            0.0,
        )
    }

    /// Physical length in meters.
    #[must_use]
    pub fn length_m(&self) -> Scalar {
        self.length_m
    }

    /// Characteristic impedance.
    #[must_use]
    pub fn characteristic_impedance(&self) -> C {
        self.z0
    }

    /// Velocity factor.
    #[must_use]
    pub fn velocity_factor(&self) -> Scalar {
        self.velocity_factor
    }

    /// Attenuation constant in nepers per meter.
    #[must_use]
    pub fn attenuation_np_per_m(&self) -> Scalar {
        self.alpha_np_per_m
    }

    /// Electrical length in degrees at `freq_hz`.
    pub fn electrical_length_degrees(&self, freq_hz: Scalar) -> Result<Scalar> {
        if freq_hz <= 0.0 {
            return Err(CascadeError::InvalidComponent(format!(
                "electrical length needs a positive frequency, got {freq_hz}"
            )));
        }
        let wavelength = SPEED_OF_LIGHT / (freq_hz * self.velocity_factor);
        Ok((self.length_m / wavelength) * 360.0)
    }

    /// Returns the ABCD two-port for this line at `freq_hz`.
    ///
    /// `cosh(γℓ)` and `sinh(γℓ)` are evaluated through the complex-valued
    /// standard functions; with a complex `Z0` the resulting entries trace
    /// the expected spirals for lossy lines.
    pub fn to_twoport(&self, freq_hz: Scalar) -> Result<TwoPort> {
        if freq_hz <= 0.0 {
            return Err(CascadeError::InvalidComponent(format!(
                "transmission line needs a positive frequency, got {freq_hz}"
            )));
        }
        let beta = phase_constant(freq_hz, self.velocity_factor);
        let gamma_l = C::new(self.alpha_np_per_m, beta) * self.length_m;
        let cosh_gl = gamma_l.cosh();
        let sinh_gl = gamma_l.sinh();
        Ok(TwoPort::from_abcd(
            cosh_gl,
            self.z0 * sinh_gl,
            sinh_gl / self.z0,
            cosh_gl,
        ))
    }
}

/// Phase constant `β = ω·sqrt(μ0·ε0)/vf` in radians per meter.
fn phase_constant(freq_hz: Scalar, velocity_factor: Scalar) -> Scalar {
    let omega = crate::constants::angular_frequency(freq_hz);
    omega * (VACUUM_PERMEABILITY * VACUUM_PERMITTIVITY).sqrt() / velocity_factor
}

fn stub_angle(length_m: Scalar, z0_ohms: Scalar, freq_hz: Scalar, vf: Scalar) -> Result<Scalar> {
    if length_m < 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "stub length must be non-negative, got {length_m}"
        )));
    }
    if z0_ohms <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "stub impedance must be positive, got {z0_ohms}"
        )));
    }
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "stub needs a positive frequency, got {freq_hz}"
        )));
    }
    if vf <= 0.0 || vf > 1.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "velocity factor must be in (0, 1], got {vf}"
        )));
    }
    Ok(phase_constant(freq_hz, vf) * length_m)
}

/// Open-terminated stub placed in series: `Z = -j·Z0·cot(βℓ)`.
///
/// Singular when `βℓ` sits on a multiple of π.
pub fn series_open_stub(
    length_m: Scalar,
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    let bl = stub_angle(length_m, z0_ohms, freq_hz, vf)?;
    let (sin, cos) = bl.sin_cos();
    if sin.abs() < DENOM_GUARD {
        return Err(CascadeError::Singular(String::from("series open stub")));
    }
    Ok(TwoPort::series_impedance(C::new(
        0.0,
        -z0_ohms * cos / sin,
    )))
}

/// Short-terminated stub placed in series: `Z = j·Z0·tan(βℓ)`.
///
/// Singular when `βℓ` sits on an odd multiple of π/2.
pub fn series_short_stub(
    length_m: Scalar,
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    let bl = stub_angle(length_m, z0_ohms, freq_hz, vf)?;
    let (sin, cos) = bl.sin_cos();
    if cos.abs() < DENOM_GUARD {
        return Err(CascadeError::Singular(String::from("series short stub")));
    }
    Ok(TwoPort::series_impedance(C::new(0.0, z0_ohms * sin / cos)))
}

/// Open-terminated stub placed in shunt: `Y = j·tan(βℓ)/Z0`.
///
/// Singular when `βℓ` sits on an odd multiple of π/2.
pub fn shunt_open_stub(
    length_m: Scalar,
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    let bl = stub_angle(length_m, z0_ohms, freq_hz, vf)?;
    let (sin, cos) = bl.sin_cos();
    if cos.abs() < DENOM_GUARD {
        return Err(CascadeError::Singular(String::from("shunt open stub")));
    }
    Ok(TwoPort::shunt_admittance(C::new(
        0.0,
        sin / (z0_ohms * cos),
    )))
}

/// Short-terminated stub placed in shunt: `Y = -j·cot(βℓ)/Z0`.
///
/// Singular when `βℓ` sits on a multiple of π.
pub fn shunt_short_stub(
    length_m: Scalar,
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    let bl = stub_angle(length_m, z0_ohms, freq_hz, vf)?;
    let (sin, cos) = bl.sin_cos();
    if sin.abs() < DENOM_GUARD {
        return Err(CascadeError::Singular(String::from("shunt short stub")));
    }
    Ok(TwoPort::shunt_admittance(C::new(
        0.0,
        -cos / (z0_ohms * sin),
    )))
}

/// Quarter wavelength in meters at `freq_hz` for the given velocity factor.
fn quarter_wavelength(freq_hz: Scalar, vf: Scalar) -> Scalar {
    SPEED_OF_LIGHT / (freq_hz * vf) / 4.0
}

/// Series open stub cut to a quarter wave at `freq_hz`. Looks like a series
/// short at the design frequency.
pub fn quarter_wave_series_open_stub(
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "stub needs a positive frequency, got {freq_hz}"
        )));
    }
    series_open_stub(quarter_wavelength(freq_hz, vf), z0_ohms, freq_hz, vf)
}

/// Series short stub cut to a quarter wave at `freq_hz`. Its reactance is
/// enormous at the design frequency (the tan singularity sits on the grid
/// point only in exact arithmetic).
pub fn quarter_wave_series_short_stub(
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "stub needs a positive frequency, got {freq_hz}"
        )));
    }
    series_short_stub(quarter_wavelength(freq_hz, vf), z0_ohms, freq_hz, vf)
}

/// Shunt open stub cut to a quarter wave at `freq_hz`. Acts as a band-stop
/// element around the design frequency.
pub fn quarter_wave_shunt_open_stub(
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "stub needs a positive frequency, got {freq_hz}"
        )));
    }
    shunt_open_stub(quarter_wavelength(freq_hz, vf), z0_ohms, freq_hz, vf)
}

/// Shunt short stub cut to a quarter wave at `freq_hz`. Nearly invisible at
/// the design frequency, shorting out-of-band energy.
pub fn quarter_wave_shunt_short_stub(
    z0_ohms: Scalar,
    freq_hz: Scalar,
    vf: Scalar,
) -> Result<TwoPort> {
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "stub needs a positive frequency, got {freq_hz}"
        )));
    }
    shunt_short_stub(quarter_wavelength(freq_hz, vf), z0_ohms, freq_hz, vf)
}

/// Saturation admittance substituted when a shunt branch looks into a
/// near-short (`|Z| < 1e-20`).
const NEAR_SHORT_ADMITTANCE: Scalar = 1e20;
/// Termination used by [`shunt_tee_open`] to stand in for an open circuit.
const OPEN_TERMINATION_OHMS: Scalar = 1e12;

/// Hangs an arbitrary two-port off the main line as a shunt branch.
///
/// The branch network is terminated in `termination`; its input impedance
/// becomes the shunt impedance, mapped to the admittance matrix
/// `[[1, 0], [y, 1]]`. A near-short branch saturates to a very large
/// admittance instead of failing.
pub fn shunt_tee(network: &TwoPort, termination: C) -> Result<TwoPort> {
    let z = network.input_impedance(termination)?;
    let y = if z.norm() < DENOM_GUARD {
        C::new(NEAR_SHORT_ADMITTANCE, 0.0)
    } else {
        C::new(1.0, 0.0) / z
    };
    Ok(TwoPort::shunt_admittance(y))
}

/// Shunt-tee with a short-circuit termination.
pub fn shunt_tee_short(network: &TwoPort) -> Result<TwoPort> {
    shunt_tee(network, C::new(0.0, 0.0))
}

/// Shunt-tee with an open-circuit termination (very large real impedance).
pub fn shunt_tee_open(network: &TwoPort) -> Result<TwoPort> {
    shunt_tee(network, C::new(OPEN_TERMINATION_OHMS, 0.0))
}

/// Shunt-tee terminated in the system impedance `z0`.
pub fn shunt_tee_match(network: &TwoPort, z0_ohms: Scalar) -> Result<TwoPort> {
    shunt_tee(network, C::new(z0_ohms, 0.0))
}

/// Shorted shunt stub built from the full line model through the tee.
///
/// Unlike [`shunt_short_stub`], this path carries the line's loss and
/// complex-impedance behavior into the shunt branch.
pub fn shunt_tee_short_stub(
    line: &TransmissionLine,
    freq_hz: Scalar,
) -> Result<TwoPort> {
    shunt_tee_short(&line.to_twoport(freq_hz)?)
}

/// Open shunt stub built from the full line model through the tee.
pub fn shunt_tee_open_stub(
    line: &TransmissionLine,
    freq_hz: Scalar,
) -> Result<TwoPort> {
    shunt_tee_open(&line.to_twoport(freq_hz)?)
}
