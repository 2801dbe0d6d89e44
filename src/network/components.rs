//! Lumped component constructors producing ABCD two-ports.
//!
//! Every constructor validates its physical domain and returns
//! [`CascadeError::InvalidComponent`] for non-physical parameters. Reactive
//! elements take the operating frequency in hertz; the angular frequency
//! `ω = 2π·f` is derived internally.

use crate::constants::angular_frequency;
use crate::errors::{CascadeError, Result};
use crate::math::{Scalar, C};

use super::transmission::TransmissionLine;
use super::twoport::TwoPort;

/// Series resistor `R` in ohms, `R >= 0`.
pub fn series_resistor(resistance_ohms: Scalar) -> Result<TwoPort> {
    if resistance_ohms < 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "series resistance must be non-negative, got {resistance_ohms}"
        )));
    }
    Ok(TwoPort::series_impedance(C::new(resistance_ohms, 0.0)))
}

/// Series inductor `L` in henries at frequency `freq_hz`, `L > 0`.
pub fn series_inductor(inductance_h: Scalar, freq_hz: Scalar) -> Result<TwoPort> {
    if inductance_h <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "inductance must be positive, got {inductance_h}"
        )));
    }
    let omega = angular_frequency(freq_hz);
    Ok(TwoPort::series_impedance(C::new(0.0, omega * inductance_h)))
}

/// Series capacitor `C` in farads at frequency `freq_hz`, `C > 0`,
/// `freq_hz > 0`.
pub fn series_capacitor(capacitance_f: Scalar, freq_hz: Scalar) -> Result<TwoPort> {
    if capacitance_f <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "capacitance must be positive, got {capacitance_f}"
        )));
    }
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "series capacitor needs a positive frequency, got {freq_hz}"
        )));
    }
    let omega = angular_frequency(freq_hz);
    Ok(TwoPort::series_impedance(C::new(
        0.0,
        -1.0 / (omega * capacitance_f),
    )))
}

/// Shunt resistor `R` in ohms, `R > 0`.
pub fn shunt_resistor(resistance_ohms: Scalar) -> Result<TwoPort> {
    if resistance_ohms <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "shunt resistance must be positive, got {resistance_ohms}"
        )));
    }
    Ok(TwoPort::shunt_admittance(C::new(
        1.0 / resistance_ohms,
        0.0,
    )))
}

/// Shunt inductor `L` in henries at frequency `freq_hz`, `L > 0`,
/// `freq_hz > 0`.
pub fn shunt_inductor(inductance_h: Scalar, freq_hz: Scalar) -> Result<TwoPort> {
    if inductance_h <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "inductance must be positive, got {inductance_h}"
        )));
    }
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "shunt inductor needs a positive frequency, got {freq_hz}"
        )));
    }
    let omega = angular_frequency(freq_hz);
    Ok(TwoPort::shunt_admittance(C::new(
        0.0,
        -1.0 / (omega * inductance_h),
    )))
}

/// Shunt capacitor `C` in farads at frequency `freq_hz`, `C > 0`.
pub fn shunt_capacitor(capacitance_f: Scalar, freq_hz: Scalar) -> Result<TwoPort> {
    if capacitance_f <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "capacitance must be positive, got {capacitance_f}"
        )));
    }
    let omega = angular_frequency(freq_hz);
    Ok(TwoPort::shunt_admittance(C::new(
        0.0,
        omega * capacitance_f,
    )))
}

/// Ideal transformer with turns ratio `n = N1/N2 > 0`:
/// `[[n, 0], [0, 1/n]]`.
pub fn ideal_transformer(turns_ratio: Scalar) -> Result<TwoPort> {
    if turns_ratio <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "turns ratio must be positive, got {turns_ratio}"
        )));
    }
    Ok(TwoPort::from_abcd(
        C::new(turns_ratio, 0.0),
        C::new(0.0, 0.0),
        C::new(0.0, 0.0),
        C::new(1.0 / turns_ratio, 0.0),
    ))
}

/// Series R-L-C branch as a single series impedance,
/// `Z = R + jωL - j/(ωC)`. All element values positive, `freq_hz > 0`.
pub fn series_rlc(r: Scalar, l: Scalar, c: Scalar, freq_hz: Scalar) -> Result<TwoPort> {
    validate_rlc(r, l, c, freq_hz)?;
    let omega = angular_frequency(freq_hz);
    Ok(TwoPort::series_impedance(C::new(
        r,
        omega * l - 1.0 / (omega * c),
    )))
}

/// Parallel R-L-C branch to ground as a single shunt admittance,
/// `Y = 1/R + jωC - j/(ωL)`. All element values positive, `freq_hz > 0`.
pub fn shunt_rlc(r: Scalar, l: Scalar, c: Scalar, freq_hz: Scalar) -> Result<TwoPort> {
    validate_rlc(r, l, c, freq_hz)?;
    let omega = angular_frequency(freq_hz);
    Ok(TwoPort::shunt_admittance(C::new(
        1.0 / r,
        omega * c - 1.0 / (omega * l),
    )))
}

fn validate_rlc(r: Scalar, l: Scalar, c: Scalar, freq_hz: Scalar) -> Result<()> {
    if r <= 0.0 || l <= 0.0 || c <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "RLC values must be positive, got R = {r}, L = {l}, C = {c}"
        )));
    }
    if freq_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "RLC branch needs a positive frequency, got {freq_hz}"
        )));
    }
    Ok(())
}

/// Closed set of sweepable component kinds.
///
/// The two-port is the only type that flows through the algebra; a kind plus
/// a value is enough to reconstruct the network at a given frequency, which
/// is what the component sweep and Monte-Carlo engines do.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Series resistor; value in ohms.
    SeriesR,
    /// Series inductor; value in henries.
    SeriesL,
    /// Series capacitor; value in farads.
    SeriesC,
    /// Shunt resistor; value in ohms.
    ShuntR,
    /// Shunt inductor; value in henries.
    ShuntL,
    /// Shunt capacitor; value in farads.
    ShuntC,
    /// Transmission line; value is the physical length in meters of a 50 Ω
    /// lossless line.
    TransmissionLine,
}

impl ComponentKind {
    /// Builds the two-port for this kind with the given value at `freq_hz`.
    pub fn build(self, value: Scalar, freq_hz: Scalar) -> Result<TwoPort> {
        match self {
            Self::SeriesR => series_resistor(value),
            Self::SeriesL => series_inductor(value, freq_hz),
            Self::SeriesC => series_capacitor(value, freq_hz),
            Self::ShuntR => shunt_resistor(value),
            Self::ShuntL => shunt_inductor(value, freq_hz),
            Self::ShuntC => shunt_capacitor(value, freq_hz),
            Self::TransmissionLine => {
                TransmissionLine::new(value, 50.0, 1.0, 0.0)?.to_twoport(freq_hz)
            }
        }
    }

    /// True for kinds whose reactance needs a non-zero operating frequency.
    #[must_use]
    pub fn is_reactive(self) -> bool {
        !matches!(self, Self::SeriesR | Self::ShuntR)
    }

    /// Short label used in error annotations.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SeriesR => "series_R",
            Self::SeriesL => "series_L",
            Self::SeriesC => "series_C",
            Self::ShuntR => "shunt_R",
            Self::ShuntL => "shunt_L",
            Self::ShuntC => "shunt_C",
            Self::TransmissionLine => "transmission_line",
        }
    }
}
