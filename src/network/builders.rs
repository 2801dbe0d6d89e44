//! Prototype filters, attenuators, matching sections, and builder plumbing.
//!
//! Builder factories return closures from frequency to a two-port, the shape
//! the sweep executors and the Smith-chart generator consume.

use crate::constants::angular_frequency;
use crate::errors::{CascadeError, Result};
use crate::math::{Scalar, C};

use super::components::{series_capacitor, series_inductor, shunt_capacitor, shunt_inductor};
use super::transmission::TransmissionLine;
use super::twoport::TwoPort;

/// 3rd-order Butterworth LC low-pass prototype (series L, shunt C, series L)
/// with cutoff `cutoff_hz` in a `z0` system.
///
/// Element values follow the g-coefficients of the maximally flat prototype:
/// `L1 = L3 = 0.7654·Z0/ωc`, `C2 = 1.8478/(Z0·ωc)`.
pub fn butterworth_lowpass3(
    cutoff_hz: Scalar,
    z0_ohms: Scalar,
) -> Result<impl Fn(Scalar) -> Result<TwoPort>> {
    if cutoff_hz <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "cutoff frequency must be positive, got {cutoff_hz}"
        )));
    }
    if z0_ohms <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "system impedance must be positive, got {z0_ohms}"
        )));
    }
    let omega_c = angular_frequency(cutoff_hz);
    let l_outer = 0.7654 * z0_ohms / omega_c;
    let c_mid = 1.8478 / (z0_ohms * omega_c);
    Ok(move |freq: Scalar| {
        let l1 = series_inductor(l_outer, freq)?;
        let c2 = shunt_capacitor(c_mid, freq)?;
        let l3 = series_inductor(l_outer, freq)?;
        Ok(l1 * c2 * l3)
    })
}

/// Π attenuator for `attenuation_db > 0` in a `z0` system.
///
/// With `k = 10^(dB/20)`: shunt legs `Z0·(k+1)/(k-1)`, series arm
/// `Z0·(k²-1)/(2k)`.
pub fn pi_attenuator(attenuation_db: Scalar, z0_ohms: Scalar) -> Result<TwoPort> {
    let k = attenuator_factor(attenuation_db, z0_ohms)?;
    let r_shunt = z0_ohms * (k + 1.0) / (k - 1.0);
    let r_series = z0_ohms * (k * k - 1.0) / (2.0 * k);
    let y = C::new(1.0 / r_shunt, 0.0);
    Ok(TwoPort::pi_section(y, C::new(r_series, 0.0), y))
}

/// T attenuator for `attenuation_db > 0` in a `z0` system.
///
/// With `k = 10^(dB/20)`: series arms `Z0·(k-1)/(k+1)`, shunt leg
/// `2·Z0·k/(k²-1)`.
pub fn t_attenuator(attenuation_db: Scalar, z0_ohms: Scalar) -> Result<TwoPort> {
    let k = attenuator_factor(attenuation_db, z0_ohms)?;
    let r_series = z0_ohms * (k - 1.0) / (k + 1.0);
    let r_shunt = 2.0 * z0_ohms * k / (k * k - 1.0);
    let z = C::new(r_series, 0.0);
    Ok(TwoPort::t_section(z, C::new(1.0 / r_shunt, 0.0), z))
}

fn attenuator_factor(attenuation_db: Scalar, z0_ohms: Scalar) -> Result<Scalar> {
    if attenuation_db <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "attenuation must be positive, got {attenuation_db} dB"
        )));
    }
    if z0_ohms <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "system impedance must be positive, got {z0_ohms}"
        )));
    }
    Ok(10.0_f64.powf(attenuation_db / 20.0))
}

/// Topology of the lossless L-match section.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTopology {
    /// Series L, shunt C (attenuates harmonics).
    Lowpass,
    /// Series C, shunt L (blocks DC).
    Highpass,
}

/// Lossless L-section matching `z_source` to `z_load`.
///
/// The section is oriented from the lower impedance toward the higher one
/// with `q = sqrt(Z_hi/Z_lo - 1)`; element values are recomputed per
/// frequency by the returned builder.
pub fn l_match(
    z_source: Scalar,
    z_load: Scalar,
    topology: MatchTopology,
) -> Result<impl Fn(Scalar) -> Result<TwoPort>> {
    if z_source <= 0.0 || z_load <= 0.0 {
        return Err(CascadeError::InvalidComponent(format!(
            "match impedances must be positive, got {z_source} and {z_load}"
        )));
    }
    let (z_lo, z_hi) = if z_source <= z_load {
        (z_source, z_load)
    } else {
        (z_load, z_source)
    };
    let q = (z_hi / z_lo - 1.0).sqrt();
    if q <= 0.0 {
        return Err(CascadeError::InvalidComponent(String::from(
            "match impedances must differ",
        )));
    }
    Ok(move |freq: Scalar| {
        let omega = angular_frequency(freq);
        match topology {
            MatchTopology::Lowpass => {
                let series = series_inductor(z_lo * q / omega, freq)?;
                let shunt = shunt_capacitor(q / (omega * z_hi), freq)?;
                Ok(series * shunt)
            }
            MatchTopology::Highpass => {
                let series = series_capacitor(1.0 / (omega * z_lo * q), freq)?;
                let shunt = shunt_inductor(z_hi / (omega * q), freq)?;
                Ok(series * shunt)
            }
        }
    })
}

/// Quarter-wave transformer section: a lossless line with 90° electrical
/// length at `freq_hz`.
pub fn quarter_wave_line(z0: impl Into<C>, freq_hz: Scalar, vf: Scalar) -> Result<TwoPort> {
    TransmissionLine::from_electrical_length(90.0, z0, freq_hz, vf)?.to_twoport(freq_hz)
}

/// Combines a list of builders into one that cascades their networks in
/// order. An empty list yields the identity at every frequency.
pub fn cascade_builders<F>(builders: Vec<F>) -> impl Fn(Scalar) -> Result<TwoPort>
where
    F: Fn(Scalar) -> Result<TwoPort>,
{
    move |freq: Scalar| {
        let mut acc = TwoPort::identity();
        for builder in &builders {
            acc = acc.cascade(&builder(freq)?);
        }
        Ok(acc)
    }
}
