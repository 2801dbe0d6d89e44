//! Frequency sweep descriptor, executor, and derived result arrays.

use crate::errors::{CascadeError, Result};
use crate::math::{db20_floored, Scalar, C};
use crate::network::params::SParameters;
use crate::network::twoport::TwoPort;

use super::{axis_values, SweepScale};

/// Frequency sweep descriptor.
///
/// Produces `num_points` samples between `start_hz` and `stop_hz`, spaced
/// linearly or logarithmically. Single-point sweeps are rejected so that
/// consumers which need prev/next neighbors always have them.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencySweep {
    start_hz: Scalar,
    stop_hz: Scalar,
    num_points: usize,
    scale: SweepScale,
}

impl FrequencySweep {
    /// Validates and constructs the descriptor.
    pub fn new(
        start_hz: Scalar,
        stop_hz: Scalar,
        num_points: usize,
        scale: SweepScale,
    ) -> Result<Self> {
        if num_points < 2 {
            return Err(CascadeError::InvalidSweep(format!(
                "a sweep needs at least two points, got {num_points}"
            )));
        }
        if start_hz <= 0.0 || stop_hz <= 0.0 {
            return Err(CascadeError::InvalidSweep(format!(
                "frequencies must be positive, got {start_hz} to {stop_hz}"
            )));
        }
        if start_hz == stop_hz {
            return Err(CascadeError::InvalidSweep(format!(
                "start and stop must differ, both are {start_hz}"
            )));
        }
        Ok(Self {
            start_hz,
            stop_hz,
            num_points,
            scale,
        })
    }

    /// Start frequency in hertz.
    #[must_use]
    pub fn start_hz(&self) -> Scalar {
        self.start_hz
    }

    /// Stop frequency in hertz.
    #[must_use]
    pub fn stop_hz(&self) -> Scalar {
        self.stop_hz
    }

    /// Number of samples.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Sample spacing.
    #[must_use]
    pub fn scale(&self) -> SweepScale {
        self.scale
    }

    /// Lazily enumerates the frequency samples in sweep order.
    pub fn values(&self) -> impl Iterator<Item = Scalar> {
        axis_values(self.start_hz, self.stop_hz, self.num_points, self.scale)
    }
}

/// Result of a frequency sweep: parallel arrays in sweep order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResults {
    /// Frequency samples in hertz.
    pub frequencies: Vec<Scalar>,
    /// S-parameters at the sweep's reference impedance.
    pub s_params: Vec<SParameters>,
    /// Input impedance under the sweep's load.
    pub input_impedances: Vec<C>,
    /// Output impedance under the sweep's source.
    pub output_impedances: Vec<C>,
}

impl SweepResults {
    /// Number of sweep points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when the sweep produced no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `S11` per point.
    #[must_use]
    pub fn s11(&self) -> Vec<C> {
        self.s_params.iter().map(|s| s.s11).collect()
    }

    /// `S21` per point.
    #[must_use]
    pub fn s21(&self) -> Vec<C> {
        self.s_params.iter().map(|s| s.s21).collect()
    }

    /// `|S11|` in dB per point.
    #[must_use]
    pub fn s11_db(&self) -> Vec<Scalar> {
        self.s_params
            .iter()
            .map(|s| db20_floored(s.s11.norm()))
            .collect()
    }

    /// `|S21|` in dB per point.
    #[must_use]
    pub fn s21_db(&self) -> Vec<Scalar> {
        self.s_params
            .iter()
            .map(|s| db20_floored(s.s21.norm()))
            .collect()
    }

    /// VSWR per point.
    #[must_use]
    pub fn vswr(&self) -> Vec<Scalar> {
        self.s_params.iter().map(SParameters::vswr).collect()
    }

    /// Phase of `S11` in degrees per point.
    #[must_use]
    pub fn s11_phase_deg(&self) -> Vec<Scalar> {
        self.s_params
            .iter()
            .map(SParameters::s11_phase_deg)
            .collect()
    }

    /// Phase of `S21` in degrees per point.
    #[must_use]
    pub fn s21_phase_deg(&self) -> Vec<Scalar> {
        self.s_params
            .iter()
            .map(SParameters::s21_phase_deg)
            .collect()
    }
}

/// Evaluates `builder` at each sweep frequency and collects S-parameters and
/// terminal impedances.
///
/// The first error raised by the builder or by a conversion aborts the sweep
/// and is annotated with the failing frequency; no partial result is
/// returned.
pub fn perform_sweep<F>(
    mut builder: F,
    sweep: &FrequencySweep,
    z0: impl Into<C>,
    z_load: C,
    z_source: C,
) -> Result<SweepResults>
where
    F: FnMut(Scalar) -> Result<TwoPort>,
{
    let z0 = z0.into();
    let n = sweep.num_points();
    let mut results = SweepResults {
        frequencies: Vec::with_capacity(n),
        s_params: Vec::with_capacity(n),
        input_impedances: Vec::with_capacity(n),
        output_impedances: Vec::with_capacity(n),
    };
    for freq in sweep.values() {
        let network = builder(freq).map_err(|e| e.at("frequency", freq))?;
        let s = network
            .to_s_parameters(z0)
            .map_err(|e| e.at("frequency", freq))?;
        let z_in = network
            .input_impedance(z_load)
            .map_err(|e| e.at("frequency", freq))?;
        let z_out = network
            .output_impedance(z_source)
            .map_err(|e| e.at("frequency", freq))?;
        results.frequencies.push(freq);
        results.s_params.push(s);
        results.input_impedances.push(z_in);
        results.output_impedances.push(z_out);
    }
    Ok(results)
}
