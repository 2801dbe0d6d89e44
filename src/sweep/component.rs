//! Component-value sweep at a fixed operating frequency.

use crate::errors::{CascadeError, Result};
use crate::math::{guarded_div, Scalar, C};
use crate::network::components::ComponentKind;
use crate::network::params::SParameters;
use crate::network::twoport::TwoPort;

use super::{axis_values, SweepScale};

/// Component-value sweep descriptor.
///
/// Sweeps one component of `kind` from `value_start` to `value_stop` while
/// the operating frequency stays fixed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentSweep {
    kind: ComponentKind,
    value_start: Scalar,
    value_stop: Scalar,
    num_points: usize,
    frequency_hz: Scalar,
    scale: SweepScale,
}

impl ComponentSweep {
    /// Validates and constructs the descriptor.
    pub fn new(
        kind: ComponentKind,
        value_start: Scalar,
        value_stop: Scalar,
        num_points: usize,
        frequency_hz: Scalar,
        scale: SweepScale,
    ) -> Result<Self> {
        if num_points < 2 {
            return Err(CascadeError::InvalidSweep(format!(
                "a sweep needs at least two points, got {num_points}"
            )));
        }
        if value_start == value_stop {
            return Err(CascadeError::InvalidSweep(format!(
                "start and stop must differ, both are {value_start}"
            )));
        }
        if scale == SweepScale::Log && (value_start <= 0.0 || value_stop <= 0.0) {
            return Err(CascadeError::InvalidSweep(format!(
                "log sweep needs positive values, got {value_start} to {value_stop}"
            )));
        }
        if frequency_hz < 0.0 {
            return Err(CascadeError::InvalidSweep(format!(
                "frequency must be non-negative, got {frequency_hz}"
            )));
        }
        Ok(Self {
            kind,
            value_start,
            value_stop,
            num_points,
            frequency_hz,
            scale,
        })
    }

    /// Swept component kind.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Fixed operating frequency in hertz.
    #[must_use]
    pub fn frequency_hz(&self) -> Scalar {
        self.frequency_hz
    }

    /// Number of samples.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Lazily enumerates the component values in sweep order.
    pub fn values(&self) -> impl Iterator<Item = Scalar> {
        axis_values(self.value_start, self.value_stop, self.num_points, self.scale)
    }

    /// Builds the primitive network for one swept value.
    pub fn build_network(&self, value: Scalar) -> Result<TwoPort> {
        self.kind.build(value, self.frequency_hz)
    }
}

/// Result of a component sweep: parallel arrays in sweep order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSweepResults {
    /// Swept component values.
    pub values: Vec<Scalar>,
    /// Input impedance per value.
    pub impedances: Vec<C>,
    /// Input admittance per value, `Y = 1/Z`.
    pub admittances: Vec<C>,
    /// S-parameters at the system reference impedance.
    pub s_params: Vec<SParameters>,
    /// Reflection coefficient per value, `Γ = (Z/Z0 - 1)/(Z/Z0 + 1)`.
    pub reflection_coefficients: Vec<C>,
}

impl ComponentSweepResults {
    /// Number of sweep points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the sweep produced no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Impedances normalized to `z0`.
    #[must_use]
    pub fn normalized_impedances(&self, z0: Scalar) -> Vec<C> {
        self.impedances.iter().map(|z| *z / z0).collect()
    }
}

/// Runs the component sweep, cascading each primitive between `before` and
/// `after`, and collecting impedances, S-parameters, and reflection
/// coefficients at `z0_system`.
pub fn perform_component_sweep(
    sweep: &ComponentSweep,
    z0_system: Scalar,
    before: &TwoPort,
    after: &TwoPort,
    z_load: C,
) -> Result<ComponentSweepResults> {
    let n = sweep.num_points();
    let mut results = ComponentSweepResults {
        values: Vec::with_capacity(n),
        impedances: Vec::with_capacity(n),
        admittances: Vec::with_capacity(n),
        s_params: Vec::with_capacity(n),
        reflection_coefficients: Vec::with_capacity(n),
    };
    let label = sweep.kind().label();
    for value in sweep.values() {
        let component = sweep.build_network(value).map_err(|e| e.at(label, value))?;
        let network = before.cascade(&component).cascade(after);
        let z_in = network
            .input_impedance(z_load)
            .map_err(|e| e.at(label, value))?;
        let y_in =
            guarded_div(C::new(1.0, 0.0), z_in, "input admittance").map_err(|e| e.at(label, value))?;
        let s = network
            .to_s_parameters(z0_system)
            .map_err(|e| e.at(label, value))?;
        let z_norm = z_in / z0_system;
        let one = C::new(1.0, 0.0);
        let gamma = guarded_div(z_norm - one, z_norm + one, "reflection coefficient")
            .map_err(|e| e.at(label, value))?;
        results.values.push(value);
        results.impedances.push(z_in);
        results.admittances.push(y_in);
        results.s_params.push(s);
        results.reflection_coefficients.push(gamma);
    }
    Ok(results)
}

/// Endpoints of the impedance arc a component traces over a tolerance band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRange {
    /// Lower end of the value band.
    pub value_min: Scalar,
    /// Upper end of the value band.
    pub value_max: Scalar,
    /// Input impedance at the lower end.
    pub z_start: C,
    /// Input impedance at the upper end.
    pub z_stop: C,
    /// Reflection coefficient at the lower end.
    pub gamma_start: C,
    /// Reflection coefficient at the upper end.
    pub gamma_stop: C,
}

/// Computes the arc endpoints for `kind` over `nominal·(1 ± tolerance)` at
/// the given frequency, terminated in the system impedance.
pub fn arc_range(
    kind: ComponentKind,
    nominal: Scalar,
    frequency_hz: Scalar,
    tolerance: Scalar,
    z0_system: Scalar,
) -> Result<ArcRange> {
    if tolerance <= 0.0 || tolerance >= 1.0 {
        return Err(CascadeError::InvalidSweep(format!(
            "arc tolerance must be in (0, 1), got {tolerance}"
        )));
    }
    let value_min = nominal * (1.0 - tolerance);
    let value_max = nominal * (1.0 + tolerance);
    let z_load = C::new(z0_system, 0.0);
    let one = C::new(1.0, 0.0);

    let endpoint = |value: Scalar| -> Result<(C, C)> {
        let network = kind.build(value, frequency_hz)?;
        let z = network.input_impedance(z_load)?;
        let z_norm = z / z0_system;
        let gamma = guarded_div(z_norm - one, z_norm + one, "reflection coefficient")?;
        Ok((z, gamma))
    };

    let (z_start, gamma_start) = endpoint(value_min)?;
    let (z_stop, gamma_stop) = endpoint(value_max)?;
    Ok(ArcRange {
        value_min,
        value_max,
        z_start,
        z_stop,
        gamma_start,
        gamma_stop,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn descriptor_validation() {
        assert!(matches!(
            ComponentSweep::new(ComponentKind::SeriesR, 10.0, 100.0, 1, 1.0e9, SweepScale::Linear),
            Err(CascadeError::InvalidSweep(_))
        ));
        assert!(matches!(
            ComponentSweep::new(ComponentKind::SeriesR, 10.0, 10.0, 5, 1.0e9, SweepScale::Linear),
            Err(CascadeError::InvalidSweep(_))
        ));
        assert!(matches!(
            ComponentSweep::new(ComponentKind::SeriesC, 0.0, 1e-12, 5, 1.0e9, SweepScale::Log),
            Err(CascadeError::InvalidSweep(_))
        ));
    }

    #[test]
    fn series_r_sweep_traces_the_real_axis() {
        let sweep = ComponentSweep::new(
            ComponentKind::SeriesR,
            0.0,
            100.0,
            11,
            1.0e9,
            SweepScale::Linear,
        )
        .unwrap();
        let id = TwoPort::identity();
        let results =
            perform_component_sweep(&sweep, 50.0, &id, &id, C::new(50.0, 0.0)).unwrap();
        assert_eq!(results.len(), 11);
        // R = 0 gives Z_in = 50 => Gamma = 0; R = 100 gives Z_in = 150 => 0.5.
        assert_relative_eq!(results.reflection_coefficients[0].re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            results.reflection_coefficients[10].re,
            0.5,
            epsilon = 1e-12
        );
        for gamma in &results.reflection_coefficients {
            assert_relative_eq!(gamma.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn admittances_are_reciprocal_impedances() {
        let sweep = ComponentSweep::new(
            ComponentKind::SeriesL,
            1e-9,
            20e-9,
            5,
            1.0e9,
            SweepScale::Linear,
        )
        .unwrap();
        let id = TwoPort::identity();
        let results =
            perform_component_sweep(&sweep, 50.0, &id, &id, C::new(50.0, 0.0)).unwrap();
        for (z, y) in results.impedances.iter().zip(&results.admittances) {
            let product = z * y;
            assert_relative_eq!(product.re, 1.0, epsilon = 1e-10);
            assert_relative_eq!(product.im, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn cascade_context_applies_before_and_after() {
        let sweep = ComponentSweep::new(
            ComponentKind::SeriesR,
            10.0,
            20.0,
            2,
            1.0e9,
            SweepScale::Linear,
        )
        .unwrap();
        let before = TwoPort::series_impedance(C::new(5.0, 0.0));
        let id = TwoPort::identity();
        let results =
            perform_component_sweep(&sweep, 50.0, &before, &id, C::new(50.0, 0.0)).unwrap();
        // Z_in = 5 + value + 50
        assert_relative_eq!(results.impedances[0].re, 65.0, epsilon = 1e-12);
        assert_relative_eq!(results.impedances[1].re, 75.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_value_aborts_with_annotation() {
        let sweep = ComponentSweep::new(
            ComponentKind::ShuntR,
            -10.0,
            10.0,
            3,
            1.0e9,
            SweepScale::Linear,
        )
        .unwrap();
        let id = TwoPort::identity();
        let err = perform_component_sweep(&sweep, 50.0, &id, &id, C::new(50.0, 0.0)).unwrap_err();
        assert!(matches!(err, CascadeError::InvalidComponent(_)));
        assert!(err.to_string().contains("shunt_R"));
    }

    #[test]
    fn arc_range_brackets_the_nominal() {
        let range = arc_range(ComponentKind::SeriesR, 50.0, 1.0e9, 0.2, 50.0).unwrap();
        assert_relative_eq!(range.value_min, 40.0, epsilon = 1e-12);
        assert_relative_eq!(range.value_max, 60.0, epsilon = 1e-12);
        // Z_in endpoints are 90 and 110.
        assert_relative_eq!(range.z_start.re, 90.0, epsilon = 1e-12);
        assert_relative_eq!(range.z_stop.re, 110.0, epsilon = 1e-12);
        assert!(range.gamma_start.re < range.gamma_stop.re);
    }
}
