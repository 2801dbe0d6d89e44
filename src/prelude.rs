//! Convenience re-exports for building RF network analyses.

pub use crate::constants::{angular_frequency, wavelength_from_frequency, SPEED_OF_LIGHT};
pub use crate::errors::{CascadeError, Result};
pub use crate::math::{Scalar, C, DEFAULT_TOLERANCE, DENOM_GUARD};
pub use crate::monte_carlo::{
    confidence_interval, histogram, ComponentTolerance, CorrelationMatrix, MonteCarloAnalyzer,
    MonteCarloResults, SensitivityResult, ToleranceDistribution,
};
pub use crate::network::builders::{
    butterworth_lowpass3, cascade_builders, l_match, pi_attenuator, quarter_wave_line,
    t_attenuator, MatchTopology,
};
pub use crate::network::components::{
    ideal_transformer, series_capacitor, series_inductor, series_resistor, series_rlc,
    shunt_capacitor, shunt_inductor, shunt_resistor, shunt_rlc, ComponentKind,
};
pub use crate::network::transmission::{
    quarter_wave_series_open_stub, quarter_wave_series_short_stub, quarter_wave_shunt_open_stub,
    quarter_wave_shunt_short_stub, series_open_stub, series_short_stub, shunt_open_stub,
    shunt_short_stub, shunt_tee, shunt_tee_match, shunt_tee_open, shunt_tee_open_stub,
    shunt_tee_short, shunt_tee_short_stub, TransmissionLine,
};
pub use crate::network::{SParameters, TwoPort, YParameters, ZParameters};
pub use crate::smith::{
    impedance_to_reflection, normalize_impedance, reflection_to_impedance, Mesh2d, PointStream,
    SmithChartConfig, SmithChartGenerator, TraceKind, TraceMetadata,
};
pub use crate::sweep::{
    arc_range, perform_component_sweep, perform_sweep, ArcRange, ComponentSweep,
    ComponentSweepResults, FrequencySweep, SweepResults, SweepScale,
};
