//! Smith-chart point generation with adaptive, edge-boosted density.
//!
//! Sweep results are mapped through the bilinear transform
//! `Γ = (Z - Z0)/(Z + Z0)` and emitted as flat coordinate streams. Between
//! consecutive sweep points the generator inserts linearly interpolated
//! points whenever the chord outruns the local spacing budget, which shrinks
//! toward the unit-circle edge where reflection trajectories compress.

/// Point streams and mesh output structures.
pub mod stream;

pub use stream::{Mesh2d, PointStream, TraceKind, TraceMetadata};

use crate::errors::{CascadeError, Result};
use crate::math::{clamp_unit, guarded_div, Scalar, C};
use crate::network::twoport::TwoPort;
use crate::sweep::component::{perform_component_sweep, ComponentSweep};
use crate::sweep::frequency::FrequencySweep;

/// Hard cap on interpolated points inserted between two sweep samples.
const MAX_INTERPOLATION_POINTS: usize = 20;

/// Converts an impedance to its reflection coefficient relative to a real
/// reference impedance.
#[must_use]
pub fn impedance_to_reflection(z: C, z0: Scalar) -> C {
    let z0 = C::new(z0, 0.0);
    (z - z0) / (z + z0)
}

/// Converts a reflection coefficient back to an impedance. Singular as
/// `Γ → 1` (an open circuit).
pub fn reflection_to_impedance(gamma: C, z0: Scalar) -> Result<C> {
    let one = C::new(1.0, 0.0);
    guarded_div(
        C::new(z0, 0.0) * (one + gamma),
        one - gamma,
        "reflection to impedance",
    )
}

/// Normalizes an impedance to the reference, `z/Z0`.
#[must_use]
pub fn normalize_impedance(z: C, z0: Scalar) -> C {
    z / z0
}

/// Point-spacing policy for the adaptive generator.
///
/// All spacings are distances on the unit disk. Inside `edge_threshold` the
/// spacing interpolates linearly from `max_spacing` at the center down to
/// `min_spacing` at the threshold radius; outside it shrinks hyperbolically
/// by up to `1 + edge_boost`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmithChartConfig {
    /// Smallest spacing between emitted points.
    pub min_spacing: Scalar,
    /// Largest spacing between emitted points.
    pub max_spacing: Scalar,
    /// `|Γ|` radius beyond which a point counts as near the edge.
    pub edge_threshold: Scalar,
    /// Density multiplier applied at the unit-circle edge.
    pub edge_boost: Scalar,
    /// Whether segments are refined at all.
    pub adaptive: bool,
}

impl Default for SmithChartConfig {
    fn default() -> Self {
        Self {
            min_spacing: 0.003,
            max_spacing: 0.015,
            edge_threshold: 0.7,
            edge_boost: 4.0,
            adaptive: true,
        }
    }
}

impl SmithChartConfig {
    /// Config with explicit spacing bounds and edge boost; threshold and
    /// adaptive flag keep their defaults.
    #[must_use]
    pub fn new(min_spacing: Scalar, max_spacing: Scalar, edge_boost: Scalar) -> Self {
        Self {
            min_spacing,
            max_spacing,
            edge_boost,
            ..Self::default()
        }
    }

    /// Same config with adaptive refinement switched on or off.
    #[must_use]
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }
}

/// Generates Smith-chart point streams from sweeps, impedance clouds, and
/// S11 series.
#[derive(Debug, Clone, Default)]
pub struct SmithChartGenerator {
    config: SmithChartConfig,
}

impl SmithChartGenerator {
    /// Generator with the given spacing configuration.
    #[must_use]
    pub fn new(config: SmithChartConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SmithChartConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: SmithChartConfig) {
        self.config = config;
    }

    /// Target spacing at a point, per the density policy.
    #[must_use]
    pub fn point_spacing(&self, gamma: C) -> Scalar {
        let radius = gamma.norm();
        let cfg = &self.config;
        if radius < cfg.edge_threshold {
            let t = radius / cfg.edge_threshold;
            cfg.max_spacing - t * (cfg.max_spacing - cfg.min_spacing)
        } else {
            let edge = (radius - cfg.edge_threshold) / (1.0 - cfg.edge_threshold);
            cfg.min_spacing / (1.0 + cfg.edge_boost * edge)
        }
    }

    /// Number of points to insert between two samples: `ceil(d/s̄) - 1`,
    /// bounded to [`MAX_INTERPOLATION_POINTS`].
    fn interpolation_count(&self, gamma1: C, gamma2: C) -> usize {
        let distance = (gamma2 - gamma1).norm();
        let avg_spacing = 0.5 * (self.point_spacing(gamma1) + self.point_spacing(gamma2));
        if distance <= avg_spacing {
            return 0;
        }
        let count = (distance / avg_spacing).ceil() as usize - 1;
        count.min(MAX_INTERPOLATION_POINTS)
    }

    fn push_point(points: &mut Vec<f32>, gamma: C) {
        points.push(clamp_unit(gamma.re) as f32);
        points.push(clamp_unit(gamma.im) as f32);
    }

    fn push_segment(&self, points: &mut Vec<f32>, gamma1: C, gamma2: C) {
        let count = self.interpolation_count(gamma1, gamma2);
        for i in 1..=count {
            let t = i as Scalar / (count + 1) as Scalar;
            Self::push_point(points, gamma1 + (gamma2 - gamma1) * t);
        }
    }

    /// Frequency sweep over a network builder, refined by the spacing policy.
    ///
    /// Emits `[x, y]` pairs in sweep order, with interpolated points inserted
    /// between samples whose chord exceeds the local spacing.
    pub fn sweep_points<F>(
        &self,
        mut builder: F,
        sweep: &FrequencySweep,
        z_load: C,
        z0_reference: Scalar,
    ) -> Result<Vec<f32>>
    where
        F: FnMut(Scalar) -> Result<TwoPort>,
    {
        let mut points = Vec::with_capacity(sweep.num_points() * 2 * 4);
        let mut prev_gamma: Option<C> = None;
        for freq in sweep.values() {
            let network = builder(freq).map_err(|e| e.at("frequency", freq))?;
            let z_in = network
                .input_impedance(z_load)
                .map_err(|e| e.at("frequency", freq))?;
            let gamma = impedance_to_reflection(z_in, z0_reference);
            if let Some(prev) = prev_gamma {
                if self.config.adaptive {
                    self.push_segment(&mut points, prev, gamma);
                }
            }
            Self::push_point(&mut points, gamma);
            prev_gamma = Some(gamma);
        }
        Ok(points)
    }

    /// Frequency sweep of a fixed (frequency-independent) network.
    ///
    /// The reflection coefficient does not move, so the same point is emitted
    /// once per frequency sample without refinement.
    pub fn fixed_network_points(
        &self,
        network: &TwoPort,
        sweep: &FrequencySweep,
        z_load: C,
        z0_reference: Scalar,
    ) -> Result<Vec<f32>> {
        let z_in = network.input_impedance(z_load)?;
        let gamma = impedance_to_reflection(z_in, z0_reference);
        let mut points = Vec::with_capacity(sweep.num_points() * 2);
        for _ in 0..sweep.num_points() {
            Self::push_point(&mut points, gamma);
        }
        Ok(points)
    }

    /// Monte-Carlo impedance scatter: one point per impedance, no
    /// interpolation.
    #[must_use]
    pub fn monte_carlo_points(&self, impedances: &[C], z0_reference: Scalar) -> Vec<f32> {
        let mut points = Vec::with_capacity(impedances.len() * 2);
        for z in impedances {
            Self::push_point(&mut points, impedance_to_reflection(*z, z0_reference));
        }
        points
    }

    /// Direct impedance-list conversion. Alias of the Monte-Carlo scatter
    /// mode.
    #[must_use]
    pub fn impedances_to_points(&self, impedances: &[C], z0_reference: Scalar) -> Vec<f32> {
        self.monte_carlo_points(impedances, z0_reference)
    }

    /// S11 passthrough: each element is treated as a reflection coefficient
    /// directly, still clamped and adaptively refined between samples.
    #[must_use]
    pub fn s11_points(&self, s11_data: &[C]) -> Vec<f32> {
        let mut points = Vec::with_capacity(s11_data.len() * 2 * 4);
        let mut prev_gamma: Option<C> = None;
        for gamma in s11_data.iter().copied() {
            if let Some(prev) = prev_gamma {
                if self.config.adaptive {
                    self.push_segment(&mut points, prev, gamma);
                }
            }
            Self::push_point(&mut points, gamma);
            prev_gamma = Some(gamma);
        }
        points
    }

    /// Frequency sweep emitted as an enhanced stream: per-point frequency
    /// values (interpolated linearly alongside `Γ`) and zero timestamps.
    pub fn frequency_sweep_stream<F>(
        &self,
        mut builder: F,
        sweep: &FrequencySweep,
        z_load: C,
        z0_reference: Scalar,
        metadata: TraceMetadata,
    ) -> Result<PointStream>
    where
        F: FnMut(Scalar) -> Result<TwoPort>,
    {
        let mut stream = PointStream::with_metadata(metadata);
        stream.reserve(sweep.num_points());
        let mut prev: Option<(C, Scalar)> = None;
        for freq in sweep.values() {
            let network = builder(freq).map_err(|e| e.at("frequency", freq))?;
            let z_in = network
                .input_impedance(z_load)
                .map_err(|e| e.at("frequency", freq))?;
            let gamma = impedance_to_reflection(z_in, z0_reference);
            if let Some((prev_gamma, prev_freq)) = prev {
                if self.config.adaptive {
                    let count = self.interpolation_count(prev_gamma, gamma);
                    for i in 1..=count {
                        let t = i as Scalar / (count + 1) as Scalar;
                        let gamma_interp = prev_gamma + (gamma - prev_gamma) * t;
                        let freq_interp = prev_freq + t * (freq - prev_freq);
                        stream.push(gamma_interp, freq_interp as f32, 0.0);
                    }
                }
            }
            stream.push(gamma, freq as f32, 0.0);
            prev = Some((gamma, freq));
        }
        Ok(stream)
    }

    /// Component sweep emitted as an enhanced stream, one point per swept
    /// value.
    pub fn component_sweep_stream(
        &self,
        sweep: &ComponentSweep,
        z_load: C,
        z0_reference: Scalar,
        metadata: TraceMetadata,
    ) -> Result<PointStream> {
        let identity = TwoPort::identity();
        let results =
            perform_component_sweep(sweep, z0_reference, &identity, &identity, z_load)?;
        let mut stream = PointStream::with_metadata(metadata);
        stream.reserve(results.len());
        for (gamma, value) in results
            .reflection_coefficients
            .iter()
            .zip(&results.values)
        {
            stream.push(*gamma, *value as f32, 0.0);
        }
        Ok(stream)
    }

    /// Monte-Carlo scatter as an enhanced stream; the per-point value is the
    /// impedance magnitude.
    #[must_use]
    pub fn monte_carlo_stream(
        &self,
        impedances: &[C],
        z0_reference: Scalar,
        metadata: TraceMetadata,
    ) -> PointStream {
        let mut stream = PointStream::with_metadata(metadata);
        stream.reserve(impedances.len());
        for z in impedances {
            let gamma = impedance_to_reflection(*z, z0_reference);
            stream.push(gamma, z.norm() as f32, 0.0);
        }
        stream
    }

    /// Frequency sweep with timestamps spread evenly across an animation
    /// duration. Emits exactly one point per sample.
    pub fn animated_sweep_stream<F>(
        &self,
        mut builder: F,
        sweep: &FrequencySweep,
        z_load: C,
        z0_reference: Scalar,
        duration_seconds: f32,
        metadata: TraceMetadata,
    ) -> Result<PointStream>
    where
        F: FnMut(Scalar) -> Result<TwoPort>,
    {
        let mut stream = PointStream::with_metadata(metadata);
        let n = sweep.num_points();
        stream.reserve(n);
        for (i, freq) in sweep.values().enumerate() {
            let network = builder(freq).map_err(|e| e.at("frequency", freq))?;
            let z_in = network
                .input_impedance(z_load)
                .map_err(|e| e.at("frequency", freq))?;
            let gamma = impedance_to_reflection(z_in, z0_reference);
            let t = i as f32 / (n - 1) as f32;
            stream.push(gamma, freq as f32, t * duration_seconds);
        }
        Ok(stream)
    }

    /// Regular 2-D mesh over a frequency × component-value grid.
    ///
    /// Rows follow the frequency sweep, columns the component-value axis.
    /// Two triangles per cell with `(i00, i01, i10)` / `(i01, i11, i10)`
    /// winding.
    #[allow(clippy::too_many_arguments)]
    pub fn mesh_2d<F>(
        &self,
        mut builder: F,
        sweep: &FrequencySweep,
        value_min: Scalar,
        value_max: Scalar,
        value_steps: usize,
        z_load: C,
        z0_reference: Scalar,
        metadata: TraceMetadata,
    ) -> Result<Mesh2d>
    where
        F: FnMut(Scalar, Scalar) -> Result<TwoPort>,
    {
        if value_steps < 2 {
            return Err(CascadeError::InvalidSweep(format!(
                "a mesh needs at least two value steps, got {value_steps}"
            )));
        }
        let rows = sweep.num_points();
        let cols = value_steps;
        let mut mesh = Mesh2d {
            vertices: Vec::with_capacity(rows * cols * 2),
            values: Vec::with_capacity(rows * cols),
            indices: Vec::with_capacity((rows - 1) * (cols - 1) * 6),
            rows,
            cols,
            metadata,
        };
        for freq in sweep.values() {
            for col in 0..cols {
                let t = col as Scalar / (cols - 1) as Scalar;
                let value = value_min + t * (value_max - value_min);
                let network = builder(freq, value).map_err(|e| e.at("frequency", freq))?;
                let z_in = network
                    .input_impedance(z_load)
                    .map_err(|e| e.at("frequency", freq))?;
                let gamma = impedance_to_reflection(z_in, z0_reference);
                mesh.vertices.push(clamp_unit(gamma.re) as f32);
                mesh.vertices.push(clamp_unit(gamma.im) as f32);
                mesh.values.push(value as f32);
            }
        }
        for row in 0..rows - 1 {
            for col in 0..cols - 1 {
                let i00 = (row * cols + col) as u32;
                let i01 = (row * cols + col + 1) as u32;
                let i10 = ((row + 1) * cols + col) as u32;
                let i11 = ((row + 1) * cols + col + 1) as u32;
                mesh.indices.extend_from_slice(&[i00, i01, i10]);
                mesh.indices.extend_from_slice(&[i01, i11, i10]);
            }
        }
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::network::components::{series_inductor, series_resistor, shunt_capacitor};
    use crate::sweep::SweepScale;

    #[test]
    fn bilinear_map_hits_the_landmarks() {
        let z0 = 50.0;
        let matched = impedance_to_reflection(C::new(50.0, 0.0), z0);
        assert_relative_eq!(matched.norm(), 0.0, epsilon = 1e-12);
        let open = impedance_to_reflection(C::new(1e12, 0.0), z0);
        assert_relative_eq!(open.re, 1.0, epsilon = 1e-6);
        let short = impedance_to_reflection(C::new(0.0, 0.0), z0);
        assert_relative_eq!(short.re, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn bilinear_map_round_trips() {
        let z = C::new(75.0, 25.0);
        let gamma = impedance_to_reflection(z, 50.0);
        let back = reflection_to_impedance(gamma, 50.0).unwrap();
        assert_relative_eq!(back.re, z.re, epsilon = 1e-10);
        assert_relative_eq!(back.im, z.im, epsilon = 1e-10);
    }

    #[test]
    fn inverse_map_is_singular_at_unity() {
        assert!(matches!(
            reflection_to_impedance(C::new(1.0, 0.0), 50.0),
            Err(CascadeError::Singular(_))
        ));
    }

    #[test]
    fn spacing_shrinks_toward_the_edge() {
        let generator = SmithChartGenerator::default();
        let center = generator.point_spacing(C::new(0.0, 0.0));
        let mid = generator.point_spacing(C::new(0.5, 0.0));
        let edge = generator.point_spacing(C::new(0.95, 0.0));
        assert_relative_eq!(center, 0.015, epsilon = 1e-12);
        assert!(mid < center);
        assert!(edge < mid);
        // At the threshold the spacing reaches min_spacing exactly.
        let threshold = generator.point_spacing(C::new(0.7, 0.0));
        assert_relative_eq!(threshold, 0.003, epsilon = 1e-12);
        // At the rim the boost divides min_spacing by (1 + edge_boost).
        let rim = generator.point_spacing(C::new(1.0, 0.0));
        assert_relative_eq!(rim, 0.003 / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn fixed_network_emits_one_point_per_sample() {
        let generator = SmithChartGenerator::default();
        let network = series_resistor(25.0).unwrap();
        let sweep = FrequencySweep::new(1.0e9, 2.0e9, 11, SweepScale::Linear).unwrap();
        let points = generator
            .fixed_network_points(&network, &sweep, C::new(50.0, 0.0), 50.0)
            .unwrap();
        assert_eq!(points.len(), 22);
        // 75 Ω in a 50 Ω system: Γ = 0.2.
        for pair in points.chunks(2) {
            assert_relative_eq!(pair[0], 0.2, epsilon = 1e-6);
            assert_relative_eq!(pair[1], 0.0, epsilon = 1e-6);
        }
    }

    fn resonator_builder() -> impl Fn(Scalar) -> crate::errors::Result<TwoPort> {
        |freq| {
            let l = series_inductor(10e-9, freq)?;
            let c = shunt_capacitor(2.5e-12, freq)?;
            Ok(l * c)
        }
    }

    #[test]
    fn adaptive_refinement_adds_points_for_resonator() {
        let sweep = FrequencySweep::new(0.95e9, 1.05e9, 11, SweepScale::Linear).unwrap();
        let z_load = C::new(50.0, 0.0);
        let config = SmithChartConfig::new(0.001, 0.01, 4.0);

        let adaptive = SmithChartGenerator::new(config)
            .sweep_points(resonator_builder(), &sweep, z_load, 50.0)
            .unwrap();
        let uniform = SmithChartGenerator::new(config.with_adaptive(false))
            .sweep_points(resonator_builder(), &sweep, z_load, 50.0)
            .unwrap();

        assert_eq!(uniform.len(), 22);
        assert!(adaptive.len() > uniform.len());
        for p in adaptive.iter().chain(uniform.iter()) {
            assert!((-1.0..=1.0).contains(p));
        }
    }

    #[test]
    fn refinement_is_bounded_per_segment() {
        // Two samples at opposite rim points force the worst-case chord.
        let generator = SmithChartGenerator::default();
        let points = generator.s11_points(&[C::new(-0.99, 0.0), C::new(0.99, 0.0)]);
        // At most 20 interpolated points between the two samples.
        assert!(points.len() <= 2 * (2 + 20));
        assert!(points.len() > 4);
    }

    #[test]
    fn s11_passthrough_skips_the_bilinear_map() {
        let generator = SmithChartGenerator::new(SmithChartConfig::default().with_adaptive(false));
        let data = [C::new(0.25, -0.1), C::new(0.3, 0.2)];
        let points = generator.s11_points(&data);
        assert_eq!(points.len(), 4);
        assert_relative_eq!(points[0], 0.25, epsilon = 1e-6);
        assert_relative_eq!(points[1], -0.1, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_impedances_stay_on_the_chart() {
        let generator = SmithChartGenerator::default();
        let impedances = [
            C::new(Scalar::INFINITY, 0.0),
            C::new(-50.0, 0.0),
            C::new(0.0, 0.0),
            C::new(1e30, -1e30),
        ];
        let points = generator.monte_carlo_points(&impedances, 50.0);
        assert_eq!(points.len(), 8);
        for p in &points {
            assert!((-1.0..=1.0).contains(p), "coordinate {p} escaped the disk");
        }
    }

    #[test]
    fn sweep_stream_interpolates_values_with_gamma() {
        let sweep = FrequencySweep::new(0.95e9, 1.05e9, 11, SweepScale::Linear).unwrap();
        let stream = SmithChartGenerator::new(SmithChartConfig::new(0.001, 0.01, 4.0))
            .frequency_sweep_stream(
                resonator_builder(),
                &sweep,
                C::new(50.0, 0.0),
                50.0,
                TraceMetadata::default(),
            )
            .unwrap();
        assert_eq!(stream.points.len(), stream.values.len() * 2);
        assert_eq!(stream.values.len(), stream.timestamps.len());
        assert!(stream.len() > 11);
        // Values stay monotonic for a monotonic frequency axis.
        for pair in stream.values.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn animated_stream_spreads_timestamps() {
        let sweep = FrequencySweep::new(1.0e9, 2.0e9, 5, SweepScale::Linear).unwrap();
        let stream = SmithChartGenerator::default()
            .animated_sweep_stream(
                |_| series_resistor(50.0),
                &sweep,
                C::new(50.0, 0.0),
                50.0,
                2.0,
                TraceMetadata::default(),
            )
            .unwrap();
        assert_eq!(stream.len(), 5);
        assert_relative_eq!(stream.timestamps[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(stream.timestamps[4], 2.0, epsilon = 1e-6);
        assert_relative_eq!(stream.timestamps[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn component_sweep_stream_carries_values() {
        use crate::network::components::ComponentKind;
        let sweep = ComponentSweep::new(
            ComponentKind::SeriesR,
            10.0,
            100.0,
            10,
            1.0e9,
            SweepScale::Linear,
        )
        .unwrap();
        let stream = SmithChartGenerator::default()
            .component_sweep_stream(&sweep, C::new(50.0, 0.0), 50.0, TraceMetadata::default())
            .unwrap();
        assert_eq!(stream.len(), 10);
        assert_relative_eq!(stream.values[0], 10.0, epsilon = 1e-6);
        assert_relative_eq!(stream.values[9], 100.0, epsilon = 1e-6);
    }

    #[test]
    fn mesh_grid_has_expected_topology() {
        let sweep = FrequencySweep::new(0.9e9, 1.1e9, 4, SweepScale::Linear).unwrap();
        let mesh = SmithChartGenerator::default()
            .mesh_2d(
                |freq, value| {
                    let l = series_inductor(value, freq)?;
                    let c = shunt_capacitor(2.5e-12, freq)?;
                    Ok(l * c)
                },
                &sweep,
                5e-9,
                20e-9,
                3,
                C::new(50.0, 0.0),
                50.0,
                TraceMetadata::default(),
            )
            .unwrap();
        assert_eq!(mesh.rows, 4);
        assert_eq!(mesh.cols, 3);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 2 * 3 * 2);
        // First cell follows the documented winding.
        assert_eq!(&mesh.indices[0..6], &[0, 1, 3, 1, 4, 3]);
        for v in &mesh.vertices {
            assert!((-1.0..=1.0).contains(v));
        }
    }
}
