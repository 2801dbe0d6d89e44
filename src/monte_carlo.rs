//! Monte-Carlo tolerance analysis over cascaded component networks.
//!
//! Each analyzed component carries a nominal value, a tolerance band, and a
//! sampling distribution. The analyzer draws a value table, rebuilds the
//! network per sample, and reduces the terminal behavior to statistics
//! (mean, componentwise standard deviation, yield against a VSWR threshold).

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal, Triangular};

use crate::errors::{CascadeError, Result};
use crate::math::{Scalar, C};
use crate::network::components::ComponentKind;
use crate::network::params::SParameters;
use crate::network::twoport::TwoPort;

/// Hard floor for sampled physical values, as a fraction of the nominal.
const SAMPLE_FLOOR_FRACTION: Scalar = 0.01;
/// Reference temperature for temperature-coefficient scaling, in °C.
const REFERENCE_TEMPERATURE_C: Scalar = 25.0;
/// Default VSWR limit for the yield statistic.
const DEFAULT_VSWR_LIMIT: Scalar = 2.0;

/// Sampling distribution of a toleranced component.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceDistribution {
    /// Uniform on `[μ(1-t), μ(1+t)]`.
    Uniform,
    /// Gaussian with `σ = μt/3`, clamped to the tolerance band.
    Gaussian,
    /// Triangular on the tolerance band with the peak at the nominal.
    Triangular,
}

/// One component of the analyzed network with its tolerance specification.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentTolerance {
    kind: ComponentKind,
    nominal: Scalar,
    tolerance: Scalar,
    distribution: ToleranceDistribution,
    temp_coeff_ppm_per_c: Scalar,
}

impl ComponentTolerance {
    /// Creates a toleranced component. `tolerance` is a fraction of the
    /// nominal (`0.1` = ±10 %).
    pub fn new(
        kind: ComponentKind,
        nominal: Scalar,
        tolerance: Scalar,
        distribution: ToleranceDistribution,
    ) -> Result<Self> {
        if nominal <= 0.0 {
            return Err(CascadeError::InvalidDistribution(format!(
                "nominal value must be positive, got {nominal}"
            )));
        }
        if tolerance < 0.0 {
            return Err(CascadeError::InvalidDistribution(format!(
                "tolerance must be non-negative, got {tolerance}"
            )));
        }
        Ok(Self {
            kind,
            nominal,
            tolerance,
            distribution,
            temp_coeff_ppm_per_c: 0.0,
        })
    }

    /// Attaches a temperature coefficient in ppm/°C.
    #[must_use]
    pub fn with_temperature_coefficient(mut self, ppm_per_c: Scalar) -> Self {
        self.temp_coeff_ppm_per_c = ppm_per_c;
        self
    }

    /// Component kind.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Nominal value.
    #[must_use]
    pub fn nominal(&self) -> Scalar {
        self.nominal
    }

    /// Tolerance fraction.
    #[must_use]
    pub fn tolerance(&self) -> Scalar {
        self.tolerance
    }

    /// Sampling distribution.
    #[must_use]
    pub fn distribution(&self) -> ToleranceDistribution {
        self.distribution
    }

    /// Nominal adjusted to `temperature_c` through the temperature
    /// coefficient: `μ' = μ·(1 + ppm·(T - 25)/1e6)`.
    #[must_use]
    pub fn at_temperature(&self, temperature_c: Scalar) -> Self {
        let factor =
            1.0 + self.temp_coeff_ppm_per_c * (temperature_c - REFERENCE_TEMPERATURE_C) / 1e6;
        Self {
            nominal: self.nominal * factor,
            ..*self
        }
    }

    /// Draws one value from the component's distribution.
    ///
    /// Samples are clamped to the tolerance band where the distribution calls
    /// for it, and always floored at `0.01·μ` to keep physical values
    /// strictly positive.
    pub fn sample(&self, rng: &mut StdRng) -> Scalar {
        if self.tolerance == 0.0 {
            return self.nominal;
        }
        let min = self.nominal * (1.0 - self.tolerance);
        let max = self.nominal * (1.0 + self.tolerance);
        let value = match self.distribution {
            ToleranceDistribution::Uniform => rng.gen_range(min..=max),
            ToleranceDistribution::Gaussian => {
                let sigma = self.nominal * self.tolerance / 3.0;
                // Parameters are validated finite and positive at construction.
                Normal::new(self.nominal, sigma)
                    .map_or(self.nominal, |dist| dist.sample(rng))
                    .clamp(min, max)
            }
            ToleranceDistribution::Triangular => Triangular::new(min, max, self.nominal)
                .map_or(self.nominal, |dist| dist.sample(rng)),
        };
        value.max(SAMPLE_FLOOR_FRACTION * self.nominal)
    }

    /// Maps a standard-normal draw into the tolerance band with the Gaussian
    /// scaling rule. Used by the correlated sampling path.
    fn from_standard_normal(&self, normal: Scalar) -> Scalar {
        if self.tolerance == 0.0 {
            return self.nominal;
        }
        let min = self.nominal * (1.0 - self.tolerance);
        let max = self.nominal * (1.0 + self.tolerance);
        let sigma = self.nominal * self.tolerance / 3.0;
        (self.nominal + sigma * normal)
            .clamp(min, max)
            .max(SAMPLE_FLOOR_FRACTION * self.nominal)
    }
}

/// Symmetric correlation matrix between analyzed components.
///
/// Defaults to the identity (independent variation). When installed on an
/// analyzer, independent standard normals are transformed by the Cholesky
/// factor before being scaled into each component's tolerance band.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    matrix: DMatrix<Scalar>,
}

impl CorrelationMatrix {
    /// Identity matrix of dimension `n` (independent components).
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self {
            matrix: DMatrix::identity(n, n),
        }
    }

    /// Dimension of the matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    /// Sets the symmetric correlation between components `i` and `j`.
    pub fn set_correlation(&mut self, i: usize, j: usize, correlation: Scalar) -> Result<()> {
        let n = self.size();
        if i >= n || j >= n {
            return Err(CascadeError::InvalidDistribution(format!(
                "correlation index ({i}, {j}) outside matrix of size {n}"
            )));
        }
        if correlation.abs() > 1.0 {
            return Err(CascadeError::InvalidDistribution(format!(
                "correlation must be in [-1, 1], got {correlation}"
            )));
        }
        self.matrix[(i, j)] = correlation;
        self.matrix[(j, i)] = correlation;
        Ok(())
    }

    /// Correlation between components `i` and `j`.
    #[must_use]
    pub fn correlation(&self, i: usize, j: usize) -> Scalar {
        self.matrix[(i, j)]
    }

    /// Lower-triangular Cholesky factor.
    fn cholesky_factor(&self) -> Result<DMatrix<Scalar>> {
        nalgebra::Cholesky::new(self.matrix.clone())
            .map(|c| c.l())
            .ok_or_else(|| {
                CascadeError::InvalidDistribution(String::from(
                    "correlation matrix is not positive definite",
                ))
            })
    }
}

/// Monte-Carlo analyzer: a component list, a sample budget, and an RNG.
///
/// The RNG is the only mutable state in the crate; seeded construction makes
/// runs reproducible. Callers that share an analyzer across threads must
/// serialize externally.
#[derive(Debug)]
pub struct MonteCarloAnalyzer {
    num_samples: usize,
    rng: StdRng,
    components: Vec<ComponentTolerance>,
    correlation: Option<CorrelationMatrix>,
}

impl MonteCarloAnalyzer {
    /// Creates an analyzer drawing `num_samples` samples. A `None` seed draws
    /// one from the operating system.
    #[must_use]
    pub fn new(num_samples: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            num_samples,
            rng,
            components: Vec::new(),
            correlation: None,
        }
    }

    /// Appends a toleranced component to the analyzed cascade.
    pub fn add_component(&mut self, component: ComponentTolerance) {
        self.components.push(component);
    }

    /// Number of components registered so far.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Installs a correlation matrix. The dimension must match the component
    /// count and the matrix must be positive definite.
    pub fn set_correlation(&mut self, correlation: CorrelationMatrix) -> Result<()> {
        if correlation.size() != self.components.len() {
            return Err(CascadeError::InvalidDistribution(format!(
                "correlation matrix size {} does not match component count {}",
                correlation.size(),
                self.components.len()
            )));
        }
        correlation.cholesky_factor()?;
        self.correlation = Some(correlation);
        Ok(())
    }

    /// Draws one value row, honoring the correlation matrix when present.
    fn draw_row(
        rng: &mut StdRng,
        components: &[ComponentTolerance],
        cholesky: Option<&DMatrix<Scalar>>,
    ) -> Vec<Scalar> {
        match cholesky {
            None => components.iter().map(|c| c.sample(rng)).collect(),
            Some(l) => {
                let n = components.len();
                let independent =
                    nalgebra::DVector::from_fn(n, |_, _| rng.sample::<Scalar, _>(StandardNormal));
                let correlated = l * independent;
                components
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c.from_standard_normal(correlated[i]))
                    .collect()
            }
        }
    }

    fn check_frequency(&self, frequency_hz: Scalar) -> Result<()> {
        if frequency_hz <= 0.0
            && self.components.iter().any(|c| c.kind().is_reactive())
        {
            return Err(CascadeError::InvalidDistribution(format!(
                "reactive components need a positive frequency, got {frequency_hz}"
            )));
        }
        Ok(())
    }

    /// Runs the analysis at `frequency_hz`, cascading the registered
    /// components in insertion order for every sample.
    pub fn analyze(
        &mut self,
        frequency_hz: Scalar,
        z0_system: Scalar,
        z_load: C,
    ) -> Result<MonteCarloResults> {
        self.check_frequency(frequency_hz)?;
        let cholesky = match &self.correlation {
            Some(corr) => Some(corr.cholesky_factor()?),
            None => None,
        };
        let mut raw = RawCollection::with_capacity(self.num_samples);
        for _ in 0..self.num_samples {
            let values = Self::draw_row(&mut self.rng, &self.components, cholesky.as_ref());
            let network = cascade_components(&self.components, &values, frequency_hz)?;
            raw.collect(values, &network, z0_system, z_load)?;
        }
        Ok(raw.finish())
    }

    /// Runs the analysis with a caller-supplied builder mapping each value
    /// row to a network.
    pub fn analyze_with<F>(
        &mut self,
        mut builder: F,
        z0_system: Scalar,
        z_load: C,
    ) -> Result<MonteCarloResults>
    where
        F: FnMut(&[Scalar]) -> Result<TwoPort>,
    {
        let cholesky = match &self.correlation {
            Some(corr) => Some(corr.cholesky_factor()?),
            None => None,
        };
        let mut raw = RawCollection::with_capacity(self.num_samples);
        for _ in 0..self.num_samples {
            let values = Self::draw_row(&mut self.rng, &self.components, cholesky.as_ref());
            let network = builder(&values)?;
            raw.collect(values, &network, z0_system, z_load)?;
        }
        Ok(raw.finish())
    }

    /// Sweeps temperature from `temp_min_c` to `temp_max_c` in `temp_steps`
    /// steps, adjusting every nominal through its temperature coefficient and
    /// running `ceil(num_samples/temp_steps)` samples per step. The aggregate
    /// result concatenates all steps and recomputes the statistics.
    pub fn analyze_temperature(
        &mut self,
        frequency_hz: Scalar,
        temp_min_c: Scalar,
        temp_max_c: Scalar,
        temp_steps: usize,
        z0_system: Scalar,
    ) -> Result<MonteCarloResults> {
        if temp_steps < 2 {
            return Err(CascadeError::InvalidSweep(format!(
                "temperature sweep needs at least two steps, got {temp_steps}"
            )));
        }
        self.check_frequency(frequency_hz)?;
        let cholesky = match &self.correlation {
            Some(corr) => Some(corr.cholesky_factor()?),
            None => None,
        };
        let samples_per_step = self.num_samples.div_ceil(temp_steps);
        let temp_step = (temp_max_c - temp_min_c) / (temp_steps - 1) as Scalar;
        let z_load = C::new(z0_system, 0.0);

        let mut raw = RawCollection::with_capacity(samples_per_step * temp_steps);
        for step in 0..temp_steps {
            let temperature = temp_min_c + step as Scalar * temp_step;
            let adjusted: Vec<ComponentTolerance> = self
                .components
                .iter()
                .map(|c| c.at_temperature(temperature))
                .collect();
            for _ in 0..samples_per_step {
                let values = Self::draw_row(&mut self.rng, &adjusted, cholesky.as_ref());
                let network = cascade_components(&adjusted, &values, frequency_hz)?;
                raw.collect(values, &network, z0_system, z_load)?;
            }
        }
        Ok(raw.finish())
    }
}

fn cascade_components(
    components: &[ComponentTolerance],
    values: &[Scalar],
    frequency_hz: Scalar,
) -> Result<TwoPort> {
    let mut network = TwoPort::identity();
    for (component, value) in components.iter().zip(values) {
        network = network.cascade(&component.kind().build(*value, frequency_hz)?);
    }
    Ok(network)
}

/// Accumulator for per-sample outputs before statistics are computed.
struct RawCollection {
    component_values: Vec<Vec<Scalar>>,
    impedances: Vec<C>,
    s_params: Vec<SParameters>,
}

impl RawCollection {
    fn with_capacity(n: usize) -> Self {
        Self {
            component_values: Vec::with_capacity(n),
            impedances: Vec::with_capacity(n),
            s_params: Vec::with_capacity(n),
        }
    }

    fn collect(
        &mut self,
        values: Vec<Scalar>,
        network: &TwoPort,
        z0_system: Scalar,
        z_load: C,
    ) -> Result<()> {
        let z_in = network.input_impedance(z_load)?;
        let s = network.to_s_parameters(z0_system)?;
        self.component_values.push(values);
        self.impedances.push(z_in);
        self.s_params.push(s);
        Ok(())
    }

    fn finish(self) -> MonteCarloResults {
        let mut results = MonteCarloResults {
            num_samples: self.impedances.len(),
            component_values: self.component_values,
            impedances: self.impedances,
            s_params: self.s_params,
            mean_impedance: C::new(0.0, 0.0),
            std_impedance: C::new(0.0, 0.0),
            yield_rate: 0.0,
        };
        results.recompute_statistics();
        results
    }
}

/// Aggregate output of a Monte-Carlo run.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloResults {
    /// Number of evaluated samples.
    pub num_samples: usize,
    /// Value table, one row per sample.
    pub component_values: Vec<Vec<Scalar>>,
    /// Input impedance per sample.
    pub impedances: Vec<C>,
    /// S-parameters per sample.
    pub s_params: Vec<SParameters>,
    /// Mean of the sampled input impedances.
    pub mean_impedance: C,
    /// Standard deviation of the impedances, computed componentwise on the
    /// real and imaginary parts (not as a complex modulus).
    pub std_impedance: C,
    /// Percentage of samples with VSWR below the default limit of 2.
    pub yield_rate: Scalar,
}

impl MonteCarloResults {
    fn recompute_statistics(&mut self) {
        let m = self.impedances.len();
        if m == 0 {
            return;
        }
        let sum: C = self.impedances.iter().sum();
        self.mean_impedance = sum / m as Scalar;

        if m > 1 {
            let (sum_sq_re, sum_sq_im) = self.impedances.iter().fold((0.0, 0.0), |acc, z| {
                let d = z - self.mean_impedance;
                (acc.0 + d.re * d.re, acc.1 + d.im * d.im)
            });
            let divisor = (m - 1) as Scalar;
            self.std_impedance =
                C::new((sum_sq_re / divisor).sqrt(), (sum_sq_im / divisor).sqrt());
        } else {
            self.std_impedance = C::new(0.0, 0.0);
        }

        self.yield_rate = self.yield_against(|s| s.vswr() < DEFAULT_VSWR_LIMIT);
    }

    /// Percentage of samples whose S-parameters satisfy `predicate`.
    #[must_use]
    pub fn yield_against<F>(&self, predicate: F) -> Scalar
    where
        F: Fn(&SParameters) -> bool,
    {
        if self.s_params.is_empty() {
            return 0.0;
        }
        let pass = self.s_params.iter().filter(|s| predicate(s)).count();
        100.0 * pass as Scalar / self.s_params.len() as Scalar
    }

    /// Sample impedance at the given percentile of `|Z|`.
    ///
    /// Samples are sorted by magnitude and the entry at rank
    /// `floor(p·M/100)` (bounded to `M-1`) is returned verbatim; no
    /// interpolation between ranks.
    #[must_use]
    pub fn percentile_impedance(&self, percentile: Scalar) -> Option<C> {
        if self.impedances.is_empty() {
            return None;
        }
        let m = self.impedances.len();
        let index = ((percentile * m as Scalar / 100.0) as usize).min(m - 1);
        let mut sorted: Vec<C> = self.impedances.clone();
        sorted.sort_by(|a, b| a.norm().total_cmp(&b.norm()));
        Some(sorted[index])
    }

    /// VSWR of every sample, in sample order.
    #[must_use]
    pub fn vswr_distribution(&self) -> Vec<Scalar> {
        self.s_params.iter().map(SParameters::vswr).collect()
    }

    /// Per-component linear sensitivity of `|Z|` to the component value,
    /// sorted by descending magnitude.
    ///
    /// Sensitivity is the slope of the least-squares regression of `|Z|` on
    /// the component value; the Pearson correlation is reported alongside.
    /// Components with zero variance get both set to zero.
    #[must_use]
    pub fn sensitivity_analysis(&self) -> Vec<SensitivityResult> {
        if self.component_values.is_empty() || self.impedances.is_empty() {
            return Vec::new();
        }
        let num_components = self.component_values[0].len();
        let m = self.impedances.len() as Scalar;
        let magnitudes: Vec<Scalar> = self.impedances.iter().map(|z| C::norm(*z)).collect();
        let mean_mag = magnitudes.iter().sum::<Scalar>() / m;

        let mut sensitivities = Vec::with_capacity(num_components);
        for index in 0..num_components {
            let mean_value = self
                .component_values
                .iter()
                .map(|row| row[index])
                .sum::<Scalar>()
                / m;
            let (mut cov, mut var_value, mut var_mag) = (0.0, 0.0, 0.0);
            for (row, mag) in self.component_values.iter().zip(&magnitudes) {
                let dv = row[index] - mean_value;
                let dm = mag - mean_mag;
                cov += dv * dm;
                var_value += dv * dv;
                var_mag += dm * dm;
            }
            let (sensitivity, correlation) = if var_value > 0.0 && var_mag > 0.0 {
                (cov / var_value, cov / (var_value * var_mag).sqrt())
            } else {
                (0.0, 0.0)
            };
            sensitivities.push(SensitivityResult {
                component_index: index,
                sensitivity,
                correlation,
            });
        }
        sensitivities.sort_by(|a, b| b.sensitivity.abs().total_cmp(&a.sensitivity.abs()));
        sensitivities
    }
}

/// Sensitivity of the output impedance magnitude to one component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityResult {
    /// Index of the component in registration order.
    pub component_index: usize,
    /// Regression slope of `|Z|` against the component value.
    pub sensitivity: Scalar,
    /// Pearson correlation between the component value and `|Z|`.
    pub correlation: Scalar,
}

/// Normalized histogram of scalar samples over `num_bins` equal-width bins.
///
/// Bin counts are divided by the sample count, so the bins sum to one.
/// Returns an empty vector for empty input or zero bins; a degenerate
/// spread (all samples equal) lands everything in the first bin.
#[must_use]
pub fn histogram(values: &[Scalar], num_bins: usize) -> Vec<Scalar> {
    if values.is_empty() || num_bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(Scalar::INFINITY, Scalar::min);
    let max = values.iter().copied().fold(Scalar::NEG_INFINITY, Scalar::max);
    let width = (max - min) / num_bins as Scalar;
    let mut bins = vec![0.0; num_bins];
    for value in values {
        let bin = if width > 0.0 {
            (((value - min) / width) as usize).min(num_bins - 1)
        } else {
            0
        };
        bins[bin] += 1.0;
    }
    let total = values.len() as Scalar;
    for bin in &mut bins {
        *bin /= total;
    }
    bins
}

/// Width of the central confidence interval of `values` at
/// `confidence_level` (e.g. `0.95`), from the empirical quantiles.
#[must_use]
pub fn confidence_interval(values: &[Scalar], confidence_level: Scalar) -> Scalar {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<Scalar> = values.to_vec();
    sorted.sort_by(Scalar::total_cmp);
    let alpha = 1.0 - confidence_level;
    let lower = (alpha * 0.5 * sorted.len() as Scalar) as usize;
    let upper =
        (((1.0 - alpha * 0.5) * sorted.len() as Scalar) as usize).min(sorted.len() - 1);
    sorted[upper] - sorted[lower]
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn resistor_5pct(distribution: ToleranceDistribution) -> ComponentTolerance {
        ComponentTolerance::new(ComponentKind::SeriesR, 50.0, 0.05, distribution).unwrap()
    }

    #[test]
    fn tolerance_validation() {
        assert!(matches!(
            ComponentTolerance::new(ComponentKind::SeriesR, 50.0, -0.1, ToleranceDistribution::Uniform),
            Err(CascadeError::InvalidDistribution(_))
        ));
        assert!(matches!(
            ComponentTolerance::new(ComponentKind::SeriesR, 0.0, 0.1, ToleranceDistribution::Uniform),
            Err(CascadeError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn uniform_samples_stay_in_band() {
        let comp = resistor_5pct(ToleranceDistribution::Uniform);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = comp.sample(&mut rng);
            assert!((47.5..=52.5).contains(&v));
        }
    }

    #[test]
    fn gaussian_statistics_match_three_sigma_rule() {
        let comp = resistor_5pct(ToleranceDistribution::Gaussian);
        let mut rng = StdRng::seed_from_u64(42);
        let samples: Vec<Scalar> = (0..1000).map(|_| comp.sample(&mut rng)).collect();
        let mean = samples.iter().sum::<Scalar>() / samples.len() as Scalar;
        let std = (samples.iter().map(|v| (v - mean).powi(2)).sum::<Scalar>()
            / (samples.len() - 1) as Scalar)
            .sqrt();
        assert!((mean - 50.0).abs() < 1.0, "mean {mean}");
        assert!((std - 50.0 * 0.05 / 3.0).abs() < 0.3, "std {std}");
        assert!(samples.iter().all(|v| *v > 0.0));
        assert!(samples.iter().all(|v| (47.5..=52.5).contains(v)));
    }

    #[test]
    fn triangular_peaks_at_nominal() {
        let comp = resistor_5pct(ToleranceDistribution::Triangular);
        let mut rng = StdRng::seed_from_u64(3);
        let samples: Vec<Scalar> = (0..4000).map(|_| comp.sample(&mut rng)).collect();
        let mean = samples.iter().sum::<Scalar>() / samples.len() as Scalar;
        assert!((mean - 50.0).abs() < 0.5, "mean {mean}");
        assert!(samples.iter().all(|v| (47.5..=52.5).contains(v)));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut analyzer = MonteCarloAnalyzer::new(100, Some(seed));
            analyzer.add_component(resistor_5pct(ToleranceDistribution::Gaussian));
            analyzer
                .analyze(1.0e9, 50.0, C::new(50.0, 0.0))
                .unwrap()
        };
        let a = run(11);
        let b = run(11);
        assert_eq!(a.impedances, b.impedances);
        let c = run(12);
        assert_ne!(a.impedances, c.impedances);
    }

    #[test]
    fn resistor_analysis_statistics() {
        let mut analyzer = MonteCarloAnalyzer::new(1000, Some(2024));
        analyzer.add_component(resistor_5pct(ToleranceDistribution::Gaussian));
        let results = analyzer.analyze(1.0e9, 50.0, C::new(50.0, 0.0)).unwrap();

        assert_eq!(results.num_samples, 1000);
        // Z_in = R + 50, so the mean sits near 100 with the resistor spread.
        assert!((results.mean_impedance.re - 100.0).abs() < 1.0);
        assert!((results.std_impedance.re - 50.0 * 0.05 / 3.0).abs() < 0.3);
        assert_relative_eq!(results.std_impedance.im, 0.0, epsilon = 1e-12);
        // The nominal sits exactly on the VSWR = 2 boundary, so roughly half
        // the samples pass.
        assert!((40.0..=60.0).contains(&results.yield_rate));
        assert!(results.component_values.iter().all(|row| row[0] > 0.0));
    }

    #[test]
    fn reflection_coefficients_stay_on_the_disk() {
        let mut analyzer = MonteCarloAnalyzer::new(200, Some(5));
        analyzer.add_component(resistor_5pct(ToleranceDistribution::Gaussian));
        let results = analyzer.analyze(1.0e9, 50.0, C::new(50.0, 0.0)).unwrap();
        let points = crate::smith::SmithChartGenerator::default()
            .monte_carlo_points(&results.impedances, 50.0);
        assert!(points.iter().all(|p| (-1.0..=1.0).contains(p)));
    }

    #[test]
    fn zero_frequency_reactive_component_is_rejected() {
        let mut analyzer = MonteCarloAnalyzer::new(10, Some(1));
        analyzer.add_component(
            ComponentTolerance::new(
                ComponentKind::SeriesC,
                1e-12,
                0.1,
                ToleranceDistribution::Uniform,
            )
            .unwrap(),
        );
        let err = analyzer.analyze(0.0, 50.0, C::new(50.0, 0.0)).unwrap_err();
        assert!(matches!(err, CascadeError::InvalidDistribution(_)));
    }

    #[test]
    fn builder_variant_sees_value_rows() {
        let mut analyzer = MonteCarloAnalyzer::new(50, Some(9));
        analyzer.add_component(resistor_5pct(ToleranceDistribution::Uniform));
        analyzer.add_component(
            ComponentTolerance::new(
                ComponentKind::ShuntR,
                100.0,
                0.1,
                ToleranceDistribution::Uniform,
            )
            .unwrap(),
        );
        let results = analyzer
            .analyze_with(
                |values| {
                    assert_eq!(values.len(), 2);
                    let series = crate::network::components::series_resistor(values[0])?;
                    let shunt = crate::network::components::shunt_resistor(values[1])?;
                    Ok(series * shunt)
                },
                50.0,
                C::new(50.0, 0.0),
            )
            .unwrap();
        assert_eq!(results.num_samples, 50);
    }

    #[test]
    fn percentile_is_rank_based() {
        let mut results = MonteCarloResults {
            num_samples: 4,
            component_values: vec![vec![]; 4],
            impedances: vec![
                C::new(40.0, 0.0),
                C::new(10.0, 0.0),
                C::new(30.0, 0.0),
                C::new(20.0, 0.0),
            ],
            s_params: Vec::new(),
            mean_impedance: C::new(0.0, 0.0),
            std_impedance: C::new(0.0, 0.0),
            yield_rate: 0.0,
        };
        results.recompute_statistics();
        assert_relative_eq!(
            results.percentile_impedance(0.0).unwrap().re,
            10.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            results.percentile_impedance(50.0).unwrap().re,
            30.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            results.percentile_impedance(100.0).unwrap().re,
            40.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn temperature_sweep_concatenates_steps() {
        let mut analyzer = MonteCarloAnalyzer::new(100, Some(77));
        analyzer.add_component(
            resistor_5pct(ToleranceDistribution::Gaussian).with_temperature_coefficient(200.0),
        );
        let results = analyzer
            .analyze_temperature(1.0e9, -40.0, 85.0, 4, 50.0)
            .unwrap();
        // ceil(100/4) = 25 per step, 4 steps.
        assert_eq!(results.num_samples, 100);
        assert!((30.0..=70.0).contains(&results.yield_rate));
    }

    #[test]
    fn temperature_coefficient_shifts_nominal() {
        let comp = resistor_5pct(ToleranceDistribution::Uniform).with_temperature_coefficient(1000.0);
        let hot = comp.at_temperature(125.0);
        assert_relative_eq!(hot.nominal(), 50.0 * (1.0 + 1000.0 * 100.0 / 1e6), epsilon = 1e-9);
        let reference = comp.at_temperature(25.0);
        assert_relative_eq!(reference.nominal(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn correlation_matrix_validation() {
        let mut corr = CorrelationMatrix::identity(2);
        assert!(corr.set_correlation(0, 1, 1.5).is_err());
        assert!(corr.set_correlation(0, 2, 0.5).is_err());
        corr.set_correlation(0, 1, 0.8).unwrap();
        assert_relative_eq!(corr.correlation(1, 0), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn correlated_components_move_together() {
        let mut analyzer = MonteCarloAnalyzer::new(2000, Some(31));
        analyzer.add_component(resistor_5pct(ToleranceDistribution::Gaussian));
        analyzer.add_component(resistor_5pct(ToleranceDistribution::Gaussian));
        let mut corr = CorrelationMatrix::identity(2);
        corr.set_correlation(0, 1, 0.9).unwrap();
        analyzer.set_correlation(corr).unwrap();
        let results = analyzer.analyze(1.0e9, 50.0, C::new(50.0, 0.0)).unwrap();

        let (mut sum_a, mut sum_b) = (0.0, 0.0);
        for row in &results.component_values {
            sum_a += row[0];
            sum_b += row[1];
        }
        let n = results.component_values.len() as Scalar;
        let (mean_a, mean_b) = (sum_a / n, sum_b / n);
        let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
        for row in &results.component_values {
            let (da, db) = (row[0] - mean_a, row[1] - mean_b);
            cov += da * db;
            var_a += da * da;
            var_b += db * db;
        }
        let empirical = cov / (var_a * var_b).sqrt();
        assert!(empirical > 0.7, "empirical correlation {empirical}");
    }

    #[test]
    fn histogram_is_normalized() {
        let values = [1.0, 1.5, 2.0, 2.5, 3.0, 3.0, 3.0, 3.0];
        let bins = histogram(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_relative_eq!(bins.iter().sum::<Scalar>(), 1.0, epsilon = 1e-12);
        // 2.5 and the four maxima land in the last bin.
        assert_relative_eq!(bins[3], 0.625, epsilon = 1e-12);
        assert_relative_eq!(bins[0], 0.125, epsilon = 1e-12);
    }

    #[test]
    fn histogram_handles_degenerate_spread() {
        let bins = histogram(&[5.0; 10], 4);
        assert_relative_eq!(bins[0], 1.0, epsilon = 1e-12);
        assert!(histogram(&[], 4).is_empty());
    }

    #[test]
    fn confidence_interval_tracks_the_spread() {
        let comp = resistor_5pct(ToleranceDistribution::Gaussian);
        let mut rng = StdRng::seed_from_u64(88);
        let samples: Vec<Scalar> = (0..4000).map(|_| comp.sample(&mut rng)).collect();
        let ci = confidence_interval(&samples, 0.95);
        // For a Gaussian with sigma = 0.833, the 95 % interval spans about
        // 3.9 sigma; clamping narrows it slightly.
        assert!(ci > 2.5 && ci < 4.0, "confidence interval {ci}");
    }

    #[test]
    fn sensitivity_ranks_the_dominant_component() {
        let mut analyzer = MonteCarloAnalyzer::new(2000, Some(64));
        // A wide-tolerance series resistor dominates |Z_in| next to a
        // tight-tolerance one.
        analyzer.add_component(
            ComponentTolerance::new(
                ComponentKind::SeriesR,
                50.0,
                0.001,
                ToleranceDistribution::Gaussian,
            )
            .unwrap(),
        );
        analyzer.add_component(
            ComponentTolerance::new(
                ComponentKind::SeriesR,
                50.0,
                0.2,
                ToleranceDistribution::Gaussian,
            )
            .unwrap(),
        );
        let results = analyzer.analyze(1.0e9, 50.0, C::new(50.0, 0.0)).unwrap();
        let sensitivities = results.sensitivity_analysis();
        assert_eq!(sensitivities.len(), 2);
        let wide = sensitivities
            .iter()
            .find(|s| s.component_index == 1)
            .unwrap();
        let tight = sensitivities
            .iter()
            .find(|s| s.component_index == 0)
            .unwrap();
        // |Z_in| = r1 + r2 + 50, so the slope against the dominant resistor
        // is 1 and nearly all the spread correlates with it.
        assert_relative_eq!(wide.sensitivity, 1.0, epsilon = 0.05);
        assert!(wide.correlation > 0.95);
        assert!(tight.correlation.abs() < 0.5);
    }

    #[test]
    fn correlation_size_mismatch_is_rejected() {
        let mut analyzer = MonteCarloAnalyzer::new(10, Some(1));
        analyzer.add_component(resistor_5pct(ToleranceDistribution::Gaussian));
        let corr = CorrelationMatrix::identity(3);
        assert!(matches!(
            analyzer.set_correlation(corr),
            Err(CascadeError::InvalidDistribution(_))
        ));
    }
}
