//! Sweep descriptors and executors over frequency and component values.

/// Component-value sweep at a fixed frequency.
pub mod component;
/// Frequency sweep over a network builder.
pub mod frequency;

pub use component::{
    arc_range, perform_component_sweep, ArcRange, ComponentSweep, ComponentSweepResults,
};
pub use frequency::{perform_sweep, FrequencySweep, SweepResults};

use crate::math::Scalar;

/// Spacing of sweep samples along the value axis.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepScale {
    /// Equally spaced samples.
    Linear,
    /// Samples equally spaced in `log10`.
    Log,
}

/// Lazily enumerates `n` samples from `start` to `stop` with the given
/// spacing. Both endpoints are included; `n` must be at least 2 (enforced by
/// the descriptor constructors).
pub(crate) fn axis_values(
    start: Scalar,
    stop: Scalar,
    n: usize,
    scale: SweepScale,
) -> impl Iterator<Item = Scalar> {
    let last = (n - 1) as Scalar;
    (0..n).map(move |i| {
        let t = i as Scalar;
        match scale {
            SweepScale::Linear => start + t * (stop - start) / last,
            SweepScale::Log => {
                let log_start = start.log10();
                let log_stop = stop.log10();
                10.0_f64.powf(log_start + t * (log_stop - log_start) / last)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn linear_axis_hits_endpoints() {
        let v: Vec<Scalar> = axis_values(0.0, 1.0, 5, SweepScale::Linear).collect();
        assert_eq!(v.len(), 5);
        assert_relative_eq!(v[0], 0.0);
        assert_relative_eq!(v[2], 0.5);
        assert_relative_eq!(v[4], 1.0);
    }

    #[test]
    fn log_axis_is_geometric() {
        let v: Vec<Scalar> = axis_values(1.0, 100.0, 3, SweepScale::Log).collect();
        assert_relative_eq!(v[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(v[1], 10.0, epsilon = 1e-9);
        assert_relative_eq!(v[2], 100.0, epsilon = 1e-9);
    }
}
