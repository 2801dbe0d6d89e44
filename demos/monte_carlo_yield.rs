use num_complex::Complex;
use rf_cascade::monte_carlo::{ComponentTolerance, MonteCarloAnalyzer, ToleranceDistribution};
use rf_cascade::network::components::ComponentKind;
use rf_cascade::smith::SmithChartGenerator;

fn main() -> rf_cascade::errors::Result<()> {
    // L-C matching section with 5 % parts, analyzed at 1 GHz.
    let mut analyzer = MonteCarloAnalyzer::new(2000, Some(1234));
    analyzer.add_component(ComponentTolerance::new(
        ComponentKind::SeriesL,
        13.8e-9,
        0.05,
        ToleranceDistribution::Gaussian,
    )?);
    analyzer.add_component(ComponentTolerance::new(
        ComponentKind::ShuntC,
        1.38e-12,
        0.05,
        ToleranceDistribution::Gaussian,
    )?);

    let results = analyzer.analyze(1.0e9, 50.0, Complex::new(200.0, 0.0))?;

    println!(
        "mean Z_in = {:.2} {:+.2}j ohm",
        results.mean_impedance.re, results.mean_impedance.im
    );
    println!(
        "std  Z_in = ({:.3}, {:.3}) ohm",
        results.std_impedance.re, results.std_impedance.im
    );
    println!("yield (VSWR < 2) = {:.1} %", results.yield_rate);
    if let Some(z95) = results.percentile_impedance(95.0) {
        println!("95th percentile |Z| sample = {:.2} {:+.2}j ohm", z95.re, z95.im);
    }

    // Scatter the sample cloud onto the Smith chart.
    let points = SmithChartGenerator::default().monte_carlo_points(&results.impedances, 50.0);
    println!("smith scatter: {} points, all on the unit disk", points.len() / 2);
    Ok(())
}
