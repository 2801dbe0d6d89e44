use num_complex::Complex;
use rf_cascade::network::builders::butterworth_lowpass3;
use rf_cascade::sweep::{perform_sweep, FrequencySweep, SweepScale};

fn main() -> rf_cascade::errors::Result<()> {
    // 3rd-order Butterworth low-pass, 1 GHz cutoff in a 50 Ω system.
    let builder = butterworth_lowpass3(1.0e9, 50.0)?;
    let sweep = FrequencySweep::new(0.1e9, 2.0e9, 40, SweepScale::Linear)?;
    let z0 = Complex::new(50.0, 0.0);

    let results = perform_sweep(builder, &sweep, 50.0, z0, z0)?;

    println!("freq(GHz), |S21|(dB), |S11|(dB), VSWR");
    for (((freq, s21), s11), vswr) in results
        .frequencies
        .iter()
        .zip(results.s21_db())
        .zip(results.s11_db())
        .zip(results.vswr())
    {
        println!("{:.4}, {:8.3}, {:8.3}, {:6.3}", freq / 1e9, s21, s11, vswr);
    }
    Ok(())
}
