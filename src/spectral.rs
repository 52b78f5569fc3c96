//! Dominant-period estimation via the discrete Fourier transform.
//!
//! The y samples are transformed as-is (no window, no detrending) and the
//! strongest bin in the non-negative half of the spectrum picks the period.
//! The DC bin takes part in that search, so a series whose mean outweighs
//! its oscillation reports [`PeriodError::ZeroFrequency`].

use rustfft::{num_complex::Complex64, FftPlanner};

use crate::data::model::CleanSeries;
use crate::error::{PeriodError, Result};

/// The strongest bin of the non-negative half spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPeak {
    /// Bin index within the half spectrum.
    pub bin: usize,
    pub frequency: f64,
    pub magnitude: f64,
}

/// Mean of consecutive differences, or `None` for fewer than two values.
pub fn sample_spacing(x: &[f64]) -> Option<f64> {
    if x.len() < 2 {
        return None;
    }
    let total: f64 = x.windows(2).map(|w| w[1] - w[0]).sum();
    Some(total / (x.len() - 1) as f64)
}

/// Sample frequencies for an `n`-point transform at spacing `d`.
///
/// Same layout as numpy's `fftfreq`: `0, 1, ..., ceil(n/2)-1` followed by the
/// negative bins, all divided by `n * d`.
pub fn fft_frequencies(n: usize, d: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * d);
    let positive = n.div_ceil(2);
    (0..n)
        .map(|k| {
            let k = if k < positive {
                k as f64
            } else {
                k as f64 - n as f64
            };
            k * scale
        })
        .collect()
}

/// Magnitudes of the full complex DFT of a real signal.
fn dft_magnitudes(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let mut buffer: Vec<Complex64> = signal.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);
    buffer.iter().map(|c| c.norm()).collect()
}

/// Index of the largest value; the earliest one wins a tie.
fn first_max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Find the dominant bin among the first `n / 2` entries.
///
/// Ties resolve to the first occurrence of the maximum.
pub fn spectrum_peak(y: &[f64], spacing: f64) -> Option<SpectrumPeak> {
    let n = y.len();
    let half = n / 2;
    if half == 0 {
        return None;
    }

    let magnitudes = dft_magnitudes(y);
    let frequencies = fft_frequencies(n, spacing);

    let best = first_max_index(&magnitudes[..half]);

    Some(SpectrumPeak {
        bin: best,
        frequency: frequencies[best],
        magnitude: magnitudes[best],
    })
}

/// Estimate the dominant period of `series`, in units of x.
///
/// Fails when fewer than two samples remain, when the mean x spacing is
/// exactly zero, or when the peak lands on the zero-frequency bin.
pub fn estimate_period(series: &CleanSeries) -> Result<f64> {
    let n = series.len();
    let spacing = match sample_spacing(series.x()) {
        Some(t) if n >= 2 => t,
        _ => return Err(PeriodError::InsufficientData { got: n }),
    };
    if spacing == 0.0 {
        return Err(PeriodError::ZeroSpacing);
    }

    let peak = spectrum_peak(series.y(), spacing)
        .ok_or(PeriodError::InsufficientData { got: n })?;
    if peak.frequency == 0.0 {
        return Err(PeriodError::ZeroFrequency);
    }
    Ok(1.0 / peak.frequency)
}
