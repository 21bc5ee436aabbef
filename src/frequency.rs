//! Magnitude spectrum of a sensor signal

use crate::types::SampleTable;
use log::warn;
use realfft::RealFftPlanner;

/// Sample rate used when the time axis cannot supply one
pub const FALLBACK_SAMPLE_RATE_HZ: f64 = 1.0;

/// One-sided magnitude spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
    pub sample_rate_hz: f64,
}

impl Spectrum {
    /// Frequency of the largest magnitude bin
    pub fn dominant_frequency(&self) -> Option<f64> {
        self.magnitudes
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_finite())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| self.frequencies[i])
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// The table's average sample rate, or [`FALLBACK_SAMPLE_RATE_HZ`] when its
/// time axis has no extent
pub fn infer_sample_rate(table: &SampleTable) -> f64 {
    table.sample_rate_hz().unwrap_or(FALLBACK_SAMPLE_RATE_HZ)
}

/// Real FFT of the valid samples, scaled as `2/n * |X_k|` for `k < n/2`
///
/// Missing cells are dropped before the transform. Returns `None` with fewer
/// than two valid samples.
pub fn compute_spectrum(values: &[Option<f64>], sample_rate_hz: f64) -> Option<Spectrum> {
    let mut input: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    let n = input.len();
    if n < 2 {
        return None;
    }
    let sample_rate_hz = if sample_rate_hz.is_finite() && sample_rate_hz > 0.0 {
        sample_rate_hz
    } else {
        FALLBACK_SAMPLE_RATE_HZ
    };

    let fft = RealFftPlanner::<f64>::new().plan_fft_forward(n);
    let mut output = fft.make_output_vec();
    if let Err(e) = fft.process(&mut input, &mut output) {
        warn!("FFT processing failed: {e}");
        return None;
    }

    let half = n / 2;
    let scale = 2.0 / n as f64;
    let frequencies = (0..half)
        .map(|k| k as f64 * sample_rate_hz / n as f64)
        .collect();
    let magnitudes = output[..half].iter().map(|c| scale * c.norm()).collect();

    Some(Spectrum {
        frequencies,
        magnitudes,
        sample_rate_hz,
    })
}
