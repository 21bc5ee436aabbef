// Magnitude spectrum chart

use super::time_series::draw_line_chart_with_axis;
use super::{series_color, PlotSeries, LINE_WIDTH_PLOT};
use crate::frequency::Spectrum;
use crate::Result;

pub fn render_spectrum(label: &str, spectrum: &Spectrum) -> Result<String> {
    let series = PlotSeries {
        data: spectrum
            .frequencies
            .iter()
            .copied()
            .zip(spectrum.magnitudes.iter().copied())
            .collect(),
        label: label.to_string(),
        color: series_color(1),
        stroke_width: LINE_WIDTH_PLOT + 1,
    };
    let title = match spectrum.dominant_frequency() {
        Some(f) => format!("{label} spectrum (dominant {f:.3} Hz)"),
        None => format!("{label} spectrum"),
    };
    draw_line_chart_with_axis(&title, "Frequency (Hz)", "Magnitude", &[series])
}
