// Altitude vs speed scatter, colored by elapsed time

use super::{
    data_bounds, render_svg, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::error::AnalyzerError;
use crate::types::{Column, SampleTable};
use crate::Result;
use plotters::prelude::*;
use std::error::Error;

const POINT_RADIUS: u32 = 3;

/// Viridis color for `t` within `[t_min, t_max]`
pub fn time_color(t: f64, t_min: f64, t_max: f64) -> RGBColor {
    let span = (t_max - t_min).abs().max(1e-9);
    let frac = ((t - t_min) / span).clamp(0.0, 1.0);
    let c = colorous::VIRIDIS.eval_continuous(frac);
    RGBColor(c.r, c.g, c.b)
}

pub fn render_envelope(table: &SampleTable, altitude: &Column, speed: &Column) -> Result<String> {
    // (speed, altitude, elapsed)
    let points = table.paired(speed, altitude);
    let xy: Vec<(f64, f64)> = points.iter().map(|(x, y, _)| (*x, *y)).collect();
    let Some(((x_min, x_max), (y_min, y_max))) = data_bounds(xy.iter()) else {
        return Err(AnalyzerError::Plot(format!(
            "no rows with both {} and {}",
            altitude.name(),
            speed.name()
        )));
    };
    let (t_min, t_max) = points
        .iter()
        .map(|p| p.2)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });

    let x_desc = speed.descriptor.display_name();
    let y_desc = altitude.descriptor.display_name();

    render_svg((PLOT_WIDTH, PLOT_HEIGHT), |root| -> std::result::Result<(), Box<dyn Error>> {
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Flight envelope (color: elapsed {t_min:.1}s to {t_max:.1}s)"),
                ("sans-serif", FONT_SIZE_CHART_TITLE),
            )
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(x_desc.as_str())
            .y_desc(y_desc.as_str())
            .light_line_style(WHITE.mix(0.7))
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;

        chart.draw_series(points.iter().map(|&(x, y, t)| {
            Circle::new((x, y), POINT_RADIUS, time_color(t, t_min, t_max).filled())
        }))?;
        Ok(())
    })
}
