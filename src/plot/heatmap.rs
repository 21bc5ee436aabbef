// Correlation matrix heatmap

use super::{render_svg, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CELL, FONT_SIZE_CHART_TITLE, HEATMAP_SIZE};
use crate::error::AnalyzerError;
use crate::stats::CorrelationMatrix;
use crate::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;

/// Cell values are printed only up to this many parameters
pub const MAX_ANNOTATED_PARAMETERS: usize = 20;
const MAX_AXIS_LABEL_CHARS: usize = 14;
const MISSING_CELL_COLOR: RGBColor = RGBColor(220, 220, 220);

/// Diverging color: blue at -1, white-ish at 0, red at +1
pub fn correlation_color(r: f64) -> RGBColor {
    if !r.is_finite() {
        return MISSING_CELL_COLOR;
    }
    let t = ((1.0 - r.clamp(-1.0, 1.0)) / 2.0).clamp(0.0, 1.0);
    let c = colorous::RED_BLUE.eval_continuous(t);
    RGBColor(c.r, c.g, c.b)
}

fn short_label(name: &str) -> String {
    if name.chars().count() <= MAX_AXIS_LABEL_CHARS {
        name.to_string()
    } else {
        let head: String = name.chars().take(MAX_AXIS_LABEL_CHARS - 1).collect();
        format!("{head}…")
    }
}

pub fn render_correlation(matrix: &CorrelationMatrix) -> Result<String> {
    if matrix.is_empty() {
        return Err(AnalyzerError::Plot(
            "correlation matrix has no parameters".to_string(),
        ));
    }
    let n = matrix.len() as i32;
    let labels: Vec<String> = matrix.names.iter().map(|s| short_label(s)).collect();
    let annotate = matrix.len() <= MAX_ANNOTATED_PARAMETERS;

    render_svg((HEATMAP_SIZE, HEATMAP_SIZE), |root| -> std::result::Result<(), Box<dyn Error>> {
        let mut chart = ChartBuilder::on(root)
            .caption("Parameter correlation", ("sans-serif", FONT_SIZE_CHART_TITLE))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(140)
            .build_cartesian_2d(0i32..n, n..0i32)?;

        let (width_px, height_px) = chart.plotting_area().dim_in_pixel();
        let cell_w = (width_px as i32 / n).max(1);
        let cell_h = (height_px as i32 / n).max(1);

        let label_for = |v: &i32| labels.get(*v as usize).cloned().unwrap_or_default();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(matrix.len())
            .y_labels(matrix.len())
            .x_label_offset(cell_w / 2)
            .y_label_offset(cell_h / 2)
            .x_label_formatter(&label_for)
            .y_label_formatter(&label_for)
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;

        chart.draw_series(matrix.values.iter().zip(0..).flat_map(|(row, y)| {
            row.iter().zip(0..).map(move |(r, x)| {
                Rectangle::new(
                    [(x, y), (x + 1, y + 1)],
                    correlation_color(r.unwrap_or(f64::NAN)).filled(),
                )
            })
        }))?;

        if annotate {
            let style = ("sans-serif", FONT_SIZE_CELL)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            for (y, row) in matrix.values.iter().enumerate() {
                for (x, r) in row.iter().enumerate() {
                    let text = r.map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".to_string());
                    chart.draw_series(std::iter::once(
                        EmptyElement::at((x as i32, y as i32))
                            + Text::new(text, (cell_w / 2, cell_h / 2), style.clone()),
                    ))?;
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_color_endpoints() {
        let red = correlation_color(1.0);
        let blue = correlation_color(-1.0);
        assert!(red.0 > red.2, "+1 should be red");
        assert!(blue.2 > blue.0, "-1 should be blue");
        assert_eq!(correlation_color(f64::NAN), MISSING_CELL_COLOR);
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("CAS"), "CAS");
        assert_eq!(short_label("PRESSUREALTITUDE_FT").chars().count(), MAX_AXIS_LABEL_CHARS);
    }

    #[test]
    fn test_render_correlation_annotates_cells() {
        let matrix = CorrelationMatrix {
            names: vec!["A".to_string(), "B".to_string()],
            values: vec![vec![Some(1.0), Some(-0.5)], vec![Some(-0.5), None]],
        };
        let svg = render_correlation(&matrix).unwrap();
        assert!(svg.contains("-0.50"));
        assert!(svg.contains("n/a"));
    }

    #[test]
    fn test_empty_matrix_is_an_error() {
        let matrix = CorrelationMatrix {
            names: Vec::new(),
            values: Vec::new(),
        };
        assert!(render_correlation(&matrix).is_err());
    }
}
