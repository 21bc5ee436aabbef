//! Flight performance metrics and time-axis analysis

use crate::categories::is_rate_parameter;
use crate::stats::mean;
use crate::types::{Category, Column, SampleTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Headline numbers for one flight; a field is `None` when its source column is absent
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightMetrics {
    pub altitude_parameter: Option<String>,
    pub speed_parameter: Option<String>,
    pub altitude_rate_parameter: Option<String>,
    pub max_altitude: Option<f64>,
    pub min_altitude: Option<f64>,
    pub altitude_range: Option<f64>,
    pub max_climb_rate: Option<f64>,
    /// Magnitude of the most negative altitude rate
    pub max_descent_rate: Option<f64>,
    pub max_speed: Option<f64>,
    pub min_speed: Option<f64>,
    pub avg_speed: Option<f64>,
    pub flight_duration_minutes: Option<f64>,
}

impl FlightMetrics {
    /// (label, value) pairs for every metric that could be computed
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        [
            ("max_altitude", self.max_altitude),
            ("min_altitude", self.min_altitude),
            ("altitude_range", self.altitude_range),
            ("max_climb_rate", self.max_climb_rate),
            ("max_descent_rate", self.max_descent_rate),
            ("max_speed", self.max_speed),
            ("min_speed", self.min_speed),
            ("avg_speed", self.avg_speed),
            ("flight_duration_minutes", self.flight_duration_minutes),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn first_non_rate(table: &SampleTable, category: Category) -> Option<&Column> {
    table.columns.iter().find(|c| {
        c.descriptor.category == category && !is_rate_parameter(c.name()) && !c.has_no_data()
    })
}

/// First altitude parameter that is not a rate
pub fn find_altitude_column(table: &SampleTable) -> Option<&Column> {
    first_non_rate(table, Category::Altitude)
}

/// First speed parameter that is not a rate
pub fn find_speed_column(table: &SampleTable) -> Option<&Column> {
    first_non_rate(table, Category::Speed)
}

/// First parameter naming both altitude and rate, e.g. `ALTITUDE_RATE`
pub fn find_altitude_rate_column(table: &SampleTable) -> Option<&Column> {
    table.columns.iter().find(|c| {
        let upper = c.name().to_uppercase();
        upper.contains("ALT") && upper.contains("RATE") && !c.has_no_data()
    })
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
    )
}

pub fn calculate_performance_metrics(table: &SampleTable) -> FlightMetrics {
    let mut metrics = FlightMetrics::default();

    if let Some(alt) = find_altitude_column(table) {
        metrics.altitude_parameter = Some(alt.name().to_string());
        if let Some((lo, hi)) = min_max(&alt.valid_values()) {
            metrics.max_altitude = Some(hi);
            metrics.min_altitude = Some(lo);
            metrics.altitude_range = Some(hi - lo);
        }
    }

    if let Some(rate) = find_altitude_rate_column(table) {
        metrics.altitude_rate_parameter = Some(rate.name().to_string());
        if let Some((lo, hi)) = min_max(&rate.valid_values()) {
            metrics.max_climb_rate = Some(hi);
            metrics.max_descent_rate = Some(lo.abs());
        }
    }

    if let Some(speed) = find_speed_column(table) {
        metrics.speed_parameter = Some(speed.name().to_string());
        let values = speed.valid_values();
        if let Some((lo, hi)) = min_max(&values) {
            metrics.max_speed = Some(hi);
            metrics.min_speed = Some(lo);
            metrics.avg_speed = mean(&values);
        }
    }

    if let Some((_, hi)) = table.elapsed_range() {
        metrics.flight_duration_minutes = Some(hi / 60.0);
    }

    metrics
}

/// Summary of the elapsed-time axis
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeAnalysis {
    pub first_seconds: f64,
    pub last_seconds: f64,
    pub duration_seconds: f64,
    /// Gap between the first two rows
    pub first_interval_seconds: Option<f64>,
    pub sample_rate_hz: Option<f64>,
    /// Count of rows whose elapsed time is earlier than the row before
    pub backwards_steps: usize,
}

pub fn time_analysis(table: &SampleTable) -> Option<TimeAnalysis> {
    let first_seconds = *table.elapsed.first()?;
    let last_seconds = *table.elapsed.last()?;
    let first_interval_seconds = match table.elapsed.as_slice() {
        [a, b, ..] => Some(b - a),
        _ => None,
    };
    let backwards_steps = table.elapsed.windows(2).filter(|w| w[1] < w[0]).count();

    Some(TimeAnalysis {
        first_seconds,
        last_seconds,
        duration_seconds: table.duration_seconds(),
        first_interval_seconds,
        sample_rate_hz: table.sample_rate_hz(),
        backwards_steps,
    })
}
