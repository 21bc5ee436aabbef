use crate::types::Category;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a summary row could be fully computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SummaryStatus {
    Ok,
    /// Exactly one valid value; std is undefined
    InsufficientData,
    /// No valid values at all; every statistic is undefined
    NoData,
}

impl SummaryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SummaryStatus::Ok => "ok",
            SummaryStatus::InsufficientData => "insufficient data",
            SummaryStatus::NoData => "no valid data",
        }
    }
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Descriptive statistics for one parameter column
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SummaryRecord {
    pub parameter: String,
    pub unit: Option<String>,
    pub category: Category,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
    pub status: SummaryStatus,
}

impl SummaryRecord {
    pub fn is_flagged(&self) -> bool {
        self.status != SummaryStatus::Ok
    }
}
