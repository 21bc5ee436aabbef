use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Semantic bucket for a flight parameter, listed in match priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    Altitude,
    Speed,
    Temperature,
    Rate,
    Other,
}

impl Category {
    /// All categories in priority order, `Other` last
    pub const ALL: [Category; 5] = [
        Category::Altitude,
        Category::Speed,
        Category::Temperature,
        Category::Rate,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Altitude => "altitude",
            Category::Speed => "speed",
            Category::Temperature => "temperature",
            Category::Rate => "rate",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name, unit and category of one sensor column
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterDescriptor {
    pub name: String,
    pub unit: Option<String>,
    pub category: Category,
}

impl ParameterDescriptor {
    /// Build a descriptor, deriving the category from the name
    pub fn new(name: impl Into<String>, unit: Option<String>) -> Self {
        let name = name.into();
        let category = crate::categories::categorize(&name);
        Self {
            name,
            unit,
            category,
        }
    }

    /// "NAME (unit)" when a unit is known, otherwise just the name
    pub fn display_name(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} ({})", self.name, unit),
            None => self.name.clone(),
        }
    }

    pub fn unit_or_empty(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }
}
