use crate::error::AnalyzerError;
use crate::types::ParameterDescriptor;
use crate::Result;
use csv::StringRecord;
use std::collections::HashMap;

/// Engineering-unit placeholder some recorders write in the unit row
pub const NO_UNIT_PLACEHOLDER: &str = "EU";

/// Parsed name and unit rows
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRows {
    pub timestamp_name: String,
    pub timestamp_unit: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
}

/// Blank or placeholder units mean "no unit"
pub fn normalize_unit(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_UNIT_PLACEHOLDER) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Make names unique by suffixing repeats with `.1`, `.2`, ...
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        seen.insert(candidate.clone(), 0);
        result.push(candidate);
    }
    result
}

/// Build column descriptors from header row 1 (names) and row 2 (units)
///
/// Column 0 is the timestamp. Blank names become `Unnamed_<index>`.
pub fn parse_header_rows(names: &StringRecord, units: &StringRecord) -> Result<HeaderRows> {
    if names.len() < 2 {
        return Err(AnalyzerError::InvalidHeader(format!(
            "expected a timestamp column and at least one parameter, found {} column(s)",
            names.len()
        )));
    }

    let raw_names: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                format!("Unnamed_{i}")
            } else {
                trimmed.to_string()
            }
        })
        .collect();
    let unique_names = dedupe_names(raw_names);

    let mut names_iter = unique_names.into_iter();
    let timestamp_name = names_iter.next().unwrap_or_default();
    let timestamp_unit = units.get(0).and_then(normalize_unit);

    let parameters = names_iter
        .enumerate()
        .map(|(i, name)| {
            let unit = units.get(i + 1).and_then(normalize_unit);
            ParameterDescriptor::new(name, unit)
        })
        .collect();

    Ok(HeaderRows {
        timestamp_name,
        timestamp_unit,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_names_and_units() {
        let names = StringRecord::from(vec!["Description", "PRESSUREALTITUDE_FT", "CAS"]);
        let units = StringRecord::from(vec!["EU", "ft", "kt"]);
        let header = parse_header_rows(&names, &units).unwrap();

        assert_eq!(header.timestamp_name, "Description");
        assert_eq!(header.timestamp_unit, None);
        assert_eq!(header.parameters.len(), 2);
        assert_eq!(header.parameters[0].unit.as_deref(), Some("ft"));
        assert_eq!(header.parameters[0].category, Category::Altitude);
        assert_eq!(header.parameters[1].category, Category::Speed);
    }

    #[test]
    fn test_short_unit_row_leaves_units_empty() {
        let names = StringRecord::from(vec!["Time", "A", "B"]);
        let units = StringRecord::from(vec!["EU", "V"]);
        let header = parse_header_rows(&names, &units).unwrap();
        assert_eq!(header.parameters[0].unit.as_deref(), Some("V"));
        assert_eq!(header.parameters[1].unit, None);
    }

    #[test]
    fn test_duplicate_and_blank_names() {
        let names = StringRecord::from(vec!["Time", "ALT", "", "ALT", "ALT"]);
        let units = StringRecord::from(vec!["", "", "", "", ""]);
        let header = parse_header_rows(&names, &units).unwrap();
        let got: Vec<&str> = header.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(got, vec!["ALT", "Unnamed_2", "ALT.1", "ALT.2"]);
    }

    #[test]
    fn test_requires_a_parameter_column() {
        let names = StringRecord::from(vec!["Time"]);
        let units = StringRecord::from(vec!["EU"]);
        assert!(matches!(
            parse_header_rows(&names, &units),
            Err(AnalyzerError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_unit_placeholder() {
        assert_eq!(normalize_unit(" eu "), None);
        assert_eq!(normalize_unit(""), None);
        assert_eq!(normalize_unit(" DGC "), Some("DGC".to_string()));
    }
}
