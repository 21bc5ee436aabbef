use crate::error::AnalyzerError;
use crate::parser::header::parse_header_rows;
use crate::parser::timestamp::normalize_timestamps;
use crate::types::{Column, SampleTable};
use crate::Result;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Tab if the first line has one, otherwise comma
pub fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

/// Parse one cell; empty, non-numeric and non-finite cells are missing
pub fn parse_value(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Load a flight-test file from disk
pub fn load_table(path: &Path) -> Result<SampleTable> {
    let bytes = std::fs::read(path)?;
    debug!(
        "Read {} bytes ({:.2} MB) from {}",
        bytes.len(),
        bytes.len() as f64 / 1024.0 / 1024.0,
        path.display()
    );
    let content = String::from_utf8_lossy(&bytes);
    load_table_from_str(&content)
}

/// Load a flight-test table from text with two header rows
///
/// Row 1 holds parameter names, row 2 units, and every following non-blank
/// row is data with the `DDD:HH:MM:SS.mmm` timestamp in column 1. A malformed
/// timestamp aborts the load; bad sensor cells only become missing values.
pub fn load_table_from_str(content: &str) -> Result<SampleTable> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);
    debug!(
        "Detected delimiter: {}",
        if delimiter == b'\t' { "tab" } else { "comma" }
    );

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut records = rdr.records();

    let names = records
        .next()
        .transpose()?
        .ok_or_else(|| AnalyzerError::InvalidHeader("file is empty".to_string()))?;
    let units = records.next().transpose()?.ok_or_else(|| {
        AnalyzerError::InvalidHeader("missing unit row (second header row)".to_string())
    })?;
    let header = parse_header_rows(&names, &units)?;
    debug!("Headers found: {:?}", names);

    let width = header.parameters.len();
    let mut timestamps: Vec<String> = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); width];
    let mut warned_wide_row = false;

    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        if record.len() > width + 1 && !warned_wide_row {
            warn!(
                "Data row {} has {} fields but the header has {}; extra fields ignored",
                timestamps.len() + 1,
                record.len(),
                width + 1
            );
            warned_wide_row = true;
        }

        timestamps.push(record.get(0).unwrap_or("").to_string());
        for (i, column) in values.iter_mut().enumerate() {
            column.push(record.get(i + 1).and_then(parse_value));
        }
    }

    if timestamps.is_empty() {
        return Err(AnalyzerError::NoData(
            "no data rows after the two header rows".to_string(),
        ));
    }

    let elapsed = normalize_timestamps(&timestamps)?;

    let columns: Vec<Column> = header
        .parameters
        .into_iter()
        .zip(values)
        .map(|(descriptor, values)| Column::new(descriptor, values))
        .collect();

    for column in columns.iter().filter(|c| c.has_no_data()) {
        warn!(
            "Column '{}' has no numeric values; it will be reported but not plotted",
            column.name()
        );
    }

    debug!(
        "Loaded {} rows x {} parameters",
        timestamps.len(),
        columns.len()
    );

    Ok(SampleTable {
        timestamp_name: header.timestamp_name,
        timestamp_unit: header.timestamp_unit,
        timestamps,
        elapsed,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    const TAB_SAMPLE: &str = "Description\tPRESSUREALTITUDE_FT\tCAS_KT\tELECTRONICSTEMP_C\n\
EU\tft\tkt\tDGC\n\
198:09:40:00.000\t1173\t0\t38.31\n\
198:09:40:00.100\t1176\t\t38.31\n\
198:09:40:00.200\t1180\tn/a\t38.40\n";

    #[test]
    fn test_load_tab_separated() {
        let table = load_table_from_str(TAB_SAMPLE).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.timestamp_name, "Description");
        assert_eq!(table.elapsed, vec![0.0, 0.1, 0.2]);
        assert_eq!(
            table.column_names(),
            vec!["PRESSUREALTITUDE_FT", "CAS_KT", "ELECTRONICSTEMP_C"]
        );
        let cas = table.column("CAS_KT").unwrap();
        assert_eq!(cas.values, vec![Some(0.0), None, None]);
        assert_eq!(cas.descriptor.category, Category::Speed);
        assert_eq!(
            table.column("ELECTRONICSTEMP_C").unwrap().descriptor.unit.as_deref(),
            Some("DGC")
        );
    }

    #[test]
    fn test_load_comma_separated_with_bom_and_blank_lines() {
        let content = "\u{feff}Time,ALT\nEU,ft\n\n198:09:40:00.000,100\n\n198:09:40:01.000,110\n";
        let table = load_table_from_str(content).unwrap();
        assert_eq!(table.timestamp_name, "Time");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.elapsed, vec![0.0, 1.0]);
        assert_eq!(table.timestamps[1], "198:09:40:01.000");
    }

    #[test]
    fn test_timestamp_cells_are_kept_verbatim() {
        let content = "Time, ALT \nEU, ft\n 198:09:40:00.000 , 100 \n198:09:40:00.500\t,110\n";
        let table = load_table_from_str(content).unwrap();
        assert_eq!(table.timestamps, vec![" 198:09:40:00.000 ", "198:09:40:00.500\t"]);
        assert_eq!(table.elapsed, vec![0.0, 0.5]);
        assert_eq!(table.column_names(), vec!["ALT"]);
        assert_eq!(table.columns[0].descriptor.unit.as_deref(), Some("ft"));
        assert_eq!(table.columns[0].values, vec![Some(100.0), Some(110.0)]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let content = "Time,A,B\nEU,V,V\n198:09:40:00.000,1\n198:09:40:00.100,2,3,99\n";
        let table = load_table_from_str(content).unwrap();
        assert_eq!(table.columns[0].values, vec![Some(1.0), Some(2.0)]);
        assert_eq!(table.columns[1].values, vec![None, Some(3.0)]);
    }

    #[test]
    fn test_blank_unit_row_is_still_the_unit_row() {
        let content = "Time,A,B\n,,\n198:09:40:00.000,1,2\n";
        let table = load_table_from_str(content).unwrap();
        assert_eq!(table.row_count(), 1);
        assert!(table.descriptors().all(|d| d.unit.is_none()));
    }

    #[test]
    fn test_malformed_timestamp_aborts() {
        let content = "Time,A\nEU,V\n198:09:40:00.000,1\n198-09-40,2\n";
        match load_table_from_str(content) {
            Err(AnalyzerError::Timestamp { row, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "198-09-40");
            }
            other => panic!("expected timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_missing_column_is_kept() {
        let content = "Time,A,JUNK\nEU,V,\n198:09:40:00.000,1,x\n198:09:40:00.100,2,\n";
        let table = load_table_from_str(content).unwrap();
        let junk = table.column("JUNK").unwrap();
        assert!(junk.has_no_data());
        assert_eq!(junk.values.len(), 2);
    }

    #[test]
    fn test_header_only_file_has_no_data() {
        let content = "Time,A\nEU,V\n";
        assert!(matches!(
            load_table_from_str(content),
            Err(AnalyzerError::NoData(_))
        ));
        assert!(matches!(
            load_table_from_str(""),
            Err(AnalyzerError::InvalidHeader(_))
        ));
        assert!(matches!(
            load_table_from_str("Time,A\n"),
            Err(AnalyzerError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 1.5 "), Some(1.5));
        assert_eq!(parse_value("-3e2"), Some(-300.0));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("ERR"), None);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a\tb"), b'\t');
        assert_eq!(detect_delimiter("a,b"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }
}
