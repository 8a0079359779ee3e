use std::path::Path;

use super::encoding::{self, TextEncoding};
use super::model::{Column, Table, normalize_header};
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read, decode and parse a simulator CSV file.
pub fn load_table(path: &Path, encoding: TextEncoding) -> Result<Table, DataLoadError> {
    let bytes = std::fs::read(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = encoding::decode(&bytes, encoding)?;
    let table = parse_table(&text)?;

    log::info!(
        "Loaded {} rows from '{}' ({encoding}) with columns {:?}",
        table.n_rows(),
        path.display(),
        table.headers()
    );
    Ok(table)
}

/// Parse CSV text with a header row into a [`Table`].
///
/// The simulator separates fields with `", "`, so both headers and cells are
/// trimmed. An empty cell is kept as `NaN` and drawn as a gap.
pub fn parse_table(text: &str) -> Result<Table, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataLoadError::MissingHeader);
    }

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        for (col_idx, cell) in record.iter().enumerate() {
            let value = parse_cell(cell).ok_or_else(|| DataLoadError::NotNumeric {
                row: row_no + 1,
                column: headers[col_idx].clone(),
                value: cell.to_string(),
            })?;
            values[col_idx].push(value);
        }
    }

    let columns = headers
        .iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::new(columns)
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SKILL_CSV: &str = "Trigger/Day, Net_Gain(Week), Value_Per_Trigger(Coeff)\n\
                             2.0, 0.8123, 0.0580\n\
                             2.1, 0.8511, 0.0579\n\
                             2.2, 0.8890, 0.0577\n";

    #[test]
    fn parses_simulator_output_with_padded_fields() {
        let table = parse_table(SKILL_CSV).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(
            table.headers(),
            vec!["Trigger/Day", "Net_Gain(Week)", "Value_Per_Trigger(Coeff)"]
        );
        assert_eq!(table.column(0).unwrap().values, vec![2.0, 2.1, 2.2]);
        assert_eq!(table.column(2).unwrap().values[1], 0.0579);
    }

    #[test]
    fn empty_cells_become_nan() {
        let table = parse_table("x,y\n1,\n2,3\n").unwrap();
        let y = &table.column(1).unwrap().values;
        assert!(y[0].is_nan());
        assert_eq!(y[1], 3.0);
    }

    #[test]
    fn text_cells_are_a_load_error() {
        let err = parse_table("x,y\n1,2\n2,oops\n").unwrap_err();
        match err {
            DataLoadError::NotNumeric { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "y");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_are_a_load_error() {
        let err = parse_table("x,y\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, DataLoadError::Csv(_)));
    }

    #[test]
    fn header_only_input_has_no_table() {
        assert!(matches!(
            parse_table("x,y\n"),
            Err(DataLoadError::NoRows)
        ));
        assert!(matches!(parse_table(""), Err(DataLoadError::MissingHeader)));
    }

    #[test]
    fn loads_a_utf16_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Trigger/Day, Net_Gain_30%(Week), Rest_Rate_30%\n2.0, 1.5, 0.25\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        file.write_all(&bytes).unwrap();

        let table = load_table(file.path(), TextEncoding::Utf16).unwrap();
        assert_eq!(table.headers()[2], "Rest_Rate_30%");
        assert_eq!(table.column(1).unwrap().values, vec![1.5]);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_table(&path, TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }
}
