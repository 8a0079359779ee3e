use std::collections::BTreeSet;

use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Column – one named numeric column of the input table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header text, already passed through [`normalize_header`].
    pub name: String,
    /// One value per data row. Missing cells are `NaN`.
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: &str, values: Vec<f64>) -> Self {
        Column {
            name: normalize_header(name),
            values,
        }
    }
}

/// Strip the whitespace the simulator leaves around header names.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_string()
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Ordered, row-aligned numeric columns. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, enforcing unique header names and at least one row.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataLoadError> {
        let first = columns.first().ok_or(DataLoadError::MissingHeader)?;
        let n_rows = first.values.len();
        if n_rows == 0 {
            return Err(DataLoadError::NoRows);
        }

        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DataLoadError::DuplicateHeader(column.name.clone()));
            }
            if column.values.len() != n_rows {
                return Err(DataLoadError::RaggedColumn {
                    column: column.name.clone(),
                    len: column.values.len(),
                    expected: n_rows,
                });
            }
        }

        Ok(Table { columns, n_rows })
    }

    /// Number of data rows (always at least one).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_normalization_is_idempotent() {
        for raw in ["  Net_Gain(Week)", "Rest_Rate_30% ", "\tTrigger/Day\t", "plain"] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once);
        }
        assert_eq!(normalize_header(" Rest_Rate_30%"), "Rest_Rate_30%");
    }

    #[test]
    fn headers_are_stored_trimmed() {
        let table = Table::new(vec![
            Column::new("Trigger/Day", vec![2.0, 2.1]),
            Column::new(" Net_Gain(Week)", vec![0.5, 0.6]),
        ])
        .unwrap();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_columns(), 2);
        assert_eq!(table.headers(), vec!["Trigger/Day", "Net_Gain(Week)"]);
        assert_eq!(
            table.column(1).map(|c| (c.name.as_str(), c.values.clone())),
            Some(("Net_Gain(Week)", vec![0.5, 0.6]))
        );
        assert!(table.column(2).is_none());
    }

    #[test]
    fn duplicate_headers_after_trimming_are_rejected() {
        let err = Table::new(vec![
            Column::new("x", vec![1.0]),
            Column::new(" x ", vec![2.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateHeader(name) if name == "x"));
    }

    #[test]
    fn empty_tables_are_rejected() {
        assert!(matches!(Table::new(vec![]), Err(DataLoadError::MissingHeader)));
        assert!(matches!(
            Table::new(vec![Column::new("x", vec![])]),
            Err(DataLoadError::NoRows)
        ));
    }
}
