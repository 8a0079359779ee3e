use std::fmt;

use super::model::Table;
use crate::chart::model::{Series, SeriesStyle, Side};
use crate::error::OutOfRangeError;

/// Capacity levels (percent) of the grouped layout, in column order.
pub const CAP_LEVELS: [u32; 5] = [30, 40, 50, 60, 70];

// ---------------------------------------------------------------------------
// Plans and schemas
// ---------------------------------------------------------------------------

/// The two chart variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Net gain (left) and value per trigger (right) against trigger rate.
    Paired,
    /// Net gain (left) and rest rate (right) for each capacity level.
    Grouped,
}

impl Plan {
    pub fn name(&self) -> &'static str {
        match self {
            Plan::Paired => "paired",
            Plan::Grouped => "grouped",
        }
    }

    /// The ordered column layout this plan expects.
    pub fn schema(&self) -> ExtractionPlan {
        let mut columns = vec![ColumnSpec {
            index: 0,
            role: ColumnRole::TriggerRate,
            series: None,
        }];

        match self {
            Plan::Paired => {
                columns.push(ColumnSpec::line(
                    1,
                    ColumnRole::NetGain { cap: None },
                    Side::Left,
                    "Weekly Net Gain (Left)",
                    0,
                ));
                columns.push(ColumnSpec::line(
                    2,
                    ColumnRole::ValuePerTrigger,
                    Side::Right,
                    "Value per Trigger (Right)",
                    0,
                ));
            }
            Plan::Grouped => {
                for (i, &cap) in CAP_LEVELS.iter().enumerate() {
                    columns.push(ColumnSpec::line(
                        1 + 2 * i,
                        ColumnRole::NetGain { cap: Some(cap) },
                        Side::Left,
                        &format!("Gain {cap}%"),
                        i,
                    ));
                    columns.push(ColumnSpec::line(
                        2 + 2 * i,
                        ColumnRole::RestRate { cap },
                        Side::Right,
                        &format!("Rest {cap}%"),
                        i,
                    ));
                }
            }
        }

        ExtractionPlan {
            name: self.name(),
            columns,
        }
    }
}

/// What a column holds, independent of its header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    TriggerRate,
    NetGain { cap: Option<u32> },
    ValuePerTrigger,
    RestRate { cap: u32 },
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::TriggerRate => write!(f, "trigger rate"),
            ColumnRole::NetGain { cap: None } => write!(f, "net gain"),
            ColumnRole::NetGain { cap: Some(cap) } => write!(f, "net gain at {cap}% cap"),
            ColumnRole::ValuePerTrigger => write!(f, "value per trigger"),
            ColumnRole::RestRate { cap } => write!(f, "rest rate at {cap}% cap"),
        }
    }
}

/// Where a plotted column goes.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub side: Side,
    pub label: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub index: usize,
    pub role: ColumnRole,
    /// `None` for the shared x column.
    pub series: Option<LineSpec>,
}

impl ColumnSpec {
    fn line(index: usize, role: ColumnRole, side: Side, label: &str, order: usize) -> Self {
        ColumnSpec {
            index,
            role,
            series: Some(LineSpec {
                side,
                label: label.to_string(),
                order,
            }),
        }
    }
}

/// An explicit, ordered schema: which column index plays which role.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPlan {
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
}

impl ExtractionPlan {
    /// Minimum number of columns the table must have.
    pub fn required_columns(&self) -> usize {
        self.columns.iter().map(|c| c.index + 1).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Pull one [`Series`] per plotted column out of `table`, by position.
///
/// Every column is resolved before anything is built, so a schema mismatch
/// yields an error and no partial output.
pub fn extract(table: &Table, plan: &ExtractionPlan) -> Result<Vec<Series>, OutOfRangeError> {
    let required = plan.required_columns();
    let resolved = plan
        .columns
        .iter()
        .map(|spec| {
            table
                .column(spec.index)
                .map(|column| (spec, column))
                .ok_or_else(|| OutOfRangeError {
                    plan: plan.name,
                    required,
                    role: spec.role.to_string(),
                    index: spec.index,
                    available: table.n_columns(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let x: &[f64] = resolved
        .iter()
        .find(|(spec, _)| spec.series.is_none())
        .map(|(_, column)| column.values.as_slice())
        .unwrap_or_default();

    let series: Vec<Series> = resolved
        .iter()
        .filter_map(|(spec, column)| {
            let line = spec.series.as_ref()?;
            Some(Series {
                label: line.label.clone(),
                x: x.to_vec(),
                y: column.values.clone(),
                side: line.side,
                order: line.order,
                style: SeriesStyle::default(),
            })
        })
        .collect();

    log::debug!(
        "{} plan: {} series from columns {:?}",
        plan.name,
        series.len(),
        table.headers()
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn table(n_columns: usize, n_rows: usize) -> Table {
        let columns = (0..n_columns)
            .map(|c| {
                let values = (0..n_rows).map(|r| (c * 100 + r) as f64).collect();
                Column::new(&format!("col{c}"), values)
            })
            .collect();
        Table::new(columns).unwrap()
    }

    #[test]
    fn paired_plan_yields_two_series_of_table_length() {
        let t = table(3, 7);
        let series = extract(&t, &Plan::Paired.schema()).unwrap();

        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|s| s.x.len() == 7 && s.y.len() == 7));
        assert_eq!(series[0].side, Side::Left);
        assert_eq!(series[1].side, Side::Right);
        assert_eq!(series[0].x, t.column(0).unwrap().values);
        assert_eq!(series[1].y, t.column(2).unwrap().values);
    }

    #[test]
    fn paired_plan_ignores_extra_columns() {
        let series = extract(&table(5, 2), &Plan::Paired.schema()).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn grouped_plan_yields_ten_series_split_by_axis() {
        let t = table(11, 4);
        let series = extract(&t, &Plan::Grouped.schema()).unwrap();

        assert_eq!(series.len(), 10);
        assert!(series.iter().all(|s| s.x.len() == 4 && s.y.len() == 4));
        assert_eq!(series.iter().filter(|s| s.side == Side::Left).count(), 5);
        assert_eq!(series.iter().filter(|s| s.side == Side::Right).count(), 5);

        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels[0], "Gain 30%");
        assert_eq!(labels[1], "Rest 30%");
        assert_eq!(labels[8], "Gain 70%");
        assert_eq!(labels[9], "Rest 70%");

        // Rest 50% comes from column 6.
        assert_eq!(series[5].y, t.column(6).unwrap().values);
        assert_eq!(series[5].order, 2);
    }

    #[test]
    fn too_few_columns_is_out_of_range() {
        let err = extract(&table(2, 3), &Plan::Paired.schema()).unwrap_err();
        assert_eq!(
            err,
            OutOfRangeError {
                plan: "paired",
                required: 3,
                role: "value per trigger".into(),
                index: 2,
                available: 2,
            }
        );
    }

    #[test]
    fn grouped_plan_names_the_first_missing_role() {
        let err = extract(&table(9, 3), &Plan::Grouped.schema()).unwrap_err();
        assert_eq!(err.index, 9);
        assert_eq!(err.role, "net gain at 70% cap");
        assert_eq!(err.required, 11);
        assert!(err.to_string().contains("needs 11 columns"));
        assert!(err.to_string().contains("only has 9 column(s)"));
    }

    #[test]
    fn schemas_report_their_width() {
        assert_eq!(Plan::Paired.schema().required_columns(), 3);
        assert_eq!(Plan::Grouped.schema().required_columns(), 11);
    }
}
