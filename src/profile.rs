//! Per-column diagnostic summary: value kinds, null share, null count.

use serde::Serialize;

use crate::{
    data::ValueKind,
    dataset::Table,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Distinct kinds in first-seen order; `null` is listed when present.
    pub kinds: Vec<ValueKind>,
    pub non_null_percent: f64,
    pub null_percent: f64,
    pub nulls: usize,
}

impl ColumnSummary {
    pub fn is_mixed(&self) -> bool {
        self.kinds
            .iter()
            .filter(|kind| **kind != ValueKind::Null)
            .count()
            > 1
    }

    pub fn kinds_display(&self) -> String {
        self.kinds
            .iter()
            .map(ValueKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn profile(table: &Table) -> Vec<ColumnSummary> {
    let total = table.len();
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut kinds = Vec::new();
            let mut nulls = 0usize;
            for row in table.rows() {
                let cell = row[idx].as_ref();
                if cell.is_none() {
                    nulls += 1;
                }
                let kind = ValueKind::of(cell);
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            let (non_null_percent, null_percent) = if total == 0 {
                (0.0, 0.0)
            } else {
                let non_null = (total - nulls) as f64 / total as f64 * 100.0;
                (round2(non_null), round2(100.0 - non_null))
            };
            ColumnSummary {
                name: name.clone(),
                kinds,
                non_null_percent,
                null_percent,
                nulls,
            }
        })
        .collect()
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn column_table(cells: Vec<Option<Value>>) -> Table {
        Table::from_rows(
            vec!["col".to_string()],
            cells.into_iter().map(|cell| vec![cell]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn reports_kinds_percentages_and_null_count() {
        let table = column_table(vec![
            Some(Value::String("N".to_string())),
            None,
            Some(Value::Integer(2)),
            Some(Value::String("I".to_string())),
        ]);
        let summary = &profile(&table)[0];
        assert_eq!(summary.name, "col");
        assert_eq!(
            summary.kinds,
            vec![ValueKind::String, ValueKind::Null, ValueKind::Integer]
        );
        assert!(summary.is_mixed());
        assert_eq!(summary.non_null_percent, 75.0);
        assert_eq!(summary.null_percent, 25.0);
        assert_eq!(summary.nulls, 1);
        assert_eq!(summary.kinds_display(), "string, null, integer");
    }

    #[test]
    fn percentages_are_rounded_independently() {
        // 1 of 3 non-null: 33.333.. and 66.666.. round to 33.33 + 66.67.
        let table = column_table(vec![Some(Value::Integer(1)), None, None]);
        let summary = &profile(&table)[0];
        assert_eq!(summary.non_null_percent, 33.33);
        assert_eq!(summary.null_percent, 66.67);
        assert_eq!(summary.nulls, 2);
    }

    #[test]
    fn independent_rounding_can_miss_one_hundred() {
        // 1 of 32 non-null: 3.125 and 96.875 both round up.
        let mut cells = vec![None; 32];
        cells[0] = Some(Value::Integer(1));
        let summary = &profile(&column_table(cells))[0];
        assert_eq!(summary.non_null_percent, 3.13);
        assert_eq!(summary.null_percent, 96.88);
        assert!((summary.non_null_percent + summary.null_percent - 100.01).abs() < 1e-9);
    }

    #[test]
    fn empty_table_reports_zero_percentages() {
        let summary = &profile(&column_table(Vec::new()))[0];
        assert!(summary.kinds.is_empty());
        assert_eq!(summary.non_null_percent, 0.0);
        assert_eq!(summary.null_percent, 0.0);
        assert_eq!(summary.nulls, 0);
    }

    #[test]
    fn profile_does_not_touch_the_table() {
        let table = column_table(vec![None]);
        let before = table.clone();
        let _ = profile(&table);
        assert_eq!(table, before);
    }
}
