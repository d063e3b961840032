//! Scale reversal.

use abs_common::column_codes;
use abs_model::{LabeledColumn, ScaleWidth};
use polars::prelude::Column;

/// Flips one response on a `width`-point scale: `v` becomes `width + 1 - v`.
///
/// Anything outside `1..=width`, absent values and leftover sentinels
/// included, comes back absent.
pub fn reverse(value: Option<i64>, width: ScaleWidth) -> Option<i64> {
    value
        .filter(|v| width.contains(*v))
        .map(|v| width.levels() + 1 - v)
}

/// Reverses every value of a code column into a new `Int64` column.
///
/// Value labels follow their codes; labels of codes outside the scale are
/// dropped since no value can carry them any more.
pub fn reverse_column(column: &LabeledColumn, width: ScaleWidth) -> LabeledColumn {
    let values: Vec<Option<i64>> = column_codes(&column.data)
        .into_iter()
        .map(|value| reverse(value, width))
        .collect();
    let data = Column::new(column.data.name().clone(), values);
    LabeledColumn {
        data,
        description: column.description.clone(),
        value_labels: column
            .value_labels
            .as_ref()
            .map(|labels| labels.remap(|code| reverse(Some(code), width))),
    }
}

#[cfg(test)]
mod tests {
    use abs_model::ValueLabels;

    use super::*;

    #[test]
    fn four_point_reversal() {
        let out: Vec<Option<i64>> = (1..=4).map(|v| reverse(Some(v), ScaleWidth::Four)).collect();
        assert_eq!(out, vec![Some(4), Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn absent_stays_absent() {
        assert_eq!(reverse(None, ScaleWidth::Five), None);
    }

    #[test]
    fn labels_follow_codes() {
        let labels: ValueLabels = [
            (1, "A great deal of trust"),
            (4, "None at all"),
            (98, "Don't know"),
        ]
        .into_iter()
        .collect();
        let column = LabeledColumn::new(Column::new("q8".into(), [Some(1i64), Some(4), None]))
            .with_value_labels(labels);
        let reversed = reverse_column(&column, ScaleWidth::Four);
        assert_eq!(
            column_codes(&reversed.data),
            vec![Some(4), Some(1), None]
        );
        let labels = reversed.labels().unwrap();
        assert_eq!(labels.get(4), Some("A great deal of trust"));
        assert_eq!(labels.get(1), Some("None at all"));
        assert_eq!(labels.get(98), None);
    }
}
