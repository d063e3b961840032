//! Normalization of response columns to integer codes.

use abs_common::{any_to_i64, column_codes};
use abs_model::LabeledColumn;
use polars::prelude::{AnyValue, Column, DataType};

use crate::error::Result;

/// Converts a response column to `Int64` codes.
///
/// Integer columns are cast directly. Float and string columns are accepted
/// when every present value is an integer code (`3`, `3.0`, `"3"`); a single
/// value such as `2.5` or `"Agree"` makes the column non-numeric and the
/// result is `None`. Description and value labels are kept.
pub fn to_code_column(column: &LabeledColumn) -> Result<Option<LabeledColumn>> {
    let dtype = column.data.dtype();
    if dtype.is_integer() {
        let data = column.data.cast(&DataType::Int64)?;
        return Ok(Some(with_data(column, data)));
    }
    if dtype == &DataType::Null {
        let data = Column::full_null(column.data.name().clone(), column.len(), &DataType::Int64);
        return Ok(Some(with_data(column, data)));
    }
    if !(dtype.is_float() || dtype == &DataType::String) {
        return Ok(None);
    }

    for idx in 0..column.len() {
        let value = column.data.get(idx)?;
        if !is_blank(&value) && any_to_i64(value).is_none() {
            return Ok(None);
        }
    }
    let data = Column::new(column.data.name().clone(), column_codes(&column.data));
    Ok(Some(with_data(column, data)))
}

fn is_blank(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn with_data(column: &LabeledColumn, data: Column) -> LabeledColumn {
    LabeledColumn {
        data,
        description: column.description.clone(),
        value_labels: column.value_labels.clone(),
    }
}
