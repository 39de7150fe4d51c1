//! Column-wide invariant corrections.
//!
//! These passes restore the cross-cell rules of a matrix after a mutation:
//! exclusive selection texts, unique values, first-row propagation and
//! trailing-zero trimming of numeric columns. They never fail. A cell that
//! refuses an update is logged and skipped.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::definitions::MAX_UNIQUE_SUFFIX_ATTEMPTS;
use crate::enums::DataType;
use crate::matrix::Matrix;
use crate::matrix_element::MatrixElement;
use crate::numeric::pending_zero_count;
use crate::value_item::ValueItem;

/// Rebinds the selection texts of an exclusive column.
///
/// Every row may choose among the texts that no row currently holds, plus
/// its own value. The pool is the union of `additional`, every row's
/// selection texts, minus all values in use. Does nothing unless every cell
/// of the column is exclusive.
pub fn correct_exclusive_selection_texts(column: &mut [&mut MatrixElement], additional: &[String]) {
    if column.is_empty() || !is_exclusive_column(column) {
        return;
    }
    let mut pool: BTreeSet<String> = additional.iter().cloned().collect();
    for cell in column.iter() {
        pool.extend(cell.type_format().selection_texts().iter().cloned());
    }
    for cell in column.iter() {
        pool.remove(cell.value());
    }
    rebind_column(column, &pool);
}

/// Rebinds an exclusive column against a complete list of texts.
///
/// Every row gets the complete list minus the values of all rows, plus its
/// own value.
pub fn correct_exclusive_selection_texts_with_complete_texts(column: &mut [&mut MatrixElement], complete: &[String]) {
    if column.is_empty() || complete.is_empty() || !is_exclusive_column(column) {
        return;
    }
    let mut pool: BTreeSet<String> = complete.iter().cloned().collect();
    for cell in column.iter() {
        pool.remove(cell.value());
    }
    rebind_column(column, &pool);
}

fn is_exclusive_column(column: &[&mut MatrixElement]) -> bool {
    column
        .iter()
        .all(|cell| cell.type_format().has_exclusive_selection_texts())
}

fn rebind_column(column: &mut [&mut MatrixElement], pool: &BTreeSet<String>) {
    for cell in column.iter_mut() {
        let value = cell.value().to_string();
        let mut texts: Vec<String> = pool.iter().cloned().collect();
        texts.push(value.clone());
        texts.sort();
        if let Err(error) = cell.rebind_exclusive_selection(&value, texts) {
            warn!(value = %value, %error, "Cannot rebind exclusive selection texts");
        }
    }
}

/// Makes the values of the first unique-default column distinct.
///
/// The column is chosen by row 0's format. Values are compared upper-case.
/// With `row` given, only that row's value is changed and compared against
/// the others; otherwise rows are processed top to bottom and earlier
/// values win.
pub fn correct_unique_value_columns(matrix: &mut Matrix, row: Option<usize>) {
    if row.is_some_and(|row| row >= matrix.row_count()) {
        return;
    }
    let Some(column) = first_row_columns(matrix, |cell| cell.type_format().is_unique_default()).first().copied()
    else {
        return;
    };

    match row {
        Some(row) => {
            let taken: HashSet<String> = matrix
                .column(column)
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != row)
                .map(|(_, cell)| cell.value().to_uppercase())
                .collect();
            if let Some(cell) = matrix.get_mut(row, column) {
                make_unique(cell, &taken);
            }
        }
        None => {
            let mut taken: HashSet<String> = HashSet::new();
            for cell in matrix.column_mut(column) {
                let value = make_unique(cell, &taken);
                taken.insert(value.to_uppercase());
            }
        }
    }
}

/// Appends an increasing counter to the cell's value until it is not taken.
///
/// Returns the cell's final value.
fn make_unique(cell: &mut MatrixElement, taken: &HashSet<String>) -> String {
    let value = cell.value().to_string();
    if !taken.contains(&value.to_uppercase()) {
        return value;
    }
    let candidate = (1..=MAX_UNIQUE_SUFFIX_ATTEMPTS)
        .map(|counter| format!("{value}{counter}"))
        .find(|candidate| !taken.contains(&candidate.to_uppercase()));
    let Some(candidate) = candidate else {
        warn!(value = %value, "No unique value found, keeping duplicate");
        return value;
    };
    match cell.set_value(&candidate) {
        Ok(_) => debug!(from = %value, to = %candidate, "Made column value unique"),
        Err(error) => warn!(value = %value, %error, "Cannot make column value unique"),
    }
    cell.value().to_string()
}

/// Copies row 0's value into every other row of first-row-editable-only columns.
pub fn correct_first_row_editable_only_columns(matrix: &mut Matrix) {
    for column in first_row_columns(matrix, |cell| cell.type_format().is_first_row_editable_only()) {
        let Some(source) = matrix.get(0, column).map(|cell| cell.value().to_string()) else {
            continue;
        };
        for cell in matrix.column_mut(column).into_iter().skip(1) {
            if let Err(error) = cell.set_value(&source) {
                warn!(column, value = %source, %error, "Cannot propagate first row value");
            }
        }
    }
}

/// Marks row 0's cells of first-row-editable-only columns editable.
pub fn correct_first_cell_of_first_row_editable_only_columns(matrix: &mut Matrix) {
    for column in first_row_columns(matrix, |cell| cell.type_format().is_first_row_editable_only()) {
        if let Some(cell) = matrix.get_mut(0, column) {
            cell.set_editable(true);
        }
    }
}

/// Trims common trailing zeros in every `NUMERIC` column.
pub fn correct_pending_zeros(matrix: &mut Matrix) {
    for column in first_row_columns(matrix, |cell| cell.type_format().data_type() == DataType::Numeric) {
        correct_pending_zeros_column(matrix, column);
    }
}

/// Trims the trailing zeros that all formatted values of a column share.
///
/// Counts are taken from fully formatted values, so a second pass finds
/// the same count and yields the same result. Without a common count the
/// cells are reformatted.
pub fn correct_pending_zeros_column(matrix: &mut Matrix, column: usize) {
    let is_numeric = matrix
        .get(0, column)
        .is_some_and(|cell| cell.type_format().data_type() == DataType::Numeric);
    if !is_numeric {
        return;
    }
    let common = matrix
        .column(column)
        .iter()
        .map(|cell| pending_zero_count(&cell.formatted_value()))
        .min()
        .unwrap_or_default();

    for cell in matrix.column_mut(column) {
        if common == 0 {
            cell.reformat();
            continue;
        }
        let formatted = cell.formatted_value();
        let trimmed = &formatted[..formatted.len().saturating_sub(common)];
        if let Err(error) = cell.set_value_without_format(trimmed) {
            warn!(column, value = %trimmed, %error, "Cannot trim pending zeros");
        }
    }
}

/// Sorts value items by vertical position, keeping the relative order of ties.
pub fn sort_value_items(items: &mut [ValueItem]) {
    items.sort_by_key(ValueItem::vertical_position);
}

/// Columns whose row-0 cell satisfies `predicate`.
fn first_row_columns(matrix: &Matrix, predicate: impl Fn(&MatrixElement) -> bool) -> Vec<usize> {
    matrix
        .row(0)
        .map(|cells| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| predicate(cell))
                .map(|(index, _)| index)
                .collect()
        })
        .unwrap_or_default()
}
