//! Row operations of flexible matrices and protein-data row ordering.

use std::collections::VecDeque;

use tracing::{debug, warn};

use super::ValueItem;
use super::columns::{correct_exclusive_column, exclusive_column, is_exclusive_column};
use crate::corrections::correct_first_cell_of_first_row_editable_only_columns;
use crate::enums::BasicType;
use crate::error::{ModelError, Result};
use crate::matrix::Matrix;
use crate::matrix_element::MatrixElement;

impl ValueItem {
    /// True if a row can be added to this flexible matrix.
    ///
    /// With an exclusive selection column, row 0 must still offer more than
    /// one selection text.
    pub fn can_insert_matrix_row(&self) -> bool {
        if self.basic_type != BasicType::FlexibleMatrix {
            return false;
        }
        let Some(matrix) = self.matrix.as_ref() else {
            return false;
        };
        if matrix.row_count() >= self.matrix_maximum_number_of_rows {
            return false;
        }
        match exclusive_column(matrix) {
            Some(column) => matrix
                .get(0, column)
                .is_some_and(|cell| cell.type_format().selection_texts().len() > 1),
            None => true,
        }
    }

    /// Inserts a new row at `index` (clamped to the row count).
    ///
    /// Exclusive cells take the first free selection text, unique-default
    /// cells a fresh unique value, all other cells their format's default.
    pub fn insert_matrix_row(&mut self, index: usize) -> bool {
        self.add_row(index, None)
    }

    /// Appends a copy of the row at `source` (clamped to the last row).
    ///
    /// Exclusive and unique-default cells are derived as on insert.
    pub fn copy_matrix_row(&mut self, source: usize) -> bool {
        let last_row = self.matrix_row_count().saturating_sub(1);
        self.add_row(usize::MAX, Some(source.min(last_row)))
    }

    fn add_row(&mut self, index: usize, source: Option<usize>) -> bool {
        if !self.can_insert_matrix_row() {
            return false;
        }
        let Some(current) = self.matrix.as_ref() else {
            return false;
        };
        let mut matrix = current.clone();
        let result = self
            .new_row(current, source)
            .and_then(|row| matrix.insert_row(index, row));
        if let Err(error) = result {
            warn!(item = %self.name, %error, "Cannot add matrix row");
            return false;
        }
        correct_exclusive_column(&mut matrix, &[]);
        debug!(item = %self.name, rows = matrix.row_count(), "Added matrix row");
        self.set_matrix(matrix);
        true
    }

    fn new_row(&self, matrix: &Matrix, source: Option<usize>) -> Result<Vec<MatrixElement>> {
        let template_row = self.current_row.min(matrix.row_count().saturating_sub(1));
        (0..matrix.column_count())
            .map(|column| {
                let type_format = matrix.cell(template_row, column)?.type_format();
                if is_exclusive_column(matrix, column) {
                    let mut format = type_format.clone();
                    let value = format
                        .first_non_default_selection_text()
                        .map(str::to_string)
                        .ok_or_else(|| {
                            ModelError::invalid_default(format.default_value(), "no free selection text left")
                        })?;
                    let texts = format.selection_texts().to_vec();
                    format.set_default_value_and_selection_texts(&value, texts)?;
                    MatrixElement::with_value(&value, format)
                } else if type_format.is_unique_default() {
                    let value = type_format.unique_default_value(&matrix.column_values(column))?;
                    MatrixElement::with_value(&value, type_format.clone())
                } else {
                    match source {
                        Some(source) => Ok(matrix.cell(source, column)?.clone()),
                        None => Ok(MatrixElement::new(type_format.clone())),
                    }
                }
            })
            .collect()
    }

    /// Removes the row at `index` (clamped to the last row).
    ///
    /// The last remaining row is never removed. The removed exclusive value
    /// becomes available to the remaining rows again.
    pub fn remove_matrix_row(&mut self, index: usize) -> bool {
        if self.basic_type != BasicType::FlexibleMatrix {
            return false;
        }
        let Some(current) = self.matrix.as_ref() else {
            return false;
        };
        if current.row_count() <= 1 {
            return false;
        }
        let index = index.min(current.row_count() - 1);
        let mut matrix = current.clone();
        let exclusive = exclusive_column(&matrix);
        let Some(removed) = matrix.remove_row(index) else {
            return false;
        };
        let released: Vec<String> = exclusive
            .and_then(|column| removed.get(column))
            .map(|cell| vec![cell.value().to_string()])
            .unwrap_or_default();
        correct_exclusive_column(&mut matrix, &released);
        correct_first_cell_of_first_row_editable_only_columns(&mut matrix);
        debug!(item = %self.name, index, "Removed matrix row");
        self.set_matrix(matrix);
        true
    }

    /// Fresh cells with row 0's formats.
    ///
    /// First-row-editable-only cells are not editable outside row 0.
    pub fn default_matrix_element_row(&self) -> Option<Vec<MatrixElement>> {
        let first_row = self.matrix.as_ref()?.row(0)?;
        let row = first_row
            .iter()
            .map(|cell| {
                let mut type_format = cell.type_format().clone();
                if type_format.is_first_row_editable_only() {
                    type_format.set_editable(false);
                }
                MatrixElement::new(type_format)
            })
            .collect();
        Some(row)
    }

    // =========================================================================
    // PROTEIN DATA ROWS
    // =========================================================================

    pub fn is_protein_data_in_matrix_row(&self, row: usize) -> bool {
        self.matrix
            .as_ref()
            .and_then(|matrix| matrix.row(row))
            .is_some_and(|cells| cells.iter().any(MatrixElement::has_protein_data))
    }

    pub fn has_protein_data_in_matrix(&self) -> bool {
        (0..self.matrix_row_count()).any(|row| self.is_protein_data_in_matrix_row(row))
    }

    /// Moves rows with protein data to the top.
    ///
    /// Protein rows come first in reverse order, followed by the other rows
    /// in their original order: rows `[a, P1, P2, b]` become `[P2, P1, a, b]`.
    /// The original order is kept for
    /// [`restore_original_matrix_rows_after_sorting`](Self::restore_original_matrix_rows_after_sorting).
    pub fn sort_matrix_rows_with_protein_data_rows_first(&mut self) {
        if !self.has_protein_data_in_matrix() {
            return;
        }
        let mut order = VecDeque::with_capacity(self.matrix_row_count());
        for row in 0..self.matrix_row_count() {
            if self.is_protein_data_in_matrix_row(row) {
                order.push_front(row);
            } else {
                order.push_back(row);
            }
        }
        let order: Vec<usize> = order.into();
        if let Some(matrix) = self.matrix.as_mut()
            && matrix.permute_rows(&order)
        {
            self.row_restore_order = Some(order);
        }
    }

    /// Undoes the last protein-data sort.
    pub fn restore_original_matrix_rows_after_sorting(&mut self) {
        let Some(order) = self.row_restore_order.as_ref() else {
            return;
        };
        if order.len() != self.matrix_row_count() {
            return;
        }
        let mut inverse = vec![0; order.len()];
        for (position, &row) in order.iter().enumerate() {
            inverse[row] = position;
        }
        if let Some(matrix) = self.matrix.as_mut() {
            matrix.permute_rows(&inverse);
        }
        self.row_restore_order = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_format::TypeFormat;

    fn colors() -> TypeFormat {
        let texts = ["Red", "Green", "Blue"].map(String::from).to_vec();
        TypeFormat::selection(texts, Some("Red"), true, false).unwrap()
    }

    fn flexible(rows: Vec<Vec<MatrixElement>>) -> ValueItem {
        let mut item = ValueItem::named("Table", BasicType::FlexibleMatrix);
        item.set_matrix(Matrix::new(rows).unwrap());
        item
    }

    #[test]
    fn only_flexible_matrices_grow() {
        let mut item = flexible(vec![vec![MatrixElement::new(TypeFormat::numeric(1))]]);
        item.set_basic_type(BasicType::Matrix);
        assert!(!item.insert_matrix_row(0));
        item.set_basic_type(BasicType::FlexibleMatrix);
        item.set_matrix_maximum_number_of_rows(2);
        assert!(item.insert_matrix_row(0));
        assert!(!item.can_insert_matrix_row());
        assert_eq!(item.matrix_row_count(), 2);
    }

    #[test]
    fn exclusive_column_stops_growing_when_texts_run_out() {
        let mut item = flexible(vec![vec![MatrixElement::new(colors())]]);
        assert!(item.insert_matrix_row(1));
        assert!(item.insert_matrix_row(2));
        assert!(!item.can_insert_matrix_row());
        let mut values = item.matrix().unwrap().column_values(0);
        values.sort();
        assert_eq!(values, ["Blue", "Green", "Red"]);
    }

    #[test]
    fn unique_default_column_gets_fresh_values() {
        let format = TypeFormat::text_with_patterns("Job", "", "", true).unwrap();
        let mut item = flexible(vec![vec![MatrixElement::new(format)]]);
        assert!(item.insert_matrix_row(5));
        assert!(item.copy_matrix_row(0));
        assert_eq!(item.matrix().unwrap().column_values(0), ["Job", "Job1", "Job2"]);
    }

    #[test]
    fn copy_appends_clone_of_source() {
        let rows = vec![
            vec![MatrixElement::with_value("1.5", TypeFormat::numeric(1)).unwrap()],
            vec![MatrixElement::with_value("2.5", TypeFormat::numeric(1)).unwrap()],
        ];
        let mut item = flexible(rows);
        assert!(item.copy_matrix_row(0));
        assert_eq!(item.matrix().unwrap().column_values(0), ["1.5", "2.5", "1.5"]);
        assert!(item.copy_matrix_row(99));
        assert_eq!(item.matrix().unwrap().column_values(0).last().map(String::as_str), Some("1.5"));
    }

    #[test]
    fn removing_releases_exclusive_text() {
        let mut item = flexible(vec![vec![MatrixElement::new(colors())]]);
        item.insert_matrix_row(1);
        let removed = item.value_at(1, 0).unwrap().to_string();
        assert!(item.remove_matrix_row(7));
        let cell = item.matrix_element_at(0, 0).unwrap();
        assert!(cell.type_format().has_selection_text(&removed));
        assert!(!item.remove_matrix_row(0));
    }

    #[test]
    fn default_row_locks_first_row_only_cells() {
        let first_only = TypeFormat::selection(vec!["A".into(), "B".into()], None, false, true).unwrap();
        let item = flexible(vec![vec![MatrixElement::new(first_only), MatrixElement::new(TypeFormat::numeric(0))]]);
        let row = item.default_matrix_element_row().unwrap();
        assert!(!row[0].type_format().is_editable());
        assert!(row[1].type_format().is_editable());
    }

    #[test]
    fn protein_rows_move_to_the_top_and_back() {
        let rows: Vec<Vec<MatrixElement>> = ["a", "p1", "p2", "b"]
            .iter()
            .map(|value| {
                let mut cell = MatrixElement::with_value(value, TypeFormat::text("x")).unwrap();
                if value.starts_with('p') {
                    cell.set_protein_data(Some("PDB"));
                }
                vec![cell]
            })
            .collect();
        let mut item = flexible(rows);
        item.sort_matrix_rows_with_protein_data_rows_first();
        assert_eq!(item.matrix().unwrap().column_values(0), ["p2", "p1", "a", "b"]);
        item.restore_original_matrix_rows_after_sorting();
        assert_eq!(item.matrix().unwrap().column_values(0), ["a", "p1", "p2", "b"]);
    }
}
