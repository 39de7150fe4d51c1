//! Rectangular grid of matrix cells.

use crate::error::{ModelError, Result};
use crate::matrix_element::MatrixElement;

/// Rows of cells with a fixed column count.
///
/// A matrix always has at least one row and one column, and every row has
/// the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vec<MatrixElement>>,
    column_count: usize,
}

impl Matrix {
    /// Builds a matrix, rejecting empty input and ragged rows.
    pub fn new(rows: Vec<Vec<MatrixElement>>) -> Result<Self> {
        let column_count = rows.first().map(Vec::len).unwrap_or_default();
        if column_count == 0 {
            return Err(ModelError::EmptyMatrix);
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != column_count)
        {
            return Err(ModelError::RowLengthMismatch {
                row,
                expected: column_count,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, column_count })
    }

    /// 1x1 matrix.
    pub fn single(cell: MatrixElement) -> Self {
        Self {
            rows: vec![vec![cell]],
            column_count: 1,
        }
    }

    /// Single-row matrix; fails on an empty row.
    pub fn from_row(row: Vec<MatrixElement>) -> Result<Self> {
        Self::new(vec![row])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&MatrixElement> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut MatrixElement> {
        self.rows.get_mut(row).and_then(|cells| cells.get_mut(column))
    }

    /// Cell at `(row, column)` or an index error.
    pub fn cell(&self, row: usize, column: usize) -> Result<&MatrixElement> {
        self.get(row, column)
            .ok_or(ModelError::IndexOutOfRange { row, column })
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Result<&mut MatrixElement> {
        self.get_mut(row, column)
            .ok_or(ModelError::IndexOutOfRange { row, column })
    }

    pub fn row(&self, row: usize) -> Option<&[MatrixElement]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[MatrixElement]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Vec<MatrixElement>> {
        self.rows.iter_mut()
    }

    /// Cells of one column, top to bottom; empty if out of range.
    pub fn column(&self, column: usize) -> Vec<&MatrixElement> {
        self.rows.iter().filter_map(|cells| cells.get(column)).collect()
    }

    /// Mutable cells of one column, top to bottom.
    pub fn column_mut(&mut self, column: usize) -> Vec<&mut MatrixElement> {
        self.rows
            .iter_mut()
            .filter_map(|cells| cells.get_mut(column))
            .collect()
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, column: usize) -> Vec<String> {
        self.column(column)
            .into_iter()
            .map(|cell| cell.value().to_string())
            .collect()
    }

    /// Inserts a row; `index` is clamped to the row count.
    pub fn insert_row(&mut self, index: usize, row: Vec<MatrixElement>) -> Result<()> {
        self.check_row_length(index, &row)?;
        let index = index.min(self.rows.len());
        self.rows.insert(index, row);
        Ok(())
    }

    pub fn push_row(&mut self, row: Vec<MatrixElement>) -> Result<()> {
        self.check_row_length(self.rows.len(), &row)?;
        self.rows.push(row);
        Ok(())
    }

    /// Removes a row, keeping at least one; returns the removed cells.
    pub fn remove_row(&mut self, index: usize) -> Option<Vec<MatrixElement>> {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return None;
        }
        Some(self.rows.remove(index))
    }

    /// Reorders rows so that new row `i` is old row `order[i]`.
    ///
    /// Returns false and leaves the matrix unchanged unless `order` is a
    /// permutation of the row indices.
    pub fn permute_rows(&mut self, order: &[usize]) -> bool {
        if order.len() != self.rows.len() {
            return false;
        }
        let mut seen = vec![false; order.len()];
        for &index in order {
            match seen.get_mut(index) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
        }
        let mut old: Vec<Option<Vec<MatrixElement>>> = self.rows.drain(..).map(Some).collect();
        self.rows = order
            .iter()
            .filter_map(|&index| old.get_mut(index).and_then(Option::take))
            .collect();
        true
    }

    /// Consumes the matrix into its rows.
    pub fn into_rows(self) -> Vec<Vec<MatrixElement>> {
        self.rows
    }

    fn check_row_length(&self, row: usize, cells: &[MatrixElement]) -> Result<()> {
        if cells.len() == self.column_count {
            Ok(())
        } else {
            Err(ModelError::RowLengthMismatch {
                row,
                expected: self.column_count,
                actual: cells.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_format::TypeFormat;

    fn text_row(values: &[&str]) -> Vec<MatrixElement> {
        values
            .iter()
            .map(|value| MatrixElement::with_value(value, TypeFormat::text("")).unwrap())
            .collect()
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        assert!(matches!(Matrix::new(Vec::new()), Err(ModelError::EmptyMatrix)));
        assert!(matches!(Matrix::new(vec![Vec::new()]), Err(ModelError::EmptyMatrix)));
        let result = Matrix::new(vec![text_row(&["a", "b"]), text_row(&["c"])]);
        assert!(matches!(
            result,
            Err(ModelError::RowLengthMismatch { row: 1, expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn insert_clamps_index_and_checks_length() {
        let mut matrix = Matrix::from_row(text_row(&["a", "b"])).unwrap();
        matrix.insert_row(99, text_row(&["c", "d"])).unwrap();
        assert_eq!(matrix.column_values(0), ["a", "c"]);
        assert!(matrix.insert_row(0, text_row(&["x"])).is_err());
        assert_eq!(matrix.row_count(), 2);
    }

    #[test]
    fn last_row_is_never_removed() {
        let mut matrix = Matrix::from_row(text_row(&["a"])).unwrap();
        assert!(matrix.remove_row(0).is_none());
        matrix.push_row(text_row(&["b"])).unwrap();
        assert_eq!(matrix.remove_row(0).map(|row| row.len()), Some(1));
        assert_eq!(matrix.column_values(0), ["b"]);
    }

    #[test]
    fn permute_rows_requires_permutation() {
        let mut matrix = Matrix::new(vec![text_row(&["a"]), text_row(&["b"]), text_row(&["c"])]).unwrap();
        assert!(!matrix.permute_rows(&[0, 0, 1]));
        assert!(!matrix.permute_rows(&[0, 1]));
        assert!(matrix.permute_rows(&[2, 0, 1]));
        assert_eq!(matrix.column_values(0), ["c", "a", "b"]);
    }

    #[test]
    fn out_of_range_cells() {
        let matrix = Matrix::single(MatrixElement::new(TypeFormat::numeric(0)));
        assert!(matrix.get(0, 1).is_none());
        assert!(matches!(
            matrix.cell(1, 0),
            Err(ModelError::IndexOutOfRange { row: 1, column: 0 })
        ));
    }
}
