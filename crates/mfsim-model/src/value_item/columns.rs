//! Column queries, diagram export and combined column formats.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::warn;

use super::ValueItem;
use crate::corrections::correct_exclusive_selection_texts;
use crate::definitions::DIAGRAM_COLUMN_SEPARATOR;
use crate::enums::{BasicType, DataType};
use crate::matrix::Matrix;
use crate::numeric::{parse_double, sort_texts};
use crate::type_format::TypeFormat;

/// X and Y value columns of a matrix diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramColumns {
    pub x: usize,
    pub y: usize,
}

/// First column whose cells all carry exclusive selection texts.
pub(crate) fn exclusive_column(matrix: &Matrix) -> Option<usize> {
    (0..matrix.column_count()).find(|&column| is_exclusive_column(matrix, column))
}

pub(crate) fn is_exclusive_column(matrix: &Matrix, column: usize) -> bool {
    column < matrix.column_count()
        && matrix
            .column(column)
            .iter()
            .all(|cell| cell.type_format().has_exclusive_selection_texts())
}

/// Rebinds the exclusive column of `matrix`, if there is one.
pub(crate) fn correct_exclusive_column(matrix: &mut Matrix, additional: &[String]) {
    if let Some(column) = exclusive_column(matrix) {
        let mut cells = matrix.column_mut(column);
        correct_exclusive_selection_texts(&mut cells, additional);
    }
}

fn is_table(basic_type: BasicType) -> bool {
    matches!(basic_type, BasicType::Matrix | BasicType::FlexibleMatrix)
}

impl ValueItem {
    pub fn exclusive_selection_text_column(&self) -> Option<usize> {
        self.matrix.as_ref().and_then(exclusive_column)
    }

    pub fn has_exclusive_selection_text_column(&self) -> bool {
        self.exclusive_selection_text_column().is_some()
    }

    pub fn is_exclusive_selection_text_column(&self, column: usize) -> bool {
        self.matrix
            .as_ref()
            .is_some_and(|matrix| is_exclusive_column(matrix, column))
    }

    /// First column that is editable in every row.
    pub fn first_editable_column(&self) -> Option<usize> {
        let matrix = self.matrix.as_ref()?;
        (0..matrix.column_count()).find(|&column| {
            matrix
                .column(column)
                .iter()
                .all(|cell| cell.type_format().is_editable())
        })
    }

    pub fn has_editable_column(&self) -> bool {
        self.first_editable_column().is_some()
    }

    /// True if every cell of the column is `NUMERIC`.
    pub fn is_numeric_column(&self, column: usize) -> bool {
        let Some(matrix) = self.matrix.as_ref() else {
            return false;
        };
        column < matrix.column_count()
            && matrix
                .column(column)
                .iter()
                .all(|cell| cell.type_format().data_type() == DataType::Numeric)
    }

    /// True if the constant sum column exists and is numeric.
    pub fn check_constant_sum_column(&self) -> bool {
        self.constant_sum_column
            .is_some_and(|column| self.is_numeric_column(column))
    }

    // =========================================================================
    // DIAGRAM
    // =========================================================================

    pub fn matrix_diagram_columns(&self) -> Option<DiagramColumns> {
        Some(DiagramColumns {
            x: self.matrix_diagram_x_value_column?,
            y: self.matrix_diagram_y_value_column?,
        })
    }

    pub fn matrix_diagram_x_value_column(&self) -> Option<usize> {
        self.matrix_diagram_x_value_column
    }

    pub fn matrix_diagram_y_value_column(&self) -> Option<usize> {
        self.matrix_diagram_y_value_column
    }

    pub fn set_matrix_diagram_columns(&mut self, x: Option<usize>, y: Option<usize>) {
        self.matrix_diagram_x_value_column = x;
        self.matrix_diagram_y_value_column = y;
    }

    /// True if the matrix can be plotted.
    ///
    /// Every X cell must be `TEXT` or `NUMERIC` and every Y cell `NUMERIC`.
    /// The matrix needs two numeric columns or one numeric and one text
    /// column.
    pub fn has_matrix_diagram(&self) -> bool {
        let (Some(columns), Some(matrix)) = (self.matrix_diagram_columns(), self.matrix.as_ref()) else {
            return false;
        };
        if columns.x >= matrix.column_count() || columns.y >= matrix.column_count() {
            return false;
        }
        let rows_plottable = matrix.rows().all(|row| {
            matches!(row[columns.x].type_format().data_type(), DataType::Text | DataType::Numeric)
                && row[columns.y].type_format().data_type() == DataType::Numeric
        });
        if !rows_plottable {
            return false;
        }
        let Some(first_row) = matrix.row(0) else {
            return false;
        };
        let count = |data_type: DataType| {
            first_row
                .iter()
                .filter(|cell| cell.type_format().data_type() == data_type)
                .count()
        };
        let numeric = count(DataType::Numeric);
        numeric >= 2 || (numeric == 1 && count(DataType::Text) >= 1)
    }

    /// Diagram data as tab separated text with a header line.
    pub fn tab_separated_diagram_data(&self) -> Option<String> {
        if !self.has_matrix_diagram() {
            return None;
        }
        let columns = self.matrix_diagram_columns()?;
        let matrix = self.matrix.as_ref()?;
        let x_type = matrix.get(0, columns.x)?.type_format().data_type();

        let mut lines = vec![format!(
            "{}{DIAGRAM_COLUMN_SEPARATOR}{}",
            self.matrix_column_name(columns.x).unwrap_or_default(),
            self.matrix_column_name(columns.y).unwrap_or_default()
        )];
        for row in 0..matrix.row_count() {
            let y = self.value_as_f64_at(row, columns.y)?;
            let x = match x_type {
                DataType::Numeric => self.value_as_f64_at(row, columns.x)?.to_string(),
                _ => self.value_at(row, columns.x)?.to_string(),
            };
            lines.push(format!("{x}{DIAGRAM_COLUMN_SEPARATOR}{y}"));
        }
        let mut data = lines.join("\n");
        data.push('\n');
        Some(data)
    }

    // =========================================================================
    // COLUMN VALUE SETTING
    // =========================================================================

    /// True if a single value may be written to the whole column.
    ///
    /// Every editable cell must be numeric, text or selection text, and at
    /// least one cell must be editable.
    pub fn is_column_value_set(&self, column: usize) -> bool {
        if !is_table(self.basic_type) {
            return false;
        }
        let Some(matrix) = self.matrix.as_ref() else {
            return false;
        };
        if column >= matrix.column_count() {
            return false;
        }
        let mut has_editable = false;
        for cell in matrix.column(column) {
            let type_format = cell.type_format();
            if !type_format.is_editable() {
                continue;
            }
            match type_format.data_type() {
                DataType::Numeric
                | DataType::NumericNull
                | DataType::Text
                | DataType::TextEmpty
                | DataType::SelectionText => has_editable = true,
                _ => return false,
            }
        }
        has_editable
    }

    pub fn is_any_column_value_set(&self) -> bool {
        (0..self.matrix_column_count()).any(|column| self.is_column_value_set(column))
    }

    /// Selection format offering every selection text used in the column.
    pub fn combined_selection_text_column_format(&self, column: usize) -> Option<TypeFormat> {
        if !is_table(self.basic_type) {
            return None;
        }
        let matrix = self.matrix.as_ref()?;
        if column >= matrix.column_count() {
            return None;
        }
        let combined: BTreeSet<String> = matrix
            .column(column)
            .iter()
            .filter(|cell| cell.type_format().data_type() == DataType::SelectionText)
            .flat_map(|cell| cell.type_format().selection_texts().iter().cloned())
            .collect();
        let mut texts: Vec<String> = combined.into_iter().collect();
        sort_texts(&mut texts);
        selection_format(texts)
    }

    /// Selection format offering every value of the column.
    ///
    /// Only numeric, text and selection columns qualify. Values are sorted
    /// numerically when every cell is `NUMERIC`.
    pub fn combined_text_column_format(&self, column: usize) -> Option<TypeFormat> {
        if !is_table(self.basic_type) {
            return None;
        }
        let matrix = self.matrix.as_ref()?;
        if column >= matrix.column_count() {
            return None;
        }
        let mut is_numeric = true;
        let mut combined = BTreeSet::new();
        for cell in matrix.column(column) {
            match cell.type_format().data_type() {
                DataType::Numeric => {}
                DataType::NumericNull | DataType::Text | DataType::TextEmpty | DataType::SelectionText => {
                    is_numeric = false;
                }
                _ => return None,
            }
            combined.insert(cell.value().to_string());
        }
        let mut texts: Vec<String> = combined.into_iter().collect();
        if is_numeric {
            texts.sort_by(|left, right| {
                match (parse_double(left), parse_double(right)) {
                    (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    _ => left.cmp(right),
                }
            });
        }
        selection_format(texts)
    }

    /// Values and selection texts of the exclusive column in first-seen order.
    pub fn combined_exclusive_selection_texts(&self) -> Option<Vec<String>> {
        let column = self.exclusive_selection_text_column()?;
        let matrix = self.matrix.as_ref()?;
        let mut combined: Vec<String> = Vec::new();
        for cell in matrix.column(column) {
            let candidates = std::iter::once(cell.value()).chain(
                cell.type_format().selection_texts().iter().map(String::as_str),
            );
            for text in candidates {
                if !combined.iter().any(|existing| existing == text) {
                    combined.push(text.to_string());
                }
            }
        }
        (!combined.is_empty()).then_some(combined)
    }

    pub fn sorted_combined_exclusive_selection_texts(&self) -> Option<Vec<String>> {
        let mut texts = self.combined_exclusive_selection_texts()?;
        texts.sort();
        Some(texts)
    }
}

fn selection_format(texts: Vec<String>) -> Option<TypeFormat> {
    if texts.is_empty() {
        return None;
    }
    match TypeFormat::selection(texts, None, false, false) {
        Ok(format) => Some(format),
        Err(error) => {
            warn!(%error, "Cannot combine column texts");
            None
        }
    }
}
