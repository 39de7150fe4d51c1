//! Immutable matrix checkpoints for undo.

use std::rc::Rc;

use crate::matrix::Matrix;

/// State of a value item's matrix at a checkpoint.
///
/// Snapshots share their matrix, so cloning one is cheap. An item without a
/// matrix yields an empty snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatrixSnapshot {
    matrix: Option<Rc<Matrix>>,
}

impl MatrixSnapshot {
    pub(crate) fn capture(matrix: Option<&Matrix>) -> Self {
        Self {
            matrix: matrix.map(|matrix| Rc::new(matrix.clone())),
        }
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        self.matrix.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_none()
    }

    pub fn row_count(&self) -> usize {
        self.matrix.as_ref().map_or(0, |matrix| matrix.row_count())
    }

    pub(crate) fn to_matrix(&self) -> Option<Matrix> {
        self.matrix.as_deref().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_element::MatrixElement;
    use crate::type_format::TypeFormat;

    #[test]
    fn capture_copies_matrix() {
        let mut matrix = Matrix::single(MatrixElement::new(TypeFormat::text("A")));
        let snapshot = MatrixSnapshot::capture(Some(&matrix));
        matrix.cell_mut(0, 0).unwrap().set_value("B").unwrap();
        assert_eq!(snapshot.matrix().unwrap().cell(0, 0).unwrap().value(), "A");
        assert_eq!(snapshot.row_count(), 1);
        assert!(MatrixSnapshot::capture(None).is_empty());
    }
}
