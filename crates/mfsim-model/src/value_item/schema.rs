//! Table-data schemas: shape templates of vector and matrix items.

use tracing::debug;

use super::ValueItem;
use crate::definitions::SCHEMA_WILDCARD;
use crate::enums::BasicType;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::matrix_element::MatrixElement;
use crate::timestamp::append_creation_timestamp;
use crate::type_format::TypeFormat;

fn is_schema_type(basic_type: BasicType) -> bool {
    matches!(
        basic_type,
        BasicType::Vector | BasicType::Matrix | BasicType::FlexibleMatrix
    )
}

fn is_compatible_type(own: BasicType, schema: BasicType) -> bool {
    own == schema || (own == BasicType::FlexibleMatrix && schema == BasicType::Matrix)
}

impl ValueItem {
    /// Builds a schema item with the shape and column names of this item.
    ///
    /// Cells with a descriptive data type keep their value, structure cells
    /// become the wildcard `*`. All schema cells are non-editable `TEXT`.
    /// A flexible matrix yields a `MATRIX` schema. Returns `None` for items
    /// without column names or matrix, for scalar-like basic types and for
    /// an empty `schema_name`.
    pub fn schema_value_item(&self, schema_name: &str) -> Option<ValueItem> {
        if schema_name.is_empty() || !is_schema_type(self.basic_type) || self.matrix_column_names.is_empty() {
            return None;
        }
        let matrix = self.matrix.as_ref()?;
        let cell_format = TypeFormat::text("").with_editable(false);
        let rows = matrix
            .rows()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| {
                        let value = if cell.type_format().data_type().is_descriptive() {
                            cell.value()
                        } else {
                            SCHEMA_WILDCARD
                        };
                        MatrixElement::with_value(value, cell_format.clone())
                    })
                    .collect()
            })
            .collect::<Result<Vec<Vec<MatrixElement>>>>()
            .ok()?;
        let schema_matrix = Matrix::new(rows).ok()?;

        let basic_type = match self.basic_type {
            BasicType::FlexibleMatrix => BasicType::Matrix,
            other => other,
        };
        let mut schema = ValueItem::named(&append_creation_timestamp(schema_name), basic_type);
        schema.set_display_name(schema_name);
        schema.set_matrix_column_names(self.matrix_column_names.clone());
        schema.set_matrix_column_widths(self.matrix_column_widths.clone());
        schema.set_matrix(schema_matrix);
        debug!(item = %self.name, schema = %schema.name, "Created schema value item");
        Some(schema)
    }

    /// Structural compatibility: basic type and column names agree.
    ///
    /// Row counts and cell values are not compared.
    pub fn can_apply_schema_value_item(&self, schema: &ValueItem) -> bool {
        is_schema_type(self.basic_type)
            && is_compatible_type(self.basic_type, schema.basic_type)
            && self.matrix_column_names == schema.matrix_column_names
    }

    /// Strict match: like [`can_apply_schema_value_item`](Self::can_apply_schema_value_item)
    /// plus equal dimensions and equal values in every non-wildcard cell.
    pub fn matches_schema_value_item(&self, schema: &ValueItem) -> bool {
        if !self.can_apply_schema_value_item(schema) {
            return false;
        }
        let (Some(own), Some(template)) = (self.matrix.as_ref(), schema.matrix.as_ref()) else {
            return false;
        };
        if own.row_count() != template.row_count() || own.column_count() != template.column_count() {
            return false;
        }
        own.rows().zip(template.rows()).all(|(own_row, template_row)| {
            own_row
                .iter()
                .zip(template_row)
                .all(|(cell, expected)| expected.value() == SCHEMA_WILDCARD || cell.value() == expected.value())
        })
    }
}
