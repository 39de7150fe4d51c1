//! `ValueItem` document codec (format version 1.0.0).

use super::ValueItem;
use crate::enums::BasicType;
use crate::error::{ModelError, Result};
use crate::matrix::Matrix;
use crate::matrix_element::{MATRIX_ELEMENT, MatrixElement};
use crate::options::ModelOptions;
use crate::payload::{COMPARTMENT_CONTAINER, CompartmentPayload, Payload};
use crate::xml::{XmlElement, parse_xml};

pub(crate) const VALUE_ITEM: &str = "ValueItem";

const NAME: &str = "Name";
const DISPLAY_NAME: &str = "DisplayName";
const NAME_OF_DATA_VALUE_ITEM: &str = "NameOfDataValueItem";
const NAME_OF_DISPLAY_VALUE_ITEM: &str = "NameOfDisplayValueItem";
const NODE_NAMES: &str = "NodeNames";
const NODE_SINGLE_NAME: &str = "NodeSingleName";
const MATRIX_OUTPUT_OMIT_COLUMNS: &str = "MatrixOutputOmitColumns";
const MATRIX_OUTPUT_OMIT_SINGLE_COLUMN: &str = "MatrixOutputOmitSingleColumn";
const MATRIX: &str = "Matrix";
const MATRIX_ROW: &str = "MatrixRow";
const MATRIX_COLUMN_NAMES: &str = "MatrixColumnNames";
const MATRIX_SINGLE_COLUMN_NAME: &str = "MatrixSingleColumnName";
const MATRIX_COLUMN_WIDTHS: &str = "MatrixColumnWidths";
const MATRIX_SINGLE_COLUMN_WIDTH: &str = "MatrixSingleColumnWidth";
const SUPPLEMENTARY_DATA: &str = "SupplementaryData";
const SUPPLEMENTARY_DATA_ITEM: &str = "SupplementaryDataItem";
const MATRIX_DIAGRAM_X_VALUE_COLUMN: &str = "MatrixDiagramXValueColumn";
const MATRIX_DIAGRAM_Y_VALUE_COLUMN: &str = "MatrixDiagramYValueColumn";
const MATRIX_MAXIMUM_NUMBER_OF_ROWS: &str = "MatrixMaximumNumberOfRows";
const IS_ACTIVE: &str = "IsActive";
const IS_DISPLAYED: &str = "IsDisplayed";
const BASIC_TYPE: &str = "ValueItemEnumBasicType";
const BLOCK_NAME: &str = "BlockName";
const DESCRIPTION: &str = "Description";
const ERROR: &str = "Error";
const HINT: &str = "Hint";
const VERTICAL_POSITION: &str = "VerticalPosition";
const IS_ESSENTIAL: &str = "IsEssential";
const IS_LOCKED: &str = "IsLocked";
const IS_JDPD_INPUT: &str = "IsJdpdInput";
const IS_MATRIX_CLONED_BEFORE_CHANGE: &str = "IsMatrixClonedBeforeChange";
const IS_UPDATE_NOTIFIER: &str = "IsUpdateNotifier";
const CONSTANT_SUM_COLUMN: &str = "ConstantSumColumn";

fn index_text(index: Option<usize>) -> String {
    index.map_or_else(|| "-1".to_string(), |index| index.to_string())
}

impl ValueItem {
    pub fn to_xml_element(&self) -> XmlElement {
        let mut root = XmlElement::versioned(VALUE_ITEM);
        root.push_text(NAME, self.name.as_str());
        root.push_text(DISPLAY_NAME, self.display_name.as_str());
        root.push_text(NAME_OF_DATA_VALUE_ITEM, self.name_of_data_value_item.as_str());
        root.push_text(NAME_OF_DISPLAY_VALUE_ITEM, self.name_of_display_value_item.as_str());
        if !self.node_names.is_empty() {
            root.push_text_list(NODE_NAMES, NODE_SINGLE_NAME, &self.node_names);
        }
        if !self.matrix_output_omit_columns.is_empty() {
            let flags: Vec<String> = self.matrix_output_omit_columns.iter().map(bool::to_string).collect();
            root.push_text_list(MATRIX_OUTPUT_OMIT_COLUMNS, MATRIX_OUTPUT_OMIT_SINGLE_COLUMN, &flags);
        }
        if let Some(matrix) = &self.matrix {
            let mut matrix_element = XmlElement::new(MATRIX);
            for cells in matrix.rows() {
                let mut row = XmlElement::new(MATRIX_ROW);
                for cell in cells {
                    row.push(cell.to_xml_element());
                }
                matrix_element.push(row);
            }
            root.push(matrix_element);
        }
        if !self.matrix_column_names.is_empty() {
            root.push_text_list(MATRIX_COLUMN_NAMES, MATRIX_SINGLE_COLUMN_NAME, &self.matrix_column_names);
        }
        if !self.matrix_column_widths.is_empty() {
            root.push_text_list(MATRIX_COLUMN_WIDTHS, MATRIX_SINGLE_COLUMN_WIDTH, &self.matrix_column_widths);
        }
        if !self.supplementary_data.is_empty() {
            root.push_text_list(SUPPLEMENTARY_DATA, SUPPLEMENTARY_DATA_ITEM, &self.supplementary_data);
        }
        root.push_text(MATRIX_DIAGRAM_X_VALUE_COLUMN, index_text(self.matrix_diagram_x_value_column));
        root.push_text(MATRIX_DIAGRAM_Y_VALUE_COLUMN, index_text(self.matrix_diagram_y_value_column));
        root.push_text(MATRIX_MAXIMUM_NUMBER_OF_ROWS, self.matrix_maximum_number_of_rows.to_string());
        root.push_text(IS_ACTIVE, self.is_active.to_string());
        root.push_text(IS_DISPLAYED, self.is_displayed.to_string());
        root.push_text(BASIC_TYPE, self.basic_type.as_str());
        root.push_text(BLOCK_NAME, self.block_name.as_str());
        root.push_text(DESCRIPTION, self.description.as_str());
        root.push_text(ERROR, self.error.as_str());
        root.push_text(HINT, self.hint.as_str());
        root.push_text(VERTICAL_POSITION, self.vertical_position.to_string());
        root.push_text(IS_ESSENTIAL, self.is_essential.to_string());
        root.push_text(IS_LOCKED, self.is_locked.to_string());
        root.push_text(IS_JDPD_INPUT, self.is_jdpd_input.to_string());
        root.push_text(IS_MATRIX_CLONED_BEFORE_CHANGE, self.is_matrix_cloned_before_change.to_string());
        root.push_text(IS_UPDATE_NOTIFIER, self.is_update_notifier.to_string());
        root.push_text(CONSTANT_SUM_COLUMN, index_text(self.constant_sum_column));
        if let Some(compartments) = self.compartments() {
            root.push(compartments.element().clone());
        }
        root
    }

    /// Serializes the item as a standalone document.
    pub fn to_xml_string(&self) -> Result<String> {
        self.to_xml_element().to_xml_string()
    }

    pub fn from_xml_element(element: &XmlElement) -> Result<Self> {
        Self::from_xml_element_with_options(element, ModelOptions::default())
    }

    /// Reads an item element into a fresh item without receivers.
    ///
    /// The matrix passes through the regular correction passes. Column names
    /// are taken exactly as written. A compartment payload is marked
    /// erroneous when the item carries an error.
    pub fn from_xml_element_with_options(element: &XmlElement, options: ModelOptions) -> Result<Self> {
        element.expect_name(VALUE_ITEM)?;
        element.check_version()?;

        let mut item = ValueItem::with_options(options);
        item.set_name(element.child_text(NAME)?);
        item.set_display_name(element.child_text(DISPLAY_NAME)?);
        item.set_name_of_data_value_item(element.child_text(NAME_OF_DATA_VALUE_ITEM)?);
        item.set_name_of_display_value_item(element.child_text(NAME_OF_DISPLAY_VALUE_ITEM)?);
        item.set_node_names(element.text_list(NODE_NAMES));
        item.set_matrix_output_omit_columns(read_omit_columns(element)?);
        if let Some(matrix) = read_matrix(element)? {
            item.set_matrix(matrix);
        }
        item.set_matrix_column_names(element.text_list(MATRIX_COLUMN_NAMES));
        item.set_matrix_column_widths(element.text_list(MATRIX_COLUMN_WIDTHS));
        item.set_supplementary_data(element.text_list(SUPPLEMENTARY_DATA));
        item.set_matrix_diagram_columns(
            element.optional_index_child(MATRIX_DIAGRAM_X_VALUE_COLUMN)?,
            element.optional_index_child(MATRIX_DIAGRAM_Y_VALUE_COLUMN)?,
        );
        item.set_matrix_maximum_number_of_rows(element.parse_child(MATRIX_MAXIMUM_NUMBER_OF_ROWS)?);
        // Locking deactivates, so the stored activity is applied after it.
        item.set_locked(element.bool_child(IS_LOCKED)?);
        item.set_activity(element.bool_child(IS_ACTIVE)?);
        item.set_display(element.bool_child(IS_DISPLAYED)?);
        item.set_basic_type(element.parse_child::<BasicType>(BASIC_TYPE)?);
        item.set_block_name(element.child_text(BLOCK_NAME)?);
        item.set_description(element.child_text(DESCRIPTION)?);
        item.set_error(element.child_text(ERROR)?);
        item.set_hint(element.child_text(HINT)?);
        item.set_vertical_position(element.parse_child(VERTICAL_POSITION)?);
        item.set_essential(element.bool_child(IS_ESSENTIAL)?);
        item.set_jdpd_input(element.bool_child(IS_JDPD_INPUT)?);
        item.set_matrix_cloned_before_change(element.bool_child(IS_MATRIX_CLONED_BEFORE_CHANGE)?);
        item.set_update_notifier(element.bool_child(IS_UPDATE_NOTIFIER)?);
        item.set_constant_sum_column(element.optional_index_child(CONSTANT_SUM_COLUMN)?);
        if let Some(compartments) = element.child(COMPARTMENT_CONTAINER) {
            let payload = CompartmentPayload::new(compartments.clone()).with_error(item.has_error());
            item.payload = Some(Payload::Compartments(payload));
        }
        item.has_change_detected = false;
        Ok(item)
    }

    /// Parses a standalone `ValueItem` document.
    pub fn from_xml_str(input: &str) -> Result<Self> {
        Self::from_xml_element(&parse_xml(input)?)
    }
}

fn read_omit_columns(element: &XmlElement) -> Result<Vec<bool>> {
    element
        .text_list(MATRIX_OUTPUT_OMIT_COLUMNS)
        .iter()
        .map(|flag| match flag.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ModelError::invalid_value(MATRIX_OUTPUT_OMIT_SINGLE_COLUMN, flag.as_str())),
        })
        .collect()
}

fn read_matrix(element: &XmlElement) -> Result<Option<Matrix>> {
    let Some(matrix) = element.child(MATRIX) else {
        return Ok(None);
    };
    let rows = matrix
        .children_named(MATRIX_ROW)
        .map(|row| {
            row.children_named(MATRIX_ELEMENT)
                .map(MatrixElement::from_xml_element)
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Matrix::new(rows).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_format::TypeFormat;

    fn sample() -> ValueItem {
        let row = vec![
            MatrixElement::with_value("Water", TypeFormat::text("Molecule")).unwrap(),
            MatrixElement::with_value("0.25", TypeFormat::numeric(2)).unwrap(),
        ];
        let mut item = ValueItem::named("Composition", BasicType::FlexibleMatrix);
        item.set_display_name("Composition of the system");
        item.set_block_name("Molecules");
        item.set_vertical_position(3);
        item.set_node_names(vec!["Job".into(), "Molecules".into()]);
        item.set_matrix_column_names(vec!["Name".into(), "Fraction".into()]);
        item.set_matrix_output_omit_columns(vec![false, true]);
        item.set_matrix(Matrix::from_row(row).unwrap());
        item.set_matrix_diagram_columns(Some(0), Some(1));
        item.set_hint("Fractions are normalized");
        item
    }

    #[test]
    fn document_round_trips() {
        let item = sample();
        let xml = item.to_xml_string().unwrap();
        let parsed = ValueItem::from_xml_str(&xml).unwrap();
        assert_eq!(parsed.to_xml_string().unwrap(), xml);
        assert_eq!(parsed.value_at(0, 1), Some("0.25"));
        assert_eq!(parsed.matrix_diagram_columns().map(|columns| columns.y), Some(1));
        assert_eq!(parsed.hint(), "Fractions are normalized");
        assert!(!parsed.has_change_detected());
    }

    #[test]
    fn element_order_and_absent_indices() {
        let mut item = ValueItem::named("Seed", BasicType::Scalar);
        item.set_default_type_format(TypeFormat::numeric(0));
        let element = item.to_xml_element();
        let names: Vec<&str> = element.children().iter().map(XmlElement::name).collect();
        assert_eq!(&names[..6], ["Version", "Name", "DisplayName", "NameOfDataValueItem", "NameOfDisplayValueItem", "Matrix"]);
        assert_eq!(element.child_text(MATRIX_DIAGRAM_X_VALUE_COLUMN).unwrap(), "-1");
        assert_eq!(element.child_text(CONSTANT_SUM_COLUMN).unwrap(), "-1");
        assert!(element.child(NODE_NAMES).is_none());
        assert_eq!(names.last(), Some(&CONSTANT_SUM_COLUMN));
    }

    #[test]
    fn compartments_survive_round_trip() {
        let mut item = ValueItem::named("Box", BasicType::Scalar);
        let mut subtree = XmlElement::new(COMPARTMENT_CONTAINER);
        subtree.push_text("Sphere", "radius=2");
        item.set_compartments(CompartmentPayload::new(subtree));
        let parsed = ValueItem::from_xml_element(&item.to_xml_element()).unwrap();
        assert_eq!(parsed.basic_type(), BasicType::CompartmentContainer);
        assert_eq!(parsed.compartments(), item.compartments());
    }

    #[test]
    fn rejects_foreign_versions() {
        let mut element = sample().to_xml_element();
        element = parse_xml(&element.to_xml_string().unwrap().replace("Version 1.0.0", "Version 0.9")).unwrap();
        assert!(matches!(
            ValueItem::from_xml_element(&element),
            Err(ModelError::UnsupportedVersion { .. })
        ));
    }
}
