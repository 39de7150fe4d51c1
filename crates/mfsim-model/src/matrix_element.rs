//! A single matrix cell: value, type format and optional protein data.

use crate::definitions::NUMERIC_NULL_VALUE;
use crate::enums::DataType;
use crate::error::{ModelError, Result};
use crate::type_format::TypeFormat;
use crate::xml::XmlElement;

// XML element names
pub(crate) const MATRIX_ELEMENT: &str = "ValueItemMatrixElement";
const VALUE: &str = "Value";
const PROTEIN_DATA: &str = "ProteinData";
const TYPE_FORMAT: &str = "ValueItemDataTypeFormat";

/// Value and format of one cell.
///
/// For a format with exclusive selection texts the value always equals the
/// format's default; setters that would break this are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixElement {
    value: String,
    type_format: TypeFormat,
    protein_data: String,
}

impl MatrixElement {
    /// Cell holding the format's default value.
    pub fn new(type_format: TypeFormat) -> Self {
        let value = type_format.format_value(type_format.default_value());
        Self {
            value,
            type_format,
            protein_data: String::new(),
        }
    }

    /// Cell holding `value` formatted by `type_format`.
    pub fn with_value(value: &str, type_format: TypeFormat) -> Result<Self> {
        check_exclusive(value, &type_format)?;
        Ok(Self {
            value: type_format.format_value(value),
            type_format,
            protein_data: String::new(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn type_format(&self) -> &TypeFormat {
        &self.type_format
    }

    pub fn protein_data(&self) -> &str {
        &self.protein_data
    }

    /// Current value rendered by the cell's format.
    pub fn formatted_value(&self) -> String {
        self.type_format.format_value(&self.value)
    }

    /// Renders any value with the cell's format.
    pub fn format_value(&self, value: &str) -> String {
        self.type_format.format_value(value)
    }

    /// Formats and stores `value`; returns whether the stored value changed.
    pub fn set_value(&mut self, value: &str) -> Result<bool> {
        check_exclusive(value, &self.type_format)?;
        let formatted = self.type_format.format_value(value);
        if formatted == self.value {
            return Ok(false);
        }
        self.value = formatted;
        Ok(true)
    }

    /// Stores `value` verbatim.
    pub fn set_value_without_format(&mut self, value: &str) -> Result<()> {
        check_exclusive(value, &self.type_format)?;
        self.value = value.to_string();
        Ok(())
    }

    /// Replaces the format and reformats the current value under it.
    pub fn set_type_format(&mut self, type_format: TypeFormat) -> Result<()> {
        check_exclusive(&self.value, &type_format)?;
        self.value = type_format.format_value(&self.value);
        self.type_format = type_format;
        Ok(())
    }

    /// Replaces value and format together.
    pub fn set_value_and_type_format(&mut self, value: &str, type_format: TypeFormat) -> Result<()> {
        check_exclusive(value, &type_format)?;
        self.value = type_format.format_value(value);
        self.type_format = type_format;
        Ok(())
    }

    /// Reformats the stored value; returns whether it changed.
    pub fn reformat(&mut self) -> bool {
        let formatted = self.type_format.format_value(&self.value);
        if formatted == self.value {
            false
        } else {
            self.value = formatted;
            true
        }
    }

    /// True for a `NUMERIC_NULL` cell holding the `null` sentinel.
    pub fn has_numeric_null_value(&self) -> bool {
        self.type_format.data_type() == DataType::NumericNull && self.value == NUMERIC_NULL_VALUE
    }

    /// Sets or clears the protein data; returns whether it changed.
    pub fn set_protein_data(&mut self, protein_data: Option<&str>) -> bool {
        let new_value = protein_data.unwrap_or_default();
        if self.protein_data == new_value {
            return false;
        }
        self.protein_data = new_value.to_string();
        true
    }

    pub fn has_protein_data(&self) -> bool {
        !self.protein_data.is_empty()
    }

    pub fn remove_protein_data(&mut self) {
        self.protein_data.clear();
    }

    /// Sets the editable flag of the cell's format.
    pub fn set_editable(&mut self, is_editable: bool) {
        self.type_format.set_editable(is_editable);
    }

    /// Sets the highlight flag of the cell's format.
    pub fn set_highlight(&mut self, is_highlighted: bool) {
        self.type_format.set_highlight(is_highlighted);
    }

    /// Rebinds value, default and selection texts of an exclusive cell at once.
    pub(crate) fn rebind_exclusive_selection(&mut self, value: &str, texts: Vec<String>) -> Result<()> {
        self.type_format.set_default_value_and_selection_texts(value, texts)?;
        self.value = self.type_format.format_value(value);
        Ok(())
    }

    /// Makes `value` the default of an exclusive cell and selects it.
    ///
    /// The value must be one of the cell's selection texts. Returns whether
    /// the stored value changed.
    pub(crate) fn select_exclusive_value(&mut self, value: &str) -> Result<bool> {
        self.type_format.set_default_value(value)?;
        self.set_value(value)
    }

    // =========================================================================
    // XML
    // =========================================================================

    pub fn to_xml_element(&self) -> XmlElement {
        let mut root = XmlElement::versioned(MATRIX_ELEMENT);
        root.push_text(VALUE, self.value.as_str());
        root.push_text(PROTEIN_DATA, self.protein_data.as_str());
        root.push(self.type_format.to_xml_element());
        root
    }

    /// Reads a cell element; the value is taken as written.
    pub fn from_xml_element(element: &XmlElement) -> Result<Self> {
        element.expect_name(MATRIX_ELEMENT)?;
        element.check_version()?;
        let type_format = TypeFormat::from_xml_element(element.required_child(TYPE_FORMAT)?)?;
        Ok(Self {
            value: element.child_text(VALUE)?.to_string(),
            protein_data: element
                .child(PROTEIN_DATA)
                .map(|child| child.text().to_string())
                .unwrap_or_default(),
            type_format,
        })
    }
}

fn check_exclusive(value: &str, type_format: &TypeFormat) -> Result<()> {
    if type_format.has_exclusive_selection_texts() && value != type_format.default_value() {
        return Err(ModelError::ExclusiveSelectionViolation {
            value: value.to_string(),
            default: type_format.default_value().to_string(),
        });
    }
    Ok(())
}
