//! Type-safe enumerations for value item metadata.
//!
//! The string forms are the upper-case tokens written to value item
//! documents (`<Type>NUMERIC</Type>`, `<ValueItemEnumBasicType>MATRIX</...>`).
//! Parsing is case-insensitive and tolerates surrounding whitespace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data type of a cell's [`TypeFormat`](crate::TypeFormat).
///
/// Every variant carries its own admission and formatting rules:
/// - **Numeric**: decimal count and bounds, optionally a `null` sentinel
/// - **Text**: allowed characters and allowed match, optionally forbidden texts
/// - **Selection**: membership in an ordered set of texts
/// - **Timestamp**: standard timestamp, optionally blank
/// - **Filesystem**: existing directory or regular file, or empty
/// - **Structure**: opaque strings, always admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum DataType {
    /// Decimal number with a fixed number of decimals.
    #[default]
    Numeric,
    /// Decimal number or the `null` sentinel.
    NumericNull,
    /// Non-empty text.
    Text,
    /// Text that may be empty.
    TextEmpty,
    /// One of a set of selection texts.
    SelectionText,
    /// Timestamp in standard format.
    Timestamp,
    /// Timestamp in standard format or blank.
    TimestampEmpty,
    /// Path of an existing directory or empty.
    Directory,
    /// Path of an existing regular file or empty.
    File,
    /// Molecular structure string (opaque).
    MolecularStructure,
    /// Monomer structure string (opaque).
    MonomerStructure,
}

impl DataType {
    /// All data types in declaration order.
    pub const ALL: [DataType; 11] = [
        DataType::Numeric,
        DataType::NumericNull,
        DataType::Text,
        DataType::TextEmpty,
        DataType::SelectionText,
        DataType::Timestamp,
        DataType::TimestampEmpty,
        DataType::Directory,
        DataType::File,
        DataType::MolecularStructure,
        DataType::MonomerStructure,
    ];

    /// Returns the serialized token.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Numeric => "NUMERIC",
            DataType::NumericNull => "NUMERIC_NULL",
            DataType::Text => "TEXT",
            DataType::TextEmpty => "TEXT_EMPTY",
            DataType::SelectionText => "SELECTION_TEXT",
            DataType::Timestamp => "TIMESTAMP",
            DataType::TimestampEmpty => "TIMESTAMP_EMPTY",
            DataType::Directory => "DIRECTORY",
            DataType::File => "FILE",
            DataType::MolecularStructure => "MOLECULAR_STRUCTURE",
            DataType::MonomerStructure => "MONOMER_STRUCTURE",
        }
    }

    /// Returns true for `NUMERIC` and `NUMERIC_NULL`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Numeric | DataType::NumericNull)
    }

    /// Returns true for molecular and monomer structures.
    pub fn is_structure(&self) -> bool {
        matches!(self, DataType::MolecularStructure | DataType::MonomerStructure)
    }

    /// Returns true if schema extraction keeps the literal cell value.
    pub fn is_descriptive(&self) -> bool {
        !self.is_structure()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        DataType::ALL
            .into_iter()
            .find(|data_type| data_type.as_str() == normalized)
            .ok_or_else(|| format!("Unknown data type: {s}"))
    }
}

/// Shape of a value item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum BasicType {
    /// Single cell.
    #[default]
    Scalar,
    /// Single row of cells.
    Vector,
    /// Fixed number of rows.
    Matrix,
    /// Rows may be inserted and removed up to a maximum.
    FlexibleMatrix,
    /// Carries an opaque compartment payload instead of cells.
    CompartmentContainer,
    /// Carries an opaque object handle instead of cells.
    Object,
}

impl BasicType {
    /// Returns the serialized token.
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicType::Scalar => "SCALAR",
            BasicType::Vector => "VECTOR",
            BasicType::Matrix => "MATRIX",
            BasicType::FlexibleMatrix => "FLEXIBLE_MATRIX",
            BasicType::CompartmentContainer => "COMPARTMENT_CONTAINER",
            BasicType::Object => "OBJECT",
        }
    }

    /// Returns true if schema extraction applies to this shape.
    pub fn supports_schema(&self) -> bool {
        matches!(
            self,
            BasicType::Vector | BasicType::Matrix | BasicType::FlexibleMatrix
        )
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BasicType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SCALAR" => Ok(BasicType::Scalar),
            "VECTOR" => Ok(BasicType::Vector),
            "MATRIX" => Ok(BasicType::Matrix),
            "FLEXIBLE_MATRIX" => Ok(BasicType::FlexibleMatrix),
            "COMPARTMENT_CONTAINER" => Ok(BasicType::CompartmentContainer),
            "OBJECT" => Ok(BasicType::Object),
            _ => Err(format!("Unknown basic type: {s}")),
        }
    }
}

/// Status filter used by value item and container queries.
///
/// `All` and `Undefined` match every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ValueItemStatus {
    /// Every item.
    #[default]
    All,
    /// Active items.
    Active,
    /// Inactive items.
    Inactive,
    /// Locked items.
    Locked,
    /// Items marked as Jdpd input.
    JdpdInput,
    /// Unlocked items.
    Unlocked,
    /// Items with an error message.
    HasError,
    /// Items without an error message.
    HasNoError,
    /// Items with a hint message.
    HasHint,
    /// Items without a hint message.
    HasNoHint,
    /// Selected items.
    Selected,
    /// Deselected items.
    Deselected,
    /// No filter.
    Undefined,
}

impl ValueItemStatus {
    /// Returns the serialized token.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueItemStatus::All => "ALL",
            ValueItemStatus::Active => "ACTIVE",
            ValueItemStatus::Inactive => "INACTIVE",
            ValueItemStatus::Locked => "LOCKED",
            ValueItemStatus::JdpdInput => "JDPD_INPUT",
            ValueItemStatus::Unlocked => "UNLOCKED",
            ValueItemStatus::HasError => "HAS_ERROR",
            ValueItemStatus::HasNoError => "HAS_NO_ERROR",
            ValueItemStatus::HasHint => "HAS_HINT",
            ValueItemStatus::HasNoHint => "HAS_NO_HINT",
            ValueItemStatus::Selected => "SELECTED",
            ValueItemStatus::Deselected => "DESELECTED",
            ValueItemStatus::Undefined => "UNDEFINED",
        }
    }
}

impl fmt::Display for ValueItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "ALL" => Ok(ValueItemStatus::All),
            "ACTIVE" => Ok(ValueItemStatus::Active),
            "INACTIVE" => Ok(ValueItemStatus::Inactive),
            "LOCKED" => Ok(ValueItemStatus::Locked),
            "JDPD_INPUT" => Ok(ValueItemStatus::JdpdInput),
            "UNLOCKED" => Ok(ValueItemStatus::Unlocked),
            "HAS_ERROR" => Ok(ValueItemStatus::HasError),
            "HAS_NO_ERROR" => Ok(ValueItemStatus::HasNoError),
            "HAS_HINT" => Ok(ValueItemStatus::HasHint),
            "HAS_NO_HINT" => Ok(ValueItemStatus::HasNoHint),
            "SELECTED" => Ok(ValueItemStatus::Selected),
            "DESELECTED" => Ok(ValueItemStatus::Deselected),
            "UNDEFINED" => Ok(ValueItemStatus::Undefined),
            _ => Err(format!("Unknown value item status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_tokens_parse_back() {
        for data_type in DataType::ALL {
            assert_eq!(data_type.as_str().parse::<DataType>(), Ok(data_type));
        }
        assert_eq!(" text_empty ".parse::<DataType>(), Ok(DataType::TextEmpty));
        assert!("FLOAT".parse::<DataType>().is_err());
    }

    #[test]
    fn basic_type_display_matches_token() {
        assert_eq!(BasicType::FlexibleMatrix.to_string(), "FLEXIBLE_MATRIX");
        assert_eq!("vector".parse::<BasicType>(), Ok(BasicType::Vector));
    }

    #[test]
    fn serde_uses_screaming_tokens() {
        let json = serde_json::to_string(&DataType::SelectionText).unwrap();
        assert_eq!(json, "\"SELECTION_TEXT\"");
        let status: ValueItemStatus = serde_json::from_str("\"HAS_NO_HINT\"").unwrap();
        assert_eq!(status, ValueItemStatus::HasNoHint);
    }

    #[test]
    fn structure_types_are_not_descriptive() {
        assert!(!DataType::MolecularStructure.is_descriptive());
        assert!(DataType::TimestampEmpty.is_descriptive());
        assert!(DataType::NumericNull.is_numeric());
    }
}
