//! Error types for the value item model.
//!
//! Construction and mutation failures are reported synchronously to the
//! immediate caller. Correction passes never fail; they log and skip instead.

use thiserror::Error;

use crate::enums::DataType;

/// Unified error type for value item model operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ModelError {
    // =========================================================================
    // CONSTRUCTION ERRORS
    // =========================================================================
    /// Number of decimals outside the supported range.
    #[error("Number of decimals must be greater or equal to zero: {value}")]
    InvalidNumberOfDecimals {
        /// The rejected decimal count.
        value: i64,
    },

    /// Maximum value is smaller than the minimum value.
    #[error("Maximum value {maximum} must be greater or equal to minimum value {minimum}")]
    InvalidBounds {
        /// Requested minimum.
        minimum: f64,
        /// Requested maximum.
        maximum: f64,
    },

    /// Default value is not admitted by its own format.
    #[error("Default value '{value}' is not allowed: {reason}")]
    InvalidDefault {
        /// The rejected default value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Selection formats need at least one selection text.
    #[error("Selection texts must not be empty")]
    EmptySelectionSet,

    /// A selection text entry is empty.
    #[error("Selection text at position {index} is empty")]
    EmptySelectionText {
        /// Position of the empty entry.
        index: usize,
    },

    /// Forbidden text list is empty or contains an empty entry.
    #[error("Forbidden texts must be non-empty and must not contain empty entries")]
    EmptyForbiddenSet,

    /// A constraint regex does not compile.
    #[error("Invalid regular expression '{pattern}': {source}")]
    RegexCompile {
        /// The regex source string.
        pattern: String,
        /// Underlying compile error.
        #[source]
        source: regex::Error,
    },

    /// Operation is not defined for the format's data type.
    #[error("Operation '{operation}' is not supported for data type {data_type}")]
    WrongDataType {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Data type of the format.
        data_type: DataType,
    },

    // =========================================================================
    // MUTATION ERRORS
    // =========================================================================
    /// Value differs from the default of an exclusive selection format.
    #[error("Value '{value}' violates exclusive selection (current default '{default}')")]
    ExclusiveSelectionViolation {
        /// The rejected value.
        value: String,
        /// The format's current default value.
        default: String,
    },

    /// No unique value could be derived within the attempt limit.
    #[error("No unique value found for base '{base}' after {attempts} attempts")]
    UniqueValueExhausted {
        /// Base value the suffix was appended to.
        base: String,
        /// Number of attempts made.
        attempts: usize,
    },

    // =========================================================================
    // STRUCTURE ERRORS
    // =========================================================================
    /// A matrix row has a different length than the first row.
    #[error("Matrix row {row} has {actual} columns, expected {expected}")]
    RowLengthMismatch {
        /// Offending row index.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        actual: usize,
    },

    /// Matrix without rows or columns.
    #[error("Matrix must contain at least one row and one column")]
    EmptyMatrix,

    /// Cell index outside the matrix.
    #[error("Cell ({row}, {column}) is outside the matrix")]
    IndexOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        column: usize,
    },

    /// Operation needs a matrix but the value item has none.
    #[error("Value item '{name}' has no matrix")]
    MissingMatrix {
        /// Value item name.
        name: String,
    },

    /// Value item name already present in the container.
    #[error("Value item '{name}' already exists")]
    DuplicateName {
        /// The duplicated name.
        name: String,
    },

    /// Value item name must not be empty.
    #[error("Value item name must not be empty")]
    EmptyName,

    // =========================================================================
    // NOTIFICATION ERRORS
    // =========================================================================
    /// Receiver list changed while a notification was dispatched.
    #[error("Change receivers cannot be modified while a notification is dispatched")]
    ReceiverListLocked,

    // =========================================================================
    // SERIALIZATION ERRORS
    // =========================================================================
    /// Version element missing or unknown.
    #[error("Unsupported version '{found}' in element <{element}>")]
    UnsupportedVersion {
        /// Element carrying the version.
        element: String,
        /// Version string found (empty if missing).
        found: String,
    },

    /// Required child element missing.
    #[error("Missing element <{child}> in <{parent}>")]
    MissingElement {
        /// Parent element name.
        parent: String,
        /// Missing child element name.
        child: String,
    },

    /// Element text could not be interpreted.
    #[error("Invalid value '{value}' in element <{element}>")]
    InvalidValue {
        /// Element name.
        element: String,
        /// Raw text.
        value: String,
    },

    /// Root element has the wrong name.
    #[error("Unexpected element <{found}>, expected <{expected}>")]
    UnexpectedElement {
        /// Expected element name.
        expected: String,
        /// Element name found.
        found: String,
    },

    // =========================================================================
    // WRAPPED ERRORS
    // =========================================================================
    /// XML reading or writing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// Create a regex compile error for a pattern.
    pub fn regex(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::RegexCompile {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create an invalid default error.
    pub fn invalid_default(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefault {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing element error.
    pub fn missing(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::MissingElement {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(element: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            element: element.into(),
            value: value.into(),
        }
    }

    /// Check if this error is recoverable (caller can fix the input and retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidNumberOfDecimals { .. }
                | Self::InvalidBounds { .. }
                | Self::InvalidDefault { .. }
                | Self::EmptySelectionSet
                | Self::EmptySelectionText { .. }
                | Self::EmptyForbiddenSet
                | Self::RegexCompile { .. }
                | Self::ExclusiveSelectionViolation { .. }
                | Self::IndexOutOfRange { .. }
                | Self::DuplicateName { .. }
                | Self::EmptyName
        )
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidBounds { .. } => Some("Swap the minimum and maximum values."),
            Self::InvalidDefault { .. } => {
                Some("Choose a default value that satisfies the format's own constraints.")
            }
            Self::EmptySelectionSet | Self::EmptySelectionText { .. } => {
                Some("Provide at least one non-empty selection text.")
            }
            Self::RegexCompile { .. } => Some("Check the regular expression syntax."),
            Self::ExclusiveSelectionViolation { .. } => Some(
                "Exclusive selection cells only accept their current default; rebind the default first.",
            ),
            Self::DuplicateName { .. } => Some("Rename the value item before adding it."),
            Self::UnsupportedVersion { .. } => {
                Some("The document was written by an unsupported version of the model.")
            }
            Self::MissingElement { .. } | Self::InvalidValue { .. } => {
                Some("The document is incomplete or was edited by hand.")
            }
            _ => None,
        }
    }
}
