//! Constants shared by the value item model.

/// Version string written to and required in every document element.
pub const XML_VERSION: &str = "Version 1.0.0";

/// Schema cell value that matches any value.
pub const SCHEMA_WILDCARD: &str = "*";

/// Sentinel accepted by `NUMERIC_NULL` formats.
pub const NUMERIC_NULL_VALUE: &str = "null";

/// Representation of an unbounded minimum or maximum.
pub const NOT_DEFINED: &str = "not defined";

/// Standard timestamp format (`yyyy/MM/dd - HH:mm:ss`).
pub const STANDARD_TIMESTAMP_FORMAT: &str = "%Y/%m/%d - %H:%M:%S";

/// Default maximum row count of flexible matrices.
pub const DEFAULT_MATRIX_MAXIMUM_NUMBER_OF_ROWS: usize = i32::MAX as usize;

/// Upper bound for suffix attempts when deriving a unique value.
pub const MAX_UNIQUE_SUFFIX_ATTEMPTS: usize = 10_000;

/// Default depth limit for nested change notifications.
pub const DEFAULT_MAX_NOTIFICATION_DEPTH: usize = 32;

/// Default depth limit for nested dependency updates.
pub const DEFAULT_MAX_UPDATE_DEPTH: usize = 8;

/// Column name prefix used when a matrix has no column names.
pub const DEFAULT_COLUMN_NAME_PREFIX: &str = "Column";

/// Column separator of diagram exports.
pub const DIAGRAM_COLUMN_SEPARATOR: char = '\t';
