//! Value item model of MFSim job settings.
//!
//! A job is described by a [`ValueItemContainer`] of named [`ValueItem`]s.
//! Each item holds a [`Matrix`] of [`MatrixElement`] cells whose admissible
//! values are described by a [`TypeFormat`]. Items keep their cells
//! consistent through the passes in [`corrections`] and announce changes
//! through [`ChangeNotifier`].
//!
//! ```
//! use mfsim_model::{BasicType, Matrix, MatrixElement, TypeFormat, ValueItem};
//!
//! let format = TypeFormat::numeric_with_default("1.25", 2, 0.0, 10.0).unwrap();
//! let mut item = ValueItem::named("Temperature", BasicType::Scalar);
//! item.set_matrix(Matrix::single(MatrixElement::new(format)));
//! assert_eq!(item.value(), Some("1.25"));
//! ```

pub mod change;
pub mod container;
pub mod corrections;
pub mod definitions;
pub mod enums;
pub mod error;
pub mod matrix;
pub mod matrix_element;
pub mod numeric;
pub mod options;
pub mod payload;
pub mod snapshot;
pub mod timestamp;
pub mod type_format;
pub mod value_item;
pub mod xml;

pub use change::{ChangeEvent, ChangeKind, ChangeNotifier, ChangeOrigin, ChangeReceiver, ChangeRecorder};
pub use container::{ContainerId, UpdateNotifier, ValueItemContainer};
pub use enums::{BasicType, DataType, ValueItemStatus};
pub use error::{ModelError, Result};
pub use matrix::Matrix;
pub use matrix_element::MatrixElement;
pub use options::ModelOptions;
pub use payload::{CompartmentPayload, ObjectHandle, Payload};
pub use snapshot::MatrixSnapshot;
pub use type_format::TypeFormat;
pub use value_item::{DiagramColumns, ValueItem};
pub use xml::{XmlElement, parse_xml};
