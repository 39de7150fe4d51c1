//! Named, typed unit of job configuration data.
//!
//! A [`ValueItem`] owns an optional [`Matrix`] of cells plus display and
//! status metadata. Every mutation that can break a cross-cell rule runs the
//! correction passes from [`crate::corrections`] before it returns, and
//! every observable change is announced through the item's
//! [`ChangeNotifier`].
//!
//! The implementation is split by concern:
//! - `rows`: inserting, copying, removing and reordering matrix rows
//! - `columns`: column queries, diagram export and combined formats
//! - `schema`: schema extraction and matching
//! - `xml`: document codec

mod columns;
mod rows;
mod schema;
mod xml;

use std::fmt;
use std::rc::Rc;

use crate::change::{ChangeEvent, ChangeKind, ChangeNotifier, ChangeReceiver};
use crate::container::ContainerId;
use crate::corrections::{
    correct_first_row_editable_only_columns, correct_pending_zeros, correct_pending_zeros_column,
    correct_unique_value_columns,
};
use crate::definitions::{DEFAULT_COLUMN_NAME_PREFIX, DEFAULT_MATRIX_MAXIMUM_NUMBER_OF_ROWS};
use crate::enums::{BasicType, DataType, ValueItemStatus};
use crate::error::{ModelError, Result};
use crate::matrix::Matrix;
use crate::matrix_element::MatrixElement;
use crate::numeric::parse_double;
use crate::options::ModelOptions;
use crate::payload::{COMPARTMENT_ERROR_MESSAGE, CompartmentPayload, ObjectHandle, Payload};
use crate::snapshot::MatrixSnapshot;
use crate::type_format::TypeFormat;

pub use columns::DiagramColumns;
pub(crate) use xml::VALUE_ITEM;

/// A named scalar, vector or matrix of typed cells with metadata.
pub struct ValueItem {
    name: String,
    display_name: String,
    name_of_data_value_item: String,
    name_of_display_value_item: String,
    node_names: Vec<String>,
    matrix_output_omit_columns: Vec<bool>,
    matrix: Option<Matrix>,
    matrix_column_names: Vec<String>,
    matrix_column_widths: Vec<String>,
    supplementary_data: Vec<String>,
    current_row: usize,
    current_column: usize,
    matrix_diagram_x_value_column: Option<usize>,
    matrix_diagram_y_value_column: Option<usize>,
    matrix_maximum_number_of_rows: usize,
    is_active: bool,
    is_displayed: bool,
    basic_type: BasicType,
    block_name: String,
    description: String,
    error: String,
    hint: String,
    file_type_ending: String,
    vertical_position: i32,
    is_essential: bool,
    is_locked: bool,
    is_jdpd_input: bool,
    is_matrix_cloned_before_change: bool,
    last_snapshot: Option<MatrixSnapshot>,
    is_update_notifier: bool,
    constant_sum_column: Option<usize>,
    is_selected: bool,
    payload: Option<Payload>,
    row_restore_order: Option<Vec<usize>>,
    has_change_detected: bool,
    container_id: Option<ContainerId>,
    notifier: ChangeNotifier,
}

impl Default for ValueItem {
    fn default() -> Self {
        Self::with_options(ModelOptions::default())
    }
}

impl ValueItem {
    /// Empty `SCALAR` item without a matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty item whose notifier uses the given depth limit.
    pub fn with_options(options: ModelOptions) -> Self {
        Self {
            name: String::new(),
            display_name: String::new(),
            name_of_data_value_item: String::new(),
            name_of_display_value_item: String::new(),
            node_names: Vec::new(),
            matrix_output_omit_columns: Vec::new(),
            matrix: None,
            matrix_column_names: Vec::new(),
            matrix_column_widths: Vec::new(),
            supplementary_data: Vec::new(),
            current_row: 0,
            current_column: 0,
            matrix_diagram_x_value_column: None,
            matrix_diagram_y_value_column: None,
            matrix_maximum_number_of_rows: DEFAULT_MATRIX_MAXIMUM_NUMBER_OF_ROWS,
            is_active: true,
            is_displayed: true,
            basic_type: BasicType::Scalar,
            block_name: String::new(),
            description: String::new(),
            error: String::new(),
            hint: String::new(),
            file_type_ending: String::new(),
            vertical_position: -1,
            is_essential: true,
            is_locked: false,
            is_jdpd_input: false,
            is_matrix_cloned_before_change: false,
            last_snapshot: None,
            is_update_notifier: false,
            constant_sum_column: None,
            is_selected: false,
            payload: None,
            row_restore_order: None,
            has_change_detected: false,
            container_id: None,
            notifier: ChangeNotifier::new(options.max_notification_depth),
        }
    }

    /// Item with name and basic type set.
    pub fn named(name: &str, basic_type: BasicType) -> Self {
        let mut item = Self::new();
        item.set_name(name);
        item.basic_type = basic_type;
        item
    }

    // =========================================================================
    // CHANGE NOTIFICATION
    // =========================================================================

    /// Receiver registry of this item.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn add_change_receiver(&self, receiver: Rc<dyn ChangeReceiver>) -> Result<()> {
        self.notifier.add_change_receiver(receiver)
    }

    pub fn remove_single_change_receiver(&self, receiver: &Rc<dyn ChangeReceiver>) -> Result<()> {
        self.notifier.remove_single_change_receiver(receiver)
    }

    pub fn remove_all_change_receivers(&self) -> Result<()> {
        self.notifier.remove_all_change_receivers()
    }

    /// Resets change detection; see [`has_change_detected`](Self::has_change_detected).
    pub fn initialize_change_detection(&mut self) {
        self.has_change_detected = false;
    }

    /// True if any notifying mutation happened since the last reset.
    pub fn has_change_detected(&self) -> bool {
        self.has_change_detected
    }

    /// Re-announces a change reported by the item's payload.
    ///
    /// A compartment error change is announced as an error change of the item.
    pub fn forward_payload_change(&mut self, kind: ChangeKind) {
        let kind = match kind {
            ChangeKind::CompartmentContainerErrorChange => ChangeKind::ErrorChange,
            other => other,
        };
        self.notify(kind);
    }

    fn notify(&mut self, kind: ChangeKind) {
        self.has_change_detected = true;
        self.notifier.notify(&ChangeEvent::value_item(kind, self.name.as_str()));
    }

    // =========================================================================
    // NAMES AND DESCRIPTIVE METADATA
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name; empty names are ignored. An empty display name
    /// follows the name.
    pub fn set_name(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        self.name = name.to_string();
        if self.display_name.is_empty() {
            self.display_name = self.name.clone();
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, display_name: &str) {
        self.display_name = display_name.to_string();
    }

    /// Name of the item holding the data shown by this item.
    pub fn name_of_data_value_item(&self) -> &str {
        &self.name_of_data_value_item
    }

    pub fn set_name_of_data_value_item(&mut self, name: &str) {
        self.name_of_data_value_item = name.to_string();
    }

    /// Name of the item displaying the data of this item.
    pub fn name_of_display_value_item(&self) -> &str {
        &self.name_of_display_value_item
    }

    pub fn set_name_of_display_value_item(&mut self, name: &str) {
        self.name_of_display_value_item = name.to_string();
    }

    /// Path of the item in a tree view.
    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    pub fn last_node_name(&self) -> Option<&str> {
        self.node_names.last().map(String::as_str)
    }

    pub fn set_node_names(&mut self, node_names: Vec<String>) {
        self.node_names = node_names;
    }

    pub fn block_name(&self) -> &str {
        &self.block_name
    }

    /// Sets the block name; empty names are ignored.
    pub fn set_block_name(&mut self, block_name: &str) {
        if !block_name.is_empty() {
            self.block_name = block_name.to_string();
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn supplementary_data(&self) -> &[String] {
        &self.supplementary_data
    }

    pub fn has_supplementary_data(&self) -> bool {
        !self.supplementary_data.is_empty()
    }

    /// Replaces the supplementary data; an empty list is ignored.
    pub fn set_supplementary_data(&mut self, data: Vec<String>) {
        if !data.is_empty() {
            self.supplementary_data = data;
        }
    }

    pub fn remove_supplementary_data(&mut self) {
        self.supplementary_data.clear();
    }

    /// File type ending for `FILE` cells, e.g. `".pdb"`.
    pub fn file_type_ending(&self) -> &str {
        &self.file_type_ending
    }

    pub fn has_file_type_ending(&self) -> bool {
        !self.file_type_ending.is_empty()
    }

    pub fn set_file_type_ending(&mut self, ending: &str) {
        self.file_type_ending = ending.to_string();
    }

    pub fn remove_file_type_ending(&mut self) {
        self.file_type_ending.clear();
    }

    pub fn basic_type(&self) -> BasicType {
        self.basic_type
    }

    pub fn set_basic_type(&mut self, basic_type: BasicType) {
        self.basic_type = basic_type;
    }

    pub fn vertical_position(&self) -> i32 {
        self.vertical_position
    }

    pub fn set_vertical_position(&mut self, position: i32) {
        self.vertical_position = position;
    }

    pub fn increment_vertical_position(&mut self) {
        self.vertical_position += 1;
    }

    /// Container this item is bound to, if any.
    pub fn container_id(&self) -> Option<ContainerId> {
        self.container_id
    }

    pub(crate) fn bind_container(&mut self, id: ContainerId) {
        self.container_id = Some(id);
    }

    pub(crate) fn unbind_container(&mut self) {
        self.container_id = None;
    }

    // =========================================================================
    // STATUS FLAGS
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_activity(&mut self, is_active: bool) {
        if self.is_active != is_active {
            self.is_active = is_active;
            self.notify(ChangeKind::ActivityChange);
        }
    }

    pub fn is_displayed(&self) -> bool {
        self.is_displayed
    }

    pub fn set_display(&mut self, is_displayed: bool) {
        if self.is_displayed != is_displayed {
            self.is_displayed = is_displayed;
            self.notify(ChangeKind::DisplayChange);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Locks or unlocks the item; a locked item is deactivated.
    pub fn set_locked(&mut self, is_locked: bool) {
        if self.is_locked != is_locked {
            self.is_locked = is_locked;
            self.notify(ChangeKind::LockStatusChange);
            if is_locked {
                self.set_activity(false);
            }
        }
    }

    pub fn is_essential(&self) -> bool {
        self.is_essential
    }

    pub fn set_essential(&mut self, is_essential: bool) {
        self.is_essential = is_essential;
    }

    pub fn is_jdpd_input(&self) -> bool {
        self.is_jdpd_input
    }

    pub fn set_jdpd_input(&mut self, is_jdpd_input: bool) {
        self.is_jdpd_input = is_jdpd_input;
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Sets the selection; always announces selected or deselected.
    pub fn set_selected(&mut self, is_selected: bool) {
        self.is_selected = is_selected;
        if is_selected {
            self.notify(ChangeKind::SelectedChange);
        } else {
            self.notify(ChangeKind::DeselectedChange);
        }
    }

    /// Changes of an update notifier trigger recomputation of dependent items.
    pub fn is_update_notifier(&self) -> bool {
        self.is_update_notifier
    }

    pub fn set_update_notifier(&mut self, is_update_notifier: bool) {
        self.is_update_notifier = is_update_notifier;
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Sets the error message; a changed error removes the hint.
    pub fn set_error(&mut self, error: &str) {
        if self.error != error {
            self.error = error.to_string();
            self.notify(ChangeKind::ErrorChange);
            self.remove_hint();
        }
    }

    pub fn remove_error(&mut self) {
        if !self.error.is_empty() {
            self.error.clear();
            self.notify(ChangeKind::ErrorChange);
        }
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn has_hint(&self) -> bool {
        !self.hint.is_empty()
    }

    /// Sets the hint; ignored while the item has an error.
    pub fn set_hint(&mut self, hint: &str) {
        if !self.has_error() && self.hint != hint {
            self.hint = hint.to_string();
            self.notify(ChangeKind::HintChange);
        }
    }

    pub fn remove_hint(&mut self) {
        if !self.hint.is_empty() {
            self.hint.clear();
            self.notify(ChangeKind::HintChange);
        }
    }

    /// True if the item matches the status filter.
    pub fn has_status(&self, status: ValueItemStatus) -> bool {
        match status {
            ValueItemStatus::All | ValueItemStatus::Undefined => true,
            ValueItemStatus::Active => self.is_active,
            ValueItemStatus::Inactive => !self.is_active,
            ValueItemStatus::Locked => self.is_locked,
            ValueItemStatus::JdpdInput => self.is_jdpd_input,
            ValueItemStatus::Unlocked => !self.is_locked,
            ValueItemStatus::HasError => self.has_error(),
            ValueItemStatus::HasNoError => !self.has_error(),
            ValueItemStatus::HasHint => self.has_hint(),
            ValueItemStatus::HasNoHint => !self.has_hint(),
            ValueItemStatus::Selected => self.is_selected,
            ValueItemStatus::Deselected => !self.is_selected,
        }
    }

    // =========================================================================
    // PAYLOAD
    // =========================================================================

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn compartments(&self) -> Option<&CompartmentPayload> {
        self.payload.as_ref().and_then(Payload::compartments)
    }

    pub fn has_compartments(&self) -> bool {
        self.compartments().is_some()
    }

    /// Attaches a compartment payload.
    ///
    /// Switches the item to `COMPARTMENT_CONTAINER` and mirrors the payload's
    /// error flag into the item error.
    pub fn set_compartments(&mut self, compartments: CompartmentPayload) {
        let has_error = compartments.has_error();
        self.payload = Some(Payload::Compartments(compartments));
        self.basic_type = BasicType::CompartmentContainer;
        self.notify(ChangeKind::CompartmentChange);
        if has_error {
            self.set_error(COMPARTMENT_ERROR_MESSAGE);
        } else {
            self.remove_error();
        }
    }

    pub fn object(&self) -> Option<ObjectHandle> {
        self.payload.as_ref().and_then(Payload::object)
    }

    pub fn has_object(&self) -> bool {
        self.object().is_some()
    }

    /// Attaches an object handle and switches the item to `OBJECT`.
    pub fn set_object(&mut self, handle: ObjectHandle) {
        self.payload = Some(Payload::Object(handle));
        self.basic_type = BasicType::Object;
    }

    pub fn remove_object(&mut self) {
        if self.has_object() {
            self.payload = None;
        }
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    pub fn is_matrix_cloned_before_change(&self) -> bool {
        self.is_matrix_cloned_before_change
    }

    /// Enables keeping the matrix state before each change; disabling drops
    /// the last snapshot.
    pub fn set_matrix_cloned_before_change(&mut self, value: bool) {
        self.is_matrix_cloned_before_change = value;
        if !value {
            self.last_snapshot = None;
        }
    }

    /// Matrix state before the last matrix change, when enabled.
    pub fn last_snapshot(&self) -> Option<&MatrixSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Captures the current matrix.
    pub fn checkpoint(&self) -> MatrixSnapshot {
        MatrixSnapshot::capture(self.matrix.as_ref())
    }

    /// Replaces the matrix with the snapshot's state.
    pub fn restore(&mut self, snapshot: &MatrixSnapshot) {
        match snapshot.to_matrix() {
            Some(matrix) => self.set_matrix(matrix),
            None => self.clear_matrix(),
        }
    }

    fn capture_snapshot(&mut self) {
        if self.is_matrix_cloned_before_change {
            self.last_snapshot = Some(MatrixSnapshot::capture(self.matrix.as_ref()));
        }
    }

    // =========================================================================
    // MATRIX
    // =========================================================================

    pub fn matrix(&self) -> Option<&Matrix> {
        self.matrix.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.matrix.is_some()
    }

    pub fn matrix_row_count(&self) -> usize {
        self.matrix.as_ref().map_or(0, Matrix::row_count)
    }

    pub fn matrix_column_count(&self) -> usize {
        self.matrix.as_ref().map_or(0, Matrix::column_count)
    }

    /// Replaces the matrix.
    ///
    /// Runs the exclusive selection, unique value, first-row and pending-zero
    /// passes, announces the change, names unnamed columns `Column i` and
    /// keeps the row cursor inside the matrix.
    pub fn set_matrix(&mut self, mut matrix: Matrix) {
        self.capture_snapshot();
        columns::correct_exclusive_column(&mut matrix, &[]);
        correct_unique_value_columns(&mut matrix, None);
        correct_first_row_editable_only_columns(&mut matrix);
        correct_pending_zeros(&mut matrix);
        let column_count = matrix.column_count();
        let last_row = matrix.row_count().saturating_sub(1);
        self.matrix = Some(matrix);
        self.notify(ChangeKind::MatrixChange);
        if self.matrix_column_names.is_empty() {
            self.matrix_column_names = (0..column_count)
                .map(|column| format!("{DEFAULT_COLUMN_NAME_PREFIX} {column}"))
                .collect();
        }
        self.current_row = self.current_row.min(last_row);
    }

    /// Removes the matrix; announces a change only if one existed.
    pub fn clear_matrix(&mut self) {
        if self.matrix.is_some() {
            self.capture_snapshot();
            self.matrix = None;
            self.notify(ChangeKind::MatrixChange);
        }
    }

    /// Initializes a one-row matrix with one cell per format, silently.
    pub fn set_default_type_formats(&mut self, type_formats: Vec<TypeFormat>) -> Result<()> {
        let row = type_formats.into_iter().map(MatrixElement::new).collect();
        self.matrix = Some(Matrix::from_row(row)?);
        Ok(())
    }

    /// Initializes a 1x1 matrix, silently.
    pub fn set_default_type_format(&mut self, type_format: TypeFormat) {
        self.matrix = Some(Matrix::single(MatrixElement::new(type_format)));
    }

    pub fn matrix_column_names(&self) -> &[String] {
        &self.matrix_column_names
    }

    pub fn matrix_column_name(&self, column: usize) -> Option<&str> {
        self.matrix_column_names.get(column).map(String::as_str)
    }

    pub fn set_matrix_column_names(&mut self, names: Vec<String>) {
        self.matrix_column_names = names;
    }

    pub fn matrix_column_widths(&self) -> &[String] {
        &self.matrix_column_widths
    }

    pub fn has_matrix_column_widths(&self) -> bool {
        !self.matrix_column_widths.is_empty()
    }

    /// Width of a column as integer; `None` if absent or not a number.
    pub fn matrix_column_width(&self, column: usize) -> Option<i32> {
        self.matrix_column_widths
            .get(column)
            .and_then(|width| width.trim().parse().ok())
    }

    pub fn set_matrix_column_widths(&mut self, widths: Vec<String>) {
        self.matrix_column_widths = widths;
    }

    /// Columns left out of matrix output.
    pub fn matrix_output_omit_columns(&self) -> &[bool] {
        &self.matrix_output_omit_columns
    }

    pub fn set_matrix_output_omit_columns(&mut self, omit: Vec<bool>) {
        self.matrix_output_omit_columns = omit;
    }

    pub fn matrix_maximum_number_of_rows(&self) -> usize {
        self.matrix_maximum_number_of_rows
    }

    pub fn set_matrix_maximum_number_of_rows(&mut self, maximum: usize) {
        self.matrix_maximum_number_of_rows = maximum;
    }

    /// Column whose values sum to a constant on insert.
    pub fn constant_sum_column(&self) -> Option<usize> {
        self.constant_sum_column
    }

    pub fn set_constant_sum_column(&mut self, column: Option<usize>) {
        self.constant_sum_column = column;
    }

    // =========================================================================
    // CURSOR AND CELL VALUES
    // =========================================================================

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn current_column(&self) -> usize {
        self.current_column
    }

    /// Moves the cursor; the position is not checked.
    pub fn set_current_matrix_position(&mut self, row: usize, column: usize) {
        self.current_row = row;
        self.current_column = column;
    }

    /// Cell at the cursor.
    pub fn matrix_element(&self) -> Option<&MatrixElement> {
        self.matrix_element_at(self.current_row, self.current_column)
    }

    pub fn matrix_element_at(&self, row: usize, column: usize) -> Option<&MatrixElement> {
        self.matrix.as_ref().and_then(|matrix| matrix.get(row, column))
    }

    /// Value at the cursor.
    pub fn value(&self) -> Option<&str> {
        self.matrix_element().map(MatrixElement::value)
    }

    pub fn value_at(&self, row: usize, column: usize) -> Option<&str> {
        self.matrix_element_at(row, column).map(MatrixElement::value)
    }

    pub fn formatted_value(&self) -> Option<String> {
        self.matrix_element().map(MatrixElement::formatted_value)
    }

    pub fn formatted_value_at(&self, row: usize, column: usize) -> Option<String> {
        self.matrix_element_at(row, column).map(MatrixElement::formatted_value)
    }

    pub fn value_as_f64(&self) -> Option<f64> {
        self.value().and_then(parse_double)
    }

    pub fn value_as_f64_at(&self, row: usize, column: usize) -> Option<f64> {
        self.value_at(row, column).and_then(parse_double)
    }

    pub fn value_as_i64(&self) -> Option<i64> {
        self.value().and_then(|value| value.trim().parse().ok())
    }

    pub fn value_as_i64_at(&self, row: usize, column: usize) -> Option<i64> {
        self.value_at(row, column).and_then(|value| value.trim().parse().ok())
    }

    /// True only for a case-insensitive `true` value.
    pub fn value_as_bool_at(&self, row: usize, column: usize) -> bool {
        self.value_at(row, column)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    pub fn has_numeric_null_value(&self, row: usize, column: usize) -> bool {
        self.matrix_element_at(row, column)
            .is_some_and(MatrixElement::has_numeric_null_value)
    }

    /// Format at the cursor.
    pub fn type_format(&self) -> Option<&TypeFormat> {
        self.matrix_element().map(MatrixElement::type_format)
    }

    /// Format of a column in the cursor row.
    pub fn type_format_of_column(&self, column: usize) -> Option<&TypeFormat> {
        self.matrix_element_at(self.current_row, column)
            .map(MatrixElement::type_format)
    }

    pub fn type_format_at(&self, row: usize, column: usize) -> Option<&TypeFormat> {
        self.matrix_element_at(row, column).map(MatrixElement::type_format)
    }

    /// Sets the value at the cursor.
    ///
    /// Without a matrix the item becomes a `SCALAR` holding a single `TEXT`
    /// cell with the value.
    pub fn set_value(&mut self, value: &str) -> Result<bool> {
        if self.matrix.is_none() {
            self.basic_type = BasicType::Scalar;
            let cell = MatrixElement::with_value(value, TypeFormat::of_type(DataType::Text))?;
            self.set_matrix(Matrix::single(cell));
            return Ok(true);
        }
        self.set_value_at(value, self.current_row, self.current_column)
    }

    /// Sets one cell and restores the cross-cell rules.
    ///
    /// Returns false if the value equals the stored one. An exclusive
    /// selection cell accepts any of its selection texts and makes it the
    /// new default; the other rows' texts are rebound afterwards.
    pub fn set_value_at(&mut self, value: &str, row: usize, column: usize) -> Result<bool> {
        let is_exclusive = {
            let matrix = self.matrix.as_ref().ok_or_else(|| ModelError::MissingMatrix {
                name: self.name.clone(),
            })?;
            let cell = matrix.cell(row, column)?;
            if cell.value() == value {
                return Ok(false);
            }
            let type_format = cell.type_format();
            if type_format.has_exclusive_selection_texts() && !type_format.has_selection_text(value) {
                return Err(ModelError::ExclusiveSelectionViolation {
                    value: value.to_string(),
                    default: type_format.default_value().to_string(),
                });
            }
            type_format.has_exclusive_selection_texts()
        };

        self.capture_snapshot();
        let name = self.name.clone();
        let matrix = self
            .matrix
            .as_mut()
            .ok_or(ModelError::MissingMatrix { name })?;
        let cell = matrix.cell_mut(row, column)?;
        if is_exclusive {
            cell.select_exclusive_value(value)?;
        } else {
            cell.set_value(value)?;
        }
        columns::correct_exclusive_column(matrix, &[]);
        correct_unique_value_columns(matrix, Some(row));
        correct_first_row_editable_only_columns(matrix);
        correct_pending_zeros_column(matrix, column);
        self.notify(ChangeKind::ValueChange);
        Ok(true)
    }

    /// Resets one cell to its format's default.
    pub fn set_default_value_at(&mut self, row: usize, column: usize) -> Result<bool> {
        let default = self
            .type_format_at(row, column)
            .map(|type_format| type_format.default_value().to_string())
            .ok_or(ModelError::IndexOutOfRange { row, column })?;
        self.set_value_at(&default, row, column)
    }
}

impl Clone for ValueItem {
    /// Detached copy: no receivers, no container binding, no snapshot.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            name_of_data_value_item: self.name_of_data_value_item.clone(),
            name_of_display_value_item: self.name_of_display_value_item.clone(),
            node_names: self.node_names.clone(),
            matrix_output_omit_columns: self.matrix_output_omit_columns.clone(),
            matrix: self.matrix.clone(),
            matrix_column_names: self.matrix_column_names.clone(),
            matrix_column_widths: self.matrix_column_widths.clone(),
            supplementary_data: self.supplementary_data.clone(),
            current_row: self.current_row,
            current_column: self.current_column,
            matrix_diagram_x_value_column: self.matrix_diagram_x_value_column,
            matrix_diagram_y_value_column: self.matrix_diagram_y_value_column,
            matrix_maximum_number_of_rows: self.matrix_maximum_number_of_rows,
            is_active: self.is_active,
            is_displayed: self.is_displayed,
            basic_type: self.basic_type,
            block_name: self.block_name.clone(),
            description: self.description.clone(),
            error: self.error.clone(),
            hint: self.hint.clone(),
            file_type_ending: self.file_type_ending.clone(),
            vertical_position: self.vertical_position,
            is_essential: self.is_essential,
            is_locked: self.is_locked,
            is_jdpd_input: self.is_jdpd_input,
            is_matrix_cloned_before_change: self.is_matrix_cloned_before_change,
            last_snapshot: None,
            is_update_notifier: self.is_update_notifier,
            constant_sum_column: self.constant_sum_column,
            is_selected: self.is_selected,
            payload: self.payload.clone(),
            row_restore_order: None,
            has_change_detected: false,
            container_id: None,
            notifier: ChangeNotifier::new(self.notifier.max_depth()),
        }
    }
}

impl fmt::Debug for ValueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueItem")
            .field("name", &self.name)
            .field("basic_type", &self.basic_type)
            .field("block_name", &self.block_name)
            .field("vertical_position", &self.vertical_position)
            .field("rows", &self.matrix_row_count())
            .field("columns", &self.matrix_column_count())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ValueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_active {
            write!(f, "{} (inactive)", self.display_name)
        } else if self.has_error() {
            write!(f, "{} (error)", self.display_name)
        } else {
            f.write_str(&self.display_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeRecorder;

    fn recorded(item: &ValueItem) -> Rc<ChangeRecorder> {
        let recorder = ChangeRecorder::new();
        item.add_change_receiver(recorder.clone()).unwrap();
        recorder
    }

    #[test]
    fn defaults_match_a_fresh_item() {
        let item = ValueItem::new();
        assert_eq!(item.basic_type(), BasicType::Scalar);
        assert_eq!(item.vertical_position(), -1);
        assert!(item.is_active() && item.is_displayed() && item.is_essential());
        assert!(!item.is_locked() && !item.is_selected());
        assert_eq!(item.matrix_maximum_number_of_rows(), DEFAULT_MATRIX_MAXIMUM_NUMBER_OF_ROWS);
        assert!(item.matrix().is_none());
    }

    #[test]
    fn name_fills_empty_display_name() {
        let mut item = ValueItem::new();
        item.set_name("");
        assert_eq!(item.name(), "");
        item.set_name("Temperature");
        assert_eq!(item.display_name(), "Temperature");
        item.set_name("Other");
        assert_eq!(item.display_name(), "Temperature");
    }

    #[test]
    fn set_value_without_matrix_creates_scalar() {
        let mut item = ValueItem::named("Job", BasicType::Vector);
        assert!(item.set_value("First job").unwrap());
        assert_eq!(item.basic_type(), BasicType::Scalar);
        assert_eq!(item.value(), Some("First job"));
        assert_eq!(item.type_format().map(TypeFormat::data_type), Some(DataType::Text));
        assert_eq!(item.matrix_column_names(), ["Column 0"]);
    }

    #[test]
    fn unchanged_value_is_not_announced() {
        let mut item = ValueItem::named("Steps", BasicType::Scalar);
        item.set_matrix(Matrix::single(MatrixElement::with_value("10", TypeFormat::numeric(0)).unwrap()));
        let recorder = recorded(&item);
        assert!(!item.set_value("10").unwrap());
        assert!(item.set_value("12").unwrap());
        assert_eq!(recorder.kinds(), [ChangeKind::ValueChange]);
        assert!(item.has_change_detected());
        item.initialize_change_detection();
        assert!(!item.has_change_detected());
    }

    #[test]
    fn set_value_at_rejects_foreign_exclusive_text() {
        let texts = ["Red", "Green", "Blue"].map(String::from).to_vec();
        let mut item = ValueItem::named("Colors", BasicType::FlexibleMatrix);
        item.set_matrix(Matrix::single(MatrixElement::new(
            TypeFormat::selection(texts, Some("Red"), true, false).unwrap(),
        )));
        assert!(matches!(
            item.set_value_at("Purple", 0, 0),
            Err(ModelError::ExclusiveSelectionViolation { .. })
        ));
        assert!(item.set_value_at("Blue", 0, 0).unwrap());
        assert_eq!(item.value(), Some("Blue"));
        assert!(item.set_value_at("x", 3, 0).is_err());
    }

    #[test]
    fn locking_deactivates() {
        let mut item = ValueItem::named("A", BasicType::Scalar);
        let recorder = recorded(&item);
        item.set_locked(true);
        item.set_locked(true);
        assert!(!item.is_active());
        assert_eq!(recorder.kinds(), [ChangeKind::LockStatusChange, ChangeKind::ActivityChange]);
    }

    #[test]
    fn error_removes_hint_and_blocks_new_hints() {
        let mut item = ValueItem::named("A", BasicType::Scalar);
        item.set_hint("Check value");
        let recorder = recorded(&item);
        item.set_error("Broken");
        assert!(!item.has_hint());
        item.set_hint("Ignored");
        assert!(!item.has_hint());
        item.remove_error();
        assert_eq!(
            recorder.kinds(),
            [ChangeKind::ErrorChange, ChangeKind::HintChange, ChangeKind::ErrorChange]
        );
        assert_eq!(item.to_string(), "A");
    }

    #[test]
    fn selection_always_notifies() {
        let mut item = ValueItem::named("A", BasicType::Scalar);
        let recorder = recorded(&item);
        item.set_selected(false);
        item.set_selected(true);
        assert_eq!(recorder.kinds(), [ChangeKind::DeselectedChange, ChangeKind::SelectedChange]);
        assert!(item.has_status(ValueItemStatus::Selected));
    }

    #[test]
    fn compartment_payload_mirrors_error() {
        let mut item = ValueItem::named("Compartments", BasicType::Scalar);
        let recorder = recorded(&item);
        item.set_compartments(CompartmentPayload::new(crate::xml::XmlElement::new("Box")).with_error(true));
        assert_eq!(item.basic_type(), BasicType::CompartmentContainer);
        assert_eq!(item.error(), COMPARTMENT_ERROR_MESSAGE);
        assert_eq!(recorder.kinds(), [ChangeKind::CompartmentChange, ChangeKind::ErrorChange]);

        item.forward_payload_change(ChangeKind::CompartmentContainerErrorChange);
        assert_eq!(recorder.kinds().last(), Some(&ChangeKind::ErrorChange));

        item.set_object(ObjectHandle(3));
        assert_eq!(item.basic_type(), BasicType::Object);
        assert!(!item.has_compartments());
    }

    #[test]
    fn snapshots_track_the_previous_matrix() {
        let mut item = ValueItem::named("A", BasicType::Scalar);
        item.set_value("first").unwrap();
        let checkpoint = item.checkpoint();
        item.set_matrix_cloned_before_change(true);
        item.set_value("second").unwrap();
        let last = item.last_snapshot().and_then(MatrixSnapshot::matrix).unwrap();
        assert_eq!(last.cell(0, 0).unwrap().value(), "first");

        item.restore(&checkpoint);
        assert_eq!(item.value(), Some("first"));
        item.set_matrix_cloned_before_change(false);
        assert!(item.last_snapshot().is_none());
    }

    #[test]
    fn clone_is_detached() {
        let mut item = ValueItem::named("A", BasicType::Scalar);
        item.set_value("x").unwrap();
        let _recorder = recorded(&item);
        let copy = item.clone();
        assert_eq!(copy.notifier().receiver_count(), 0);
        assert_eq!(copy.value(), Some("x"));
        assert!(!copy.has_change_detected());
    }

    #[test]
    fn display_marks_inactive_items() {
        let mut item = ValueItem::named("Pressure", BasicType::Scalar);
        item.set_activity(false);
        assert_eq!(item.to_string(), "Pressure (inactive)");
    }
}
