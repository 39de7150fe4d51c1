//! Inventories and cell checks of loaded containers.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use mfsim_model::{BasicType, DataType, ValueItem, ValueItemContainer, ValueItemStatus};

/// Status flags reported per item, in display order.
const REPORTED_STATUS: [ValueItemStatus; 5] = [
    ValueItemStatus::Inactive,
    ValueItemStatus::Locked,
    ValueItemStatus::JdpdInput,
    ValueItemStatus::HasError,
    ValueItemStatus::HasHint,
];

/// One row of the `inspect` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub name: String,
    pub display_name: String,
    pub block: String,
    pub basic_type: BasicType,
    pub rows: usize,
    pub columns: usize,
    pub vertical_position: i32,
    pub is_displayed: bool,
    pub status: Vec<ValueItemStatus>,
}

impl ItemSummary {
    fn from_item(item: &ValueItem) -> Self {
        Self {
            name: item.name().to_string(),
            display_name: item.display_name().to_string(),
            block: item.block_name().to_string(),
            basic_type: item.basic_type(),
            rows: item.matrix_row_count(),
            columns: item.matrix_column_count(),
            vertical_position: item.vertical_position(),
            is_displayed: item.is_displayed(),
            status: REPORTED_STATUS
                .into_iter()
                .filter(|status| item.has_status(*status))
                .collect(),
        }
    }

    /// Status tokens joined for table output; `-` when none apply.
    pub fn status_label(&self) -> String {
        if self.status.is_empty() {
            return "-".to_string();
        }
        self.status
            .iter()
            .map(ValueItemStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub item_count: usize,
    pub blocks: Vec<String>,
    pub error_count: usize,
    pub hint_count: usize,
    pub items: Vec<ItemSummary>,
}

/// Summarizes every item in vertical order.
pub fn summarize(container: &ValueItemContainer) -> ContainerSummary {
    let items: Vec<ItemSummary> = container
        .sorted_value_items()
        .into_iter()
        .map(ItemSummary::from_item)
        .collect();
    let count = |status: ValueItemStatus| {
        items
            .iter()
            .filter(|item| item.status.contains(&status))
            .count()
    };
    ContainerSummary {
        item_count: items.len(),
        blocks: container
            .block_names()
            .into_iter()
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect(),
        error_count: count(ValueItemStatus::HasError),
        hint_count: count(ValueItemStatus::HasHint),
        items,
    }
}

/// Kind of problem found by [`check_container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value is not admitted by the cell's type format.
    NotAllowed,
    /// Another row of the exclusive selection column holds the same value.
    DuplicateExclusiveValue,
    /// The constant sum column is missing or not numeric.
    InvalidConstantSumColumn,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::NotAllowed => "value not allowed",
            ViolationKind::DuplicateExclusiveValue => "duplicate exclusive value",
            ViolationKind::InvalidConstantSumColumn => "invalid constant sum column",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cell that breaks a rule of its item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub item: String,
    pub row: usize,
    pub column: usize,
    pub value: String,
    pub data_type: DataType,
    pub kind: ViolationKind,
}

/// Result of `check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub checked_items: usize,
    pub checked_cells: usize,
    pub violations: Vec<Violation>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks every cell against its format and the column rules of its item.
///
/// Items are visited in vertical order and cells row by row, so the report
/// order is stable across runs.
pub fn check_container(container: &ValueItemContainer) -> CheckReport {
    let mut report = CheckReport::default();
    for item in container.sorted_value_items() {
        report.checked_items += 1;
        check_item(item, &mut report);
    }
    debug!(
        items = report.checked_items,
        cells = report.checked_cells,
        violations = report.violations.len(),
        "Checked container"
    );
    report
}

fn check_item(item: &ValueItem, report: &mut CheckReport) {
    let Some(matrix) = item.matrix() else {
        return;
    };
    let exclusive = item.exclusive_selection_text_column();
    let mut exclusive_values = HashSet::new();

    for (row, cells) in matrix.rows().enumerate() {
        for (column, cell) in cells.iter().enumerate() {
            report.checked_cells += 1;
            let kind = if !cell.type_format().is_value_allowed(cell.value()) {
                Some(ViolationKind::NotAllowed)
            } else if exclusive == Some(column) && !exclusive_values.insert(cell.value()) {
                Some(ViolationKind::DuplicateExclusiveValue)
            } else {
                None
            };
            if let Some(kind) = kind {
                report.violations.push(Violation {
                    item: item.name().to_string(),
                    row,
                    column,
                    value: cell.value().to_string(),
                    data_type: cell.type_format().data_type(),
                    kind,
                });
            }
        }
    }

    if let Some(column) = item.constant_sum_column()
        && !item.check_constant_sum_column()
    {
        let cell = matrix.get(0, column);
        report.violations.push(Violation {
            item: item.name().to_string(),
            row: 0,
            column,
            value: cell.map(|cell| cell.value().to_string()).unwrap_or_default(),
            data_type: cell.map_or(DataType::Text, |cell| cell.type_format().data_type()),
            kind: ViolationKind::InvalidConstantSumColumn,
        });
    }
}
