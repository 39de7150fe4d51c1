use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use mfsim_cli::report::{CheckReport, ContainerSummary, ItemSummary, ViolationKind};

pub fn print_inventory(summary: &ContainerSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Display name"),
        header_cell("Block"),
        header_cell("Type"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Position"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for item in &summary.items {
        table.add_row(vec![
            name_cell(item),
            Cell::new(&item.display_name),
            text_or_dash(&item.block),
            Cell::new(item.basic_type.as_str()),
            Cell::new(item.rows),
            Cell::new(item.columns),
            Cell::new(item.vertical_position),
            status_cell(item),
        ]);
    }
    println!("{table}");
    println!(
        "{} items in {} blocks, {} with errors, {} with hints",
        summary.item_count,
        summary.blocks.len(),
        summary.error_count,
        summary.hint_count
    );
}

pub fn print_check_report(report: &CheckReport) {
    if report.is_clean() {
        println!(
            "OK: {} cells in {} items",
            report.checked_cells, report.checked_items
        );
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Item"),
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Value"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for violation in &report.violations {
        table.add_row(vec![
            Cell::new(&violation.item),
            Cell::new(violation.row),
            Cell::new(violation.column),
            dim_cell(violation.data_type.as_str()),
            Cell::new(&violation.value),
            kind_cell(violation.kind),
        ]);
    }
    println!("{table}");
    println!(
        "{} violations in {} cells",
        report.violations.len(),
        report.checked_cells
    );
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() == 8 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(15)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(item: &ItemSummary) -> Cell {
    if item.is_displayed {
        Cell::new(&item.name)
    } else {
        Cell::new(format!("({})", item.name)).fg(Color::DarkGrey)
    }
}

fn status_cell(item: &ItemSummary) -> Cell {
    let label = item.status_label();
    if item.status.is_empty() {
        dim_cell(label)
    } else if label.contains("ERROR") {
        Cell::new(label).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        Cell::new(label).fg(Color::Yellow)
    }
}

fn kind_cell(kind: ViolationKind) -> Cell {
    match kind {
        ViolationKind::NotAllowed => Cell::new(kind).fg(Color::Red),
        ViolationKind::DuplicateExclusiveValue | ViolationKind::InvalidConstantSumColumn => {
            Cell::new(kind).fg(Color::Yellow)
        }
    }
}

fn text_or_dash(text: &str) -> Cell {
    if text.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(text)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
