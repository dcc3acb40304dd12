//! Terminal tables for clean plans and session audit logs.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rds_core::TableSession;
use rds_transform::{CleanOperation, CleanPlan};

/// One row per plan step, in execution order.
pub fn plan_table(plan: &CleanPlan) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Operation"),
        header_cell("Argument"),
        header_cell("Step"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, step) in plan.iter().enumerate() {
        let argument = match &step.operation {
            CleanOperation::ToDate {
                output_format: Some(format),
            } => Cell::new(format),
            _ => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&step.field).fg(Color::Blue),
            Cell::new(step.operation.name()),
            argument,
            Cell::new(step.operation.step_label()),
        ]);
    }
    table
}

/// Row counts at each audit snapshot plus the removed-row total.
pub fn audit_table(session: &TableSession) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Field"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in session.audit_log() {
        table.add_row(vec![
            Cell::new(entry.label()),
            entry.field().map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(entry.row_count()),
        ]);
    }
    let removed = session.removed().row_count();
    let removed_cell = if removed > 0 {
        Cell::new(removed).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        dim_cell(removed)
    };
    table.add_row(vec![
        Cell::new("Removed")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        removed_cell,
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
