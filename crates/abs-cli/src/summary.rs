use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use abs_model::{Diagnostic, Severity};

use crate::types::{ConceptResult, HarmonizeResult};

/// Diagnostics listed individually before the table is cut off.
const MAX_LISTED_DIAGNOSTICS: usize = 40;

pub fn print_summary(result: &HarmonizeResult) {
    println!("Data: {}", result.data_dir.display());
    match &result.outputs {
        Some(paths) => {
            println!("Assembled: {}", paths.assembled.display());
            println!("Codebook: {}", paths.codebook.display());
            println!("Diagnostics: {}", paths.diagnostics.display());
        }
        None => println!("Dry run: no files written"),
    }
    println!("Registry fingerprint: {}", result.fingerprint);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Wave"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Harmonized"),
        header_cell("Warnings"),
        header_cell("Info"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_warnings = 0usize;
    let mut total_infos = 0usize;
    for wave in &result.waves {
        total_warnings += wave.warnings;
        total_infos += wave.infos;
        table.add_row(vec![
            Cell::new(wave.wave)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(wave.rows),
            Cell::new(wave.columns),
            Cell::new(wave.harmonized),
            count_cell(wave.warnings, Color::Yellow),
            count_cell(wave.infos, Color::Cyan),
        ]);
    }
    // Assembly diagnostics carry no wave.
    let unattributed = result.report.warning_count().saturating_sub(total_warnings);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.total_rows).add_attribute(Attribute::Bold),
        Cell::new(result.total_columns).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(total_warnings + unattributed, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(total_infos, Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_kind_table(result);
    print_diagnostic_table(&result.report.diagnostics);
}

fn print_kind_table(result: &HarmonizeResult) {
    let counts = result.report.by_kind();
    if counts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Diagnostic"),
        header_cell("Severity"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (kind, count) in counts {
        table.add_row(vec![
            Cell::new(kind),
            severity_cell(kind.default_severity()),
            Cell::new(count),
        ]);
    }
    println!();
    println!("{table}");
}

fn print_diagnostic_table(diagnostics: &[Diagnostic]) {
    let warnings: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    if warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Wave"),
        header_cell("Concept"),
        header_cell("Variable"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for diagnostic in warnings.iter().take(MAX_LISTED_DIAGNOSTICS) {
        table.add_row(vec![
            optional_cell(diagnostic.wave.map(|w| w.to_string())),
            optional_cell(diagnostic.concept.clone()),
            optional_cell(diagnostic.variable.clone()),
            Cell::new(&diagnostic.message),
        ]);
    }
    println!();
    println!("Warnings:");
    println!("{table}");
    if warnings.len() > MAX_LISTED_DIAGNOSTICS {
        println!(
            "... {} more in the diagnostics file",
            warnings.len() - MAX_LISTED_DIAGNOSTICS
        );
    }
}

pub fn print_concept(result: &ConceptResult) {
    println!("Concept: {} ({})", result.concept, result.description);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Wave"),
        header_cell("Variable"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Absent"),
        header_cell("Absent %"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in &result.rows {
        let share = if row.rows == 0 {
            0.0
        } else {
            row.absent as f64 * 100.0 / row.rows as f64
        };
        table.add_row(vec![
            Cell::new(row.wave)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_cell(row.variable.clone()),
            if row.status == "available" {
                Cell::new(&row.status).fg(Color::Green)
            } else {
                dim_cell(&row.status)
            },
            Cell::new(row.rows),
            count_cell(row.absent, Color::Yellow),
            Cell::new(format!("{share:.1}")),
        ]);
    }
    println!("{table}");
    print_diagnostic_table(&result.report.diagnostics);
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::Cyan),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
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
