use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fittsforge::layouts::Layout;
use fittsforge::optimizer::AnnealResult;
use fittsforge::scorer::CostRecord;

/// Groups symbols into rows by their y coordinate, each row sorted by x.
pub fn layout_rows(layout: &Layout) -> Vec<Vec<char>> {
    let mut rows: Vec<(f64, Vec<char>)> = Vec::new();
    for (symbol, pos) in layout.reading_order() {
        match rows.last_mut() {
            Some((y, row)) if *y == pos.y => row.push(symbol),
            _ => rows.push((pos.y, vec![symbol])),
        }
    }
    rows.into_iter().map(|(_, row)| row).collect()
}

pub fn print_layout_grid(name: &str, layout: &Layout) {
    println!("\nLayout: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for row in layout_rows(layout) {
        let cells: Vec<Cell> = row
            .iter()
            .map(|c| Cell::new(c.to_string()).set_alignment(CellAlignment::Center))
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn print_cost_report(results: &[(String, CostRecord)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Digraph"),
        Cell::new("Letter"),
        Cell::new("Total").fg(Color::Cyan),
    ]);

    for i in 1..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, r) in results {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.6}", r.digraph_cost)),
            Cell::new(format!("{:.6}", r.letter_cost)),
            Cell::new(format!("{:.6}", r.total_cost)).fg(Color::Cyan),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_run_summary(result: &AnnealResult, breakdown: &CostRecord) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let ratio = if result.total_moves > 0 {
        result.accepted_moves as f64 / result.total_moves as f64
    } else {
        0.0
    };

    table.add_row(vec![Cell::new("Best cost"), Cell::new(format!("{:.6}", result.best_cost))]);
    table.add_row(vec![
        Cell::new("Digraph / Letter"),
        Cell::new(format!(
            "{:.6} / {:.6}",
            breakdown.digraph_cost, breakdown.letter_cost
        )),
    ]);
    table.add_row(vec![
        Cell::new("Temperature steps"),
        Cell::new(result.outer_steps.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Moves (accepted)"),
        Cell::new(format!(
            "{} ({:.2}%)",
            result.total_moves,
            ratio * 100.0
        )),
    ]);
    if result.cancelled {
        table.add_row(vec![Cell::new("Stopped early"), Cell::new("yes").fg(Color::Yellow)]);
    }
    if result.io_failures > 0 {
        table.add_row(vec![
            Cell::new("Failed log writes"),
            Cell::new(result.io_failures.to_string()).fg(Color::Red),
        ]);
    }
    println!("\n{}", table);
}
