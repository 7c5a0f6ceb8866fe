use serde::Serialize;

/// Widest a table cell may grow before it is cut with `...`.
const MAX_CELL: usize = 60;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

fn clip(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL {
        cell.to_string()
    } else {
        let cut: String = cell.chars().take(MAX_CELL - 3).collect();
        format!("{cut}...")
    }
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{cell}{}", " ".repeat(width.saturating_sub(len)))
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.iter().map(|c| clip(c)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        println!("{}", cells.join("  ").trim_end());
    };
    line(headers.iter().zip(&widths).map(|(h, w)| pad(h, *w)).collect());
    line(widths.iter().map(|w| "-".repeat(*w)).collect());
    for row in &rows {
        line(row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect());
    }
}
