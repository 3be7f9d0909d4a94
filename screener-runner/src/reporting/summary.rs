//! Console summary of a finished run.

use std::fmt::Write;

use crate::runner::ScreenRun;

/// Render the hit table plus run counters as plain text.
///
/// Column widths adapt to the longest cell; numbers are right-aligned.
pub fn render_summary(run: &ScreenRun) -> String {
    let report = &run.report;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "strategy {}  run {}  {} symbols, {} hits, {} failed ({:.1}s)",
        report.strategy(),
        run.run_id,
        report.attempted(),
        report.len(),
        report.failed(),
        run.duration_secs,
    );

    if report.is_empty() {
        let _ = writeln!(out, "no hits");
        return out;
    }

    let header: Vec<String> = report.columns().iter().map(|c| c.to_string()).collect();
    let rows: Vec<Vec<String>> = report
        .entries()
        .iter()
        .map(|e| {
            let mut row = vec![e.symbol.clone()];
            row.extend(e.details.values());
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let _ = writeln!(out);
    write_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i == 0 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}
