//! Hit table export (CSV/JSON).

use anyhow::{Context, Result};
use std::path::Path;

use screener_core::domain::HitReport;

/// Render the hit table as CSV: `symbol` plus the strategy's detail columns.
pub fn hits_csv(report: &HitReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(report.columns())?;

    for entry in report {
        let mut row = vec![entry.symbol.clone()];
        row.extend(entry.details.values());
        wtr.write_record(&row)?;
    }

    let bytes = wtr.into_inner().context("Failed to flush hits CSV")?;
    String::from_utf8(bytes).context("Hits CSV is not UTF-8")
}

pub fn write_hits_csv(path: &Path, report: &HitReport) -> Result<()> {
    std::fs::write(path, hits_csv(report)?)
        .with_context(|| format!("Failed to write hits CSV {}", path.display()))?;
    Ok(())
}

pub fn write_hits_json(path: &Path, report: &HitReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize hit report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write hits JSON {}", path.display()))?;
    Ok(())
}
