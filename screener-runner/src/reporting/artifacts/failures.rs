//! Failure log export (CSV).

use anyhow::{Context, Result};
use std::path::Path;

use screener_core::engine::SymbolFailure;

pub fn write_failures_csv(path: &Path, failures: &[SymbolFailure]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create failures CSV {}", path.display()))?;
    wtr.write_record(["index", "symbol", "kind", "error"])?;

    for failure in failures {
        wtr.write_record([
            failure.index.to_string(),
            failure.symbol.clone(),
            failure.error.kind().to_string(),
            failure.error.to_string(),
        ])?;
    }

    wtr.flush()
        .with_context(|| format!("Failed to flush failures CSV {}", path.display()))?;
    Ok(())
}
