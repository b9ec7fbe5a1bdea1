//! CSV export of a batch's trend window.
//!
//! Writes the window contents as delimited rows so operators can pull a
//! batch's recent history into a spreadsheet. Column order matches the
//! backend's own export endpoint.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use super::store::BatchRecord;

const CSV_HEADER: &str = "timestamp,ph,temperature,co2,ideal_ph,ideal_temperature,ideal_co2";

/// Render a batch's window as CSV, header first, oldest row first.
pub fn window_to_csv(record: &BatchRecord) -> String {
    let mut out = String::with_capacity(64 * (record.window.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for m in record.window.iter() {
        // Infallible for String targets
        let _ = writeln!(
            out,
            "{:.2},{:.3},{:.2},{:.2},{:.3},{:.2},{:.2}",
            m.timestamp,
            m.actual.ph,
            m.actual.temperature,
            m.actual.co2,
            m.ideal.ph,
            m.ideal.temperature,
            m.ideal.co2,
        );
    }
    out
}

/// Write a batch's window to `fermwatch-batch-<id>-<time>.csv` under `dir`.
///
/// Returns the path written so the caller can show it to the user.
pub fn export_window(record: &BatchRecord, dir: &Path) -> Result<PathBuf> {
    let filename = format!(
        "fermwatch-batch-{}-{}.csv",
        record.id,
        Local::now().format("%Y%m%d-%H%M%S")
    );
    let path = dir.join(filename);

    fs::write(&path, window_to_csv(record))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
