//! CSV export of an accumulated scan session.
//!
//! Writes one row per host: address, liveness, and the open-port list
//! joined with `", "`. Trivial by design; the interesting logic lives in
//! the scanner.

use crate::error::{ExportError, ExportResult};
use crate::types::ScanSession;
use std::fs::File;
use std::path::Path;

/// Write a session to a CSV file at `path`.
pub fn write_csv(session: &ScanSession, path: &Path) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["IP", "Status", "Ports"])?;

    for result in &session.results {
        writer.write_record([
            result.addr.to_string(),
            result.liveness.to_string(),
            result.ports_display(),
        ])?;
    }

    writer.flush().map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Render a session as a CSV string (used for stdout export).
pub fn to_csv_string(session: &ScanSession) -> ExportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["IP", "Status", "Ports"])?;

    for result in &session.results {
        writer.write_record([
            result.addr.to_string(),
            result.liveness.to_string(),
            result.ports_display(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
