//! Run artifacts: the JSON report plus an artifact index that pins the log
//! and report by SHA-256.

use std::path::{Path, PathBuf};

use crate::differential::DiffReport;
use crate::error::HarnessError;
use crate::structured_log::ArtifactIndex;

/// Writes `report` as pretty JSON to `report_path` and an artifact index
/// next to it (`<report>.index.json`). Returns the index path.
pub fn write_run_artifacts(
    report: &DiffReport,
    report_path: &Path,
    log_path: Option<&Path>,
) -> Result<PathBuf, HarnessError> {
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(report)?)?;

    let mut index = ArtifactIndex::new(&report.run_id);
    index.add_file(report_path, "report")?;
    if let Some(log) = log_path {
        index.add_file(log, "log")?;
    }

    let index_path = report_path.with_extension("index.json");
    std::fs::write(&index_path, index.to_json()?)?;
    Ok(index_path)
}
