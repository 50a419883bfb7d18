use std::fs;
use std::path::Path;

use crate::error::{ProbeError, Result};
use crate::testing::RunReport;

/// Write `report` as pretty JSON, creating parent directories as needed.
pub fn save_report(report: &RunReport, path: &Path) -> Result<()> {
    let report_error = |reason: String| ProbeError::Report {
        path: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| report_error(format!("Failed to create directory: {e}")))?;
    }

    let raw = serde_json::to_string_pretty(report)
        .map_err(|e| report_error(format!("Failed to serialize report: {e}")))?;
    fs::write(path, raw).map_err(|e| report_error(e.to_string()))
}
