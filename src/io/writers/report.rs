use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// Write `report` as pretty JSON to `path`.
pub fn write_json_report<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    let json_string = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json_string)?;
    info!("Created batch report: {:?}", path);
    Ok(())
}
