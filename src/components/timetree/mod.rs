pub mod models;
pub mod time;

pub use models::{TimeTreeEvent, TimeTreeExport};

use crate::error::{Error, MigrateResult};
use std::fs;
use std::path::Path;
use tracing::info;

/// Read and parse a TimeTree export file
pub fn load_export(path: &Path) -> MigrateResult<TimeTreeExport> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Input(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let export = parse_export(&content)
        .map_err(|e| Error::Input(format!("{}: {}", path.display(), e)))?;

    info!("Loaded {} events from {}", export.events.len(), path.display());
    Ok(export)
}

/// Parse TimeTree export JSON
pub fn parse_export(content: &str) -> Result<TimeTreeExport, serde_json::Error> {
    serde_json::from_str(content)
}
