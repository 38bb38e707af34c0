use std::path::Path;

use crate::models::SpotFleetDocument;

/// Pretty-printed JSON with 2-space indentation, as copied or downloaded.
pub fn render_pretty(doc: &SpotFleetDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

pub fn write_document(path: &Path, doc: &SpotFleetDocument) -> Result<(), std::io::Error> {
    std::fs::write(path, render_pretty(doc)?)?;
    tracing::info!(path = %path.display(), "Wrote Spot Fleet configuration");
    Ok(())
}
