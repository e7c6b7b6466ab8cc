//! Static catalog snapshot fallback.
//!
//! When the remote list endpoint is unreachable (or returns garbage), the
//! public catalog falls back to a same-origin `resources.json` file and
//! filters client-side. The snapshot uses `url` for the file location; the
//! record type accepts it as an alias of `file_url`.

use std::path::Path;

use pastq_core::{AppError, PastQuestion};

/// Read and normalize the snapshot file.
pub fn read_snapshot(path: &Path) -> Result<Vec<PastQuestion>, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| AppError::NotFound(format!("Could not load {}", path.display())))?;

    let items: Vec<PastQuestion> = serde_json::from_str(&text)
        .map_err(|e| AppError::InvalidInput(format!("Invalid snapshot JSON: {}", e)))?;

    Ok(items.into_iter().map(PastQuestion::normalized).collect())
}
