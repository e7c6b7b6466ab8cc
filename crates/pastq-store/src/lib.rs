//! Local persistence for the past-question client.
//!
//! The browser original kept everything in localStorage; here the same
//! state lives as files under one state directory: the admin bearer token,
//! the draft/list cache, and the local-only member photos. All stores share
//! the storage error policy: reads degrade to empty state, writes degrade
//! to a warning, and in-memory state always reflects the operation.

pub mod draft;
pub mod photos;
pub mod token;

use std::path::{Path, PathBuf};

use pastq_core::AppError;

pub use draft::DraftStore;
pub use photos::PhotoStore;
pub use token::TokenStore;

/// Resolve (and create) the state directory. An explicit override wins;
/// otherwise the platform data directory is used.
pub fn state_dir(override_dir: Option<&Path>) -> Result<PathBuf, AppError> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => directories::ProjectDirs::from("", "", "pastq")
            .ok_or_else(|| AppError::Storage("No home directory for state".to_string()))?
            .data_dir()
            .to_path_buf(),
    };

    std::fs::create_dir_all(&dir).map_err(|e| {
        AppError::Storage(format!(
            "Failed to create state directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_override_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/state");
        let resolved = state_dir(Some(&nested)).unwrap();
        assert_eq!(resolved, nested);
        assert!(nested.is_dir());
    }
}
