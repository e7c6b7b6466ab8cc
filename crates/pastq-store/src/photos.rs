//! Local-only member photo store.
//!
//! The council-member page lets an editor attach a photo per member card
//! without touching the network: the image is validated, capped, and kept
//! as a base64 data URL keyed by the card's photo key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use pastq_core::validation::validate_member_photo;
use pastq_core::AppError;

const PHOTO_FILE: &str = "photos.json";

#[derive(Debug)]
pub struct PhotoStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

fn mime_for(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

impl PhotoStore {
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(PHOTO_FILE);
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Validate and store a photo for `key` as a data URL. The preview (the
    /// in-memory entry) survives even when persisting fails.
    pub fn set(&mut self, key: &str, image: &Path) -> Result<(), AppError> {
        let name = image
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let size = std::fs::metadata(image)
            .map_err(|_| AppError::InvalidInput(format!("File not found: {}", image.display())))?
            .len();
        validate_member_photo(name, None, size)?;

        let bytes = std::fs::read(image)
            .map_err(|e| AppError::InvalidInput(format!("Failed to read {}: {}", image.display(), e)))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let data_url = format!("data:{};base64,{}", mime_for(name), encoded);

        self.entries.insert(key.to_string(), data_url);
        self.save();
        Ok(())
    }

    /// Remove a stored photo. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.save();
        }
        removed
    }

    fn save(&self) {
        let json = match serde_json::to_vec_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize photo store");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist photos");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastq_core::validation::MAX_PHOTO_BYTES;

    #[test]
    fn test_set_get_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("member-1.png");
        std::fs::write(&photo, b"\x89PNG fake bytes").unwrap();

        let mut store = PhotoStore::open(dir.path());
        store.set("lsrc-member-1", &photo).unwrap();

        let url = store.get("lsrc-member-1").unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        // Survives reload.
        let store = PhotoStore::open(dir.path());
        assert!(store.get("lsrc-member-1").is_some());

        let mut store = PhotoStore::open(dir.path());
        assert!(store.remove("lsrc-member-1"));
        assert!(!store.remove("lsrc-member-1"));
        assert!(store.get("lsrc-member-1").is_none());
    }

    #[test]
    fn test_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("paper.pdf");
        std::fs::write(&doc, b"%PDF").unwrap();

        let mut store = PhotoStore::open(dir.path());
        let err = store.set("k", &doc).unwrap_err();
        assert_eq!(err.client_message(), "Please select an image file.");
    }

    #[test]
    fn test_rejects_oversize_images() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.jpg");
        std::fs::write(&big, vec![0u8; (MAX_PHOTO_BYTES + 1) as usize]).unwrap();

        let mut store = PhotoStore::open(dir.path());
        let err = store.set("k", &big).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
