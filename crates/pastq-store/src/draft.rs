//! Draft/list cache.
//!
//! An ordered list of records (newest first) persisted as JSON, used both as
//! a staging area for unpublished drafts and as a cache of the last fetched
//! server list. Duplicates are allowed. Parse failures reset to an empty
//! list; write failures warn without failing the operation.

use std::path::{Path, PathBuf};

use pastq_core::{AppError, PastQuestion};

/// Canonical state file. Earlier iterations of the admin page used a
/// versioned key; that file is migrated once and then ignored.
pub const DRAFT_FILE: &str = "drafts.json";
pub const LEGACY_DRAFT_FILE: &str = "drafts-v1.json";

#[derive(Debug)]
pub struct DraftStore {
    path: PathBuf,
    items: Vec<PastQuestion>,
}

impl DraftStore {
    /// Load the cache from the state directory, migrating the legacy file
    /// when the canonical one does not exist yet.
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(DRAFT_FILE);

        let items = match Self::load_file(&path) {
            Some(items) => items,
            None => {
                let legacy = Self::load_file(&state_dir.join(LEGACY_DRAFT_FILE));
                match legacy {
                    Some(items) => {
                        let store = Self {
                            path: path.clone(),
                            items,
                        };
                        store.save();
                        return store;
                    }
                    None => Vec::new(),
                }
            }
        };

        Self { path, items }
    }

    fn load_file(path: &Path) -> Option<Vec<PastQuestion>> {
        let text = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Vec<PastQuestion>>(&text) {
            Ok(items) => Some(items.into_iter().map(PastQuestion::normalized).collect()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "draft cache unreadable, resetting");
                Some(Vec::new())
            }
        }
    }

    pub fn items(&self) -> &[PastQuestion] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prepend a new draft: normalized, unsaved (no id), no stored file yet.
    pub fn add(&mut self, mut record: PastQuestion) {
        record.id = None;
        record.file_url.clear();
        record.created_at = None;
        self.items.insert(0, record.normalized());
        self.save();
    }

    pub fn remove(&mut self, index: usize) -> Option<PastQuestion> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.save();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.save();
    }

    /// Replace the whole cache with the server's list. Destructive for any
    /// unsaved drafts; callers must check [`unsaved_count`](Self::unsaved_count)
    /// and get confirmation first.
    pub fn replace_with_live(&mut self, items: Vec<PastQuestion>) {
        self.items = items.into_iter().map(PastQuestion::normalized).collect();
        self.save();
    }

    /// Records that were never uploaded (no server id).
    pub fn unsaved_count(&self) -> usize {
        self.items.iter().filter(|r| r.is_draft()).count()
    }

    /// Records missing a real level/semester classification.
    pub fn unsorted_count(&self) -> usize {
        self.items.iter().filter(|r| !r.is_classified()).count()
    }

    /// Serialize the cache for export.
    pub fn export_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }

    /// Parse an exported/imported JSON array into normalized records.
    pub fn import_json(text: &str) -> Result<Vec<PastQuestion>, AppError> {
        let items: Vec<PastQuestion> = serde_json::from_str(text)?;
        Ok(items.into_iter().map(PastQuestion::normalized).collect())
    }

    fn save(&self) {
        let json = match serde_json::to_vec_pretty(&self.items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize draft cache");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist draft cache");
        }
    }
}
