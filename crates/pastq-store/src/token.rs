//! Bearer-token store.
//!
//! One canonical `token` file under the state directory. Reads fall back to
//! the empty string; writes warn and carry on, matching the original's
//! swallow-everything localStorage access.

use std::path::{Path, PathBuf};

const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn open(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(TOKEN_FILE),
        }
    }

    /// The persisted token, or empty string when absent/unreadable.
    pub fn get(&self) -> String {
        match std::fs::read_to_string(&self.path) {
            Ok(token) => token.trim().to_string(),
            Err(_) => String::new(),
        }
    }

    /// Persist the token; an empty token clears it.
    pub fn set(&self, token: &str) {
        let token = token.trim();
        let result = if token.is_empty() {
            match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            }
        } else {
            std::fs::write(&self.path, token)
        };

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist token");
        }
    }

    pub fn clear(&self) {
        self.set("");
    }
}
