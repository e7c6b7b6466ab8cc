//! Upload preflight checks, performed before any request is built.

use std::path::Path;

use crate::error::AppError;
use crate::models::Format;

/// Soft cap for locally stored member photos (base64 bloat makes larger
/// images exceed the persisted-state budget).
pub const MAX_PHOTO_BYTES: u64 = 3 * 1024 * 1024 / 2;

/// An upload needs an existing regular file; without one no request is made.
pub fn validate_upload_path(path: &Path) -> Result<(), AppError> {
    if path.as_os_str().is_empty() {
        return Err(AppError::InvalidInput("Choose a file first.".to_string()));
    }
    let meta = std::fs::metadata(path).map_err(|_| {
        AppError::InvalidInput(format!("File not found: {}", path.display()))
    })?;
    if !meta.is_file() {
        return Err(AppError::InvalidInput(format!(
            "Not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Member photos are images only and capped at [`MAX_PHOTO_BYTES`].
pub fn validate_member_photo(name: &str, mime: Option<&str>, size: u64) -> Result<(), AppError> {
    match Format::infer(mime, name) {
        Some(Format::Image) => {}
        _ => {
            return Err(AppError::InvalidInput(
                "Please select an image file.".to_string(),
            ))
        }
    }
    if size > MAX_PHOTO_BYTES {
        return Err(AppError::PayloadTooLarge(
            "Image too large. Please use an image under ~1.5MB.".to_string(),
        ));
    }
    Ok(())
}
