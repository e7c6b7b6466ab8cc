//! Validation modules

pub mod contact;
pub mod upload;

pub use contact::{is_valid_email, validate_contact, ContactForm, MIN_MESSAGE_LENGTH};
pub use upload::{validate_member_photo, validate_upload_path, MAX_PHOTO_BYTES};
