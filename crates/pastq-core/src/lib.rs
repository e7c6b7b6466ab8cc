//! Pastq Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared by the past-question API client, the local stores, and
//! the CLI.

pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod slug;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
pub use filter::{Filters, Highlight};
pub use models::{Admin, Format, PastQuestion, UNKNOWN, UNSORTED};
pub use slug::to_kebab;
