//! Domain models

pub mod record;

pub use record::{Admin, Format, PastQuestion, UNKNOWN, UNSORTED};
