//! Core snippet record types and catalog primitives.

mod merge;
mod types;
mod validate;

pub use merge::{apply_overrides, fold_records, merge_catalog};
pub use types::*;
pub use validate::{ValidationError, validate_catalog, validate_record};
