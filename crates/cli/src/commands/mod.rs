//! Command implementations.
//!
//! Each handler returns serializable values; `main` renders them as JSON lines.

pub mod lookup;
pub mod purge;
pub mod validate;

pub use lookup::LookupArgs;
pub use validate::ValidateArgs;

use serde::Serialize;

use crate::error::CliError;

/// Render each item as a single-line JSON document.
pub fn to_json_lines<T: Serialize>(items: &[T]) -> Result<Vec<String>, CliError> {
    items.iter().map(|item| serde_json::to_string(item).map_err(CliError::from)).collect()
}
