//! Error taxonomy for catalog construction and inventory operations.

use serde_json::Value;
use thiserror::Error;

/// Raised when a catalog source cannot be turned into item definitions.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog root was not a JSON object keyed by item id.
    #[error("catalog root must be an object keyed by item id, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A single definition could not be decoded.
    #[error("malformed definition for item '{id}': {source}")]
    MalformedEntry {
        /// Item id of the broken definition.
        id: String,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reported by inventory operations. None of them leave the
/// collection partially mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    /// The id does not resolve in the catalog.
    #[error("unknown item '{id}'")]
    UnknownItem {
        /// Requested item id.
        id: String,
    },

    /// An index-addressed operation was out of bounds.
    #[error("index {index} out of range for inventory of {len} entries")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of entries at the time of the call.
        len: usize,
    },

    /// A stack would exceed the largest representable amount.
    #[error("stack of '{id}' holding {held} cannot take {added} more")]
    StackOverflow {
        /// Item id of the stack.
        id: String,
        /// Amount already in the stack.
        held: u64,
        /// Amount that did not fit.
        added: u64,
    },

    /// A transfer found nothing matching the request in the source.
    #[error("no item '{id}'{} found", describe_data(.data))]
    ItemNotFound {
        /// Requested item id.
        id: String,
        /// Requested payload, if any.
        data: Option<Value>,
    },
}

fn describe_data(data: &Option<Value>) -> String {
    match data {
        Some(value) => format!(" with data {value}"),
        None => String::new(),
    }
}

/// Result alias for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
