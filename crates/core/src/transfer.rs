//! Moving items between two inventories.

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{InventoryError, Result},
    inventory::{Entry, Inventory, MatchPolicy},
};

/// Outcome of a successful [`transfer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// Item id that moved.
    pub id: String,
    /// Quantity that left the source.
    pub moved: u32,
    /// Index in the source the quantity was taken from.
    pub source_index: usize,
}

/// Move up to `amount` of `id` from `source` to `destination`.
///
/// The source entry is picked with a strict match on `data`, so a request
/// without payload never moves a unit that carries one. Stacks are clamped to
/// what the matched entry holds; a unit moves one entry per call.
///
/// Both sides are validated before either is mutated: the destination must
/// know `id` and have room for the moved amount, and the source must hold a
/// match. Otherwise nothing changes.
pub fn transfer(
    source: &mut Inventory,
    destination: &mut Inventory,
    id: &str,
    amount: u32,
    data: Option<&Value>,
) -> Result<Transfer> {
    destination.definition(id)?;
    let data = data.filter(|value| !value.is_null());

    let index = source
        .find_with(id, data, MatchPolicy::Strict)
        .first()
        .ok_or_else(|| InventoryError::ItemNotFound {
            id: id.to_string(),
            data: data.cloned(),
        })?;

    let entry = source.get(index)?.clone();
    let moved = match &entry {
        Entry::Stack { amount: held, .. } => amount.min(*held),
        Entry::Unit { .. } => amount.min(1),
    };
    if moved == 0 {
        return Ok(Transfer {
            id: id.to_string(),
            moved,
            source_index: index,
        });
    }
    destination.check_add(id, moved)?;

    source.remove_at(index, moved)?;
    destination.add(id, moved, entry.data().cloned())?;

    debug!("transferred {moved} x '{id}' from index {index}");
    Ok(Transfer {
        id: id.to_string(),
        moved,
        source_index: index,
    })
}
