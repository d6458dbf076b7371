//! Ordered item collection bound to a catalog.

mod entry;
mod matching;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, ItemDefinition},
    error::{InventoryError, Result},
};

pub use entry::{Entry, RawEntry};
pub use matching::{deep_equal, FindReport, MatchPolicy, Matches};

/// Collection engine owning an ordered sequence of entries.
///
/// Insertion order is meaningful: indices address entries directly and
/// id-based removal always consumes the earliest matches first. Every
/// operation either completes or fails before touching `entries`.
#[derive(Debug, Clone)]
pub struct Inventory {
    catalog: Arc<Catalog>,
    entries: Vec<Entry>,
}

impl Inventory {
    /// Empty inventory bound to `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            entries: Vec::new(),
        }
    }

    /// Build an inventory from raw entries, resolving each against the catalog.
    ///
    /// Stack entries with a non-positive amount are dropped and repeated stacks
    /// of one id are folded into the first, so the loaded collection satisfies
    /// the same invariants `add` maintains. Amounts that do not fit a stack
    /// fail with [`InventoryError::StackOverflow`].
    pub fn load(catalog: Arc<Catalog>, items: Vec<RawEntry>) -> Result<Self> {
        let mut inventory = Self::new(catalog);
        for raw in items {
            let stackable = inventory.definition(&raw.id)?.stackable;
            if !stackable {
                let data = raw.data.filter(|value| !value.is_null());
                inventory.entries.push(Entry::Unit { id: raw.id, data });
                continue;
            }

            let amount = raw.amount.unwrap_or(1);
            if amount <= 0 {
                warn!("dropping stack of '{}' with amount {amount}", raw.id);
                continue;
            }
            let amount = u32::try_from(amount).map_err(|_| InventoryError::StackOverflow {
                id: raw.id.clone(),
                held: 0,
                added: amount.unsigned_abs(),
            })?;
            if let Some(held) = inventory.stack_mut(&raw.id) {
                warn!("folding repeated stack of '{}' into the first", raw.id);
                *held = stack_total(&raw.id, *held, amount)?;
            } else {
                inventory.entries.push(Entry::Stack { id: raw.id, amount });
            }
        }
        Ok(inventory)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries (not item quantity).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog definition for `id`, or [`InventoryError::UnknownItem`].
    pub fn definition(&self, id: &str) -> Result<&ItemDefinition> {
        self.catalog
            .lookup(id)
            .ok_or_else(|| InventoryError::UnknownItem { id: id.to_string() })
    }

    /// Whether `add(id, amount, ..)` would succeed, without mutating.
    pub fn check_add(&self, id: &str, amount: u32) -> Result<()> {
        let stackable = self.definition(id)?.stackable;
        if !stackable {
            return Ok(());
        }
        let held = self.entries.iter().find_map(|entry| match entry {
            Entry::Stack {
                id: held_id,
                amount,
            } if held_id == id => Some(*amount),
            _ => None,
        });
        match held {
            Some(held) => stack_total(id, held, amount).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Add `amount` of `id`.
    ///
    /// Stackable items merge into the first existing stack of the same id, or
    /// start a new one at the end; `data` is ignored for them. Non-stackable
    /// items append `amount` separate units, each carrying a copy of `data`.
    /// A merge that would overflow the stack fails before anything changes.
    pub fn add(&mut self, id: &str, amount: u32, data: Option<Value>) -> Result<()> {
        let stackable = self.definition(id)?.stackable;
        if amount == 0 {
            return Ok(());
        }
        let data = data.filter(|value| !value.is_null());

        if stackable {
            if data.is_some() {
                debug!("ignoring payload for stackable item '{id}'");
            }
            match self.stack_mut(id) {
                Some(held) => *held = stack_total(id, *held, amount)?,
                None => self.entries.push(Entry::Stack {
                    id: id.to_string(),
                    amount,
                }),
            }
        } else {
            self.entries.extend((0..amount).map(|_| Entry::Unit {
                id: id.to_string(),
                data: data.clone(),
            }));
        }

        debug!("added {amount} x '{id}'");
        Ok(())
    }

    /// Remove `amount` of `id`, earliest entries first.
    ///
    /// Asking for more than exists removes everything that matches and is not
    /// an error.
    pub fn remove(&mut self, id: &str, amount: u32) -> Result<()> {
        let stackable = self.definition(id)?.stackable;
        if amount == 0 {
            return Ok(());
        }

        let targets: Vec<usize> = if stackable {
            let Some(index) = self.entries.iter().position(|entry| entry.id() == id) else {
                return Ok(());
            };
            match &mut self.entries[index] {
                Entry::Stack { amount: held, .. } if *held > amount => {
                    *held -= amount;
                    Vec::new()
                }
                _ => vec![index],
            }
        } else {
            self.entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.id() == id)
                .map(|(index, _)| index)
                .take(amount as usize)
                .collect()
        };

        self.remove_indices(targets);
        debug!("removed up to {amount} x '{id}'");
        Ok(())
    }

    /// Remove `amount` from the entry at `index`.
    ///
    /// A stack shrinks and disappears once it reaches zero; a unit entry is
    /// deleted whatever `amount` says.
    pub fn remove_at(&mut self, index: usize, amount: u32) -> Result<()> {
        let len = self.entries.len();
        let Some(entry) = self.entries.get_mut(index) else {
            warn!("rejected removal at index {index}, inventory holds {len} entries");
            return Err(InventoryError::IndexOutOfRange { index, len });
        };

        let delete = match entry {
            Entry::Stack { amount: held, .. } => {
                if *held > amount {
                    *held -= amount;
                    false
                } else {
                    true
                }
            }
            Entry::Unit { .. } => true,
        };
        if delete {
            self.remove_indices(vec![index]);
        }

        debug!("removed {amount} at index {index}");
        Ok(())
    }

    /// Evaluate loose and strict matches for `id` in one scan.
    ///
    /// An id missing from the catalog yields an empty report. A `null` query
    /// payload counts as no payload, as it does in `add`.
    pub fn find(&self, id: &str, data: Option<&Value>) -> FindReport {
        let data = data.filter(|value| !value.is_null());
        let mut report = FindReport::default();
        if !self.catalog.contains(id) {
            return report;
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.id() != id {
                continue;
            }
            let quantity = entry.quantity();
            if MatchPolicy::Loose.accepts(entry.data(), data) {
                report.loose.record(index, quantity);
            }
            if MatchPolicy::Strict.accepts(entry.data(), data) {
                report.strict.record(index, quantity);
            }
        }
        report
    }

    /// Matches for `id` under a single policy.
    pub fn find_with(&self, id: &str, data: Option<&Value>, policy: MatchPolicy) -> Matches {
        self.find(id, data).into_policy(policy)
    }

    /// Total quantity held of `id`, regardless of payloads.
    pub fn quantity(&self, id: &str) -> u64 {
        self.find(id, None).loose.count
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Result<&Entry> {
        self.entries
            .get(index)
            .ok_or(InventoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Catalog definition of the entry at `index`.
    pub fn definition_at(&self, index: usize) -> Result<&ItemDefinition> {
        let entry = self.get(index)?;
        self.definition(entry.id())
    }

    fn stack_mut(&mut self, id: &str) -> Option<&mut u32> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Stack {
                id: held_id,
                amount,
            } if held_id == id => Some(amount),
            _ => None,
        })
    }

    /// Delete several entries, highest index first so pending indices stay valid.
    fn remove_indices(&mut self, mut indices: Vec<usize>) {
        indices.sort_unstable();
        indices.dedup();
        while let Some(index) = indices.pop() {
            self.entries.remove(index);
        }
    }
}

fn stack_total(id: &str, held: u32, amount: u32) -> Result<u32> {
    held.checked_add(amount)
        .ok_or_else(|| InventoryError::StackOverflow {
            id: id.to_string(),
            held: u64::from(held),
            added: u64::from(amount),
        })
}
