//! Player file persistence.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    catalog::Catalog,
    inventory::{Inventory, RawEntry},
};

/// Serialized player file. Only `items` is interpreted; every other
/// top-level field is carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerFile {
    #[serde(default)]
    items: Vec<RawEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl PlayerFile {
    /// Read a player file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(file)
    }

    /// Read a player file, starting empty when it does not exist yet.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("player file {} missing, starting empty", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the file, refreshing `saved_at`.
    pub fn store(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        self.saved_at = Some(Utc::now());
        let serialised = serde_json::to_vec_pretty(self)?;
        fs::write(path, serialised).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Raw entries as stored.
    pub fn items(&self) -> &[RawEntry] {
        &self.items
    }

    /// Time of the last `store`, if any.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Fields other than `items` and `saved_at`.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Build an inventory from the stored entries.
    pub fn to_inventory(&self, catalog: Arc<Catalog>) -> crate::error::Result<Inventory> {
        Inventory::load(catalog, self.items.clone())
    }

    /// Replace the stored entries with the inventory's current contents.
    pub fn set_items(&mut self, inventory: &Inventory) {
        self.items = inventory.entries().iter().map(RawEntry::from).collect();
    }
}
