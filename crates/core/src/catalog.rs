//! Static item catalog keyed by item id.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;

/// Immutable description of one item kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDefinition {
    /// Unique catalog key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form category such as `food` or `weapon`.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Quality tier label.
    pub quality: String,
    /// Examine text.
    pub examine: String,
    /// Whether additions merge into a single counted stack.
    pub stackable: bool,
    /// Healing value for consumables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
}

impl ItemDefinition {
    /// Healing value, zero when the definition carries none.
    pub fn food_health(&self) -> f64 {
        self.health.unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    item_type: String,
    #[serde(default)]
    quality: String,
    #[serde(default)]
    examine: String,
    #[serde(default)]
    stackable: bool,
    #[serde(default)]
    health: Option<f64>,
}

/// Read-only mapping from item id to [`ItemDefinition`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<String, ItemDefinition>,
}

impl Catalog {
    /// Build a catalog from an already parsed JSON object.
    pub fn from_value(raw: Value) -> std::result::Result<Self, CatalogError> {
        let object = match raw {
            Value::Object(object) => object,
            other => {
                return Err(CatalogError::NotAnObject {
                    found: json_type_name(&other),
                })
            }
        };

        let mut items = HashMap::with_capacity(object.len());
        for (id, value) in object {
            let raw: RawDefinition = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(source) => return Err(CatalogError::MalformedEntry { id, source }),
            };
            let definition = ItemDefinition {
                id: id.clone(),
                name: raw.name,
                item_type: raw.item_type,
                quality: raw.quality,
                examine: raw.examine,
                stackable: raw.stackable,
                health: raw.health,
            };
            items.insert(id, definition);
        }

        Ok(Self { items })
    }

    /// Read and parse a catalog file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let raw: Value = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse catalog {}", path.display()))?;
        let catalog = Self::from_value(raw)
            .with_context(|| format!("invalid catalog {}", path.display()))?;
        Ok(catalog)
    }

    /// Definition for `id`, if the catalog knows it.
    pub fn lookup(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Whether `id` resolves.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Known ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.items.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> Value {
        json!({
            "strawberry": {
                "name": "Strawberry",
                "type": "food",
                "quality": "common",
                "examine": "A juicy red berry.",
                "stackable": true,
                "health": 5
            },
            "wooden_stick": {
                "name": "Wooden Stick",
                "type": "weapon",
                "quality": "poor",
                "examine": "Better than nothing.",
                "stackable": false
            }
        })
    }

    #[test]
    fn builds_definitions_keyed_by_id() {
        let catalog = Catalog::from_value(sample()).expect("catalog should load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ids(), vec!["strawberry", "wooden_stick"]);

        let berry = catalog.lookup("strawberry").expect("strawberry defined");
        assert_eq!(berry.id, "strawberry");
        assert_eq!(berry.item_type, "food");
        assert!(berry.stackable);
        assert_eq!(berry.food_health(), 5.0);

        let stick = catalog.lookup("wooden_stick").expect("stick defined");
        assert!(!stick.stackable);
        assert_eq!(stick.food_health(), 0.0);
    }

    #[test]
    fn unknown_id_is_absent_not_an_error() {
        let catalog = Catalog::from_value(sample()).expect("catalog should load");
        assert!(catalog.lookup("dragon_scimitar").is_none());
        assert!(!catalog.contains("dragon_scimitar"));
    }

    #[test]
    fn missing_fields_are_tolerated() {
        let catalog = Catalog::from_value(json!({ "useless_dust": {} })).expect("catalog");
        let dust = catalog.lookup("useless_dust").expect("dust defined");
        assert_eq!(dust.name, "");
        assert!(!dust.stackable);
        assert!(dust.health.is_none());
    }

    #[test]
    fn rejects_structural_failures() {
        let err = Catalog::from_value(json!(["strawberry"])).unwrap_err();
        assert!(matches!(err, CatalogError::NotAnObject { found: "array" }));

        let err = Catalog::from_value(json!({ "broken": "not an object" })).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedEntry { ref id, .. } if id == "broken"));
    }

    #[test]
    fn loads_from_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("itemsdb.json");
        fs::write(&path, serde_json::to_vec_pretty(&sample())?)?;

        let catalog = Catalog::from_path(&path)?;
        assert!(catalog.contains("wooden_stick"));

        fs::write(&path, "{ not json")?;
        assert!(Catalog::from_path(&path).is_err());
        Ok(())
    }
}
