#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of an inventory. The variant is chosen from the catalog's
/// stackability flag when the entry is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "RawEntry")]
pub enum Entry {
    /// Counted stack of a stackable item. `amount` is always positive.
    Stack { id: String, amount: u32 },
    /// Single non-stackable item with an optional payload.
    Unit { id: String, data: Option<Value> },
}

impl Entry {
    pub fn id(&self) -> &str {
        match self {
            Entry::Stack { id, .. } | Entry::Unit { id, .. } => id,
        }
    }

    /// Quantity this entry contributes to a count: the stack size, or one.
    pub fn quantity(&self) -> u64 {
        match self {
            Entry::Stack { amount, .. } => u64::from(*amount),
            Entry::Unit { .. } => 1,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Entry::Stack { .. } => None,
            Entry::Unit { data, .. } => data.as_ref(),
        }
    }

    /// Payload, or an empty object when the entry carries none.
    pub fn data_or_empty(&self) -> Value {
        self.data()
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// On-disk shape of an entry: `{id, amount}` for stacks, `{id, data?}` for units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RawEntry {
    pub fn stack(id: impl Into<String>, amount: i64) -> Self {
        Self {
            id: id.into(),
            amount: Some(amount),
            data: None,
        }
    }

    pub fn unit(id: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            id: id.into(),
            amount: None,
            data,
        }
    }
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Stack { id, amount } => RawEntry::stack(id, i64::from(amount)),
            Entry::Unit { id, data } => RawEntry::unit(id, data),
        }
    }
}

impl From<&Entry> for RawEntry {
    fn from(entry: &Entry) -> Self {
        entry.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_raw_shape() {
        let stack = Entry::Stack {
            id: "strawberry".to_string(),
            amount: 3,
        };
        assert_eq!(
            serde_json::to_value(&stack).unwrap(),
            json!({"id": "strawberry", "amount": 3})
        );

        let plain = Entry::Unit {
            id: "wooden_stick".to_string(),
            data: None,
        };
        assert_eq!(
            serde_json::to_value(&plain).unwrap(),
            json!({"id": "wooden_stick"})
        );

        let enchanted = Entry::Unit {
            id: "wooden_stick".to_string(),
            data: Some(json!({"bonus_dmg": 1337})),
        };
        assert_eq!(
            serde_json::to_value(&enchanted).unwrap(),
            json!({"id": "wooden_stick", "data": {"bonus_dmg": 1337}})
        );
    }

    #[test]
    fn data_or_empty_defaults_to_object() {
        let plain = Entry::Unit {
            id: "wooden_stick".to_string(),
            data: None,
        };
        assert_eq!(plain.data_or_empty(), json!({}));
        assert_eq!(plain.quantity(), 1);
    }
}
