use std::io::Write;

use anyhow::Result;
use clap::Subcommand;
use satchel_core::{Entry, Inventory, MatchPolicy, Matches};
use serde_json::{json, Value};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every entry with its index.
    List,
    /// Add items to the inventory.
    Give {
        id: String,
        #[arg(default_value_t = 1)]
        amount: u32,
        /// JSON payload attached to each non-stackable unit.
        #[arg(long, value_parser = parse_json)]
        data: Option<Value>,
    },
    /// Remove items by id, earliest first.
    Take {
        id: String,
        #[arg(default_value_t = 1)]
        amount: u32,
    },
    /// Remove from the entry at an index.
    TakeAt {
        index: usize,
        #[arg(default_value_t = 1)]
        amount: u32,
    },
    /// Count matches under both loose and strict matching.
    Find {
        id: String,
        #[arg(long, value_parser = parse_json)]
        data: Option<Value>,
    },
    /// Show the entry at an index with its catalog definition.
    Show { index: usize },
    /// Run the enchanted stick walkthrough.
    Demo,
}

/// Execute `command`, returning whether the inventory was mutated.
pub fn run(command: Command, inventory: &mut Inventory, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::List => {
            list(inventory, out)?;
            Ok(false)
        }
        Command::Give { id, amount, data } => {
            inventory.add(&id, amount, data)?;
            writeln!(out, "gave {amount} x {id}")?;
            Ok(true)
        }
        Command::Take { id, amount } => {
            inventory.remove(&id, amount)?;
            writeln!(out, "took up to {amount} x {id}")?;
            Ok(true)
        }
        Command::TakeAt { index, amount } => {
            inventory.remove_at(index, amount)?;
            writeln!(out, "took {amount} at index {index}")?;
            Ok(true)
        }
        Command::Find { id, data } => {
            let report = inventory.find(&id, data.as_ref());
            print_matches(out, "loose", &report.loose)?;
            print_matches(out, "strict", &report.strict)?;
            Ok(false)
        }
        Command::Show { index } => {
            show(inventory, index, out)?;
            Ok(false)
        }
        Command::Demo => demo(inventory, out).map(|_| true),
    }
}

fn demo(inventory: &mut Inventory, out: &mut impl Write) -> Result<()> {
    inventory.remove("useless_dust", 1)?;

    let bonus = json!({ "bonus_dmg": 1337 });
    inventory.add("wooden_stick", 1, Some(bonus.clone()))?;
    list(inventory, out)?;

    let matches = inventory.find_with("wooden_stick", Some(&bonus), MatchPolicy::Strict);
    writeln!(
        out,
        "wooden_stick with extra damage (1337): {} of this item, at inventory index(es): {:?}",
        matches.count, matches.indices
    )?;
    if let Some(index) = matches.first() {
        show(inventory, index, out)?;
    }
    Ok(())
}

fn list(inventory: &Inventory, out: &mut impl Write) -> Result<()> {
    if inventory.is_empty() {
        writeln!(out, "(empty)")?;
        return Ok(());
    }
    for (index, entry) in inventory.entries().iter().enumerate() {
        let name = &inventory.definition(entry.id())?.name;
        match entry {
            Entry::Stack { amount, .. } => writeln!(out, "[{index}] {name} x{amount}")?,
            Entry::Unit { data: Some(data), .. } => writeln!(out, "[{index}] {name} {data}")?,
            Entry::Unit { data: None, .. } => writeln!(out, "[{index}] {name}")?,
        }
    }
    Ok(())
}

fn show(inventory: &Inventory, index: usize, out: &mut impl Write) -> Result<()> {
    let entry = inventory.get(index)?;
    let definition = inventory.definition_at(index)?;
    writeln!(out, "{}", serde_json::to_string_pretty(entry)?)?;
    writeln!(out, "{}", serde_json::to_string_pretty(definition)?)?;
    Ok(())
}

fn print_matches(out: &mut impl Write, label: &str, matches: &Matches) -> Result<()> {
    writeln!(out, "{label}: {} at {:?}", matches.count, matches.indices)?;
    Ok(())
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|err| format!("invalid JSON payload: {err}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use satchel_core::Catalog;

    fn inventory() -> Inventory {
        let raw = json!({
            "strawberry": { "name": "Strawberry", "stackable": true },
            "wooden_stick": { "name": "Wooden Stick", "stackable": false },
            "useless_dust": { "name": "Useless Dust", "stackable": false }
        });
        Inventory::new(Arc::new(Catalog::from_value(raw).expect("fixture catalog")))
    }

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("utf8 output")
    }

    #[test]
    fn give_then_list() -> Result<()> {
        let mut inventory = inventory();
        let mut out = Vec::new();

        let mutated = run(
            Command::Give {
                id: "strawberry".to_string(),
                amount: 2,
                data: None,
            },
            &mut inventory,
            &mut out,
        )?;
        assert!(mutated);
        assert!(!run(Command::List, &mut inventory, &mut out)?);

        assert_eq!(output(out), "gave 2 x strawberry\n[0] Strawberry x2\n");
        Ok(())
    }

    #[test]
    fn find_reports_both_policies() -> Result<()> {
        let mut inventory = inventory();
        inventory.add("wooden_stick", 1, Some(json!({ "a": 1 })))?;
        let mut out = Vec::new();

        run(
            Command::Find {
                id: "wooden_stick".to_string(),
                data: None,
            },
            &mut inventory,
            &mut out,
        )?;
        assert_eq!(output(out), "loose: 1 at [0]\nstrict: 0 at []\n");
        Ok(())
    }

    #[test]
    fn null_payload_is_found_again() -> Result<()> {
        let mut inventory = inventory();
        let mut out = Vec::new();
        run(
            Command::Give {
                id: "wooden_stick".to_string(),
                amount: 1,
                data: Some(parse_json("null").map_err(anyhow::Error::msg)?),
            },
            &mut inventory,
            &mut out,
        )?;

        let mut out = Vec::new();
        run(
            Command::Find {
                id: "wooden_stick".to_string(),
                data: Some(Value::Null),
            },
            &mut inventory,
            &mut out,
        )?;
        assert_eq!(output(out), "loose: 1 at [0]\nstrict: 1 at [0]\n");
        Ok(())
    }

    #[test]
    fn take_at_out_of_range_is_reported() {
        let mut inventory = inventory();
        let mut out = Vec::new();
        let result = run(
            Command::TakeAt {
                index: 4,
                amount: 1,
            },
            &mut inventory,
            &mut out,
        );
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn demo_walkthrough() -> Result<()> {
        let mut inventory = inventory();
        inventory.add("useless_dust", 1, None)?;
        let mut out = Vec::new();

        assert!(run(Command::Demo, &mut inventory, &mut out)?);

        let text = output(out);
        assert!(text.starts_with("[0] Wooden Stick {\"bonus_dmg\":1337}\n"));
        assert!(text.contains("1 of this item, at inventory index(es): [0]"));
        assert_eq!(inventory.quantity("useless_dust"), 0);
        Ok(())
    }

    #[test]
    fn rejects_invalid_payloads() {
        assert!(parse_json("{\"bonus_dmg\": 1}").is_ok());
        assert!(parse_json("{bonus_dmg}").is_err());
    }
}
