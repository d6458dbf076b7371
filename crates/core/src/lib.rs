#![warn(clippy::all, missing_docs)]

//! Core item-collection engine for satchel.
//!
//! This crate hosts the static item catalog, the inventory engine with its
//! loose and strict match disciplines, cross-inventory transfers, and the
//! configuration and player-file layers used by the command-line driver.

pub mod catalog;
pub mod config;
pub mod error;
pub mod inventory;
pub mod save;
pub mod transfer;

pub use catalog::{Catalog, ItemDefinition};
pub use crate::config::AppConfig;
pub use error::{CatalogError, InventoryError};
pub use inventory::{Entry, FindReport, Inventory, MatchPolicy, Matches, RawEntry};
pub use save::PlayerFile;
pub use transfer::{transfer, Transfer};
