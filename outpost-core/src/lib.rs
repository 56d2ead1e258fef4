//! # Outpost Core Library
//!
//! Engine-agnostic conversation state for the frontier-outpost NPCs.
//!
//! Every NPC the player talks to accumulates an [`NpcMemory`] inside the
//! shared [`MemoryStore`]:
//!
//! - **Memories**: short snippets of what the player said, classified by
//!   keyword tables into [`MemoryCategory`] buckets and bounded per NPC
//! - **Relationship**: four bounded disposition counters nudged every turn
//! - **History**: the last few raw exchanges, fed back to the dialogue model
//!
//! Alongside the memory store the crate owns the quest log, the quest
//! template generator, the player inventory and the local save store used
//! when the remote save endpoint is unreachable.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod extraction;
pub mod history;
pub mod importance;
pub mod inventory;
pub mod memory;
pub mod persistence;
pub mod pruning;
pub mod quest;
pub mod relationship;
pub mod roster;
pub mod state;
pub mod types;

pub use config::OutpostConfig;
pub use error::OutpostError;
pub use inventory::Inventory;
pub use memory::{MemoryCategory, MemoryEntry, MemoryStore, NpcMemory};
pub use quest::{Quest, QuestLog};
pub use relationship::RelationshipScores;
pub use state::GameState;
pub use types::*;
