//! # outpost-dialogue: the dialogue turn controller
//!
//! Sits between the player, the remote dialogue service and the game state.
//! A dialogue opens with a greeting (or a quest turn-in, or a progress
//! report), then alternates player lines with NPC replies until it is
//! closed. Lines that ask for work go to quest generation; everything else
//! goes to free chat and feeds the NPC's memory.
//!
//! The rendering engine is not a dependency: the UI and the world map are
//! injected behind [`DialogueUi`] and [`WorldView`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod intent;
pub mod session;
pub mod ui;
pub mod world;

pub use controller::{DialogueController, DialogueState, QuestDecision};
pub use session::Session;
pub use ui::{DialogueUi, RecordingUi, UiEvent};
pub use world::{StaticWorld, WorldView};
