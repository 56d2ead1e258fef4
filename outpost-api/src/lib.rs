//! # outpost-api: client for the dialogue/quest/save service
//!
//! The NPCs' words come from a remote language-model service spoken to as
//! JSON over HTTP:
//!
//! ```text
//! POST /api/dialogue        NPC reply to a player line
//! POST /api/generate-quest  quest built from a player suggestion
//! POST /api/quest           legacy quest generation
//! POST /api/save            store a save   (falls back to the local store)
//! GET  /api/load            latest save    (falls back to the local store)
//! GET  /api/logs            service logs
//! POST /api/logs/clear      truncate service logs
//! GET  /api/health          liveness check
//! ```
//!
//! The service is allowed to be down. Every public operation degrades to a
//! fixed fallback instead of returning an error, so the game keeps talking.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod fallback;
pub mod types;

pub use client::{GameService, ServiceClient};
pub use error::ApiError;
pub use fallback::FallbackTopic;
pub use types::{
    DialogueRequest, DialogueResponse, GenerateQuestRequest, GenerateQuestResponse, PlayerContext, QuestPayload,
    SaveOutcome,
};
