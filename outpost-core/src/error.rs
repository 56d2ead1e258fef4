//! Error types for the outpost core library.

use thiserror::Error;

/// Top-level error type for all core operations.
#[derive(Error, Debug)]
pub enum OutpostError {
    /// A quest with the given ID was not found in any list.
    #[error("Quest not found: {0}")]
    QuestNotFound(crate::QuestId),

    /// A quest with this ID is already in the log.
    #[error("Quest already in the log: {0}")]
    DuplicateQuest(crate::QuestId),

    /// A quest was turned in before its objective was met.
    #[error("Quest objective not met: {0}")]
    ObjectiveIncomplete(crate::QuestId),

    /// A quest payload could not be turned into a playable quest.
    #[error("Invalid quest: {reason}")]
    InvalidQuest {
        /// What was missing or malformed.
        reason: String,
    },

    /// The inventory has no free slot for a new stack.
    #[error("Inventory full: cannot add {quantity} x {item_id}")]
    InventoryFull {
        /// Item that did not fit.
        item_id: String,
        /// Quantity that did not fit.
        quantity: u32,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored save did not match its checksum.
    #[error("Save corrupted for key {key}: checksum mismatch")]
    Corrupted {
        /// Save key whose payload failed verification.
        key: String,
    },

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, OutpostError>;
