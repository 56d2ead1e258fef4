//! The world seam: what the controller reads about the game map.

use parking_lot::RwLock;

use outpost_core::roster::Roster;
use outpost_core::{ItemId, Position};

/// Read-only view of the world around the dialogue.
pub trait WorldView: Send + Sync {
    /// Where the player stands.
    fn player_position(&self) -> Position;
    /// Item types that can currently be found.
    fn available_item_ids(&self) -> Vec<ItemId>;
    /// Display names of every NPC.
    fn npc_names(&self) -> Vec<String>;
}

/// A fixed world built from the roster; the player position can be moved.
#[derive(Debug)]
pub struct StaticWorld {
    position: RwLock<Position>,
    items: Vec<ItemId>,
    npc_names: Vec<String>,
}

impl StaticWorld {
    /// Every catalogue item available, every resident present.
    #[must_use]
    pub fn from_roster(roster: &Roster) -> Self {
        Self {
            position: RwLock::new(Position::default()),
            items: roster.items.iter().map(|i| i.id.clone()).collect(),
            npc_names: roster.npc_names(),
        }
    }

    /// Move the player.
    pub fn set_player_position(&self, position: Position) {
        *self.position.write() = position;
    }
}

impl WorldView for StaticWorld {
    fn player_position(&self) -> Position {
        *self.position.read()
    }

    fn available_item_ids(&self) -> Vec<ItemId> {
        self.items.clone()
    }

    fn npc_names(&self) -> Vec<String> {
        self.npc_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_roster() {
        let roster = Roster::default();
        let world = StaticWorld::from_roster(&roster);
        assert_eq!(world.available_item_ids().len(), roster.items.len());
        assert_eq!(world.npc_names().len(), 6);
        world.set_player_position(Position::new(3.0, 4.0));
        assert_eq!(world.player_position(), Position::new(3.0, 4.0));
    }
}
