//! The outpost's residents and the collectable item catalogue.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, NpcId, Position};

/// First names the gossip table listens for.
pub const GOSSIP_NAMES: &[&str] = &["sarah", "kim", "marcus", "eliza", "jake", "rick"];

/// A dialogue-capable resident with a fixed personality profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcProfile {
    /// Stable id.
    pub id: NpcId,
    /// Display name.
    pub name: String,
    /// Job at the outpost.
    pub role: String,
    /// Short personality description sent to the dialogue model.
    pub personality: String,
    /// Backstory sent to the dialogue model.
    pub background: String,
    /// Speaking style sent to the dialogue model.
    pub dialogue_style: String,
    /// Static greeting shown when there is no quest business.
    pub default_greeting: String,
    /// Spawn point.
    pub position: Position,
}

/// A collectable item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Stable id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
}

/// The set of NPCs and items a session knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Residents.
    pub npcs: Vec<NpcProfile>,
    /// Item catalogue.
    pub items: Vec<ItemDef>,
}

impl Roster {
    /// Look up a resident by id.
    #[must_use]
    pub fn npc(&self, id: &NpcId) -> Option<&NpcProfile> {
        self.npcs.iter().find(|n| &n.id == id)
    }

    /// Resolve a free-form reference (id or display name, any case).
    #[must_use]
    pub fn resolve_npc(&self, reference: &str) -> Option<&NpcProfile> {
        let needle = reference.trim();
        self.npcs.iter().find(|n| {
            n.id.as_str().eq_ignore_ascii_case(needle) || n.name.eq_ignore_ascii_case(needle)
        })
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Display names of every resident.
    #[must_use]
    pub fn npc_names(&self) -> Vec<String> {
        self.npcs.iter().map(|n| n.name.clone()).collect()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            npcs: default_npcs(),
            items: default_items(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn npc(
    id: &str,
    name: &str,
    (x, y): (f32, f32),
    personality: &str,
    role: &str,
    background: &str,
    dialogue_style: &str,
    default_greeting: &str,
) -> NpcProfile {
    NpcProfile {
        id: NpcId::from(id),
        name: name.to_string(),
        role: role.to_string(),
        personality: personality.to_string(),
        background: background.to_string(),
        dialogue_style: dialogue_style.to_string(),
        default_greeting: default_greeting.to_string(),
        position: Position::new(x, y),
    }
}

/// The six residents of the outpost.
#[must_use]
pub fn default_npcs() -> Vec<NpcProfile> {
    vec![
        npc(
            "commander_sarah",
            "Commander Sarah Chen",
            (200.0, 200.0),
            "authoritative, strategic, concerned about colony security",
            "Outpost Commander",
            "Former military officer, now leads this frontier outpost",
            "formal but approachable, uses military terminology",
            "At ease, soldier. I'm Commander Sarah Chen, in charge of this outpost. We're on the frontier here, so we need to stay vigilant. What brings you to my command center?",
        ),
        npc(
            "engineer_marcus",
            "Engineer Marcus Rodriguez",
            (600.0, 300.0),
            "brilliant but eccentric, obsessed with technology",
            "Chief Engineer",
            "Genius inventor who keeps the outpost running",
            "technical jargon mixed with enthusiasm, slightly scatterbrained",
            "Oh! Hello there! I'm Marcus Rodriguez, Chief Engineer. *adjusts goggles excitedly* The quantum flux capacitors are behaving most unusually today! What can I help you with? The power grid needs constant attention, you know!",
        ),
        npc(
            "trader_eliza",
            "Trader Eliza Thompson",
            (400.0, 500.0),
            "charismatic, opportunistic, well-connected",
            "Merchant",
            "Travels between outposts, knows all the best deals",
            "smooth talker, always has a deal to offer",
            "Well hello there, handsome! I'm Eliza Thompson, and I've got the best deals this side of the galaxy! Just got back from a trade run with some rare materials. What catches your eye today?",
        ),
        npc(
            "scout_jake",
            "Scout Jake Williams",
            (800.0, 150.0),
            "cautious, observant, has seen things in the wilderness",
            "Frontier Scout",
            "Explores the dangerous areas beyond the outpost",
            "whispers about threats, shares survival tips",
            "*whispers* You should be careful out there. I'm Jake Williams, scout. I've seen things in the wilderness that would make your blood run cold. The outpost walls are all that keep us safe. What do you need to know?",
        ),
        npc(
            "medic_dr_kim",
            "Dr. Kim Park",
            (300.0, 400.0),
            "compassionate, professional, slightly overwhelmed",
            "Medical Officer",
            "Keeps everyone healthy in this harsh environment",
            "caring but busy, medical advice mixed with concern",
            "Hello! I'm Dr. Kim Park, medical officer. I hope you're feeling well. The medical bay is fully stocked, but I'm always concerned about the health of our outpost residents. How are you holding up?",
        ),
        npc(
            "unfiltered_rick",
            "Rick \"The Unfiltered\"",
            (700.0, 600.0),
            "completely unfiltered, crude, says whatever comes to mind, no social boundaries",
            "Unfiltered Resident",
            "Lives on the edge of the outpost, known for saying exactly what he thinks",
            "crude, direct, no filter whatsoever, uses profanity freely, says anything without restraint",
            "Well well well, look what the fuck crawled out of the void! I'm Rick, and I don't give a shit about your feelings or what anyone thinks. What the hell do you want? I'll tell you exactly what I think, no bullshit!",
        ),
    ]
}

/// The thirteen collectable item types.
#[must_use]
pub fn default_items() -> Vec<ItemDef> {
    [
        ("crystal_red", "Red Crystal"),
        ("iron_ore", "Iron Ore"),
        ("plant_fiber", "Alien Plant Fiber"),
        ("space_rock", "Space Rock"),
        ("azure_crystal", "Azure Crystal"),
        ("meteorite_fragment", "Meteorite Fragment"),
        ("enigmatic_artifact", "Enigmatic Artifact"),
        ("crystal_spires", "Crystal Spires"),
        ("ancient_rubble", "Ancient Rubble"),
        ("glow_stalk", "Glow Stalk"),
        ("impact_shard", "Impact Shard"),
        ("alien_relic", "Alien Relic"),
        ("cosmic_dust", "Cosmic Dust"),
    ]
    .into_iter()
    .map(|(id, name)| ItemDef {
        id: ItemId::from(id),
        name: name.to_string(),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_sizes() {
        let roster = Roster::default();
        assert_eq!(roster.npcs.len(), 6);
        assert_eq!(roster.items.len(), 13);
    }

    #[test]
    fn resolves_by_name_or_id() {
        let roster = Roster::default();
        let by_name = roster.resolve_npc("dr. kim park").expect("name resolves");
        assert_eq!(by_name.id, NpcId::from("medic_dr_kim"));
        let by_id = roster.resolve_npc("scout_jake").expect("id resolves");
        assert_eq!(by_id.name, "Scout Jake Williams");
        assert!(roster.resolve_npc("nobody").is_none());
    }

    #[test]
    fn gossip_names_match_residents() {
        let roster = Roster::default();
        for name in GOSSIP_NAMES {
            assert!(
                roster.npcs.iter().any(|n| n.name.to_lowercase().contains(name)),
                "{name} is not a resident"
            );
        }
    }
}
