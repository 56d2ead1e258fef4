//! Memory context rendering.
//!
//! The dialogue service receives a plain-text block summarising what the NPC
//! remembers:
//!
//! ```text
//! === NPC MEMORY CONTEXT ===
//! RELATIONSHIP STATUS:
//! - Trust: 55/100
//! ...
//! PROMISES:
//! - Promise/Deal: I promise to bring you (positive)
//!
//! RECENT CONVERSATION CONTEXT:
//! Player: "..."
//! NPC: "..."
//! Emotion: positive
//!
//! === END MEMORY CONTEXT ===
//! ```

use std::fmt::Write as _;

use crate::memory::{MemoryCategory, MemoryEntry, NpcMemory};
use crate::relationship::RelationshipField;

/// Render `record` into the memory context block.
///
/// Categories appear in the order their first memory appears in the list.
/// Returns an empty string when there are no memories and no scores.
#[must_use]
pub fn render(record: &NpcMemory, recent_turns: usize) -> String {
    if record.memories.is_empty() && record.relationship.is_none() {
        return String::new();
    }

    let mut out = String::from("\n\n=== NPC MEMORY CONTEXT ===\n");

    if let Some(scores) = &record.relationship {
        out.push_str("RELATIONSHIP STATUS:\n");
        for field in [
            RelationshipField::Trust,
            RelationshipField::Friendship,
            RelationshipField::Respect,
            RelationshipField::Attraction,
        ] {
            let _ = writeln!(out, "- {field}: {}/100", scores.get(field));
        }
        out.push('\n');
    }

    let mut groups: Vec<(MemoryCategory, Vec<&MemoryEntry>)> = Vec::new();
    for memory in &record.memories {
        match groups.iter_mut().find(|(c, _)| *c == memory.category) {
            Some((_, list)) => list.push(memory),
            None => groups.push((memory.category, vec![memory])),
        }
    }
    for (category, memories) in groups {
        let _ = writeln!(out, "{}:", category.heading());
        for memory in memories {
            out.push_str("- ");
            out.push_str(&memory.content);
            if let Some(emotion) = &memory.emotional_context {
                let _ = write!(out, " ({emotion})");
            }
            out.push('\n');
        }
        out.push('\n');
    }

    let recent = record.history.recent(recent_turns);
    if !recent.is_empty() {
        out.push_str("RECENT CONVERSATION CONTEXT:\n");
        for turn in recent {
            let _ = writeln!(out, "Player: \"{}\"", turn.player_message);
            let _ = writeln!(out, "NPC: \"{}\"", turn.npc_response);
            if let Some(emotion) = &turn.emotional_context {
                let _ = writeln!(out, "Emotion: {emotion}");
            }
            out.push('\n');
        }
    }

    out.push_str("=== END MEMORY CONTEXT ===\n\n");
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ConversationEntry;
    use crate::relationship::RelationshipScores;

    #[test]
    fn empty_record_renders_nothing() {
        assert_eq!(render(&NpcMemory::default(), 2), "");
    }

    #[test]
    fn scores_only_block() {
        let record = NpcMemory {
            relationship: Some(RelationshipScores::default()),
            ..NpcMemory::default()
        };
        let out = render(&record, 2);
        assert_eq!(
            out,
            "\n\n=== NPC MEMORY CONTEXT ===\nRELATIONSHIP STATUS:\n- Trust: 50/100\n- Friendship: 50/100\n- Respect: 50/100\n- Attraction: 50/100\n\n=== END MEMORY CONTEXT ===\n\n"
        );
    }

    #[test]
    fn groups_memories_and_shows_last_turns() {
        let mut record = NpcMemory::default();
        record.memories.push(MemoryEntry::new(MemoryCategory::Trade, "Trade/Business: Selling ore cheap", None, 3));
        record.memories.push(MemoryEntry::new(
            MemoryCategory::Promises,
            "Promise/Deal: I promise to bring you",
            Some("positive".into()),
            4,
        ));
        record.memories.push(MemoryEntry::new(MemoryCategory::Trade, "Trade/Business: Need a discount", None, 3));
        for i in 0..3 {
            record.history.push(ConversationEntry::new(format!("p{i}"), format!("n{i}"), None), 5);
        }

        let out = render(&record, 2);
        let trade = out.find("TRADE:").expect("trade heading");
        let promises = out.find("PROMISES:").expect("promises heading");
        assert!(trade < promises);
        assert_eq!(out.matches("TRADE:").count(), 1);
        assert!(out.contains("- Promise/Deal: I promise to bring you (positive)\n"));
        assert!(!out.contains("Player: \"p0\""));
        assert!(out.contains("Player: \"p2\"\nNPC: \"n2\"\n"));
        assert!(!out.contains("RELATIONSHIP STATUS"));
    }
}
