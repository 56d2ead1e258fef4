//! Relationship score tracking.
//!
//! Each NPC holds four counters in `0..=100` describing its disposition
//! toward the player. Every turn the player's message is matched against
//! [`RELATIONSHIP_RULES`]; all triggered deltas are summed per field and the
//! result is clamped. Scores never decay.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of every score.
pub const MIN_SCORE: u8 = 0;
/// Upper bound of every score.
pub const MAX_SCORE: u8 = 100;
/// Starting value for unseen NPCs.
pub const DEFAULT_SCORE: u8 = 50;

/// Four bounded disposition counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipScores {
    /// Willingness to believe the player.
    pub trust: u8,
    /// Warmth toward the player.
    pub friendship: u8,
    /// Regard for the player's standing.
    pub respect: u8,
    /// Physical or romantic interest.
    pub attraction: u8,
}

impl RelationshipScores {
    /// All four scores at `initial` (clamped to the valid range).
    #[must_use]
    pub fn uniform(initial: u8) -> Self {
        let v = initial.min(MAX_SCORE);
        Self {
            trust: v,
            friendship: v,
            respect: v,
            attraction: v,
        }
    }

    /// Read one field.
    #[must_use]
    pub fn get(&self, field: RelationshipField) -> u8 {
        match field {
            RelationshipField::Trust => self.trust,
            RelationshipField::Friendship => self.friendship,
            RelationshipField::Respect => self.respect,
            RelationshipField::Attraction => self.attraction,
        }
    }

    /// The same scores with every field pulled into `0..=100`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            trust: self.trust.min(MAX_SCORE),
            friendship: self.friendship.min(MAX_SCORE),
            respect: self.respect.min(MAX_SCORE),
            attraction: self.attraction.min(MAX_SCORE),
        }
    }

    fn slot(&mut self, field: RelationshipField) -> &mut u8 {
        match field {
            RelationshipField::Trust => &mut self.trust,
            RelationshipField::Friendship => &mut self.friendship,
            RelationshipField::Respect => &mut self.respect,
            RelationshipField::Attraction => &mut self.attraction,
        }
    }

    /// Apply every triggered rule for `player_message`, then clamp.
    ///
    /// Returns the net delta per field that fired (before clamping).
    pub fn apply_message(&mut self, player_message: &str) -> Vec<(RelationshipField, i16)> {
        let text = player_message.to_lowercase();
        let mut net: Vec<(RelationshipField, i16)> = Vec::new();

        for rule in RELATIONSHIP_RULES.iter().filter(|r| r.trigger.fires(&text)) {
            match net.iter_mut().find(|(f, _)| *f == rule.field) {
                Some((_, d)) => *d += rule.delta,
                None => net.push((rule.field, rule.delta)),
            }
        }

        for &(field, delta) in &net {
            let slot = self.slot(field);
            let next = (i16::from(*slot) + delta).clamp(i16::from(MIN_SCORE), i16::from(MAX_SCORE));
            *slot = u8::try_from(next).unwrap_or(MAX_SCORE);
        }
        net
    }
}

impl Default for RelationshipScores {
    fn default() -> Self {
        Self::uniform(DEFAULT_SCORE)
    }
}

/// Names one of the four counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipField {
    /// See [`RelationshipScores::trust`].
    Trust,
    /// See [`RelationshipScores::friendship`].
    Friendship,
    /// See [`RelationshipScores::respect`].
    Respect,
    /// See [`RelationshipScores::attraction`].
    Attraction,
}

impl fmt::Display for RelationshipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trust => "Trust",
            Self::Friendship => "Friendship",
            Self::Respect => "Respect",
            Self::Attraction => "Attraction",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// When a relationship rule fires.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// Any of the substrings is present.
    AnyOf(&'static [&'static str]),
    /// `word` is present but `unless` is not.
    Without {
        /// Required substring.
        word: &'static str,
        /// Substring that suppresses the rule.
        unless: &'static str,
    },
}

impl Trigger {
    fn fires(&self, lowercase_text: &str) -> bool {
        match self {
            Self::AnyOf(words) => words.iter().any(|w| lowercase_text.contains(w)),
            Self::Without { word, unless } => {
                lowercase_text.contains(word) && !lowercase_text.contains(unless)
            }
        }
    }
}

/// One row of the relationship table.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipRule {
    /// Condition on the lowercased player message.
    pub trigger: Trigger,
    /// Counter the rule moves.
    pub field: RelationshipField,
    /// Signed adjustment.
    pub delta: i16,
}

/// The relationship table. `"dislike"` contains `"like"`, so it fires both
/// sentiment rows and nets to zero.
pub const RELATIONSHIP_RULES: &[RelationshipRule] = &[
    RelationshipRule {
        trigger: Trigger::Without { word: "fuck", unless: "fuck you" },
        field: RelationshipField::Attraction,
        delta: 5,
    },
    RelationshipRule {
        trigger: Trigger::AnyOf(&["fuck you"]),
        field: RelationshipField::Friendship,
        delta: -10,
    },
    RelationshipRule {
        trigger: Trigger::AnyOf(&["trust", "believe"]),
        field: RelationshipField::Trust,
        delta: 5,
    },
    RelationshipRule {
        trigger: Trigger::AnyOf(&["love", "like"]),
        field: RelationshipField::Friendship,
        delta: 5,
    },
    RelationshipRule {
        trigger: Trigger::AnyOf(&["hate", "dislike"]),
        field: RelationshipField::Friendship,
        delta: -5,
    },
    RelationshipRule {
        trigger: Trigger::AnyOf(&["respect"]),
        field: RelationshipField::Respect,
        delta: 5,
    },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fifty() {
        let s = RelationshipScores::default();
        assert_eq!((s.trust, s.friendship, s.respect, s.attraction), (50, 50, 50, 50));
    }

    #[test]
    fn insult_lowers_friendship_without_attraction() {
        let mut s = RelationshipScores::default();
        s.apply_message("Well FUCK YOU then");
        assert_eq!(s.friendship, 40);
        assert_eq!(s.attraction, 50);
    }

    #[test]
    fn profanity_raises_attraction() {
        let mut s = RelationshipScores::default();
        s.apply_message("fuck, this place is wild");
        assert_eq!(s.attraction, 55);
        assert_eq!(s.friendship, 50);
    }

    #[test]
    fn trust_and_respect_rise() {
        let mut s = RelationshipScores::default();
        s.apply_message("I believe you and I respect that");
        assert_eq!(s.trust, 55);
        assert_eq!(s.respect, 55);
    }

    #[test]
    fn dislike_nets_to_zero() {
        let mut s = RelationshipScores::default();
        let net = s.apply_message("I dislike the cold");
        assert_eq!(s.friendship, 50);
        assert_eq!(net, vec![(RelationshipField::Friendship, 0)]);
    }

    #[test]
    fn clamps_at_bounds() {
        let mut s = RelationshipScores::uniform(98);
        s.apply_message("I trust you, I love this");
        assert_eq!(s.trust, 100);
        assert_eq!(s.friendship, 100);

        let mut s = RelationshipScores::uniform(3);
        s.apply_message("fuck you, I hate you");
        assert_eq!(s.friendship, 0);
    }

    #[test]
    fn uniform_clamps_initial() {
        assert_eq!(RelationshipScores::uniform(250).trust, 100);
    }
}
