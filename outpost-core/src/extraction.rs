//! Keyword-driven memory extraction.
//!
//! Classification is table-driven: [`CATEGORY_RULES`] maps each
//! [`MemoryCategory`] to a keyword list and a content label, and
//! [`EMOTION_RULES`] maps keyword families to emotion tags. Nothing here
//! mutates state; [`crate::MemoryStore`] decides what to keep.
//!
//! ```text
//! player text ──▶ category scan ──▶ word window ──▶ clean ──▶ length gate ──▶ Candidate
//!                  (table order)     (3 | kw | 3)
//! ```

use crate::config::MemoryConfig;
use crate::importance;
use crate::memory::MemoryCategory;
use crate::roster::GOSSIP_NAMES;

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// How the stored content is labelled.
#[derive(Debug, Clone, Copy)]
pub enum Label {
    /// `"<prefix>: <snippet>"`.
    Prefix(&'static str),
    /// `"Gossip about <keyword>: <snippet>"`.
    AboutKeyword(&'static str),
}

impl Label {
    fn render(self, keyword: &str, snippet: &str) -> String {
        match self {
            Self::Prefix(prefix) => format!("{prefix}: {snippet}"),
            Self::AboutKeyword(lead) => format!("{lead} {keyword}: {snippet}"),
        }
    }
}

/// One row of the category table.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Category assigned on a hit.
    pub category: MemoryCategory,
    /// Content label.
    pub label: Label,
    /// Keywords, tried in order.
    pub keywords: &'static [&'static str],
    /// Also search the NPC reply when `memory.scan_npc_reply` is on.
    pub reads_reply: bool,
}

/// The category table, in scan order.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: MemoryCategory::PersonalInfo,
        label: Label::Prefix("Player shared"),
        keywords: &[
            "family", "home", "planet", "background", "childhood", "grew up", "hobby", "interest",
            "like", "enjoy", "love", "favorite", "dislike", "hate", "don't like", "not a fan",
            "can't stand", "age", "old", "young", "years", "job", "work", "career",
        ],
        reads_reply: false,
    },
    CategoryRule {
        category: MemoryCategory::Relationship,
        label: Label::Prefix("Relationship context"),
        keywords: &[
            "friend", "enemy", "trust", "betray", "like", "dislike", "romantic", "intimate",
            "relationship", "together", "love", "fuck", "sex", "close", "distant",
        ],
        reads_reply: true,
    },
    CategoryRule {
        category: MemoryCategory::Promises,
        label: Label::Prefix("Promise/Deal"),
        keywords: &[
            "promise", "deal", "agreement", "will do", "going to", "guarantee", "assure", "commit",
            "owe", "pay", "reward",
        ],
        reads_reply: true,
    },
    CategoryRule {
        category: MemoryCategory::Quests,
        label: Label::Prefix("Quest related"),
        keywords: &[
            "quest", "work", "job", "task", "mission", "help", "collect", "find", "bring", "get",
            "gather", "crypto", "reward",
        ],
        reads_reply: false,
    },
    CategoryRule {
        category: MemoryCategory::Emotional,
        label: Label::Prefix("Emotional moment"),
        keywords: &[
            "fuck", "damn", "shit", "love", "hate", "angry", "happy", "sad", "excited",
            "disappointed", "surprised", "shocked",
        ],
        reads_reply: true,
    },
    CategoryRule {
        category: MemoryCategory::Gossip,
        label: Label::AboutKeyword("Gossip about"),
        keywords: GOSSIP_NAMES,
        reads_reply: false,
    },
    CategoryRule {
        category: MemoryCategory::Trade,
        label: Label::Prefix("Trade/Business"),
        keywords: &[
            "crypto", "money", "payment", "price", "cost", "deal", "trade", "sell", "buy",
            "exchange", "bargain", "discount",
        ],
        reads_reply: false,
    },
];

/// Whose line an emotion rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The player's message.
    Player,
    /// The NPC's reply.
    Npc,
}

/// One row of the emotion table.
#[derive(Debug, Clone, Copy)]
pub struct EmotionRule {
    /// Line inspected.
    pub speaker: Speaker,
    /// Tag emitted.
    pub tag: &'static str,
    /// Any of these substrings emits the tag.
    pub any_of: &'static [&'static str],
}

const ANGER: &[&str] = &["fuck", "damn", "shit"];
const WARMTH: &[&str] = &["love", "like", "great"];
const SCORN: &[&str] = &["hate", "dislike", "terrible"];

/// The emotion table, in tag order.
pub const EMOTION_RULES: &[EmotionRule] = &[
    EmotionRule { speaker: Speaker::Player, tag: "angry", any_of: ANGER },
    EmotionRule { speaker: Speaker::Player, tag: "positive", any_of: WARMTH },
    EmotionRule { speaker: Speaker::Player, tag: "negative", any_of: SCORN },
    EmotionRule { speaker: Speaker::Player, tag: "trusting", any_of: &["trust", "believe"] },
    EmotionRule { speaker: Speaker::Player, tag: "confidential", any_of: &["secret", "confidential"] },
    EmotionRule { speaker: Speaker::Npc, tag: "npc_angry", any_of: ANGER },
    EmotionRule { speaker: Speaker::Npc, tag: "npc_positive", any_of: WARMTH },
    EmotionRule { speaker: Speaker::Npc, tag: "npc_negative", any_of: SCORN },
];

// ---------------------------------------------------------------------------
// Emotion tags
// ---------------------------------------------------------------------------

/// Comma-joined emotion tags for an exchange, `None` when no rule fires.
#[must_use]
pub fn emotional_context(player_message: &str, npc_reply: &str) -> Option<String> {
    let player = player_message.to_lowercase();
    let npc = npc_reply.to_lowercase();
    let tags: Vec<&str> = EMOTION_RULES
        .iter()
        .filter(|rule| {
            let text = match rule.speaker {
                Speaker::Player => &player,
                Speaker::Npc => &npc,
            };
            rule.any_of.iter().any(|kw| text.contains(kw))
        })
        .map(|rule| rule.tag)
        .collect();
    (!tags.is_empty()).then(|| tags.join(", "))
}

// ---------------------------------------------------------------------------
// Snippets
// ---------------------------------------------------------------------------

/// Collapse whitespace, capitalise the first letter, drop trailing `,.!?`.
#[must_use]
pub fn clean_snippet(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_end_matches([',', '.', '!', '?']);
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Index of the first word where `keyword` (possibly several words) starts.
fn keyword_position(words: &[&str], keyword: &str) -> Option<usize> {
    let span = keyword.split(' ').count();
    (0..words.len()).find(|&i| {
        let end = (i + span).min(words.len());
        words[i..end].join(" ").to_lowercase().contains(keyword)
    })
}

/// The cleaned word window around `keyword`, if it passes the length gate.
///
/// The window keeps `window_before` words before the keyword's word and
/// `window_after` words after it. The cleaned text must be strictly longer
/// than `min_snippet_len` and strictly shorter than `max_snippet_len`
/// characters.
#[must_use]
pub fn snippet_around(text: &str, keyword: &str, config: &MemoryConfig) -> Option<String> {
    let words: Vec<&str> = text.split(' ').collect();
    let idx = keyword_position(&words, &keyword.to_lowercase())?;
    let start = idx.saturating_sub(config.window_before);
    let end = (idx + config.window_after + 1).min(words.len());
    let snippet = clean_snippet(&words[start..end].join(" "));
    let len = snippet.chars().count();
    (len > config.min_snippet_len && len < config.max_snippet_len).then_some(snippet)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A memory the store may keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Category whose table fired.
    pub category: MemoryCategory,
    /// Keyword that fired.
    pub keyword: &'static str,
    /// Cleaned snippet.
    pub snippet: String,
    /// Labelled content as stored.
    pub content: String,
    /// Importance of the snippet given the turn's emotion tags.
    pub importance: u8,
}

/// First passing candidate for a single category rule.
fn candidate_for(
    rule: &CategoryRule,
    player_message: &str,
    npc_reply: &str,
    emotions: Option<&str>,
    config: &MemoryConfig,
) -> Option<Candidate> {
    let joined;
    let text = if rule.reads_reply && config.scan_npc_reply {
        joined = format!("{player_message} {npc_reply}");
        joined.as_str()
    } else {
        player_message
    };
    let lowered = text.to_lowercase();

    rule.keywords
        .iter()
        .copied()
        .filter(|kw| lowered.contains(kw))
        .find_map(|kw| {
            let snippet = snippet_around(text, kw, config)?;
            Some(Candidate {
                category: rule.category,
                keyword: kw,
                content: rule.label.render(kw, &snippet),
                importance: importance::score(&snippet, emotions),
                snippet,
            })
        })
}

/// One candidate per category that fired, in table order.
#[must_use]
pub fn classify(
    player_message: &str,
    npc_reply: &str,
    emotions: Option<&str>,
    config: &MemoryConfig,
) -> Vec<Candidate> {
    CATEGORY_RULES
        .iter()
        .filter_map(|rule| candidate_for(rule, player_message, npc_reply, emotions, config))
        .collect()
}

// ---------------------------------------------------------------------------
// Near-duplicate detection
// ---------------------------------------------------------------------------

/// Lowercase, punctuation stripped, whitespace collapsed.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two memory contents say the same thing.
///
/// After normalisation the two are duplicates when either contains the other
/// or every word of one appears in the other.
#[must_use]
pub fn is_near_duplicate(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    if a.contains(&b) || b.contains(&a) {
        return true;
    }
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let long_words: std::collections::HashSet<&str> = long.split(' ').collect();
    short.split(' ').all(|w| long_words.contains(w))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MemoryConfig {
        MemoryConfig::default()
    }

    #[test]
    fn emotion_tags_join_in_table_order() {
        let ctx = emotional_context("Damn, I love this place", "I hate the cold");
        assert_eq!(ctx.as_deref(), Some("angry, positive, npc_negative"));
        assert_eq!(emotional_context("Good morning", "Morning"), None);
    }

    #[test]
    fn clean_snippet_normalises() {
        assert_eq!(clean_snippet("  i   promise to bring you,  "), "I promise to bring you");
        assert_eq!(clean_snippet("what a day!?"), "What a day");
        assert_eq!(clean_snippet(""), "");
    }

    #[test]
    fn window_is_three_words_each_side() {
        let text = "one two three four KEYWORD six seven eight nine";
        let s = snippet_around(text, "keyword", &cfg()).expect("long enough");
        assert_eq!(s, "Two three four KEYWORD six seven eight");
    }

    #[test]
    fn multi_word_keywords_are_located() {
        let text = "Honestly I grew up on a mining colony far away";
        let s = snippet_around(text, "grew up", &cfg()).expect("found");
        assert_eq!(s, "Honestly I grew up on a");
    }

    #[test]
    fn short_snippets_are_rejected() {
        assert!(snippet_around("I like it", "like", &cfg()).is_none());
    }

    #[test]
    fn promise_message_is_classified() {
        let msg = "I promise to bring you the crystal, that's a deal";
        let emotions = emotional_context(msg, "Alright.");
        let candidates = classify(msg, "Alright.", emotions.as_deref(), &cfg());
        let first = candidates.first().expect("a category fired");
        assert_eq!(first.category, MemoryCategory::Promises);
        assert_eq!(first.content, "Promise/Deal: I promise to bring you");
        assert!(first.importance >= 4);
    }

    #[test]
    fn gossip_label_names_the_resident() {
        let msg = "Yesterday I saw marcus sneaking into the storage bay";
        let candidates = classify(msg, "Oh?", None, &cfg());
        let gossip = candidates
            .iter()
            .find(|c| c.category == MemoryCategory::Gossip)
            .expect("gossip fired");
        assert!(gossip.content.starts_with("Gossip about marcus: "));
    }

    #[test]
    fn reply_is_ignored_unless_enabled() {
        let msg = "Tell me about the weather out here";
        let reply = "I promise you it will storm tonight";
        assert!(classify(msg, reply, None, &cfg()).iter().all(|c| c.category != MemoryCategory::Promises));

        let wide = MemoryConfig {
            scan_npc_reply: true,
            ..MemoryConfig::default()
        };
        assert!(classify(msg, reply, None, &wide).iter().any(|c| c.category == MemoryCategory::Promises));
    }

    #[test]
    fn overlapping_statements_are_duplicates() {
        assert!(is_near_duplicate(
            "Player shared: I love exploring the outpost",
            "Player shared: I really love exploring the outpost"
        ));
        assert!(is_near_duplicate("I LOVE the outpost!", "i love the outpost"));
        assert!(!is_near_duplicate(
            "Player shared: I love exploring the outpost",
            "Trade/Business: I want to buy some ore"
        ));
    }
}
