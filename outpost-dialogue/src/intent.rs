//! Quest-request detection for player lines.
//!
//! Lowercase substring matching against two tables. Any casual phrase wins
//! over any quest phrase, so "how's work lately" is chat. Substring matching
//! is loose: `"hi"` also matches inside `"this"`.

/// Phrases that mark a line as asking for (or offering) work.
pub const QUEST_KEYWORDS: &[&str] = &[
    "quest",
    "work",
    "job",
    "task",
    "mission",
    "help me",
    "need help",
    "collect for",
    "find for",
    "bring for",
    "get for",
    "can you give me a quest",
    "do you have work",
    "any tasks available",
    "looking for work",
    "need a job",
    "want to help",
];

/// Phrases that force a line to be treated as conversation.
pub const CASUAL_CONTEXTS: &[&str] = &[
    "how are you",
    "how have you been",
    "what's up",
    "sup",
    "hello",
    "hi",
    "heard about",
    "tell me about",
    "what do you think",
    "do you know",
    "recently",
    "lately",
    "together",
    "relationship",
    "love",
    "dating",
    "personal",
    "private",
    "between you and",
    "you and",
    "got together",
];

/// How a player line is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Sent to quest generation.
    QuestSuggestion,
    /// Sent to free dialogue.
    RegularChat,
}

/// Whether `message` asks for or suggests a quest.
#[must_use]
pub fn is_quest_request(message: &str) -> bool {
    let lower = message.to_lowercase();
    if CASUAL_CONTEXTS.iter().any(|c| lower.contains(c)) {
        return false;
    }
    QUEST_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Route a player line.
#[must_use]
pub fn classify(message: &str) -> Intent {
    if is_quest_request(message) {
        Intent::QuestSuggestion
    } else {
        Intent::RegularChat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_requests_are_quests() {
        assert!(is_quest_request("Do you have a JOB for me?"));
        assert!(is_quest_request("I could collect for you"));
        assert_eq!(classify("any mission?"), Intent::QuestSuggestion);
    }

    #[test]
    fn casual_context_overrides() {
        assert!(!is_quest_request("How are you? Any work?"));
        assert!(!is_quest_request("What do you think about the new mission"));
    }

    #[test]
    fn substring_false_positives_are_kept() {
        // "this" contains "hi".
        assert!(!is_quest_request("Is this a task?"));
        // "network" contains "work".
        assert!(is_quest_request("The network is down"));
    }

    #[test]
    fn plain_chat() {
        assert_eq!(classify("Nice weather"), Intent::RegularChat);
    }
}
