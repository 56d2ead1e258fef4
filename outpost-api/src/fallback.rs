//! Fixed lines and payloads used when the service cannot answer.

use std::fmt;

use serde_json::json;

use crate::types::{GenerateQuestResponse, QuestPayload};

/// Topics with a canned fallback line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackTopic {
    /// Buying and selling.
    Trade,
    /// Asking for work.
    Quest,
    /// Research talk.
    Research,
    /// Found artifacts.
    Artifacts,
    /// Outpost security.
    Security,
    /// Offering help.
    Help,
    /// Anything else, used for non-connection failures.
    Custom,
    /// The service could not be reached.
    ConnectionError,
}

impl FallbackTopic {
    /// Every topic with a dedicated line.
    pub const ALL: [Self; 8] = [
        Self::Trade,
        Self::Quest,
        Self::Research,
        Self::Artifacts,
        Self::Security,
        Self::Help,
        Self::Custom,
        Self::ConnectionError,
    ];

    /// Wire id of the topic.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Trade => "trade",
            Self::Quest => "quest",
            Self::Research => "research",
            Self::Artifacts => "artifacts",
            Self::Security => "security",
            Self::Help => "help",
            Self::Custom => "custom",
            Self::ConnectionError => "connection_error",
        }
    }

    /// Look a topic up by wire id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// The canned line for this topic.
    #[must_use]
    pub fn line(self) -> &'static str {
        match self {
            Self::Trade => {
                "I have some interesting items, but my inventory system is currently offline. Please check back later!"
            }
            Self::Quest => {
                "I do have some work that needs doing, but I need to check my task list. Can you come back in a moment?"
            }
            Self::Research => {
                "My research is quite fascinating! I'm studying ancient technology and energy patterns."
            }
            Self::Artifacts => {
                "I've found several mysterious artifacts, but I need more time to analyze them properly."
            }
            Self::Security => {
                "Security is always a concern around here. We're doing our best to keep everyone safe."
            }
            Self::Help => {
                "We could always use more help around here. Let me know if you're interested in joining our security team."
            }
            Self::Custom => {
                "That's an interesting point. I'd love to discuss it more, but my connection to the central database is currently down."
            }
            Self::ConnectionError => {
                "I'm having trouble connecting to the central database right now. Please try again in a moment."
            }
        }
    }
}

impl fmt::Display for FallbackTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Line for topics without a dedicated entry.
pub const DEFAULT_LINE: &str = "That's an interesting question. I'd love to tell you more, but my connection to the central database is currently down.";

/// Reply used when the service answers without `message` or `response`.
pub const EMPTY_REPLY_LINE: &str = "I'm not sure how to respond to that.";

/// Fallback line for a topic id; unknown ids get [`DEFAULT_LINE`].
#[must_use]
pub fn line_for(topic_id: &str) -> &'static str {
    FallbackTopic::from_id(topic_id).map_or(DEFAULT_LINE, FallbackTopic::line)
}

/// The failure object returned when quest generation cannot reach the service.
#[must_use]
pub fn generate_quest_failure() -> GenerateQuestResponse {
    GenerateQuestResponse {
        success: false,
        message: Some("Failed to generate quest".to_string()),
        quest: Some(QuestPayload {
            error: Some("Unable to generate quest at this time".to_string()),
            response: Some(
                "I'm having trouble processing that suggestion right now. Could you try something else?"
                    .to_string(),
            ),
            ..QuestPayload::default()
        }),
    }
}

/// The placeholder quest returned when `/api/quest` fails.
#[must_use]
pub fn fallback_quest() -> serde_json::Value {
    json!({
        "quest": {
            "id": format!("fallback_quest_{}", chrono::Utc::now().timestamp_millis()),
            "title": "Temporary Assignment",
            "description": "This is a placeholder quest while the system is offline.",
            "reward": "Basic compensation",
            "status": "available",
        },
        "source": "fallback",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for topic in FallbackTopic::ALL {
            assert_eq!(FallbackTopic::from_id(topic.id()), Some(topic));
        }
    }

    #[test]
    fn unknown_topic_gets_default_line() {
        assert_eq!(line_for("weather"), DEFAULT_LINE);
        assert_eq!(line_for("trade"), FallbackTopic::Trade.line());
    }

    #[test]
    fn failure_object_carries_a_spoken_line() {
        let failure = generate_quest_failure();
        assert!(!failure.success);
        let quest = failure.quest.expect("quest payload");
        assert!(quest.error.is_some());
        assert!(quest.response.expect("line").starts_with("I'm having trouble"));
    }

    #[test]
    fn fallback_quest_is_tagged() {
        let quest = fallback_quest();
        assert_eq!(quest["source"], "fallback");
        assert_eq!(quest["quest"]["title"], "Temporary Assignment");
        assert!(quest["quest"]["id"].as_str().expect("id").starts_with("fallback_quest_"));
    }
}
