//! One open dialogue: the NPC, the conversation so far, and the
//! cancellation token that guards every delayed continuation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use outpost_core::roster::NpcProfile;

/// Who spoke a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The player.
    Player,
    /// The NPC of the session.
    Npc,
}

/// A line in the session's conversation buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationLine {
    /// Speaker.
    pub speaker: Speaker,
    /// What was said.
    pub text: String,
    /// When it was said.
    pub timestamp: DateTime<Utc>,
}

/// An open dialogue with one NPC.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    npc: NpcProfile,
    token: CancellationToken,
    conversation: Vec<ConversationLine>,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Open a session with a fresh id and token.
    #[must_use]
    pub fn new(npc: NpcProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            npc,
            token: CancellationToken::new(),
            conversation: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Session id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The NPC being talked to.
    #[must_use]
    pub fn npc(&self) -> &NpcProfile {
        &self.npc
    }

    /// When the session opened.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// A handle that cancels this session from outside the controller.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel every pending continuation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the session has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait `ms`, returning `false` if the session was cancelled first.
    pub async fn pause(&self, ms: u64) -> bool {
        tokio::select! {
            () = self.token.cancelled() => false,
            () = tokio::time::sleep(Duration::from_millis(ms)) => true,
        }
    }

    /// Append a player line.
    pub fn push_player(&mut self, text: impl Into<String>) {
        self.push(Speaker::Player, text.into());
    }

    /// Append an NPC line.
    pub fn push_npc(&mut self, text: impl Into<String>) {
        self.push(Speaker::Npc, text.into());
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.conversation.push(ConversationLine {
            speaker,
            text,
            timestamp: Utc::now(),
        });
    }

    /// Lines so far.
    #[must_use]
    pub fn conversation(&self) -> &[ConversationLine] {
        &self.conversation
    }

    /// The conversation as `Speaker: line` lines, the NPC named by display name.
    #[must_use]
    pub fn context(&self) -> String {
        self.conversation
            .iter()
            .map(|line| match line.speaker {
                Speaker::Player => format!("Player: {}", line.text),
                Speaker::Npc => format!("{}: {}", self.npc.name, line.text),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::roster::Roster;

    fn session() -> Session {
        Session::new(Roster::default().npcs[2].clone())
    }

    #[test]
    fn context_names_speakers() {
        let mut s = session();
        s.push_npc("Welcome, traveler.");
        s.push_player("Got anything cheap?");
        assert_eq!(
            s.context(),
            "Trader Eliza Thompson: Welcome, traveler.\nPlayer: Got anything cheap?"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pause_completes_unless_cancelled() {
        let s = session();
        assert!(s.pause(2_000).await);
        s.cancel();
        assert!(!s.pause(2_000).await);
        assert!(s.is_cancelled());
    }

    #[test]
    fn every_session_is_distinct() {
        assert_ne!(session().id(), session().id());
    }
}
