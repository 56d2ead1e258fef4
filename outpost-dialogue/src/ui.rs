//! The UI seam the controller drives.

use parking_lot::Mutex;

use outpost_core::Quest;

/// Dialogue widgets as seen by the controller.
pub trait DialogueUi: Send + Sync {
    /// Show a line in the dialogue box.
    fn show_dialogue(&self, text: &str, speaker: &str);
    /// Hide the dialogue box.
    fn hide_dialogue(&self);
    /// Ask the player for free text.
    fn prompt_input(&self, placeholder: &str);
    /// Hide the text input.
    fn hide_input(&self);
    /// Present accept/decline for a pending quest.
    fn show_quest_offer(&self, quest: &Quest);
    /// Show a transient notice.
    fn show_message(&self, text: &str);
}

/// One call made on a [`RecordingUi`].
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// `show_dialogue`.
    Dialogue {
        /// Line shown.
        text: String,
        /// Speaker shown.
        speaker: String,
    },
    /// `hide_dialogue`.
    HideDialogue,
    /// `prompt_input`.
    Prompt(String),
    /// `hide_input`.
    HideInput,
    /// `show_quest_offer`, by quest title.
    QuestOffer(String),
    /// `show_message`.
    Message(String),
}

/// A UI that records every call; for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().clone()
    }

    /// Dialogue lines shown, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Dialogue { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The last dialogue line shown.
    #[must_use]
    pub fn last_line(&self) -> Option<String> {
        self.lines().pop()
    }

    /// Number of input prompts shown.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.events.lock().iter().filter(|e| matches!(e, UiEvent::Prompt(_))).count()
    }

    /// Forget everything recorded.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn record(&self, event: UiEvent) {
        self.events.lock().push(event);
    }
}

impl DialogueUi for RecordingUi {
    fn show_dialogue(&self, text: &str, speaker: &str) {
        self.record(UiEvent::Dialogue {
            text: text.to_string(),
            speaker: speaker.to_string(),
        });
    }

    fn hide_dialogue(&self) {
        self.record(UiEvent::HideDialogue);
    }

    fn prompt_input(&self, placeholder: &str) {
        self.record(UiEvent::Prompt(placeholder.to_string()));
    }

    fn hide_input(&self) {
        self.record(UiEvent::HideInput);
    }

    fn show_quest_offer(&self, quest: &Quest) {
        self.record(UiEvent::QuestOffer(quest.title.clone()));
    }

    fn show_message(&self, text: &str) {
        self.record(UiEvent::Message(text.to_string()));
    }
}
