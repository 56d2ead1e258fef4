//! Plain stdout rendering of the dialogue widgets.

use std::io::Write as _;

use outpost_core::Quest;
use outpost_core::quest::QuestObjective;
use outpost_dialogue::DialogueUi;
use outpost_dialogue::controller::lines;

/// Prints dialogue lines as `Speaker: text`.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl DialogueUi for TerminalUi {
    fn show_dialogue(&self, text: &str, speaker: &str) {
        if text == lines::LOADING {
            return;
        }
        println!("\n{speaker}: {text}");
    }

    fn hide_dialogue(&self) {}

    fn prompt_input(&self, placeholder: &str) {
        print!("\n({placeholder})\n> ");
        let _ = std::io::stdout().flush();
    }

    fn hide_input(&self) {}

    fn show_quest_offer(&self, quest: &Quest) {
        let goal = match &quest.objective {
            QuestObjective::CollectItem { item_id, quantity } => {
                format!("collect {quantity} {}", item_id.spoken())
            }
            QuestObjective::TalkToNpc { npc_id, .. } => format!("talk to {npc_id}"),
        };
        println!("\n  [Quest offer] {}", quest.title);
        if !quest.description.is_empty() {
            println!("  {}", quest.description);
        }
        println!("  Goal: {goal}. Reward: {} crypto.", quest.reward.crypto);
        print!("  Accept? [y/n] > ");
        let _ = std::io::stdout().flush();
    }

    fn show_message(&self, text: &str) {
        println!("\n* {text}");
    }
}
