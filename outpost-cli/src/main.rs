//! Outpost CLI: talk to NPCs from a terminal and inspect what they remember.

mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use outpost_api::ServiceClient;
use outpost_core::config::{GeneralConfig, OutpostConfig};
use outpost_core::persistence::LocalSaveStore;
use outpost_core::relationship::RelationshipField;
use outpost_core::roster::Roster;
use outpost_core::{GameState, ItemId, NpcId};
use outpost_dialogue::{DialogueController, DialogueState, QuestDecision, StaticWorld};

use crate::terminal::TerminalUi;

#[derive(Parser)]
#[command(name = "outpost")]
#[command(about = "Talk to the residents of a frontier outpost", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "OUTPOST_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an interactive dialogue with one NPC
    Chat {
        /// NPC id (see `outpost npcs`)
        #[arg(short, long)]
        npc: String,
    },
    /// List the outpost's residents
    Npcs,
    /// Dump the memories stored in a local save
    Memories {
        /// Save key; defaults to the configured local key
        #[arg(short, long)]
        save: Option<String>,
    },
    /// Check that the dialogue service answers
    Health,
    /// Show or clear the service's conversation logs
    Logs {
        /// Clear instead of showing
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => OutpostConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => OutpostConfig::default(),
    };
    init_tracing(&config.general);

    match cli.command {
        Commands::Chat { npc } => chat(config, &npc).await?,
        Commands::Npcs => list_npcs(),
        Commands::Memories { save } => dump_memories(&config, save)?,
        Commands::Health => {
            let client = ServiceClient::new(&config.api)?;
            if client.test_connection().await {
                println!("{} is up", client.base_url());
            } else {
                bail!("{} is unreachable", client.base_url());
            }
        }
        Commands::Logs { clear } => {
            let client = ServiceClient::new(&config.api)?;
            let body = if clear {
                client.clear_logs().await
            } else {
                client.logs().await
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

fn init_tracing(general: &GeneralConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if general.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ---------------------------------------------------------------------------
// chat
// ---------------------------------------------------------------------------

async fn chat(config: OutpostConfig, npc: &str) -> Result<()> {
    let roster = Roster::default();
    let npc_id = NpcId::from(npc);
    if roster.npc(&npc_id).is_none() {
        bail!("unknown NPC '{npc}'; run `outpost npcs` for the roster");
    }

    let client = Arc::new(ServiceClient::from_config(&config)?);
    let game = match client.load_state(&config).await {
        Ok(Some(game)) => {
            info!(quests = game.quests.active().len(), "Resumed saved game");
            game
        }
        Ok(None) => GameState::new(&config),
        Err(err) => {
            warn!(error = %err, "Saved game unreadable, starting fresh");
            GameState::new(&config)
        }
    };

    let world = Arc::new(StaticWorld::from_roster(&roster));
    let mut controller =
        DialogueController::new(config, roster, game, Arc::new(TerminalUi), world, client.clone());
    controller.start(&npc_id).await;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = input.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if matches!(controller.state(), DialogueState::AwaitingQuestDecision { .. }) {
            match line.to_lowercase().as_str() {
                "y" | "yes" => controller.decide_quest(QuestDecision::Accept).await,
                "n" | "no" => controller.decide_quest(QuestDecision::Decline).await,
                _ => println!("  Please answer y or n."),
            }
            continue;
        }

        match line {
            "/quit" | "/bye" => break,
            "/inventory" => print_inventory(controller.game()),
            "/save" => {
                let outcome = client.save_state(controller.game_mut()).await;
                println!("* {}", outcome.message.unwrap_or_else(|| "Saved.".to_string()));
            }
            _ => match line.strip_prefix("/give ") {
                Some(args) => give(&mut controller, args),
                None => controller.handle_player_message(line).await,
            },
        }
    }

    controller.close();
    let mut game = controller.into_game();
    let outcome = client.save_state(&mut game).await;
    if outcome.success {
        println!("\n* Game saved.");
    } else {
        warn!(message = ?outcome.message, "Game was not saved");
    }
    Ok(())
}

/// `/give <item> [quantity]`: drop items into the player's bags.
fn give(controller: &mut DialogueController, args: &str) {
    let mut parts = args.split_whitespace();
    let Some(item) = parts.next() else {
        println!("* usage: /give <item> [quantity]");
        return;
    };
    let quantity = parts.next().and_then(|q| q.parse().ok()).unwrap_or(1);
    let item_id = ItemId::new(item);
    match controller.game_mut().inventory.add_items(&item_id, quantity) {
        Ok(()) => println!("* Picked up {quantity} {}.", item_id.spoken()),
        Err(err) => println!("* {err}"),
    }
}

fn print_inventory(game: &GameState) {
    println!("\n* Crypto: {}", game.inventory.crypto());
    for stack in game.inventory.stacks() {
        println!("*   {} x{}", stack.item_id, stack.quantity);
    }
    for quest in game.quests.active() {
        println!("* Quest: {} (from {})", quest.title, quest.giver_name);
    }
}

// ---------------------------------------------------------------------------
// npcs / memories
// ---------------------------------------------------------------------------

fn list_npcs() {
    for npc in Roster::default().npcs {
        println!("{:<18} {:<28} {}", npc.id.as_str(), npc.name, npc.role);
    }
}

fn dump_memories(config: &OutpostConfig, save: Option<String>) -> Result<()> {
    let store = LocalSaveStore::from_config(config)?;
    let key = save.unwrap_or_else(|| config.api.local_save_key.clone());
    let Some(game) = store.load_state(&key, config)? else {
        println!("No save '{key}' in {}", store.db_path().display());
        return Ok(());
    };

    let roster = Roster::default();
    let mut records: Vec<_> = game.memory.iter().collect();
    records.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));

    for (id, record) in records {
        let name = roster.npc(id).map_or_else(|| id.to_string(), |p| p.name.clone());
        println!("== {name} ==");
        let scores = game.memory.relationship(id);
        let line: Vec<String> = [
            RelationshipField::Trust,
            RelationshipField::Friendship,
            RelationshipField::Respect,
            RelationshipField::Attraction,
        ]
        .into_iter()
        .map(|f| format!("{f} {}", scores.get(f)))
        .collect();
        println!("  {}", line.join(", "));
        for memory in &record.memories {
            let emotion = memory
                .emotional_context
                .as_deref()
                .map(|e| format!(" ({e})"))
                .unwrap_or_default();
            println!(
                "  [{}|{}] {}{emotion}",
                memory.category, memory.importance, memory.content
            );
        }
        println!("  {} recent exchanges", record.history.len());
    }
    if let Some(saved_at) = game.saved_at {
        println!("Saved at {saved_at}");
    }
    Ok(())
}
