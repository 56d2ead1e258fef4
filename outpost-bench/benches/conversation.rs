//! Outpost benchmark suite: the work done on every dialogue turn.
//!
//!   record_turn_single ................ extract, dedup, score, prune, history
//!   record_turn_full_store ............ same, with the list at capacity
//!   memory_context_full_store ......... render the context block
//!   prune_overflow_by_ten ............. rank and evict
//!   intent_classify_mixed ............. quest-request detection
//!   quest_generate_random ............. template generation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand::rngs::StdRng;

use outpost_core::config::{MemoryConfig, QuestConfig, RelationshipConfig};
use outpost_core::memory::{MemoryCategory, MemoryEntry, MemoryStore};
use outpost_core::quest::QuestKind;
use outpost_core::quest::generator;
use outpost_core::roster::Roster;
use outpost_core::types::NpcId;
use outpost_core::{importance, pruning};
use outpost_dialogue::intent;

const PLAYER_LINES: &[&str] = &[
    "I promise I'll bring you the crystals by tomorrow, that's a deal",
    "My family grew up on a mining planet far from here",
    "I heard Marcus has been fixing the reactor all week",
    "I trust you, and I really like how you run this place",
    "What's the price of water filters these days?",
    "Damn, I hate these sandstorms",
];

fn full_store(npc: &NpcId) -> MemoryStore {
    let mut store = MemoryStore::new(MemoryConfig::default(), RelationshipConfig::default());
    for i in 0..200 {
        let line = PLAYER_LINES[i % PLAYER_LINES.len()];
        store.record_turn(npc, &format!("{line} (take {i})"), "Noted.");
    }
    store
}

fn scored_entries(n: usize) -> Vec<MemoryEntry> {
    (0..n)
        .map(|i| {
            let content = format!("Player shared: memory number {i} about the outpost");
            let score = importance::score(&content, None);
            MemoryEntry::new(MemoryCategory::PersonalInfo, content, None, score + (i % 5) as u8)
        })
        .collect()
}

/// One turn into an empty store.
fn bench_record_turn(c: &mut Criterion) {
    let npc = NpcId::from("trader_eliza");
    c.bench_function("record_turn_single", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new(MemoryConfig::default(), RelationshipConfig::default());
            let record = store.record_turn(
                black_box(&npc),
                black_box(PLAYER_LINES[0]),
                black_box("A deal is a deal."),
            );
            black_box(record);
        });
    });
}

/// One turn into a store already at capacity.
fn bench_record_turn_full(c: &mut Criterion) {
    let npc = NpcId::from("trader_eliza");
    let store = full_store(&npc);
    c.bench_function("record_turn_full_store", |b| {
        b.iter_batched(
            || store.clone(),
            |mut store| {
                let record = store.record_turn(
                    black_box(&npc),
                    black_box("I swear on my family I will pay you back, I promise"),
                    black_box("I'll hold you to that."),
                );
                black_box(record);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Render the context block for a full store.
fn bench_memory_context(c: &mut Criterion) {
    let npc = NpcId::from("trader_eliza");
    let mut store = full_store(&npc);
    c.bench_function("memory_context_full_store", |b| {
        b.iter(|| {
            let rendered = store.memory_context(black_box(&npc));
            black_box(rendered);
        });
    });
}

/// Prune a list ten over capacity.
fn bench_prune(c: &mut Criterion) {
    let capacity = MemoryConfig::default().capacity;
    let entries = scored_entries(capacity + 10);
    c.bench_function("prune_overflow_by_ten", |b| {
        b.iter_batched(
            || entries.clone(),
            |mut list| {
                let evicted = pruning::prune(black_box(&mut list), capacity);
                black_box(evicted);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Classify a mix of chat and quest lines.
fn bench_intent(c: &mut Criterion) {
    let lines = [
        "Do you have any work for me?",
        "How have you been lately?",
        "I could collect for you some ore",
        "Tell me about the network outage",
        PLAYER_LINES[3],
    ];
    c.bench_function("intent_classify_mixed", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(intent::classify(black_box(line)));
            }
        });
    });
}

/// Generate a random quest template.
fn bench_quest_generation(c: &mut Criterion) {
    let roster = Roster::default();
    let config = QuestConfig::default();
    let giver = NpcId::from("commander_sarah");
    let mut rng = StdRng::seed_from_u64(7);
    c.bench_function("quest_generate_random", |b| {
        b.iter(|| {
            let template = generator::generate(
                QuestKind::Random,
                black_box(&giver),
                &roster.items,
                &roster.npcs,
                &config,
                &mut rng,
            );
            black_box(template);
        });
    });
}

criterion_group!(
    benches,
    bench_record_turn,
    bench_record_turn_full,
    bench_memory_context,
    bench_prune,
    bench_intent,
    bench_quest_generation,
);
criterion_main!(benches);
