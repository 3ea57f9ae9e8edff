#![allow(dead_code)]

use chordlab_core::catalog::{Command, CommandCatalog};
use chordlab_core::config::ExperimentConfig;
use chordlab_core::deck::Deck;
use chordlab_core::engine::{DelayPolicy, TrialEngine};
use chordlab_core::layout::{KeyDescriptor, KeyLayout};

pub fn key(name: &str, row: usize, col: usize) -> KeyDescriptor {
    KeyDescriptor {
        name: name.to_string(),
        label: name.to_uppercase(),
        row,
        col,
    }
}

pub fn command(id: u16, first: &str, second: &str) -> Command {
    command_weighted(id, first, second, 1, 1)
}

pub fn command_weighted(
    id: u16,
    first: &str,
    second: &str,
    training_weight: u32,
    eval_weight: u32,
) -> Command {
    Command {
        id,
        label: format!("command {}", id),
        key_first: first.to_string(),
        key_second: second.to_string(),
        training_weight,
        eval_weight,
    }
}

/// A handful of keys on the 6x22 grid, enough for every chord fixture.
pub fn small_layout() -> KeyLayout {
    KeyLayout::new(
        6,
        22,
        vec![
            key("control", 5, 1),
            key("shift", 4, 1),
            key("alt", 5, 3),
            key("a", 3, 2),
            key("g", 3, 6),
            key("s", 3, 3),
            key("q", 2, 2),
        ],
    )
}

/// control+a, control+g, shift+q — gives "control" the partner set {a, g}.
pub fn small_catalog() -> CommandCatalog {
    CommandCatalog::new(vec![
        command(0, "control", "a"),
        command(1, "control", "g"),
        command(2, "shift", "q"),
    ])
}

/// Engine over an explicit draw order. Ids are drawn from the END of the
/// vec, so the LAST element is the first trial.
pub fn engine_with(catalog: CommandCatalog, draw_ids: Vec<u16>, block_size: usize) -> TrialEngine {
    let config = ExperimentConfig {
        block_size,
        ..Default::default()
    };
    TrialEngine::new(
        catalog,
        Deck::from_ids(draw_ids),
        DelayPolicy::from_config(&config),
    )
    .expect("engine fixture")
}
