use crate::error::{ChordLabError, ClResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Which frequency column a deck is dealt from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightKind {
    Training,
    Evaluation,
}

impl std::fmt::Display for WeightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightKind::Training => write!(f, "training"),
            WeightKind::Evaluation => write!(f, "evaluation"),
        }
    }
}

/// One trainable command: the instruction shown to the participant and the
/// two-key chord that answers it, in required press order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub id: u16,
    pub label: String,
    pub key_first: String,
    pub key_second: String,
    pub training_weight: u32,
    pub eval_weight: u32,
}

impl Command {
    pub fn weight(&self, kind: WeightKind) -> u32 {
        match kind {
            WeightKind::Training => self.training_weight,
            WeightKind::Evaluation => self.eval_weight,
        }
    }
}

/// Immutable ordered command list, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommandCatalog {
    pub commands: Vec<Command>,

    #[serde(skip)]
    by_id: HashMap<u16, usize>,
}

impl CommandCatalog {
    pub fn new(commands: Vec<Command>) -> Self {
        let mut catalog = Self {
            commands,
            by_id: HashMap::new(),
        };
        catalog.rebuild_index();
        catalog
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ClResult<Self> {
        let content = fs::read_to_string(&path)?;
        let commands: Vec<Command> = serde_json::from_str(&content)?;
        let catalog = Self::new(commands);
        catalog.validate()?;
        Ok(catalog)
    }

    /// The smart-home command set of the original study, with its training
    /// and evaluation frequency columns.
    pub fn with_defaults() -> Self {
        let defaults: &[(u16, &str, &str, &str, u32, u32)] = &[
            (0, "Turn up living room lights", "control", "s", 4, 2),
            (1, "Turn down living room lights", "control", "a", 4, 2),
            (2, "Raise the upstairs blinds", "control", "g", 6, 3),
            (3, "Lower the upstairs blinds", "control", "b", 6, 3),
            (4, "Turn off all lights", "control", "m", 3, 1),
            (5, "Set lights to party mode", "control", "u", 2, 1),
            (6, "Turn on/off porch lights", "control", "p", 4, 2),
            (7, "Adjust temperature up 1 deg", "alt", "o", 3, 1),
            (8, "Adjust temperature down 1 deg", "alt", "l", 3, 1),
            (9, "Increase bedroom fan speed", "alt", "t", 2, 1),
            (10, "Decrease bedroom fan speed", "alt", "r", 2, 1),
            (11, "Run the dehumidifier", "alt", "a", 1, 1),
            (12, "Change air conditioner mode", "alt", "n", 6, 3),
            (13, "Turn on/off dining room fan", "alt", "c", 12, 6),
            (14, "Open the garage door", "shift", "i", 2, 1),
            (15, "Close the garage door", "shift", "u", 2, 1),
            (16, "Lock the main door", "shift", "f", 12, 6),
            (17, "Unlock the main door", "shift", "v", 12, 6),
            (18, "Call emergency services", "shift", "q", 1, 1),
            (19, "Test the smoke detector", "shift", "x", 1, 1),
            (20, "Turn on/off alarm system", "shift", "n", 2, 1),
        ];

        let commands = defaults
            .iter()
            .map(
                |&(id, label, key_first, key_second, training_weight, eval_weight)| Command {
                    id,
                    label: label.to_string(),
                    key_first: key_first.to_string(),
                    key_second: key_second.to_string(),
                    training_weight,
                    eval_weight,
                },
            )
            .collect();

        Self::new(commands)
    }

    fn rebuild_index(&mut self) {
        self.by_id.clear();
        for (i, cmd) in self.commands.iter().enumerate() {
            self.by_id.insert(cmd.id, i);
        }
    }

    pub fn validate(&self) -> ClResult<()> {
        if self.commands.is_empty() {
            return Err(ChordLabError::Config("command catalog is empty".to_string()));
        }
        if self.by_id.len() != self.commands.len() {
            return Err(ChordLabError::Config(
                "command catalog contains duplicate ids".to_string(),
            ));
        }
        for cmd in &self.commands {
            if cmd.training_weight == 0 || cmd.eval_weight == 0 {
                return Err(ChordLabError::Config(format!(
                    "command {} ('{}') has a zero frequency weight",
                    cmd.id, cmd.label
                )));
            }
            if cmd.key_first.eq_ignore_ascii_case(&cmd.key_second) {
                return Err(ChordLabError::Config(format!(
                    "command {} ('{}') pairs key '{}' with itself",
                    cmd.id, cmd.label, cmd.key_first
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: u16) -> Option<&Command> {
        self.by_id.get(&id).map(|&i| &self.commands[i])
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
