use crate::error::{ChordLabError, ClResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A single physical key: its normalized name, the label shown to the
/// participant, and the backlight grid cell it occupies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDescriptor {
    pub name: String,
    pub label: String,
    pub row: usize,
    pub col: usize,
}

/// Immutable key name -> grid cell mapping for one keyboard.
///
/// Key identity is case-insensitive; names are normalized to lowercase
/// when the lookup map is rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeyLayout {
    pub rows: usize,
    pub cols: usize,
    pub keys: Vec<KeyDescriptor>,

    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl KeyLayout {
    pub fn new(rows: usize, cols: usize, keys: Vec<KeyDescriptor>) -> Self {
        let mut layout = Self {
            rows,
            cols,
            keys,
            by_name: HashMap::new(),
        };
        layout.rebuild_index();
        layout
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ClResult<Self> {
        let content = fs::read_to_string(&path)?;
        let mut layout: KeyLayout = serde_json::from_str(&content)?;
        layout.rebuild_index();
        layout.validate()?;
        Ok(layout)
    }

    /// The hardware map of the study keyboard: 26 letters plus the three
    /// modifiers, addressed on a 6x22 backlight grid.
    pub fn with_defaults() -> Self {
        let defaults: &[(&str, &str, usize, usize)] = &[
            ("a", "A", 3, 2),
            ("b", "B", 4, 7),
            ("c", "C", 4, 5),
            ("d", "D", 3, 4),
            ("e", "E", 2, 4),
            ("f", "F", 3, 5),
            ("g", "G", 3, 6),
            ("h", "H", 3, 7),
            ("i", "I", 2, 9),
            ("j", "J", 3, 8),
            ("k", "K", 3, 9),
            ("l", "L", 3, 10),
            ("m", "M", 4, 9),
            ("n", "N", 4, 8),
            ("o", "O", 2, 10),
            ("p", "P", 2, 11),
            ("q", "Q", 2, 2),
            ("r", "R", 2, 5),
            ("s", "S", 3, 3),
            ("t", "T", 2, 6),
            ("u", "U", 2, 8),
            ("v", "V", 4, 6),
            ("w", "W", 2, 3),
            ("x", "X", 4, 4),
            ("y", "Y", 2, 7),
            ("z", "Z", 4, 3),
            ("control", "Ctrl", 5, 1),
            ("shift", "Shift", 4, 1),
            ("alt", "Alt", 5, 3),
        ];

        let keys = defaults
            .iter()
            .map(|&(name, label, row, col)| KeyDescriptor {
                name: name.to_string(),
                label: label.to_string(),
                row,
                col,
            })
            .collect();

        Self::new(crate::consts::GRID_ROWS, crate::consts::GRID_COLS, keys)
    }

    fn rebuild_index(&mut self) {
        self.by_name.clear();
        for (i, key) in self.keys.iter().enumerate() {
            self.by_name.insert(key.name.to_lowercase(), i);
        }
    }

    pub fn validate(&self) -> ClResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ChordLabError::Config(
                "layout grid must have non-zero dimensions".to_string(),
            ));
        }
        if self.keys.is_empty() {
            return Err(ChordLabError::Config("layout has no keys".to_string()));
        }
        if self.by_name.len() != self.keys.len() {
            return Err(ChordLabError::Config(
                "layout contains duplicate key names".to_string(),
            ));
        }
        for key in &self.keys {
            if key.row >= self.rows || key.col >= self.cols {
                return Err(ChordLabError::Config(format!(
                    "key '{}' cell ({}, {}) is outside the {}x{} grid",
                    key.name, key.row, key.col, self.rows, self.cols
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&KeyDescriptor> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.keys[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}
