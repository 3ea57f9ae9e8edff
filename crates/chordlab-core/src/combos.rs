use crate::catalog::CommandCatalog;
use crate::error::{ChordLabError, ClResult};
use crate::layout::KeyLayout;
use std::collections::{BTreeSet, HashMap};

/// Precomputed partner sets and grid cells, built once per session.
///
/// For every key that appears in some command, `partners` holds the set of
/// keys it co-occurs with (both directions, deduplicated); `cells` maps every
/// layout key to its grid cell for O(1) render lookup. Read-only after
/// construction.
#[derive(Debug, Clone)]
pub struct CombinationIndex {
    partners: HashMap<String, BTreeSet<String>>,
    cells: HashMap<String, (usize, usize)>,
}

impl CombinationIndex {
    pub fn build(catalog: &CommandCatalog, layout: &KeyLayout) -> ClResult<Self> {
        let mut partners: HashMap<String, BTreeSet<String>> = HashMap::new();

        for cmd in &catalog.commands {
            let first = cmd.key_first.to_lowercase();
            let second = cmd.key_second.to_lowercase();

            for name in [&first, &second] {
                if !layout.contains(name) {
                    return Err(ChordLabError::Config(format!(
                        "command {} ('{}') references key '{}' absent from the layout",
                        cmd.id, cmd.label, name
                    )));
                }
            }

            partners
                .entry(first.clone())
                .or_default()
                .insert(second.clone());
            partners.entry(second).or_default().insert(first);
        }

        let cells = layout
            .keys
            .iter()
            .map(|k| (k.name.to_lowercase(), (k.row, k.col)))
            .collect();

        Ok(Self { partners, cells })
    }

    /// Partner keys of `name`, in stable order. Empty for keys that appear
    /// in no command.
    pub fn partners<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.partners
            .get(&name.to_lowercase())
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn partner_count(&self, name: &str) -> usize {
        self.partners
            .get(&name.to_lowercase())
            .map_or(0, BTreeSet::len)
    }

    pub fn cell(&self, name: &str) -> Option<(usize, usize)> {
        self.cells.get(&name.to_lowercase()).copied()
    }
}
