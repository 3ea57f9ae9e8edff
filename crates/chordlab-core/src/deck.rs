use crate::catalog::{CommandCatalog, WeightKind};
use crate::error::ClResult;
use tracing::debug;

/// A session's full draw order of command ids. Consumed by popping from the
/// end; the last element is the first trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    ids: Vec<u16>,
}

impl Deck {
    pub fn from_ids(ids: Vec<u16>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[u16] {
        &self.ids
    }

    pub fn draw(&mut self) -> Option<u16> {
        self.ids.pop()
    }
}

/// Expands the catalog into a weighted multiset of command ids and shuffles
/// it. Each id appears `weight(kind)` times; total length is the sum of the
/// chosen weight column.
pub fn build_deck(catalog: &CommandCatalog, kind: WeightKind) -> ClResult<Deck> {
    catalog.validate()?;

    let mut ids = Vec::new();
    for cmd in &catalog.commands {
        for _ in 0..cmd.weight(kind) {
            ids.push(cmd.id);
        }
    }

    shuffle(&mut ids);
    debug!(deck_len = ids.len(), "deck dealt");
    Ok(Deck::from_ids(ids))
}

/// Unbiased in-place Fisher-Yates: every permutation of the multiset is
/// equally likely.
fn shuffle(ids: &mut [u16]) {
    for i in (1..=ids.len()).rev() {
        let j = fastrand::usize(0..i);
        ids.swap(i - 1, j);
    }
}
