//! Recommendation model and the pure recompute pipeline.

use nemesis_common::ItemId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::demand::Demand;
use crate::extras::fill_slots;
use crate::inventory::Inventory;
use crate::selection::{candidates, Batch};

/// Guidance shown when nothing is held.
pub const EMPTY_INVENTORY_GUIDANCE: &str = "You have no items in your inventory.";

/// Guidance shown when no recipe is buildable and surplus fills the slate.
pub const USE_EXTRAS_GUIDANCE: &str = "Using up extra items.";

/// Guidance shown when a full slate cannot be assembled.
pub const WAITING_GUIDANCE: &str = "Waiting for more items.";

/// Which outcome a recommendation represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Every physical count is zero.
    #[default]
    EmptyInventory,
    /// One or more recipes should be built.
    Build,
    /// Nothing is buildable; surplus items should be used up.
    UseExtras,
    /// Not enough items for a full slate.
    Waiting,
}

/// What the player should do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Outcome category.
    pub kind: RecommendationKind,
    /// Message for the player.
    pub guidance: String,
    /// Items to put in the slots, always empty or full.
    pub items: Vec<String>,
    /// Recipe items produced by using `items`.
    pub results: Vec<String>,
}

impl Default for Recommendation {
    fn default() -> Self {
        Self::empty_inventory()
    }
}

impl Recommendation {
    /// Recommendation for an empty inventory.
    #[must_use]
    pub fn empty_inventory() -> Self {
        Self::without_items(RecommendationKind::EmptyInventory, EMPTY_INVENTORY_GUIDANCE)
    }

    /// Recommendation when no full slate can be assembled.
    #[must_use]
    pub fn waiting() -> Self {
        Self::without_items(RecommendationKind::Waiting, WAITING_GUIDANCE)
    }

    fn without_items(kind: RecommendationKind, guidance: &str) -> Self {
        Self {
            kind,
            guidance: guidance.to_string(),
            items: Vec::new(),
            results: Vec::new(),
        }
    }
}

fn names(catalog: &Catalog, ids: impl IntoIterator<Item = ItemId>) -> Vec<String> {
    ids.into_iter()
        .map(|id| catalog.name(id).to_string())
        .collect()
}

/// Recomputes the recommendation from scratch.
///
/// Pure with respect to its inputs: the inventory is only read, all
/// bookkeeping happens on a snapshot.
#[must_use]
pub fn recommend(catalog: &Catalog, inventory: &Inventory) -> Recommendation {
    let mut have = inventory.snapshot(catalog);
    if have.values().all(|&count| count == 0) {
        return Recommendation::empty_inventory();
    }

    let demand = Demand::propagate(catalog, &mut have);
    let found = candidates(catalog, &have, &demand);
    let batch = Batch::pack(catalog, &found);
    debug!(
        candidates = found.len(),
        batch = batch.entries().len(),
        critical = demand.need.len(),
        "Selected recipe batch"
    );

    let Some(slots) = fill_slots(catalog, &have, &demand.need, batch.components(catalog)) else {
        return Recommendation::waiting();
    };

    match batch.guidance(catalog) {
        Some(guidance) => Recommendation {
            kind: RecommendationKind::Build,
            guidance,
            items: names(catalog, slots),
            results: names(catalog, batch.results()),
        },
        None => Recommendation {
            kind: RecommendationKind::UseExtras,
            guidance: USE_EXTRAS_GUIDANCE.to_string(),
            items: names(catalog, slots),
            results: Vec::new(),
        },
    }
}
