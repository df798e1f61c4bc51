//! Demand propagation from virtual goals down the recipe graph.
//!
//! Each goal is walked depth-first. Stock on hand satisfies a demand and
//! stops the descent; anything missing is recorded as needed and, when
//! craftable, its components are demanded in turn.

use nemesis_common::ItemId;
use tracing::{trace, warn};

use crate::catalog::Catalog;
use crate::inventory::Counts;

/// Result of propagating goal demand through the recipe graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demand {
    /// Items reserved from stock to progress toward a goal.
    pub consume: Counts,
    /// Items missing on the path to a goal (critical items).
    pub need: Counts,
}

enum Step {
    Visit(ItemId),
    Leave(ItemId),
}

impl Demand {
    /// Propagates demand from every virtual goal in catalog order.
    ///
    /// `have` is the working snapshot and is drawn down as stock is reserved.
    #[must_use]
    pub fn propagate(catalog: &Catalog, have: &mut Counts) -> Self {
        let mut demand = Self::default();
        for goal in catalog.goals() {
            demand.walk(catalog, goal, have);
        }
        demand
    }

    /// Walks the graph below `root`, pre-order, components left to right.
    ///
    /// Siblings are not de-duplicated: an item reached through two branches
    /// is demanded twice.
    pub fn walk(&mut self, catalog: &Catalog, root: ItemId, have: &mut Counts) {
        let mut on_path = vec![false; catalog.len()];
        let mut stack = vec![Step::Visit(root)];

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Leave(id) => {
                    on_path[id.index()] = false;
                    continue;
                }
                Step::Visit(id) => id,
            };

            if let Some(held) = have.get_mut(&id).filter(|held| **held > 0) {
                *held -= 1;
                *self.consume.entry(id).or_insert(0) += 1;
                continue;
            }

            *self.need.entry(id).or_insert(0) += 1;

            // Drop-only: wait for it to drop.
            let Some(recipe) = catalog.recipe(id) else {
                continue;
            };

            if on_path[id.index()] {
                warn!(item = catalog.name(id), "Recipe cycle in catalog, abandoning branch");
                continue;
            }

            trace!(item = catalog.name(id), components = recipe.len(), "Expanding demand");
            on_path[id.index()] = true;
            stack.push(Step::Leave(id));
            stack.extend(recipe.iter().rev().map(|&component| Step::Visit(component)));
        }
    }

    /// Returns how many units of an item are reserved from stock.
    #[must_use]
    pub fn consumed(&self, item: ItemId) -> u32 {
        self.consume.get(&item).copied().unwrap_or(0)
    }

    /// Returns how many units of an item are missing.
    #[must_use]
    pub fn needed(&self, item: ItemId) -> u32 {
        self.need.get(&item).copied().unwrap_or(0)
    }

    /// Returns true if the item lies on the demand path of an unmet goal.
    #[must_use]
    pub fn is_critical(&self, item: ItemId) -> bool {
        self.need.contains_key(&item)
    }
}
