//! Candidate selection and batch packing.
//!
//! Critical recipes (on the path to an unmet goal) are built from reserved
//! stock; everything else is built from what is left over. Candidates are
//! packed greedily into a batch that fits the recommendation slots without
//! two recipes competing for the same component.

use std::collections::HashSet;

use nemesis_common::{ItemId, SLOT_COUNT};

use crate::catalog::Catalog;
use crate::demand::Demand;
use crate::inventory::Counts;

/// A recipe whose components are all available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Item the recipe produces.
    pub item: ItemId,
    /// Whether the item is on the demand path of an unmet goal.
    pub is_critical: bool,
}

/// Finds every buildable recipe, ordered by preference.
///
/// Critical candidates come first; within the same criticality, longer
/// recipes come first since they shrink the inventory fastest. Ties keep
/// catalog order.
#[must_use]
pub fn candidates(catalog: &Catalog, have: &Counts, demand: &Demand) -> Vec<Candidate> {
    let mut available: Vec<Candidate> = catalog
        .craftable()
        .filter_map(|(item, recipe)| {
            let is_critical = demand.is_critical(item);
            let satisfiable = recipe.iter().all(|component| {
                if is_critical {
                    demand.consumed(*component) > 0
                } else {
                    have.get(component).copied().unwrap_or(0) > 0
                }
            });
            satisfiable.then_some(Candidate { item, is_critical })
        })
        .collect();

    available.sort_by(|u, v| {
        v.is_critical.cmp(&u.is_critical).then_with(|| {
            recipe_len(catalog, v.item).cmp(&recipe_len(catalog, u.item))
        })
    });

    available
}

fn recipe_len(catalog: &Catalog, item: ItemId) -> usize {
    catalog.recipe(item).map_or(0, <[ItemId]>::len)
}

/// Recipes selected for one recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    entries: Vec<Candidate>,
}

impl Batch {
    /// Packs candidates greedily.
    ///
    /// The first candidate is always taken. Each later one is admitted if
    /// it fits the remaining slots and shares no component with anything
    /// already admitted.
    #[must_use]
    pub fn pack(catalog: &Catalog, candidates: &[Candidate]) -> Self {
        let Some((first, rest)) = candidates.split_first() else {
            return Self::default();
        };

        let first_recipe = catalog.recipe(first.item).unwrap_or(&[]);
        let mut claimed: HashSet<ItemId> = first_recipe.iter().copied().collect();
        let mut budget = SLOT_COUNT.saturating_sub(first_recipe.len());
        let mut entries = vec![*first];

        for candidate in rest {
            let recipe = catalog.recipe(candidate.item).unwrap_or(&[]);
            if recipe.len() > budget {
                continue;
            }
            if recipe.iter().any(|component| claimed.contains(component)) {
                continue;
            }
            claimed.extend(recipe.iter().copied());
            budget -= recipe.len();
            entries.push(*candidate);
        }

        Self { entries }
    }

    /// Returns true if nothing can be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the selected recipes in admission order.
    #[must_use]
    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    /// Returns the items the batch produces.
    pub fn results(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.entries.iter().map(|entry| entry.item)
    }

    /// Returns every component of every selected recipe, in order.
    #[must_use]
    pub fn components(&self, catalog: &Catalog) -> Vec<ItemId> {
        self.entries
            .iter()
            .flat_map(|entry| catalog.recipe(entry.item).unwrap_or(&[]).iter().copied())
            .collect()
    }

    /// Describes the batch for the player, `None` if the batch is empty.
    #[must_use]
    pub fn guidance(&self, catalog: &Catalog) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let names = self
            .entries
            .iter()
            .map(|entry| {
                let name = catalog.name(entry.item);
                if entry.is_critical {
                    format!("{name} (!)")
                } else {
                    name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" + ");

        let mut guidance = if self.entries.len() > 1 {
            format!("Build Recipes: {names}")
        } else {
            format!("Build Recipe: {names}")
        };

        match self.components(catalog).len() {
            0..=2 => guidance.push_str(" + Extra Items"),
            3 => guidance.push_str(" + Extra Item"),
            _ => {}
        }

        Some(guidance)
    }
}
