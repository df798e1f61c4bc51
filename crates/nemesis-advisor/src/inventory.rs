//! Inventory counts.

use std::collections::HashMap;

use nemesis_common::ItemId;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Working count table keyed by item.
pub type Counts = HashMap<ItemId, u32>;

/// Held item counts.
///
/// Counts never go below zero. Virtual items are filtered out when a
/// snapshot is taken, so whatever is stored for them is never seen by the
/// recommendation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: HashMap<ItemId, u32>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from `(name, count)` pairs.
    ///
    /// Returns the inventory and the names that were not found in the
    /// catalog or that name virtual items.
    pub fn from_named<'a, I>(catalog: &Catalog, entries: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut inventory = Self::new();
        let mut rejected = Vec::new();
        for (name, count) in entries {
            match catalog.id(name) {
                Some(id) if !catalog.is_virtual(id) => inventory.set(id, count),
                _ => rejected.push(name.to_string()),
            }
        }
        (inventory, rejected)
    }

    /// Returns the count of an item.
    #[must_use]
    pub fn count(&self, item: ItemId) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Sets the count of an item.
    pub fn set(&mut self, item: ItemId, count: u32) {
        if count == 0 {
            self.counts.remove(&item);
        } else {
            self.counts.insert(item, count);
        }
    }

    /// Adds items.
    pub fn add(&mut self, item: ItemId, amount: u32) {
        let current = self.count(item);
        self.set(item, current.saturating_add(amount));
    }

    /// Removes items, clamping at zero. Returns how many were removed.
    pub fn remove(&mut self, item: ItemId, amount: u32) -> u32 {
        let current = self.count(item);
        let removed = current.min(amount);
        self.set(item, current - removed);
        removed
    }

    /// Returns true if no item has a positive count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns an iterator over items with a positive count.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }

    /// Returns `(name, count)` pairs for held items, in catalog order.
    #[must_use]
    pub fn named<'c>(&self, catalog: &'c Catalog) -> Vec<(&'c str, u32)> {
        catalog
            .ids()
            .filter(|id| !catalog.is_virtual(*id))
            .map(|id| (catalog.name(id), self.count(id)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Takes a snapshot of physical counts for one recompute.
    ///
    /// Every non-virtual catalog item gets an entry, zero counts included.
    #[must_use]
    pub fn snapshot(&self, catalog: &Catalog) -> Counts {
        catalog
            .ids()
            .filter(|id| !catalog.is_virtual(*id))
            .map(|id| (id, self.count(id)))
            .collect()
    }
}
