//! Stateful advisor: owns the catalog and live inventory and keeps the
//! current recommendation in step with every inventory change.

use nemesis_common::ItemId;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::inventory::Inventory;
use crate::recommendation::{recommend, Recommendation};

/// Advisor error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    /// Item is not in the catalog
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    /// Virtual items cannot be held
    #[error("{0} is virtual and cannot be held")]
    VirtualItem(String),
    /// Only drop-only items can be queued as drops
    #[error("{0} is crafted, not dropped")]
    NotADrop(String),
}

/// Result type for advisor operations.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Recommendation engine instance.
#[derive(Debug, Clone)]
pub struct Advisor {
    catalog: Catalog,
    inventory: Inventory,
    queue: Vec<ItemId>,
    current: Recommendation,
}

impl Advisor {
    /// Creates an advisor and computes the initial recommendation.
    #[must_use]
    pub fn new(catalog: Catalog, inventory: Inventory) -> Self {
        let current = recommend(&catalog, &inventory);
        Self {
            catalog,
            inventory,
            queue: Vec::new(),
            current,
        }
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the live inventory.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Returns the current recommendation.
    #[must_use]
    pub fn recommendation(&self) -> &Recommendation {
        &self.current
    }

    /// Returns the names of queued drops, in the order they were queued.
    #[must_use]
    pub fn queued(&self) -> Vec<&str> {
        self.queue.iter().map(|id| self.catalog.name(*id)).collect()
    }

    /// Recomputes the recommendation from the current inventory.
    pub fn recompute(&mut self) -> &Recommendation {
        self.current = recommend(&self.catalog, &self.inventory);
        debug!(
            kind = ?self.current.kind,
            guidance = %self.current.guidance,
            items = ?self.current.items,
            "Recomputed recommendation"
        );
        &self.current
    }

    fn held_item(&self, name: &str) -> AdvisorResult<ItemId> {
        let id = self
            .catalog
            .id(name)
            .ok_or_else(|| AdvisorError::UnknownItem(name.to_string()))?;
        if self.catalog.is_virtual(id) {
            return Err(AdvisorError::VirtualItem(name.to_string()));
        }
        Ok(id)
    }

    /// Returns the held count of an item.
    pub fn count(&self, name: &str) -> AdvisorResult<u32> {
        let id = self
            .catalog
            .id(name)
            .ok_or_else(|| AdvisorError::UnknownItem(name.to_string()))?;
        if self.catalog.is_virtual(id) {
            return Ok(0);
        }
        Ok(self.inventory.count(id))
    }

    /// Sets the held count of an item and recomputes.
    pub fn set_count(&mut self, name: &str, count: u32) -> AdvisorResult<&Recommendation> {
        let id = self.held_item(name)?;
        self.inventory.set(id, count);
        Ok(self.recompute())
    }

    /// Adds one of an item and recomputes.
    pub fn increment(&mut self, name: &str) -> AdvisorResult<&Recommendation> {
        let id = self.held_item(name)?;
        self.inventory.add(id, 1);
        Ok(self.recompute())
    }

    /// Removes one of an item, never going below zero, and recomputes.
    pub fn decrement(&mut self, name: &str) -> AdvisorResult<&Recommendation> {
        let id = self.held_item(name)?;
        self.inventory.remove(id, 1);
        Ok(self.recompute())
    }

    /// Queues a drop to be added on the next flush.
    pub fn queue_drop(&mut self, name: &str) -> AdvisorResult<()> {
        let id = self.held_item(name)?;
        if !self.catalog.is_drop(id) {
            return Err(AdvisorError::NotADrop(name.to_string()));
        }
        self.queue.push(id);
        Ok(())
    }

    /// Discards all queued drops without adding them.
    pub fn clear_queue(&mut self) {
        let cleared = self.queue.len();
        self.queue.clear();
        debug!(cleared, "Cleared drop queue");
    }

    /// Adds every queued drop to the inventory, empties the queue, and
    /// recomputes.
    pub fn flush_queue(&mut self) -> &Recommendation {
        let flushed = self.queue.len();
        for id in std::mem::take(&mut self.queue) {
            self.inventory.add(id, 1);
        }
        debug!(flushed, "Flushed drop queue");
        self.recompute()
    }

    /// Applies the current recommendation: spends one of every slotted item,
    /// credits one of every result, and recomputes.
    ///
    /// Virtual results are not credited. Does nothing but recompute when the
    /// current recommendation has no items.
    pub fn consume_recipe(&mut self) -> &Recommendation {
        let spent: Vec<ItemId> = self
            .current
            .items
            .iter()
            .filter_map(|name| self.catalog.id(name))
            .collect();
        let produced: Vec<ItemId> = self
            .current
            .results
            .iter()
            .filter_map(|name| self.catalog.id(name))
            .filter(|id| !self.catalog.is_virtual(*id))
            .collect();

        for id in spent {
            self.inventory.remove(id, 1);
        }
        for id in produced {
            self.inventory.add(id, 1);
        }

        if !self.current.results.is_empty() {
            info!(results = ?self.current.results, "Consumed recipe batch");
        }
        self.recompute()
    }
}
