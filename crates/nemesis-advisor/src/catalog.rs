//! Item catalog and recipe graph.
//!
//! This module provides:
//! - Item definitions (drops, craftable items, virtual goals)
//! - The catalog: an ordered, name-indexed item list with recipes resolved to IDs
//! - Graph validation (recipe length, dangling virtual goals, cycles)

use std::collections::HashMap;

use nemesis_common::{CatalogError, CatalogResult, ItemId, SLOT_COUNT};
use serde::{Deserialize, Serialize};

/// A catalog item definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item name.
    pub name: String,
    /// Components consumed to craft one unit, `None` for drop-only items.
    pub recipe: Option<Vec<String>>,
    /// Virtual items are synthesis goals only and are never held.
    pub is_virtual: bool,
    /// Optional icon reference for presentation layers.
    pub image: Option<String>,
}

impl Item {
    /// Creates a drop-only item with no recipe.
    #[must_use]
    pub fn drop(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recipe: None,
            is_virtual: false,
            image: None,
        }
    }

    /// Creates a craftable item from its components.
    #[must_use]
    pub fn craftable<I, S>(name: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            recipe: Some(components.into_iter().map(Into::into).collect()),
            is_virtual: false,
            image: None,
        }
    }

    /// Marks this item as a virtual goal.
    #[must_use]
    pub fn virtual_goal(mut self) -> Self {
        self.is_virtual = true;
        self
    }

}

/// Immutable item catalog with the recipe graph resolved to IDs.
///
/// Items are kept sorted by name (case-insensitive), which fixes the order
/// in which goals, candidates and surplus items are visited.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    recipes: Vec<Option<Vec<ItemId>>>,
    by_name: HashMap<String, ItemId>,
}

impl Catalog {
    /// Builds a catalog from item definitions.
    ///
    /// Fails on empty or duplicate names, empty recipes, and recipes that
    /// reference unknown items. Graph-level checks live in [`Catalog::validate`].
    pub fn new(mut items: Vec<Item>) -> CatalogResult<Self> {
        if let Some(index) = items.iter().position(|item| item.name.is_empty()) {
            return Err(CatalogError::EmptyName(index));
        }

        items.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut by_name = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if by_name
                .insert(item.name.clone(), ItemId::from_index(index))
                .is_some()
            {
                return Err(CatalogError::DuplicateItem(item.name.clone()));
            }
        }

        let mut recipes = Vec::with_capacity(items.len());
        for item in &items {
            let Some(components) = &item.recipe else {
                recipes.push(None);
                continue;
            };
            if components.is_empty() {
                return Err(CatalogError::EmptyRecipe(item.name.clone()));
            }
            let resolved = components
                .iter()
                .map(|component| {
                    by_name
                        .get(component)
                        .copied()
                        .ok_or_else(|| CatalogError::UnknownComponent {
                            item: item.name.clone(),
                            component: component.clone(),
                        })
                })
                .collect::<CatalogResult<Vec<_>>>()?;
            recipes.push(Some(resolved));
        }

        Ok(Self {
            items,
            recipes,
            by_name,
        })
    }

    /// Checks graph integrity: recipe length, virtual items without a
    /// recipe, and cycles.
    pub fn validate(&self) -> CatalogResult<()> {
        for (id, item) in self.iter() {
            match self.recipe(id) {
                Some(recipe) if recipe.len() > SLOT_COUNT => {
                    return Err(CatalogError::RecipeTooLong {
                        item: item.name.clone(),
                        len: recipe.len(),
                        max: SLOT_COUNT,
                    });
                }
                None if item.is_virtual => {
                    return Err(CatalogError::VirtualWithoutRecipe(item.name.clone()));
                }
                _ => {}
            }
        }

        self.check_acyclic()
    }

    fn check_acyclic(&self) -> CatalogResult<()> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.items.len()];

        for (root, _) in self.iter() {
            if marks[root.index()] != Mark::Unvisited {
                continue;
            }

            // (node, index of the next component to explore)
            let mut stack = vec![(root, 0usize)];
            marks[root.index()] = Mark::InProgress;

            while let Some((node, next)) = stack.pop() {
                let components = self.recipe(node).unwrap_or(&[]);
                if let Some(&child) = components.get(next) {
                    stack.push((node, next + 1));
                    match marks[child.index()] {
                        Mark::InProgress => {
                            return Err(CatalogError::Cycle(self.name(child).to_string()));
                        }
                        Mark::Unvisited => {
                            marks[child.index()] = Mark::InProgress;
                            stack.push((child, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node.index()] = Mark::Done;
                }
            }
        }

        Ok(())
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item ID by exact name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<ItemId> {
        self.by_name.get(name).copied()
    }

    /// Returns the item definition for an ID.
    ///
    /// # Panics
    /// Panics if the ID was not issued by this catalog.
    #[must_use]
    pub fn item(&self, id: ItemId) -> &Item {
        &self.items[id.index()]
    }

    /// Returns the item name for an ID.
    #[must_use]
    pub fn name(&self, id: ItemId) -> &str {
        &self.item(id).name
    }

    /// Returns the resolved recipe for an ID, if the item is craftable.
    #[must_use]
    pub fn recipe(&self, id: ItemId) -> Option<&[ItemId]> {
        self.recipes[id.index()].as_deref()
    }

    /// Returns true if the item is a virtual goal.
    #[must_use]
    pub fn is_virtual(&self, id: ItemId) -> bool {
        self.item(id).is_virtual
    }

    /// Returns true if the item can only be obtained as a drop.
    #[must_use]
    pub fn is_drop(&self, id: ItemId) -> bool {
        self.recipes[id.index()].is_none()
    }

    /// Iterates over all items in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| (ItemId::from_index(index), item))
    }

    /// Iterates over all item IDs in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> {
        (0..self.items.len()).map(ItemId::from_index)
    }

    /// Iterates over craftable items with their recipes.
    pub fn craftable(&self) -> impl Iterator<Item = (ItemId, &[ItemId])> + '_ {
        self.ids()
            .filter_map(|id| self.recipe(id).map(|recipe| (id, recipe)))
    }

    /// Iterates over virtual goals that have a recipe.
    pub fn goals(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.craftable()
            .filter(|(id, _)| self.is_virtual(*id))
            .map(|(id, _)| id)
    }

    /// Iterates over drop-only items.
    pub fn drops(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids().filter(|id| self.is_drop(*id))
    }
}
