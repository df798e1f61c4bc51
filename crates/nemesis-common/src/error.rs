//! Error types for catalog integrity.

use thiserror::Error;

/// Recipe graph integrity violations found while validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// An item was declared with an empty name.
    #[error("Item at position {0} has an empty name")]
    EmptyName(usize),

    /// Two items share a name.
    #[error("Duplicate item name: {0}")]
    DuplicateItem(String),

    /// A recipe lists no components.
    #[error("Recipe for {0} has no components")]
    EmptyRecipe(String),

    /// A recipe has more components than a recommendation can show.
    #[error("Recipe for {item} has {len} components, at most {max} allowed")]
    RecipeTooLong {
        /// Item whose recipe is too long
        item: String,
        /// Number of components
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// A recipe references an item that is not in the catalog.
    #[error("Recipe for {item} references unknown component {component}")]
    UnknownComponent {
        /// Item whose recipe is broken
        item: String,
        /// Missing component name
        component: String,
    },

    /// A virtual item has nothing to synthesize it from.
    #[error("Virtual item {0} has no recipe")]
    VirtualWithoutRecipe(String),

    /// The recipe graph contains a cycle through this item.
    #[error("Recipe cycle detected through {0}")]
    Cycle(String),
}

/// Result type alias for catalog validation.
pub type CatalogResult<T> = Result<T, CatalogError>;
