//! # Nemesis Advisor
//!
//! Recommendation engine for the Nemesis crafting advisor.
//!
//! Given a fixed recipe graph and the current inventory, the engine works
//! out which recipes to craft next toward the virtual goal items:
//! - Catalog and recipe graph
//! - Inventory counts
//! - Demand propagation from goals
//! - Candidate selection and batch packing
//! - Surplus padding to a full slate
//! - The stateful [`Advisor`] that recomputes on every inventory change

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod advisor;
pub mod catalog;
pub mod demand;
pub mod extras;
pub mod inventory;
pub mod recommendation;
pub mod selection;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::advisor::*;
    pub use crate::catalog::*;
    pub use crate::demand::*;
    pub use crate::extras::*;
    pub use crate::inventory::*;
    pub use crate::recommendation::*;
    pub use crate::selection::*;
}

pub use prelude::*;
