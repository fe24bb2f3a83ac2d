//! Collection types used by the graph storage and its algorithms.
//!
//! Storage goes through [`StorageMap`] (slotmap-backed, selected by feature),
//! temporary per-record data through the secondary maps, and short-lived
//! buffers through [`SmallBuffer`].

mod aliases;
mod helpers;
mod secondary_maps;

pub use aliases::*;
pub use helpers::*;
pub use secondary_maps::*;
