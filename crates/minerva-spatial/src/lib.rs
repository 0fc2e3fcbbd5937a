//! Spatial acceleration structures for pairwise interactions.
//!
//! The [`NeighborList`] combines a uniform cell grid (broad phase) with a
//! Verlet skin: pairs are gathered out to `cutoff + skin`, so the list
//! stays usable until some particle has moved more than half the skin from
//! its position at the last rebuild.

pub mod neighbor;

pub use neighbor::{NeighborList, NeighborListConfig, NeighborListStats, NeighborPair};
