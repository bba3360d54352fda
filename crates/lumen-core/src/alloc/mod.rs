//! Allocation and collection types shared across lumen crates.
//!
//! - Re-exports of hash collections using AHash
//! - [`SparseSet`], a generational arena used for object and task storage

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
pub use sparse_set::{CapacityExceeded, IndexSlot, SparseSet};
