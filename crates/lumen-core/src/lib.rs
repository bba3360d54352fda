//! Lumen Core
//!
//! Shared services for the lumen widget crates: logging setup, profiling
//! hooks and the generational arena used for object and task storage.

pub mod alloc;
pub mod logging;
pub mod profiling;
