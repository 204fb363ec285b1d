//! Domain layer: node contract, hierarchy engine and detached arena
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod error;
pub mod item;
pub mod options;
pub mod record;
pub mod tools;

pub use arena::{ArenaNode, HierarchyArena};
pub use display::TreeDisplay;
pub use error::{DomainError, DomainResult};
pub use item::{into_node_refs, FlatRecord, HierarchyItem, HierarchyLinks, NodeRef, WeakNodeRef};
pub use options::{BuildStrategy, HierarchyOptions};
pub use record::Record;
pub use tools::HierarchyTools;
