//! Application services

pub mod hierarchy;

pub use hierarchy::{Forest, ForestStats, HierarchyService, NodeSummary};
