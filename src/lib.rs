//! Build forests from flat parent-pointer records and query them.
//!
//! The [`domain`] layer holds the node contract, the in-place hierarchy engine
//! and the detached arena. [`application`] loads record files and wraps the
//! engine in a service; [`cli`] is the `hierarchy` binary's front end.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    BuildStrategy, DomainError, FlatRecord, HierarchyArena, HierarchyItem, HierarchyLinks,
    HierarchyOptions, HierarchyTools, NodeRef, Record,
};
