//! Engine options

use serde::{Deserialize, Serialize};

/// How `build` finds the direct children of a placed node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStrategy {
    /// Index the input by parent id once; linear overall.
    #[default]
    Indexed,
    /// Rescan the whole input for every placed node; quadratic.
    Scan,
}

/// Options controlling how the hierarchy engine wires nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyOptions {
    /// Populate child-to-parent back-references during `build`.
    ///
    /// Required for `find_ancestors` and selection propagation. Off by default
    /// so a serializer following both `children` and `parent` never loops.
    pub set_parent_links: bool,
    /// Child lookup strategy; both produce the same forest.
    pub strategy: BuildStrategy,
}

impl HierarchyOptions {
    pub fn with_parent_links() -> Self {
        Self {
            set_parent_links: true,
            ..Self::default()
        }
    }

    pub fn strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
