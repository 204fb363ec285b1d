//! Hierarchy service
//!
//! Loads record files and runs the hierarchy engine over them.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use tracing::instrument;

use crate::application::records::{load_records, StringRecord};
use crate::application::ApplicationResult;
use crate::domain::{
    into_node_refs, FlatRecord, HierarchyArena, HierarchyItem, HierarchyOptions, HierarchyTools,
    NodeRef,
};

/// A record file wired into a forest.
pub struct Forest {
    /// Every record of the file, in file order, orphans included
    pub nodes: Vec<NodeRef<StringRecord>>,
    /// Root nodes, in file order
    pub roots: Vec<NodeRef<StringRecord>>,
}

impl Forest {
    /// Ids of records that did not end up in the forest, in file order.
    ///
    /// Reachability is tracked per node, so an unplaced duplicate of a placed
    /// id is still reported.
    pub fn orphans(&self) -> Vec<String> {
        let tools = HierarchyTools::<StringRecord>::default();
        let mut reachable: HashSet<*const RefCell<StringRecord>> = HashSet::new();
        for root in &self.roots {
            reachable.insert(Rc::as_ptr(root));
            for node in tools.find_node_descendants(root) {
                reachable.insert(Rc::as_ptr(&node));
            }
        }

        let mut orphans = Vec::new();
        for node in &self.nodes {
            if !reachable.contains(&Rc::as_ptr(node)) {
                orphans.push(node.borrow().id().clone());
            }
        }
        orphans
    }
}

/// Flat view of one node for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSummary {
    pub id: String,
    pub label: String,
    pub parent_id: Option<String>,
    pub level: usize,
    pub children: usize,
}

impl NodeSummary {
    fn of(node: &NodeRef<StringRecord>) -> Self {
        let node = node.borrow();
        Self {
            id: node.id().clone(),
            label: node.to_string(),
            parent_id: node.parent_id().cloned(),
            level: node.level(),
            children: node.children().len(),
        }
    }
}

/// Shape of a record file as a detached forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestStats {
    pub records: usize,
    pub roots: usize,
    pub placed: usize,
    pub orphans: usize,
    pub depth: usize,
    pub leaves: Vec<String>,
}

/// Service for building and querying hierarchies stored in record files.
pub struct HierarchyService {
    tools: HierarchyTools<StringRecord>,
}

impl HierarchyService {
    pub fn new(options: HierarchyOptions) -> Self {
        Self {
            tools: HierarchyTools::new(options),
        }
    }

    pub fn options(&self) -> &HierarchyOptions {
        self.tools.options()
    }

    /// Build the forest of a record file, optionally marking a selected node.
    #[instrument(level = "debug", skip(self))]
    pub fn tree(&self, path: &Path, selected: Option<&str>) -> ApplicationResult<Forest> {
        let nodes = into_node_refs(load_records(path)?);
        let selected = selected.map(str::to_string);
        let roots = self.tools.build_with_selection(&nodes, selected.as_ref())?;
        Ok(Forest { nodes, roots })
    }

    /// Look up one node in the built forest. Orphans are not found.
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, path: &Path, id: &str) -> ApplicationResult<Option<NodeSummary>> {
        let forest = self.tree(path, None)?;
        Ok(self
            .tools
            .find_by_id(&forest.roots, &id.to_string())
            .map(|node| NodeSummary::of(&node)))
    }

    /// Ancestors of `id`, root first; `None` if `id` is not in the forest.
    ///
    /// Always empty unless parent links are enabled.
    #[instrument(level = "debug", skip(self))]
    pub fn ancestors(&self, path: &Path, id: &str) -> ApplicationResult<Option<Vec<NodeSummary>>> {
        let forest = self.tree(path, None)?;
        let Some(node) = self.tools.find_by_id(&forest.roots, &id.to_string()) else {
            return Ok(None);
        };
        let ancestors = self.tools.find_ancestors(&node);
        Ok(Some(ancestors.iter().map(NodeSummary::of).collect()))
    }

    /// Descendants of `id` from the flat records, sorted by level then id.
    #[instrument(level = "debug", skip(self))]
    pub fn descendants(&self, path: &Path, id: &str) -> ApplicationResult<Vec<NodeSummary>> {
        let forest = self.tree(path, None)?;
        let mut descendants: Vec<NodeSummary> = self
            .tools
            .find_descendants(&forest.nodes, &id.to_string())?
            .iter()
            .map(NodeSummary::of)
            .collect();
        descendants.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.id.cmp(&b.id)));
        Ok(descendants)
    }

    /// Shape of the record file, computed on a detached arena.
    #[instrument(level = "debug", skip(self))]
    pub fn stats(&self, path: &Path) -> ApplicationResult<ForestStats> {
        let records = load_records(path)?;
        let total = records.len();
        let arena = HierarchyArena::build(records)?;

        let leaves = arena
            .leaf_nodes()
            .into_iter()
            .filter_map(|idx| arena.get_node(idx))
            .map(|node| node.data.id().clone())
            .collect();

        Ok(ForestStats {
            records: total,
            roots: arena.roots().len(),
            placed: arena.len(),
            orphans: total - arena.len(),
            depth: arena.depth(),
            leaves,
        })
    }
}
