use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::item::{parent_chain_cycle, FlatRecord};

/// Node of a detached forest.
#[derive(Debug)]
pub struct ArenaNode<D> {
    /// Record payload, owned by the arena
    pub data: D,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<Index>,
    /// 1-indexed depth
    pub level: usize,
}

/// Arena-based forest built from records taken by value.
///
/// The non-mutating counterpart of `HierarchyTools::build`: the caller's
/// records are moved in and every node is owned by the arena, so parent
/// indices are always available regardless of parent-link mode.
#[derive(Debug)]
pub struct HierarchyArena<D> {
    /// Arena storage for all placed nodes
    arena: Arena<ArenaNode<D>>,
    /// Indices of root nodes, in input order
    roots: Vec<Index>,
}

impl<D> Default for HierarchyArena<D> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }
}

impl<D: FlatRecord> HierarchyArena<D> {
    /// Builds a forest from flat records.
    ///
    /// Orphans are dropped; a looping parent chain fails with
    /// [`DomainError::CycleDetected`].
    #[instrument(level = "debug", skip_all)]
    pub fn build<I>(records: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = D>,
    {
        let records: Vec<D> = records.into_iter().collect();
        let ids: Vec<D::Id> = records.iter().map(|record| record.id().clone()).collect();

        let mut by_parent: HashMap<D::Id, Vec<usize>> = HashMap::new();
        let mut root_positions = Vec::new();
        for (pos, record) in records.iter().enumerate() {
            match record.parent_id() {
                Some(parent_id) => by_parent.entry(parent_id.clone()).or_default().push(pos),
                None => root_positions.push(pos),
            }
        }
        let mut slots: Vec<Option<D>> = records.into_iter().map(Some).collect();

        let mut tree = Self::default();
        // Ids from the current root down to the record being placed
        let mut path: HashSet<&D::Id> = HashSet::new();
        // Reverse push keeps input order among siblings
        let mut stack: Vec<Visit> = root_positions
            .iter()
            .rev()
            .map(|&pos| Visit::Enter(pos, None))
            .collect();

        while let Some(visit) = stack.pop() {
            let (pos, parent_idx) = match visit {
                Visit::Enter(pos, parent_idx) => (pos, parent_idx),
                Visit::Exit(pos) => {
                    path.remove(&ids[pos]);
                    continue;
                }
            };
            if path.contains(&ids[pos]) {
                return Err(DomainError::CycleDetected(format!("{:?}", ids[pos])));
            }
            let Some(data) = slots[pos].take() else {
                debug!(id = ?ids[pos], "record reached twice, keeping first placement");
                continue;
            };

            let current_idx = tree.insert_node(data, parent_idx);
            path.insert(&ids[pos]);
            stack.push(Visit::Exit(pos));

            if let Some(children) = by_parent.get(&ids[pos]) {
                for &child in children.iter().rev() {
                    stack.push(Visit::Enter(child, Some(current_idx)));
                }
            }
        }

        tree.check_unplaced(&slots)?;
        debug!(roots = tree.roots.len(), nodes = tree.len(), "arena built");
        Ok(tree)
    }

    /// Records still in `slots` were never reached from a root.
    fn check_unplaced(&self, slots: &[Option<D>]) -> DomainResult<()> {
        let placed: HashSet<&D::Id> = self.arena.iter().map(|(_, node)| node.data.id()).collect();
        let parents: HashMap<&D::Id, Option<&D::Id>> = slots
            .iter()
            .flatten()
            .map(|record| (record.id(), record.parent_id()))
            .chain(
                self.arena
                    .iter()
                    .map(|(_, node)| (node.data.id(), node.data.parent_id())),
            )
            .collect();

        for record in slots.iter().flatten() {
            if placed.contains(record.id()) {
                continue;
            }
            if let Some(id) = parent_chain_cycle(&parents, record.id()) {
                return Err(DomainError::CycleDetected(format!("{:?}", id)));
            }
            debug!(id = ?record.id(), parent_id = ?record.parent_id(), "dropping orphan");
        }
        Ok(())
    }

    #[instrument(level = "trace", skip_all)]
    fn insert_node(&mut self, data: D, parent: Option<Index>) -> Index {
        let level = parent
            .and_then(|idx| self.arena.get(idx))
            .map_or(1, |parent| parent.level + 1);
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
            level,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    /// Pre-order search; the first match wins.
    pub fn find_by_id(&self, id: &D::Id) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.id() == id)
            .map(|(idx, _)| idx)
    }
}

impl<D> HierarchyArena<D> {
    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode<D>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ArenaNode<D>> {
        self.arena.get_mut(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_, D> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, D> {
        PostOrderIterator::new(self)
    }

    /// All nodes below `idx`, excluding it. Unknown indices give an empty result.
    pub fn descendants(&self, idx: Index) -> Vec<Index> {
        let mut descendants = Vec::new();
        let mut stack: Vec<Index> = self
            .get_node(idx)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_node(current) {
                stack.extend(node.children.iter().copied());
            }
            descendants.push(current);
        }
        descendants
    }

    /// Ancestors of `idx`, top-level first and immediate parent last.
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut ancestors = Vec::new();
        let mut current = self.get_node(idx).and_then(|node| node.parent);
        while let Some(parent_idx) = current {
            ancestors.push(parent_idx);
            current = self.get_node(parent_idx).and_then(|node| node.parent);
        }
        ancestors.reverse();
        ancestors
    }

    /// Level of the deepest node; 0 for an empty forest.
    pub fn depth(&self) -> usize {
        self.arena
            .iter()
            .map(|(_, node)| node.level)
            .max()
            .unwrap_or(0)
    }

    /// Nodes without children, in pre-order.
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Work item of the build walk: record position to place, or to leave the path.
enum Visit {
    Enter(usize, Option<Index>),
    Exit(usize),
}

/// Pre-order traversal over every tree of the forest, roots in input order.
pub struct TreeIterator<'a, D> {
    tree: &'a HierarchyArena<D>,
    stack: Vec<Index>,
}

impl<'a, D> TreeIterator<'a, D> {
    fn new(tree: &'a HierarchyArena<D>) -> Self {
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a, D> Iterator for TreeIterator<'a, D> {
    type Item = (Index, &'a ArenaNode<D>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal: every node after all of its descendants.
pub struct PostOrderIterator<'a, D> {
    tree: &'a HierarchyArena<D>,
    stack: Vec<(Index, bool)>,
}

impl<'a, D> PostOrderIterator<'a, D> {
    fn new(tree: &'a HierarchyArena<D>) -> Self {
        let stack = tree.roots.iter().rev().map(|&root| (root, false)).collect();
        Self { tree, stack }
    }
}

impl<'a, D> Iterator for PostOrderIterator<'a, D> {
    type Item = (Index, &'a ArenaNode<D>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
