//! Hierarchy engine: wires a flat collection into a forest in place and queries it.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::item::{parent_chain_cycle, HierarchyItem, NodeRef};
use crate::domain::options::{BuildStrategy, HierarchyOptions};

/// Builds and queries forests of `T`.
///
/// The engine holds no state besides its options; the forest lives in the
/// caller's nodes. `build` needs exclusive access to every input node, which
/// `Rc<RefCell<_>>` handles already confine to one thread.
pub struct HierarchyTools<T> {
    options: HierarchyOptions,
    _item: PhantomData<fn() -> T>,
}

impl<T: HierarchyItem> Default for HierarchyTools<T> {
    fn default() -> Self {
        Self::new(HierarchyOptions::default())
    }
}

impl<T: HierarchyItem> HierarchyTools<T> {
    pub fn new(options: HierarchyOptions) -> Self {
        Self {
            options,
            _item: PhantomData,
        }
    }

    pub fn options(&self) -> &HierarchyOptions {
        &self.options
    }

    /// Converts a flat collection into a forest and returns its roots.
    ///
    /// Every input node gets its children, parent link and level rewritten;
    /// results of an earlier build are discarded, not merged. Nodes whose
    /// parent id matches no input node are left out of the forest.
    ///
    /// # Errors
    ///
    /// [`DomainError::CycleDetected`] if any parent chain loops, whether the
    /// loop is reachable from a root (duplicate ids) or not.
    #[instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
    pub fn build(&self, nodes: &[NodeRef<T>]) -> DomainResult<Vec<NodeRef<T>>> {
        for node in nodes {
            let mut node = node.borrow_mut();
            node.set_children(Vec::new());
            node.set_parent(None);
            node.set_level(1);
        }

        let lookup = ChildLookup::new(nodes, self.options.strategy);
        let roots: Vec<NodeRef<T>> = nodes
            .iter()
            .filter(|node| node.borrow().is_root())
            .cloned()
            .collect();

        let mut placed = HashSet::new();
        for root in &roots {
            self.attach_children(root, &lookup, &mut placed)?;
        }

        self.check_unplaced(nodes, &placed)?;
        debug!(roots = roots.len(), placed = placed.len(), "hierarchy built");
        Ok(roots)
    }

    /// Wires the tree below `root` depth-first with an explicit stack.
    ///
    /// `path` holds the ids from `root` down to the node being entered; an id
    /// already on it closes a loop.
    fn attach_children(
        &self,
        root: &NodeRef<T>,
        lookup: &ChildLookup<'_, T>,
        placed: &mut HashSet<T::Id>,
    ) -> DomainResult<()> {
        let mut path: HashSet<T::Id> = HashSet::new();
        let mut stack: Vec<Visit<NodeRef<T>, T::Id>> = vec![Visit::Enter(Rc::clone(root))];

        while let Some(visit) = stack.pop() {
            let parent = match visit {
                Visit::Enter(node) => node,
                Visit::Exit(id) => {
                    path.remove(&id);
                    continue;
                }
            };

            let (id, level) = {
                let parent = parent.borrow();
                (parent.id().clone(), parent.level())
            };
            if !path.insert(id.clone()) {
                return Err(DomainError::CycleDetected(format!("{:?}", id)));
            }
            placed.insert(id.clone());

            let children = lookup.children_of(&id);
            for child in &children {
                let mut child = child.borrow_mut();
                child.set_level(level + 1);
                if self.options.set_parent_links {
                    child.set_parent(Some(Rc::downgrade(&parent)));
                }
            }
            trace!(id = ?id, depth = level, children = children.len(), "attached children");

            stack.push(Visit::Exit(id));
            // Reverse push keeps left-to-right order
            stack.extend(children.iter().rev().cloned().map(Visit::Enter));
            parent.borrow_mut().set_children(children);
        }
        Ok(())
    }

    /// Nodes left out of the forest are either orphans or part of a loop.
    fn check_unplaced(&self, nodes: &[NodeRef<T>], placed: &HashSet<T::Id>) -> DomainResult<()> {
        let borrowed: Vec<_> = nodes.iter().map(|node| node.borrow()).collect();
        let parents: HashMap<&T::Id, Option<&T::Id>> = borrowed
            .iter()
            .map(|node| (node.id(), node.parent_id()))
            .collect();

        for node in &borrowed {
            if placed.contains(node.id()) {
                continue;
            }
            if let Some(id) = parent_chain_cycle(&parents, node.id()) {
                return Err(DomainError::CycleDetected(format!("{:?}", id)));
            }
            debug!(id = ?node.id(), parent_id = ?node.parent_id(), "dropping orphan");
        }
        Ok(())
    }

    /// Converts the flat collection into a forest and marks `selected_id`.
    ///
    /// The selected node is looked up in the flat input. It gets `is_selected`;
    /// each of its ancestors gets `has_selected_child`. Flags from earlier
    /// selections are cleared first. Without parent links only the node itself
    /// is marked.
    #[instrument(level = "debug", skip_all, fields(selected = ?selected_id))]
    pub fn build_with_selection(
        &self,
        nodes: &[NodeRef<T>],
        selected_id: Option<&T::Id>,
    ) -> DomainResult<Vec<NodeRef<T>>> {
        let selected =
            selected_id.and_then(|id| nodes.iter().find(|node| node.borrow().id() == id).cloned());

        let roots = self.build(nodes)?;
        for node in nodes {
            let mut node = node.borrow_mut();
            node.set_selected(false);
            node.set_has_selected_child(false);
        }

        match selected {
            Some(selected) => {
                selected.borrow_mut().set_selected(true);
                for ancestor in self.find_ancestors(&selected) {
                    ancestor.borrow_mut().set_has_selected_child(true);
                }
            }
            None => debug!("no selected node in input"),
        }
        Ok(roots)
    }

    /// Depth-first pre-order search below `roots`; the first match wins.
    pub fn find_by_id(&self, roots: &[NodeRef<T>], id: &T::Id) -> Option<NodeRef<T>> {
        let mut stack: Vec<NodeRef<T>> = roots.iter().rev().cloned().collect();
        while let Some(node) = stack.pop() {
            if node.borrow().id() == id {
                return Some(node);
            }
            // Reverse push keeps left-to-right order
            stack.extend(node.borrow().children().iter().rev().cloned());
        }
        None
    }

    /// All nodes below `host_id`, computed from the flat collection.
    ///
    /// Needs no prior `build`. Unordered; excludes the host. An unknown
    /// `host_id` gives an empty result.
    ///
    /// # Errors
    ///
    /// [`DomainError::CycleDetected`] if the descent revisits an id.
    #[instrument(level = "debug", skip_all, fields(host = ?host_id))]
    pub fn find_descendants(
        &self,
        nodes: &[NodeRef<T>],
        host_id: &T::Id,
    ) -> DomainResult<Vec<NodeRef<T>>> {
        let lookup = ChildLookup::new(nodes, self.options.strategy);
        let mut descendants = Vec::new();
        lookup.collect_descendants(host_id, &mut descendants)?;
        debug!(found = descendants.len(), "descendants collected");
        Ok(descendants)
    }

    /// All nodes below an already built `host`, following `children`.
    pub fn find_node_descendants(&self, host: &NodeRef<T>) -> Vec<NodeRef<T>> {
        let mut descendants = Vec::new();
        let mut stack = host.borrow().children().to_vec();
        while let Some(node) = stack.pop() {
            stack.extend(node.borrow().children().iter().cloned());
            descendants.push(node);
        }
        descendants
    }

    /// Ancestors of `node`, top-level first and immediate parent last.
    ///
    /// Empty for a root, and always empty unless the forest was built with
    /// parent links.
    pub fn find_ancestors(&self, node: &NodeRef<T>) -> Vec<NodeRef<T>> {
        if !self.options.set_parent_links {
            debug!("parent links disabled, ancestors are unavailable");
        }

        let mut ancestors = Vec::new();
        let mut current = node.borrow().parent();
        while let Some(parent) = current {
            current = parent.borrow().parent();
            ancestors.push(parent);
        }
        ancestors.reverse();
        ancestors
    }
}

/// Direct-children lookup over the flat input.
enum ChildLookup<'a, T: HierarchyItem> {
    Indexed(HashMap<T::Id, Vec<NodeRef<T>>>),
    Scan(&'a [NodeRef<T>]),
}

impl<'a, T: HierarchyItem> ChildLookup<'a, T> {
    fn new(nodes: &'a [NodeRef<T>], strategy: BuildStrategy) -> Self {
        match strategy {
            BuildStrategy::Indexed => {
                let mut index: HashMap<T::Id, Vec<NodeRef<T>>> = HashMap::new();
                for node in nodes {
                    if let Some(parent_id) = node.borrow().parent_id() {
                        index
                            .entry(parent_id.clone())
                            .or_default()
                            .push(Rc::clone(node));
                    }
                }
                Self::Indexed(index)
            }
            BuildStrategy::Scan => Self::Scan(nodes),
        }
    }

    /// Direct children of `id`, in input order.
    fn children_of(&self, id: &T::Id) -> Vec<NodeRef<T>> {
        match self {
            Self::Indexed(index) => index.get(id).cloned().unwrap_or_default(),
            Self::Scan(nodes) => nodes
                .iter()
                .filter(|node| node.borrow().parent_id() == Some(id))
                .cloned()
                .collect(),
        }
    }

    fn collect_descendants(
        &self,
        host_id: &T::Id,
        descendants: &mut Vec<NodeRef<T>>,
    ) -> DomainResult<()> {
        let mut path: HashSet<T::Id> = HashSet::new();
        let mut stack: Vec<Visit<T::Id, T::Id>> = vec![Visit::Enter(host_id.clone())];

        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Enter(id) => id,
                Visit::Exit(id) => {
                    path.remove(&id);
                    continue;
                }
            };
            if !path.insert(id.clone()) {
                return Err(DomainError::CycleDetected(format!("{:?}", id)));
            }

            let children = self.children_of(&id);
            stack.push(Visit::Exit(id));
            for child in children.into_iter().rev() {
                let child_id = child.borrow().id().clone();
                descendants.push(child);
                stack.push(Visit::Enter(child_id));
            }
        }
        Ok(())
    }
}

/// Work item of an explicit-stack depth-first walk.
enum Visit<E, X> {
    /// Node to process
    Enter(E),
    /// All descendants done; leave the node's path entry
    Exit(X),
}
