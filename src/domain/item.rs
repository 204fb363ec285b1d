//! Node contract: what a record must expose to take part in a hierarchy.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

/// Shared handle to a node. The forest owns children through these.
pub type NodeRef<T> = Rc<RefCell<T>>;

/// Non-owning back-reference from a child to its parent.
pub type WeakNodeRef<T> = Weak<RefCell<T>>;

/// Identity of a record in a flat, parent-pointer collection.
///
/// `parent_id() == None` marks a root.
pub trait FlatRecord {
    type Id: Clone + Eq + Hash + fmt::Debug;

    fn id(&self) -> &Self::Id;
    fn parent_id(&self) -> Option<&Self::Id>;

    fn is_root(&self) -> bool {
        self.parent_id().is_none()
    }
}

/// Hierarchy fields rewired by the engine.
///
/// Embed one of these in a record type and hand it out through
/// [`HierarchyItem::links`] / [`HierarchyItem::links_mut`].
pub struct HierarchyLinks<T> {
    parent: Option<WeakNodeRef<T>>,
    children: Vec<NodeRef<T>>,
    level: usize,
    is_selected: bool,
    has_selected_child: bool,
}

impl<T> Default for HierarchyLinks<T> {
    fn default() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            level: 1,
            is_selected: false,
            has_selected_child: false,
        }
    }
}

impl<T> Clone for HierarchyLinks<T> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            children: self.children.clone(),
            level: self.level,
            is_selected: self.is_selected,
            has_selected_child: self.has_selected_child,
        }
    }
}

// Children and parent are elided: printing them would walk the whole subtree.
impl<T> fmt::Debug for HierarchyLinks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyLinks")
            .field("has_parent", &self.parent.is_some())
            .field("children", &self.children.len())
            .field("level", &self.level)
            .field("is_selected", &self.is_selected)
            .field("has_selected_child", &self.has_selected_child)
            .finish()
    }
}

/// A record that can be wired into a forest in place.
///
/// Implementors only provide identity and access to their [`HierarchyLinks`];
/// everything else has a default.
pub trait HierarchyItem: FlatRecord + Sized {
    fn links(&self) -> &HierarchyLinks<Self>;
    fn links_mut(&mut self) -> &mut HierarchyLinks<Self>;

    /// Parent node, if parent links were set and the parent is still alive.
    fn parent(&self) -> Option<NodeRef<Self>> {
        self.links().parent.as_ref().and_then(Weak::upgrade)
    }

    fn set_parent(&mut self, parent: Option<WeakNodeRef<Self>>) {
        self.links_mut().parent = parent;
    }

    fn children(&self) -> &[NodeRef<Self>] {
        &self.links().children
    }

    /// Replaces the child list; the previous list is dropped, never merged.
    fn set_children(&mut self, children: Vec<NodeRef<Self>>) {
        self.links_mut().children = children;
    }

    /// 1-indexed depth; roots are level 1.
    fn level(&self) -> usize {
        self.links().level
    }

    fn set_level(&mut self, level: usize) {
        self.links_mut().level = level;
    }

    fn is_selected(&self) -> bool {
        self.links().is_selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.links_mut().is_selected = selected;
    }

    /// True on every ancestor of the selected node.
    fn has_selected_child(&self) -> bool {
        self.links().has_selected_child
    }

    fn set_has_selected_child(&mut self, value: bool) {
        self.links_mut().has_selected_child = value;
    }
}

/// Wraps owned records into shared node handles, keeping input order.
pub fn into_node_refs<T, I>(records: I) -> Vec<NodeRef<T>>
where
    I: IntoIterator<Item = T>,
{
    records
        .into_iter()
        .map(|record| Rc::new(RefCell::new(record)))
        .collect()
}

/// Follows parent ids upward from `start`.
///
/// Returns the id that closes a loop, or `None` when the chain ends at a root
/// or at an id missing from `parents`.
pub(crate) fn parent_chain_cycle<'a, Id>(
    parents: &HashMap<&'a Id, Option<&'a Id>>,
    start: &'a Id,
) -> Option<&'a Id>
where
    Id: Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut current = start;
    loop {
        if !seen.insert(current) {
            return Some(current);
        }
        match parents.get(current) {
            Some(&Some(parent)) => current = parent,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_chain_ending_at_root_when_following_parents_then_no_cycle() {
        let (a, b, c) = (1, 2, 3);
        let parents = HashMap::from([(&a, None), (&b, Some(&a)), (&c, Some(&b))]);
        assert_eq!(parent_chain_cycle(&parents, &c), None);
    }

    #[test]
    fn given_chain_ending_at_missing_id_when_following_parents_then_no_cycle() {
        let (b, c, missing) = (2, 3, 99);
        let parents = HashMap::from([(&b, Some(&missing)), (&c, Some(&b))]);
        assert_eq!(parent_chain_cycle(&parents, &c), None);
    }

    #[test]
    fn given_loop_when_following_parents_then_reports_closing_id() {
        let (a, b, c) = (1, 2, 3);
        let parents = HashMap::from([(&a, Some(&b)), (&b, Some(&a)), (&c, Some(&a))]);
        assert_eq!(parent_chain_cycle(&parents, &c), Some(&a));
    }

    #[test]
    fn given_default_links_then_level_is_one_and_flags_clear() {
        let links: HierarchyLinks<()> = HierarchyLinks::default();
        assert_eq!(links.level, 1);
        assert!(links.parent.is_none());
        assert!(links.children.is_empty());
        assert!(!links.is_selected);
        assert!(!links.has_selected_child);
    }
}
