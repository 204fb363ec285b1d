/*
Rendering of built forests as text trees.
Node handles are aliases of `Rc<RefCell<_>>`, so conversions go through a local
trait rather than inherent impls (E0116).
 */
use std::fmt::Display;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::HierarchyArena;
use crate::domain::item::{HierarchyItem, NodeRef};

pub trait TreeDisplay<T> {
    /// Renders the subtree with a custom label per node.
    fn to_tree_with<F>(&self, label: &F) -> Tree<String>
    where
        F: Fn(&T) -> String;

    /// Renders the subtree using each node's `Display`.
    fn to_tree_string(&self) -> Tree<String>
    where
        T: Display,
    {
        self.to_tree_with(&|node: &T| node.to_string())
    }
}

impl<T: HierarchyItem> TreeDisplay<T> for NodeRef<T> {
    #[instrument(level = "trace", skip_all)]
    fn to_tree_with<F>(&self, label: &F) -> Tree<String>
    where
        F: Fn(&T) -> String,
    {
        let node = self.borrow();
        let leaves: Vec<_> = node
            .children()
            .iter()
            .map(|child| child.to_tree_with(label))
            .collect();

        Tree::new(label(&*node)).with_leaves(leaves)
    }
}

impl<D> HierarchyArena<D> {
    /// One rendered tree per root, in root order.
    pub fn to_tree_strings_with<F>(&self, label: &F) -> Vec<Tree<String>>
    where
        F: Fn(&D) -> String,
    {
        fn build_tree<D, F>(arena: &HierarchyArena<D>, idx: Index, label: &F) -> Option<Tree<String>>
        where
            F: Fn(&D) -> String,
        {
            let node = arena.get_node(idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build_tree(arena, child, label))
                .collect();
            Some(Tree::new(label(&node.data)).with_leaves(leaves))
        }

        self.roots()
            .iter()
            .filter_map(|&root| build_tree(self, root, label))
            .collect()
    }

    pub fn to_tree_strings(&self) -> Vec<Tree<String>>
    where
        D: Display,
    {
        self.to_tree_strings_with(&|data: &D| data.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::into_node_refs;
    use crate::domain::record::Record;
    use crate::domain::tools::HierarchyTools;

    fn records() -> Vec<Record<&'static str>> {
        vec![
            Record::root("root"),
            Record::child("a", "root"),
            Record::child("a1", "a"),
            Record::child("b", "root"),
        ]
    }

    #[test]
    fn given_built_forest_when_rendering_then_children_are_nested() {
        let nodes = into_node_refs(records());
        let roots = HierarchyTools::default().build(&nodes).unwrap();

        let rendered = roots[0].to_tree_string().to_string();

        assert_eq!(
            rendered.lines().collect::<Vec<_>>(),
            vec!["root", "├── a", "│   └── a1", "└── b"]
        );
    }

    #[test]
    fn given_custom_label_when_rendering_then_label_is_used() {
        let nodes = into_node_refs(records());
        let roots = HierarchyTools::default().build(&nodes).unwrap();

        let rendered = roots[0]
            .to_tree_with(&|node: &Record<&str>| format!("{}@{}", node.id, node.level()))
            .to_string();

        assert!(rendered.starts_with("root@1\n"));
        assert!(rendered.contains("a1@3"));
    }

    #[test]
    fn given_arena_when_rendering_then_one_tree_per_root() {
        let mut input = records();
        input.push(Record::root("other"));
        let arena = HierarchyArena::build(input).unwrap();

        let trees = arena.to_tree_strings();

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[1].to_string().trim_end(), "other");
    }
}
