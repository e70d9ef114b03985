use generational_arena::{Arena, Index};
use std::fmt;
use termtree::Tree;
use tracing::instrument;

use crate::domain::analysis::ConceptNode;

/// Data payload for arena nodes: one concept of the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Display label of the concept
    pub label: String,
    /// Distance from the root (root = 0)
    pub depth: usize,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Concept data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based concept tree.
///
/// Flattens an owned [`ConceptNode`] tree so every concept gets a stable
/// [`Index`] identity that layout and rendering can key on.
#[derive(Debug)]
pub struct ConceptArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for ConceptArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Build an arena from an owned concept tree.
    ///
    /// Children are inserted in input order, so arena child lists preserve
    /// the sibling order of the source tree.
    #[instrument(level = "debug", skip(tree), fields(root = %tree.label))]
    pub fn from_tree(tree: &ConceptNode) -> Self {
        let mut arena = Self::new();
        let mut stack: Vec<(&ConceptNode, Option<Index>, usize)> = vec![(tree, None, 0)];

        while let Some((node, parent, depth)) = stack.pop() {
            let data = NodeData {
                label: node.label.clone(),
                depth,
            };
            let idx = arena.insert_node(data, parent);
            // Reverse push so children are inserted left to right
            for child in node.children.iter().rev() {
                stack.push((child, Some(idx), depth + 1));
            }
        }
        arena
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels in the tree (a single root counts as 1).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter()
            .map(|(_, node)| node.data.depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Labels of all leaf nodes, left to right.
    pub fn leaf_labels(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.data.label.clone())
            .collect()
    }

    /// Render the hierarchy as a terminal outline.
    pub fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &ConceptArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.data.label.clone());
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root.and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(root.data.label.clone());
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("(empty)".to_string()),
        }
    }
}

/// Pre-order, left-to-right traversal.
pub struct TreeIterator<'a> {
    arena: &'a ConceptArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a ConceptArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal: every child is yielded before its parent.
pub struct PostOrderIterator<'a> {
    arena: &'a ConceptArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a ConceptArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
