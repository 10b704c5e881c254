//! Trees shared by tableaux and sequent calculus proofs.

use crate::Symbol;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of a node, given by the child indices leading to it from the root.
pub type Path = Vec<usize>;

/// Tree node with an optional justification.
///
/// Nodes own their children; positions of nodes are given by [`Path`]s,
/// so that trees never need back-references.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node<T> {
    pub content: T,
    #[cfg_attr(feature = "serde", serde(default))]
    pub justification: Option<Symbol>,
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub children: Vec<Node<T>>,
}

impl<T> Node<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            justification: None,
            children: Vec::new(),
        }
    }

    pub fn justified(content: T, justification: impl Into<Symbol>) -> Self {
        Self {
            content,
            justification: Some(justification.into()),
            children: Vec::new(),
        }
    }

    /// Append a child.
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Build a linear tree where every node is the only child of its predecessor.
    ///
    /// ~~~
    /// # use logics::tree::Node;
    /// let chain = Node::chain(vec![Node::new(0), Node::new(1), Node::new(2)]).unwrap();
    /// assert_eq!(chain.get(&[0, 0]).map(|n| n.content), Some(2));
    /// ~~~
    pub fn chain(nodes: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut nodes: Vec<_> = nodes.into_iter().collect();
        let mut last = nodes.pop()?;
        while let Some(node) = nodes.pop() {
            last = node.child(last);
        }
        Some(last)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, path: &[usize]) -> Option<&Self> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => self.children.get(*i)?.get(rest),
        }
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        match path.split_first() {
            None => Some(self),
            Some((i, rest)) => self.children.get_mut(*i)?.get_mut(rest),
        }
    }

    /// Return the nodes from the root to the node at the given path.
    pub fn branch(&self, path: &[usize]) -> Option<Vec<&Self>> {
        let mut branch = Vec::from([self]);
        let mut node = self;
        for i in path {
            node = node.children.get(*i)?;
            branch.push(node);
        }
        Some(branch)
    }

    /// Return all nodes with their paths, parents before children.
    pub fn pre_order(&self) -> Vec<(Path, &Self)> {
        let mut acc = Vec::new();
        self.pre_order_rec(&mut Vec::new(), &mut acc);
        acc
    }

    fn pre_order_rec<'a>(&'a self, path: &mut Path, acc: &mut Vec<(Path, &'a Self)>) {
        acc.push((path.clone(), self));
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            child.pre_order_rec(path, acc);
            path.pop();
        }
    }

    /// Return all nodes with their paths, children before parents.
    pub fn post_order(&self) -> Vec<(Path, &Self)> {
        let mut acc = Vec::new();
        self.post_order_rec(&mut Vec::new(), &mut acc);
        acc
    }

    fn post_order_rec<'a>(&'a self, path: &mut Path, acc: &mut Vec<(Path, &'a Self)>) {
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            child.post_order_rec(path, acc);
            path.pop();
        }
        acc.push((path.clone(), self));
    }

    /// Return all nodes with their paths, level by level.
    pub fn level_order(&self) -> Vec<(Path, &Self)> {
        let mut acc = Vec::new();
        let mut queue = VecDeque::from([(Vec::new(), self)]);
        while let Some((path, node)) = queue.pop_front() {
            for (i, child) in node.children.iter().enumerate() {
                let mut path = path.clone();
                path.push(i);
                queue.push_back((path, child))
            }
            acc.push((path, node));
        }
        acc
    }

    /// Return the leaves with their paths, from left to right.
    pub fn leaves(&self) -> Vec<(Path, &Self)> {
        let mut leaves = self.pre_order();
        leaves.retain(|(_, node)| node.is_leaf());
        leaves
    }

    /// Return the number of nodes.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }

    /// Return the number of edges on the longest path from the node to a leaf.
    pub fn height(&self) -> usize {
        let heights = self.children.iter().map(|c| c.height() + 1);
        heights.max().unwrap_or(0)
    }
}

impl<T: Display> Node<T> {
    fn fmt_label(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.content.fmt(f)?;
        match &self.justification {
            Some(j) => write!(f, " ({})", j),
            None => Ok(()),
        }
    }

    fn fmt_children(&self, f: &mut fmt::Formatter<'_>, prefix: &mut String) -> fmt::Result {
        let n = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == n;
            write!(f, "\n{}{}", prefix, if last { "└── " } else { "├── " })?;
            child.fmt_label(f)?;
            let len = prefix.len();
            prefix.push_str(if last { "    " } else { "│   " });
            child.fmt_children(f, prefix)?;
            prefix.truncate(len);
        }
        Ok(())
    }
}

/// Display the tree with the root first and children indented below,
/// annotating every node with its justification.
impl<T: Display> Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_label(f)?;
        self.fmt_children(f, &mut String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn tree() -> Node<u8> {
        let left = Node::justified(1, "a").child(Node::new(3));
        Node::new(0).children([left, Node::justified(2, "b")])
    }

    #[test]
    fn traversals() {
        let t = tree();
        let contents = |v: Vec<(Path, &Node<u8>)>| v.into_iter().map(|(_, n)| n.content).collect::<Vec<_>>();
        assert_eq!(contents(t.pre_order()), vec![0, 1, 3, 2]);
        assert_eq!(contents(t.post_order()), vec![3, 1, 2, 0]);
        assert_eq!(contents(t.level_order()), vec![0, 1, 2, 3]);
        assert_eq!(contents(t.leaves()), vec![3, 2]);
        assert_eq!(t.level_order()[3].0, vec![0, 0]);
        assert_eq!(t.size(), 4);
        assert_eq!(t.height(), 2);
    }

    #[test]
    fn paths() {
        let mut t = tree();
        let branch = t.branch(&[0, 0]).unwrap();
        assert_eq!(branch.iter().map(|n| n.content).collect::<Vec<_>>(), vec![0, 1, 3]);
        assert!(t.branch(&[2]).is_none());
        t.get_mut(&[1]).unwrap().children.push(Node::new(4));
        assert_eq!(t.get(&[1, 0]).map(|n| n.content), Some(4));
    }

    #[test]
    fn display() {
        let expected = "0\n├── 1 (a)\n│   └── 3\n└── 2 (b)";
        assert_eq!(tree().to_string(), expected);
    }
}
