//! Lazy traversals over an ordered tree.
//!
//! Each iterator borrows the tree and walks it with an explicit stack (or
//! queue for breadth-first), so no traversal is cached: calling the
//! constructor again restarts the walk.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Node;

/// Traversal order selectable at runtime (configuration, CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Pre,
    #[default]
    In,
    Post,
    Breadth,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Order::Pre => "pre",
            Order::In => "in",
            Order::Post => "post",
            Order::Breadth => "breadth",
        };
        f.write_str(name)
    }
}

impl FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pre" | "preorder" | "pre-order" => Ok(Order::Pre),
            "in" | "inorder" | "in-order" => Ok(Order::In),
            "post" | "postorder" | "post-order" => Ok(Order::Post),
            "breadth" | "bfs" | "level" => Ok(Order::Breadth),
            other => Err(format!("unknown traversal order: {other}")),
        }
    }
}

/// Node, then left subtree, then right subtree.
pub struct PreOrder<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> PreOrder<'a, V> {
    pub(crate) fn new(start: Option<&'a Node<V>>) -> Self {
        Self {
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a, V> Iterator for PreOrder<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right first so the left subtree is popped next
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }
        Some(node.value())
    }
}

/// Left subtree, node, right subtree: ascending key order.
pub struct InOrder<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> InOrder<'a, V> {
    pub(crate) fn new(start: Option<&'a Node<V>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(start);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<V>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a, V> Iterator for InOrder<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.value())
    }
}

/// Left subtree, right subtree, node: children before parents.
pub struct PostOrder<'a, V> {
    stack: Vec<(&'a Node<V>, bool)>,
}

impl<'a, V> PostOrder<'a, V> {
    pub(crate) fn new(start: Option<&'a Node<V>>) -> Self {
        Self {
            stack: start.map(|node| (node, false)).into_iter().collect(),
        }
    }
}

impl<'a, V> Iterator for PostOrder<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, visited)) = self.stack.pop() {
            if visited {
                return Some(node.value());
            }
            self.stack.push((node, true));
            if let Some(right) = node.right() {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left() {
                self.stack.push((left, false));
            }
        }
        None
    }
}

/// Level order, children enqueued left then right.
pub struct BreadthFirst<'a, V> {
    queue: VecDeque<&'a Node<V>>,
}

impl<'a, V> BreadthFirst<'a, V> {
    pub(crate) fn new(root: Option<&'a Node<V>>) -> Self {
        Self {
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, V> Iterator for BreadthFirst<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        if let Some(left) = node.left() {
            self.queue.push_back(left);
        }
        if let Some(right) = node.right() {
            self.queue.push_back(right);
        }
        Some(node.value())
    }
}
