//! Tree cell: a value plus two exclusively owned child slots.

/// Owned child slot.
pub type Link<V> = Option<Box<Node<V>>>;

/// Node of an [`OrderedTree`](crate::domain::OrderedTree).
///
/// Parents are not stored. Parent relations are recomputed by descending
/// from the root, see [`OrderedTree::get_parent`](crate::domain::OrderedTree::get_parent).
#[derive(Debug, Clone, PartialEq)]
pub struct Node<V> {
    pub(crate) value: V,
    pub(crate) left: Link<V>,
    pub(crate) right: Link<V>,
}

impl<V> Node<V> {
    pub fn new(value: V) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn left(&self) -> Option<&Node<V>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node<V>> {
        self.right.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Rightmost descendant (the node itself when it has no right child).
    pub fn max_node(&self) -> &Node<V> {
        let mut current = self;
        while let Some(ref right) = current.right {
            current = right;
        }
        current
    }

    /// Leftmost descendant (the node itself when it has no left child).
    pub fn min_node(&self) -> &Node<V> {
        let mut current = self;
        while let Some(ref left) = current.left {
            current = left;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Node<i32> {
        // 5 -> left 3 -> left 1 ; 5 -> right 8 -> right 9
        let mut root = Node::new(5);
        let mut three = Node::new(3);
        three.left = Some(Box::new(Node::new(1)));
        let mut eight = Node::new(8);
        eight.right = Some(Box::new(Node::new(9)));
        root.left = Some(Box::new(three));
        root.right = Some(Box::new(eight));
        root
    }

    #[test]
    fn given_new_node_when_created_then_is_leaf() {
        let node = Node::new("a");
        assert!(node.is_leaf());
        assert!(node.left().is_none());
        assert!(node.right().is_none());
    }

    #[test]
    fn given_subtree_when_finding_extremes_then_returns_spine_ends() {
        let root = chain();
        assert_eq!(*root.max_node().value(), 9);
        assert_eq!(*root.min_node().value(), 1);
        assert_eq!(*root.left().unwrap().max_node().value(), 3);
    }
}
