//! Binary search tree engine.
//!
//! Nodes own their children through `Option<Box<Node>>` slots and keep no
//! parent reference. Every structural change is expressed as "take the
//! subtree out of its slot, rebuild it, put the new subtree root back", so
//! ancestors never need to be patched after the fact.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::node::{Link, Node};
use crate::domain::traversal::{BreadthFirst, InOrder, Order, PostOrder, PreOrder};
use crate::domain::Keyed;

/// Outcome of [`OrderedTree::insert`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// A value with an equal key is already present; the tree is unchanged.
    Duplicate,
}

impl Insertion {
    pub fn is_inserted(self) -> bool {
        self == Insertion::Inserted
    }
}

/// How a node with two children is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStrategy {
    /// Hang the right subtree below the maximum of the left subtree.
    #[default]
    Merging,
    /// Move the maximum of the left subtree into the deleted node.
    Copying,
}

impl fmt::Display for DeleteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteStrategy::Merging => f.write_str("merging"),
            DeleteStrategy::Copying => f.write_str("copying"),
        }
    }
}

impl FromStr for DeleteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" | "merging" => Ok(DeleteStrategy::Merging),
            "copy" | "copying" => Ok(DeleteStrategy::Copying),
            other => Err(format!("unknown delete strategy: {other}")),
        }
    }
}

/// Unbalanced binary search tree keyed by [`Keyed::key`].
///
/// Keys are unique. The tree never rebalances itself; call
/// [`balance`](Self::balance) to rebuild it with near-minimal height.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedTree<V> {
    root: Link<V>,
}

impl<V> Default for OrderedTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OrderedTree<V> {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Node<V>> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Number of values, counted by walking the tree.
    pub fn len(&self) -> usize {
        self.pre_order().count()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub fn height(&self) -> usize {
        fn height_of<V>(node: Option<&Node<V>>) -> usize {
            node.map_or(0, |n| 1 + height_of(n.left()).max(height_of(n.right())))
        }
        height_of(self.root())
    }

    /// True iff at every node the subtree heights differ by at most one.
    pub fn is_balanced(&self) -> bool {
        Self::checked_height(self.root()).is_some()
    }

    /// Height of `node`, or `None` as soon as any subtree is out of balance.
    fn checked_height(node: Option<&Node<V>>) -> Option<usize> {
        let Some(node) = node else {
            return Some(0);
        };
        let left = Self::checked_height(node.left())?;
        let right = Self::checked_height(node.right())?;
        if left.abs_diff(right) > 1 {
            return None;
        }
        Some(left.max(right) + 1)
    }

    pub fn min(&self) -> Option<&V> {
        self.root().map(|root| root.min_node().value())
    }

    pub fn max(&self) -> Option<&V> {
        self.root().map(|root| root.max_node().value())
    }

    pub fn pre_order(&self) -> PreOrder<'_, V> {
        PreOrder::new(self.root())
    }

    pub fn pre_order_from<'a>(&'a self, start: Option<&'a Node<V>>) -> PreOrder<'a, V> {
        PreOrder::new(start)
    }

    pub fn in_order(&self) -> InOrder<'_, V> {
        InOrder::new(self.root())
    }

    pub fn in_order_from<'a>(&'a self, start: Option<&'a Node<V>>) -> InOrder<'a, V> {
        InOrder::new(start)
    }

    pub fn post_order(&self) -> PostOrder<'_, V> {
        PostOrder::new(self.root())
    }

    pub fn post_order_from<'a>(&'a self, start: Option<&'a Node<V>>) -> PostOrder<'a, V> {
        PostOrder::new(start)
    }

    /// Level order over the whole tree.
    pub fn breadth_first(&self) -> BreadthFirst<'_, V> {
        BreadthFirst::new(self.root())
    }

    pub fn traverse(&self, order: Order) -> Box<dyn Iterator<Item = &V> + '_> {
        match order {
            Order::Pre => Box::new(self.pre_order()),
            Order::In => Box::new(self.in_order()),
            Order::Post => Box::new(self.post_order()),
            Order::Breadth => Box::new(self.breadth_first()),
        }
    }

    /// Appends the in-order sequence of the subtree at `start` to `out`.
    pub fn to_ordered_sequence<'a>(start: Option<&'a Node<V>>, out: &mut Vec<&'a V>) {
        if let Some(node) = start {
            Self::to_ordered_sequence(node.left(), out);
            out.push(node.value());
            Self::to_ordered_sequence(node.right(), out);
        }
    }

    /// In-order values of the whole tree.
    pub fn ordered_values(&self) -> Vec<&V> {
        let mut out = Vec::new();
        Self::to_ordered_sequence(self.root(), &mut out);
        out
    }

    /// Moves every value out of `node` in ascending order.
    fn drain_in_order(node: Box<Node<V>>, out: &mut Vec<V>) {
        let Node { value, left, right } = *node;
        if let Some(left) = left {
            Self::drain_in_order(left, out);
        }
        out.push(value);
        if let Some(right) = right {
            Self::drain_in_order(right, out);
        }
    }
}

impl<V: Keyed> OrderedTree<V> {
    fn order_of<Q>(key: &Q, node: &Node<V>) -> Ordering
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        key.cmp(Borrow::<Q>::borrow(node.value.key()))
    }

    /// Adds `value` unless a value with the same key is present.
    pub fn insert(&mut self, value: V) -> Insertion {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            match value.key().cmp(node.value.key()) {
                Ordering::Less => slot = &mut node.left,
                Ordering::Greater => slot = &mut node.right,
                Ordering::Equal => {
                    trace!("insert: duplicate key rejected");
                    return Insertion::Duplicate;
                }
            }
        }
        *slot = Some(Box::new(Node::new(value)));
        Insertion::Inserted
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&Node<V>>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root();
        while let Some(node) = current {
            match Self::order_of(key, node) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => current = node.right(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Parent of `node`, found by descending from the root along `node`'s key.
    ///
    /// Nodes are matched by identity, not by key: a node belonging to another
    /// tree has no parent here even if an equal key is present. Returns `None`
    /// for the root and for nodes not in this tree.
    pub fn get_parent(&self, node: &Node<V>) -> Option<&Node<V>> {
        let key = node.value.key();
        let mut parent = None;
        let mut current = self.root();
        while let Some(candidate) = current {
            if std::ptr::eq(candidate, node) {
                return parent;
            }
            parent = Some(candidate);
            current = match key.cmp(candidate.value.key()) {
                Ordering::Less => candidate.left(),
                Ordering::Greater => candidate.right(),
                Ordering::Equal => None,
            };
        }
        None
    }

    /// Parent of the node holding `key`; `None` if absent or the root.
    pub fn parent_of<Q>(&self, key: &Q) -> Option<&Node<V>>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).and_then(|node| self.get_parent(node))
    }

    pub fn delete<Q>(&mut self, key: &Q, strategy: DeleteStrategy) -> Option<V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match strategy {
            DeleteStrategy::Merging => self.delete_by_merging(key),
            DeleteStrategy::Copying => self.delete_by_copying(key),
        }
    }

    /// Removes the value with `key`, relinking subtrees without moving payloads.
    ///
    /// Returns the removed value, or `None` (tree unchanged) if `key` is absent.
    #[instrument(level = "trace", skip_all)]
    pub fn delete_by_merging<Q>(&mut self, key: &Q) -> Option<V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut removed = None;
        self.root = Self::merge_out(self.root.take(), key, &mut removed);
        trace!(found = removed.is_some(), "delete_by_merging");
        removed
    }

    fn merge_out<Q>(link: Link<V>, key: &Q, removed: &mut Option<V>) -> Link<V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = link?;
        match Self::order_of(key, &node) {
            Ordering::Less => {
                node.left = Self::merge_out(node.left.take(), key, removed);
                Some(node)
            }
            Ordering::Greater => {
                node.right = Self::merge_out(node.right.take(), key, removed);
                Some(node)
            }
            Ordering::Equal => {
                let Node { value, left, right } = *node;
                *removed = Some(value);
                match (left, right) {
                    (None, right) => right,
                    (left, None) => left,
                    (Some(mut left), right) => {
                        Self::attach_at_max(&mut left.right, right);
                        Some(left)
                    }
                }
            }
        }
    }

    /// Puts `subtree` into the empty right slot at the end of the right spine.
    fn attach_at_max(slot: &mut Link<V>, subtree: Link<V>) {
        match slot {
            Some(node) => Self::attach_at_max(&mut node.right, subtree),
            None => *slot = subtree,
        }
    }

    /// Removes the value with `key`; a node with two children keeps its place
    /// and receives the maximum value of its left subtree.
    ///
    /// Returns the removed value, or `None` (tree unchanged) if `key` is absent.
    #[instrument(level = "trace", skip_all)]
    pub fn delete_by_copying<Q>(&mut self, key: &Q) -> Option<V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut removed = None;
        self.root = Self::copy_out(self.root.take(), key, &mut removed);
        trace!(found = removed.is_some(), "delete_by_copying");
        removed
    }

    fn copy_out<Q>(link: Link<V>, key: &Q, removed: &mut Option<V>) -> Link<V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = link?;
        match Self::order_of(key, &node) {
            Ordering::Less => {
                node.left = Self::copy_out(node.left.take(), key, removed);
                Some(node)
            }
            Ordering::Greater => {
                node.right = Self::copy_out(node.right.take(), key, removed);
                Some(node)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, right) => {
                    *removed = Some(node.value);
                    right
                }
                (left, None) => {
                    *removed = Some(node.value);
                    left
                }
                (Some(left), right) => {
                    let (rest, donor) = Self::take_max(left);
                    *removed = Some(std::mem::replace(&mut node.value, donor));
                    node.left = rest;
                    node.right = right;
                    Some(node)
                }
            },
        }
    }

    /// Detaches the maximum of `node`'s subtree.
    ///
    /// The donor has no right child, so it is replaced by its left subtree.
    fn take_max(mut node: Box<Node<V>>) -> (Link<V>, V) {
        match node.right.take() {
            Some(right) => {
                let (rest, max) = Self::take_max(right);
                node.right = rest;
                (Some(node), max)
            }
            None => {
                let Node { value, left, .. } = *node;
                (left, value)
            }
        }
    }

    /// Rebuilds the tree with near-minimal height.
    ///
    /// Flattens in order, clears, and reinserts by recursive midpoint. This is
    /// a one-shot operation; later inserts and deletes may unbalance it again.
    #[instrument(level = "debug", skip_all)]
    pub fn balance(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        let mut sorted = Vec::new();
        Self::drain_in_order(root, &mut sorted);
        let count = sorted.len();
        let mut slots: Vec<Option<V>> = sorted.into_iter().map(Some).collect();
        self.insert_midpoints(&mut slots);
        debug!(count, height = self.height(), "balance: tree rebuilt");
    }

    /// Inserts `sorted[low..=high]` by recursive midpoint, `mid = (low + high) / 2`.
    ///
    /// `low > high` is the empty range and does nothing. A range reaching
    /// past the end of `sorted` is rejected before the tree is touched.
    pub fn rebuild_balanced(&mut self, sorted: &[V], low: usize, high: usize) -> TreeResult<()>
    where
        V: Clone,
    {
        if low > high {
            return Ok(());
        }
        if high >= sorted.len() {
            return Err(DomainError::RangeOutOfBounds {
                low,
                high,
                len: sorted.len(),
            });
        }
        let mut slots: Vec<Option<V>> = sorted[low..=high].iter().cloned().map(Some).collect();
        self.insert_midpoints(&mut slots);
        Ok(())
    }

    /// [`rebuild_balanced`](Self::rebuild_balanced) over all of `sorted`.
    pub fn rebuild_from_sorted(&mut self, sorted: &[V]) -> TreeResult<()>
    where
        V: Clone,
    {
        match sorted.len() {
            0 => Ok(()),
            len => self.rebuild_balanced(sorted, 0, len - 1),
        }
    }

    // Slice-relative midpoint (len - 1) / 2 equals (low + high) / 2 - low.
    fn insert_midpoints(&mut self, slots: &mut [Option<V>]) {
        if slots.is_empty() {
            return;
        }
        let mid = (slots.len() - 1) / 2;
        if let Some(value) = slots[mid].take() {
            if self.insert(value) == Insertion::Duplicate {
                trace!("insert_midpoints: duplicate key skipped");
            }
        }
        let (lower, upper) = slots.split_at_mut(mid);
        self.insert_midpoints(lower);
        self.insert_midpoints(&mut upper[1..]);
    }
}

impl<V: Keyed> FromIterator<V> for OrderedTree<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<V: Keyed> Extend<V> for OrderedTree<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}
