// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes: a leaf holding items or an internal node holding child nodes.

use alloc::vec::Vec;

use crate::item::SpatialItem;
use crate::split::{Bounded, quadratic_split};
use crate::types::Aabb;

/// What a node holds. Exactly one kind of entry, decided by the variant.
#[derive(Clone, Debug)]
pub enum NodeContents<T> {
    /// Bottom of the tree: stored items.
    Leaf(Vec<SpatialItem<T>>),
    /// Interior: child nodes.
    Internal(Vec<RTreeNode<T>>),
}

/// A node of the [`RTree`](crate::RTree).
///
/// `bounds` is always the exact corner union of the node's entries once a mutating
/// call returns, so every entry edge lies on or inside the node's edges. `level` is the node's depth index: bulk loading numbers the root `0`
/// and each layer below it one higher, and a root split puts the new root at
/// `old_root.level - 1`, so levels may become negative after incremental growth.
#[derive(Clone, Debug)]
pub struct RTreeNode<T> {
    pub(crate) bounds: Aabb,
    pub(crate) level: i32,
    pub(crate) contents: NodeContents<T>,
}

impl<T> RTreeNode<T> {
    pub(crate) fn leaf(level: i32, items: Vec<SpatialItem<T>>) -> Self {
        let bounds = Aabb::union_all(items.iter().map(Bounded::bounds));
        Self {
            bounds,
            level,
            contents: NodeContents::Leaf(items),
        }
    }

    pub(crate) fn internal(level: i32, children: Vec<Self>) -> Self {
        let bounds = Aabb::union_all(children.iter().map(|c| c.bounds));
        Self {
            bounds,
            level,
            contents: NodeContents::Internal(children),
        }
    }

    /// Bounds enclosing everything under this node.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Depth index of this node.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Whether this node holds items directly.
    pub fn is_leaf(&self) -> bool {
        matches!(self.contents, NodeContents::Leaf(_))
    }

    /// The node's entries.
    pub fn contents(&self) -> &NodeContents<T> {
        &self.contents
    }

    /// Items of a leaf; empty for internal nodes.
    pub fn items(&self) -> &[SpatialItem<T>] {
        match &self.contents {
            NodeContents::Leaf(items) => items,
            NodeContents::Internal(_) => &[],
        }
    }

    /// Children of an internal node; empty for leaves.
    pub fn children(&self) -> &[Self] {
        match &self.contents {
            NodeContents::Leaf(_) => &[],
            NodeContents::Internal(children) => children,
        }
    }

    /// Number of direct entries (items or children).
    pub fn len(&self) -> usize {
        match &self.contents {
            NodeContents::Leaf(items) => items.len(),
            NodeContents::Internal(children) => children.len(),
        }
    }

    /// Whether the node has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recompute `bounds` from the direct entries.
    pub(crate) fn recompute_bounds(&mut self) {
        self.bounds = match &self.contents {
            NodeContents::Leaf(items) => Aabb::union_all(items.iter().map(Bounded::bounds)),
            NodeContents::Internal(children) => Aabb::union_all(children.iter().map(|c| c.bounds)),
        };
    }

    /// Split an overfull node in place with the quadratic heuristic.
    ///
    /// `self` keeps the first group; the second group is returned as a new sibling
    /// on the same level.
    pub(crate) fn split(&mut self) -> Self {
        let level = self.level;
        match &mut self.contents {
            NodeContents::Leaf(items) => {
                let halves = quadratic_split(core::mem::take(items));
                log::trace!(
                    "split leaf at level {level}: {} / {}",
                    halves.first.len(),
                    halves.second.len()
                );
                *items = halves.first;
                self.bounds = halves.first_bounds;
                Self {
                    bounds: halves.second_bounds,
                    level,
                    contents: NodeContents::Leaf(halves.second),
                }
            }
            NodeContents::Internal(children) => {
                let halves = quadratic_split(core::mem::take(children));
                log::trace!(
                    "split internal node at level {level}: {} / {}",
                    halves.first.len(),
                    halves.second.len()
                );
                *children = halves.first;
                self.bounds = halves.first_bounds;
                Self {
                    bounds: halves.second_bounds,
                    level,
                    contents: NodeContents::Internal(halves.second),
                }
            }
        }
    }

    /// Consume the subtree and return every item in it.
    pub(crate) fn into_items(self) -> Vec<SpatialItem<T>> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![self];
        while let Some(node) = stack.pop() {
            match node.contents {
                NodeContents::Leaf(items) => out.extend(items),
                NodeContents::Internal(children) => stack.extend(children),
            }
        }
        out
    }
}

impl<T> Bounded for RTreeNode<T> {
    fn bounds(&self) -> Aabb {
        self.bounds
    }
}
