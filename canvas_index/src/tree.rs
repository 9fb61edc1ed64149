// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The R-tree: incremental insert with quadratic splits, removal with lazy
//! rebuilds, pruned box/point queries, and bulk loading.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;

use crate::bulk;
use crate::config::RTreeConfig;
use crate::error::InvalidItemError;
use crate::item::{ItemKinds, SpatialItem};
use crate::node::{NodeContents, RTreeNode};
use crate::types::{Aabb, BoundingBox};

/// Snapshot of tree bookkeeping returned by [`RTree::stats`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RTreeStats {
    /// Items currently stored.
    pub item_count: usize,
    /// Removals since the last full rebuild.
    pub remove_count: usize,
    /// Number of layers from the root down to the shallowest leaf; `0` when empty.
    pub height: usize,
    /// Whether the next removal will trigger a full rebuild.
    pub needs_rebuild: bool,
    /// Total number of nodes.
    pub node_count: usize,
}

/// Two-dimensional R-tree over [`BoundingBox`]es carrying payloads of type `T`.
///
/// Removals never merge underfull nodes. Instead, once more than
/// [`RTreeConfig::rebuild_threshold`] removals have accumulated, the whole tree is
/// rebuilt through the bulk loader.
///
/// The tree is a plain single-owner structure. Mutations need `&mut self`, so
/// sharing across threads means wrapping the whole tree in one lock.
pub struct RTree<T> {
    config: RTreeConfig,
    root: Option<RTreeNode<T>>,
    // Id -> current bounds. Enforces id uniqueness and prunes the removal search.
    ids: HashMap<String, BoundingBox>,
    remove_count: usize,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RTree<T> {
    /// Create an empty tree with the default [`RTreeConfig`].
    pub fn new() -> Self {
        Self::with_config(RTreeConfig::default())
    }

    /// Create an empty tree with custom tuning.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_children < 2`.
    pub fn with_config(config: RTreeConfig) -> Self {
        assert!(
            config.max_children >= 2,
            "an R-tree node must be able to hold at least two entries"
        );
        Self {
            config,
            root: None,
            ids: HashMap::new(),
            remove_count: 0,
        }
    }

    /// The tuning this tree was created with.
    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the tree stores no items.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether an item with this id is stored.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Root node, for inspection (for example a debug overlay of node bounds).
    pub fn root(&self) -> Option<&RTreeNode<T>> {
        self.root.as_ref()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&SpatialItem<T>> {
        let hint = Aabb::from_box(self.ids.get(id)?);
        let mut stack = vec![self.root.as_ref()?];
        while let Some(node) = stack.pop() {
            if !node.bounds.intersects(&hint) {
                continue;
            }
            match &node.contents {
                NodeContents::Leaf(items) => {
                    if let Some(found) = items.iter().find(|it| it.id == id) {
                        return Some(found);
                    }
                }
                NodeContents::Internal(children) => stack.extend(children),
            }
        }
        None
    }

    /// Iterate over every stored item, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SpatialItem<T>> + '_ {
        self.collect(|_| true, ItemKinds::all()).into_iter()
    }

    /// Insert an item.
    ///
    /// Fails without touching the tree if the id is empty, the bounds are unusable,
    /// or the id is already stored.
    pub fn insert(&mut self, item: SpatialItem<T>) -> Result<(), InvalidItemError> {
        item.validate()?;
        if self.ids.contains_key(item.id.as_str()) {
            return Err(InvalidItemError::DuplicateId { id: item.id });
        }
        self.ids.insert(item.id.clone(), item.bounds);
        self.insert_unchecked(item);
        Ok(())
    }

    fn insert_unchecked(&mut self, item: SpatialItem<T>) {
        let max_children = self.config.max_children;
        if self.root.is_none() {
            self.root = Some(RTreeNode::leaf(0, vec![item]));
            return;
        }
        let Some(root) = self.root.as_mut() else {
            return;
        };
        let Some(sibling) = Self::insert_into(root, item, max_children) else {
            return;
        };
        if let Some(old_root) = self.root.take() {
            let level = old_root.level - 1;
            log::trace!("root split, new root at level {level}");
            self.root = Some(RTreeNode::internal(level, vec![old_root, sibling]));
        }
    }

    /// Insert below `node`; returns the new sibling if `node` had to split.
    fn insert_into(
        node: &mut RTreeNode<T>,
        item: SpatialItem<T>,
        max_children: usize,
    ) -> Option<RTreeNode<T>> {
        let item_bounds = Aabb::from_box(&item.bounds);
        let overflow = match &mut node.contents {
            NodeContents::Leaf(items) => {
                items.push(item);
                items.len() > max_children
            }
            NodeContents::Internal(children) => {
                let best = choose_subtree(children, &item_bounds);
                match Self::insert_into(&mut children[best], item, max_children) {
                    Some(sibling) => {
                        children.insert(best + 1, sibling);
                        children.len() > max_children
                    }
                    None => false,
                }
            }
        };
        node.bounds = node.bounds.union(&item_bounds);
        overflow.then(|| node.split())
    }

    /// Remove an item by id. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        self.remove_item(id).is_some()
    }

    /// Remove an item by id and hand it back.
    ///
    /// Every ancestor's bounds is recomputed from what remains and emptied nodes are
    /// dropped. Counts towards the rebuild threshold.
    pub fn remove_item(&mut self, id: &str) -> Option<SpatialItem<T>> {
        let hint = Aabb::from_box(self.ids.get(id)?);
        let root = self.root.as_mut()?;
        let removed = Self::remove_from(root, id, &hint)?;
        if root.is_empty() {
            self.root = None;
        }
        self.ids.remove(id);
        self.remove_count += 1;
        if self.remove_count > self.config.rebuild_threshold {
            log::debug!(
                "{} removals since last rebuild, rebuilding {} items",
                self.remove_count,
                self.ids.len()
            );
            self.rebuild();
        }
        Some(removed)
    }

    fn remove_from(
        node: &mut RTreeNode<T>,
        id: &str,
        hint: &Aabb,
    ) -> Option<SpatialItem<T>> {
        if !node.bounds.intersects(hint) {
            return None;
        }
        let removed = match &mut node.contents {
            NodeContents::Leaf(items) => {
                let pos = items.iter().position(|it| it.id == id)?;
                items.remove(pos)
            }
            NodeContents::Internal(children) => {
                let (idx, removed) = children
                    .iter_mut()
                    .enumerate()
                    .find_map(|(i, c)| Self::remove_from(c, id, hint).map(|r| (i, r)))?;
                if children[idx].is_empty() {
                    children.remove(idx);
                }
                removed
            }
        };
        node.recompute_bounds();
        Some(removed)
    }

    /// Move an item to new bounds, keeping its id, payload, and kind.
    ///
    /// Returns `false` with no effect if the id is not stored or `bounds` is not
    /// [valid](BoundingBox::is_valid). Implemented as a removal plus reinsertion,
    /// so it counts towards the rebuild threshold.
    pub fn update(&mut self, id: &str, bounds: BoundingBox) -> bool {
        if !bounds.is_valid() {
            return false;
        }
        let Some(mut item) = self.remove_item(id) else {
            return false;
        };
        item.bounds = bounds;
        self.ids.insert(item.id.clone(), bounds);
        self.insert_unchecked(item);
        true
    }

    /// Swap in a full replacement for the stored item with the same id.
    ///
    /// Returns `Ok(false)` with no effect if no item has that id, and an error if the
    /// replacement itself is invalid.
    pub fn replace(&mut self, item: SpatialItem<T>) -> Result<bool, InvalidItemError> {
        item.validate()?;
        if self.remove_item(&item.id).is_none() {
            return Ok(false);
        }
        self.ids.insert(item.id.clone(), item.bounds);
        self.insert_unchecked(item);
        Ok(true)
    }

    /// Items whose bounds intersect `bounds` (edges inclusive), in no particular order.
    pub fn query(&self, bounds: &BoundingBox) -> Vec<&SpatialItem<T>> {
        let q = Aabb::from_box(bounds);
        self.collect(|b| b.intersects(&q), ItemKinds::all())
    }

    /// Like [`RTree::query`], keeping only items whose kind is in `kinds`.
    pub fn query_filtered(&self, bounds: &BoundingBox, kinds: ItemKinds) -> Vec<&SpatialItem<T>> {
        let q = Aabb::from_box(bounds);
        self.collect(|b| b.intersects(&q), kinds)
    }

    /// Items whose bounds contain the point (edges inclusive), in no particular order.
    pub fn query_point(&self, x: f64, y: f64) -> Vec<&SpatialItem<T>> {
        self.collect(|b| b.contains(x, y), ItemKinds::all())
    }

    /// Like [`RTree::query_point`], keeping only items whose kind is in `kinds`.
    pub fn query_point_filtered(&self, x: f64, y: f64, kinds: ItemKinds) -> Vec<&SpatialItem<T>> {
        self.collect(|b| b.contains(x, y), kinds)
    }

    fn collect<F>(&self, hit: F, kinds: ItemKinds) -> Vec<&SpatialItem<T>>
    where
        F: Fn(&Aabb) -> bool,
    {
        let mut out = Vec::new();
        let Some(root) = &self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !hit(&node.bounds) {
                continue;
            }
            match &node.contents {
                NodeContents::Leaf(items) => out.extend(
                    items
                        .iter()
                        .filter(|it| kinds.accepts(it.kind) && hit(&Aabb::from_box(&it.bounds))),
                ),
                NodeContents::Internal(children) => stack.extend(children),
            }
        }
        out
    }

    /// Replace the whole contents with `items`, building a packed tree.
    ///
    /// The input is validated first (including duplicate ids within it); on error the
    /// previous contents are kept. An empty input leaves the tree empty.
    pub fn bulk_load(&mut self, items: Vec<SpatialItem<T>>) -> Result<(), InvalidItemError> {
        let mut ids = HashMap::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if ids.insert(item.id.clone(), item.bounds).is_some() {
                return Err(InvalidItemError::DuplicateId {
                    id: item.id.clone(),
                });
            }
        }
        self.ids = ids;
        self.remove_count = 0;
        self.root = bulk::build(items, self.config.max_children);
        log::debug!(
            "bulk loaded {} items, height {}",
            self.ids.len(),
            self.height()
        );
        Ok(())
    }

    /// Re-pack every stored item through the bulk loader and reset the removal count.
    pub fn rebuild(&mut self) {
        let items = self
            .root
            .take()
            .map(RTreeNode::into_items)
            .unwrap_or_default();
        self.root = bulk::build(items, self.config.max_children);
        self.remove_count = 0;
    }

    /// Drop every item and reset the counters.
    pub fn clear(&mut self) {
        self.root = None;
        self.ids.clear();
        self.remove_count = 0;
    }

    /// Bookkeeping snapshot.
    pub fn stats(&self) -> RTreeStats {
        RTreeStats {
            item_count: self.ids.len(),
            remove_count: self.remove_count,
            height: self.height(),
            needs_rebuild: self.remove_count >= self.config.rebuild_threshold,
            node_count: self.node_count(),
        }
    }

    /// Layers from the root down to the shallowest leaf.
    fn height(&self) -> usize {
        let Some(root) = &self.root else {
            return 0;
        };
        let mut height = 1;
        let mut layer = vec![root];
        while !layer.iter().any(|n| n.is_leaf()) {
            layer = layer.into_iter().flat_map(RTreeNode::children).collect();
            if layer.is_empty() {
                break;
            }
            height += 1;
        }
        height
    }

    fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&RTreeNode<T>> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

/// Child needing the least area enlargement to absorb `bounds`; ties go to the
/// smaller child.
fn choose_subtree<T>(children: &[RTreeNode<T>], bounds: &Aabb) -> usize {
    let mut best = 0;
    let mut best_cost = (f64::INFINITY, f64::INFINITY);
    for (i, child) in children.iter().enumerate() {
        let cost = (child.bounds.enlargement(bounds), child.bounds.area());
        if cost.0 < best_cost.0 || (cost.0 == best_cost.0 && cost.1 < best_cost.1) {
            best = i;
            best_cost = cost;
        }
    }
    best
}

impl<T> Debug for RTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_children", &self.config.max_children)
            .field("min_children", &self.config.min_children)
            .field("rebuild_threshold", &self.config.rebuild_threshold)
            .field("items", &self.ids.len())
            .field("remove_count", &self.remove_count)
            .field("has_root", &self.root.is_some())
            .finish_non_exhaustive()
    }
}
