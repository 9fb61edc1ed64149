// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down bulk builder.
//!
//! Items are ordered by a coarse locality key, then the sorted sequence is cut into
//! at most `max_children` contiguous chunks per node, recursively. The key buckets
//! box centers into a 100×100 grid, `floor(cx / 100) * 1000 + floor(cy / 100)`.
//! That approximates the clustering of a space-filling curve; it is not a Hilbert
//! index and fixtures depend on the resulting shape.
//!
//! Leaves are only created at the bottom layer, so every leaf of a freshly loaded
//! tree sits at the same depth. The shape therefore differs from the plain rule of
//! turning any run of at most `max_children` items into a leaf: a short tail above
//! the bottom layer still gets internal nodes, for example two items become an
//! internal node over two single-item leaves.

use alloc::vec::Vec;

use crate::item::SpatialItem;
use crate::node::RTreeNode;
use crate::types::BoundingBox;

const CELL: f64 = 100.0;
const ROW_STRIDE: i64 = 1000;

#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid buckets are coarse; out-of-range centers saturate to the edge bucket."
)]
fn floor_to_i64(v: f64) -> i64 {
    let t = v as i64;
    if (t as f64) > v { t - 1 } else { t }
}

/// Grid-bucket ordering key for a box.
pub(crate) fn locality_key(bounds: &BoundingBox) -> i64 {
    let (cx, cy) = bounds.center();
    floor_to_i64(cx / CELL)
        .saturating_mul(ROW_STRIDE)
        .saturating_add(floor_to_i64(cy / CELL))
}

/// Number of layers needed so that `n` items fit with fan-out `max_children`.
fn target_height(n: usize, max_children: usize) -> usize {
    let mut height = 1;
    let mut capacity = max_children;
    while capacity < n {
        capacity = capacity.saturating_mul(max_children);
        height += 1;
    }
    height
}

/// Build a packed tree. Returns `None` for an empty input.
pub(crate) fn build<T>(
    mut items: Vec<SpatialItem<T>>,
    max_children: usize,
) -> Option<RTreeNode<T>> {
    if items.is_empty() {
        return None;
    }
    items.sort_by_cached_key(|it| locality_key(&it.bounds));
    let height = target_height(items.len(), max_children);
    Some(build_node(items, 0, height, max_children))
}

fn build_node<T>(
    items: Vec<SpatialItem<T>>,
    level: i32,
    layers: usize,
    max_children: usize,
) -> RTreeNode<T> {
    if layers <= 1 {
        return RTreeNode::leaf(level, items);
    }
    let chunk = items.len().div_ceil(max_children);
    let mut children = Vec::with_capacity(max_children);
    let mut rest = items;
    while !rest.is_empty() {
        let tail = rest.split_off(chunk.min(rest.len()));
        children.push(build_node(rest, level + 1, layers - 1, max_children));
        rest = tail;
    }
    RTreeNode::internal(level, children)
}
