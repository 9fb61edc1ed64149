// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for [`RTree`](crate::RTree).

/// Fan-out and rebuild tuning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RTreeConfig {
    /// Upper bound on entries per node; a node holding more is split. Must be at least 2.
    pub max_children: usize,
    /// Nominal lower bound on entries per node. Advisory only: nodes are never merged
    /// after removals, so this is not enforced.
    pub min_children: usize,
    /// Once more removals than this have accumulated, the tree is rebuilt in bulk.
    pub rebuild_threshold: usize,
}

impl RTreeConfig {
    /// Default maximum fan-out.
    pub const MAX_CHILDREN: usize = 8;
    /// Default advisory minimum fan-out.
    pub const MIN_CHILDREN: usize = 4;
    /// Default number of removals tolerated before a rebuild.
    pub const REBUILD_THRESHOLD: usize = 50;
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            max_children: Self::MAX_CHILDREN,
            min_children: Self::MIN_CHILDREN,
            rebuild_threshold: Self::REBUILD_THRESHOLD,
        }
    }
}
