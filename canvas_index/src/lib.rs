// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canvas_index --heading-base-level=0

//! Canvas Index: a 2D R-tree over axis-aligned bounding boxes.
//!
//! Canvas Index backs viewport culling, hit testing, and collision queries for a
//! diagram canvas. Components and connections are stored as [`SpatialItem`]s keyed by
//! a string id, each with a [`BoundingBox`], an opaque payload, and an [`ItemKind`].
//!
//! - Insert, update, replace, and remove items by id.
//! - Query by intersecting rectangle or by point, optionally filtered by [`ItemKinds`].
//! - Bulk load a complete item set into a packed tree.
//!
//! Inserts descend by least area enlargement and split overfull nodes with the
//! quadratic heuristic. Removals keep every node's bounds exact but never merge
//! underfull nodes. Once more than [`RTreeConfig::rebuild_threshold`] removals have
//! accumulated, the tree is rebuilt through the bulk loader.
//!
//! # Example
//!
//! ```rust
//! use canvas_index::{BoundingBox, RTree, SpatialItem};
//!
//! let mut tree = RTree::new();
//! tree.insert(SpatialItem::component("a", BoundingBox::new(0.0, 0.0, 10.0, 10.0), 1_u32))?;
//! tree.insert(SpatialItem::component("b", BoundingBox::new(100.0, 100.0, 10.0, 10.0), 2))?;
//! tree.insert(SpatialItem::connection("c", BoundingBox::new(5.0, 5.0, 10.0, 10.0), 3))?;
//!
//! // Cull to a viewport.
//! let visible = tree.query(&BoundingBox::new(0.0, 0.0, 10.0, 10.0));
//! assert_eq!(visible.len(), 2);
//!
//! // Resolve a click.
//! let hits = tree.query_point(105.0, 105.0);
//! assert_eq!(hits[0].data, 2);
//!
//! // Move an item; payload and kind are kept.
//! assert!(tree.update("a", BoundingBox::new(500.0, 500.0, 10.0, 10.0)));
//! assert_eq!(tree.query_point(505.0, 505.0)[0].data, 1);
//! # Ok::<(), canvas_index::InvalidItemError>(())
//! ```
//!
//! Loading a whole canvas at once:
//!
//! ```rust
//! use canvas_index::{BoundingBox, RTree, SpatialItem};
//!
//! let items: Vec<_> = (0..100)
//!     .map(|i| {
//!         let b = BoundingBox::new((i % 10) as f64 * 150.0, (i / 10) as f64 * 100.0, 120.0, 80.0);
//!         SpatialItem::component(format!("node-{i}"), b, i)
//!     })
//!     .collect();
//!
//! let mut tree = RTree::new();
//! tree.bulk_load(items)?;
//! let stats = tree.stats();
//! assert_eq!(stats.item_count, 100);
//! assert_eq!(stats.height, 3);
//! # Ok::<(), canvas_index::InvalidItemError>(())
//! ```
//!
//! ### Float semantics
//!
//! Item bounds must be finite with a non-negative extent; anything else is rejected
//! with [`InvalidItemError::InvalidBounds`]. Query boxes are not validated.
//! Node bounds are kept as exact [`Aabb`] corners, so an item is found by any query
//! that touches one of its edges, however far it sits from the rest of the tree.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bulk;
pub mod config;
pub mod error;
pub mod item;
pub mod node;
mod split;
pub mod tree;
pub mod types;

pub use config::RTreeConfig;
pub use error::InvalidItemError;
pub use item::{ItemKind, ItemKinds, SpatialItem};
pub use node::{NodeContents, RTreeNode};
pub use tree::{RTree, RTreeStats};
pub use types::{Aabb, BoundingBox};
