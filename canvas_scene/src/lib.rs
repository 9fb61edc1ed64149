// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canvas_scene --heading-base-level=0

//! Canvas Scene: diagram elements and connections kept in sync with a spatial index.
//!
//! Canvas Scene sits between a diagram editor's data model and [`canvas_index`].
//! It owns the [`DiagramElement`]s and [`Connection`]s of one canvas, derives a
//! bounding box for each, and keeps an [`RTree`](canvas_index::RTree) current as the
//! diagram is edited.
//!
//! - Element bounds come from the element position and its `width`/`height`
//!   properties, falling back to [`SceneConfig::default_size`].
//! - Connection bounds span the centers of both endpoints, padded by
//!   [`SceneConfig::connection_padding`] so thin links stay clickable.
//! - Moving or resizing an element drags its connections along and reports a
//!   damage rectangle covering everything that changed.
//!
//! ## Not a renderer
//!
//! Nothing here draws or routes connections. Coordinates are canvas coordinates;
//! any view transform is applied by the caller before querying.
//!
//! ## API overview
//!
//! - [`SceneIndex`]: the scene container.
//! - [`SceneIndex::visible`]: everything overlapping a viewport, for culling.
//! - [`SceneIndex::hit_test`] / [`SceneIndex::hits_at`]: picking under a point.
//!   Elements win over connections and smaller elements win over the groups they sit in.
//! - [`SceneIndex::move_element`] / [`SceneIndex::resize_element`] → damage [`Rect`](kurbo::Rect).
//!
//! # Example
//!
//! ```rust
//! use canvas_scene::{Connection, DiagramElement, SceneConfig, SceneIndex};
//! use kurbo::{Point, Rect};
//!
//! let mut scene = SceneIndex::from_diagram(
//!     SceneConfig::default(),
//!     [
//!         DiagramElement::new("web", "service", Point::new(0.0, 0.0)),
//!         DiagramElement::new("db", "database", Point::new(300.0, 0.0)),
//!     ],
//!     [Connection::new("web-db", "web", "db", "sql")],
//! )?;
//!
//! let hit = scene.hit_test(Point::new(310.0, 10.0)).unwrap();
//! assert_eq!(hit.id, "db");
//!
//! let damage = scene.move_element("db", Point::new(300.0, 400.0)).unwrap();
//! assert!(damage.contains(Point::new(310.0, 10.0)));
//! assert!(scene.visible(Rect::new(290.0, 390.0, 500.0, 500.0)).iter().any(|it| it.id == "db"));
//! # Ok::<(), canvas_scene::SceneError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
pub mod model;
pub mod scene;
pub mod util;

pub use error::SceneError;
pub use model::{Connection, DiagramElement, SceneEntity};
pub use scene::{SceneConfig, SceneIndex};
