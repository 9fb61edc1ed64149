// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between Kurbo geometry and index bounds.

use canvas_index::BoundingBox;
use kurbo::Rect;

/// Bounds of a Kurbo rectangle. Inverted rectangles are normalized first.
pub fn rect_to_bounds(r: Rect) -> BoundingBox {
    let r = r.abs();
    BoundingBox::from_min_max(r.x0, r.y0, r.x1, r.y1)
}

/// Kurbo rectangle covering `b`.
pub fn bounds_to_rect(b: BoundingBox) -> Rect {
    Rect::new(b.x, b.y, b.max_x(), b.max_y())
}
