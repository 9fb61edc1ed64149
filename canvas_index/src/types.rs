// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry: the axis-aligned [`BoundingBox`] and its predicates.

/// Axis-aligned rectangle in canvas coordinates, stored as origin plus extent.
///
/// `width` and `height` are expected to be non-negative and every field finite;
/// see [`BoundingBox::is_valid`]. All predicates treat edges as inclusive, so two
/// boxes that merely touch intersect, and a point on an edge is contained.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BoundingBox {
    /// The `{0, 0, 0, 0}` box.
    ///
    /// This is the designated result of a union over zero boxes, for example the
    /// bounds of a node whose last entry was just removed. It is indistinguishable
    /// from a real degenerate box at the origin; callers that need to tell "nothing"
    /// apart should check emptiness of the source collection instead.
    pub const EMPTY: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a box from its origin and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a box from min/max corners.
    pub const fn from_min_max(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Right edge.
    #[inline]
    pub const fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub const fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Center point `(cx, cy)`.
    #[inline]
    pub const fn center(&self) -> (f64, f64) {
        (self.x + 0.5 * self.width, self.y + 0.5 * self.height)
    }

    /// `width * height`.
    #[inline]
    pub const fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether the two boxes overlap or touch.
    ///
    /// False only when one box lies strictly to one side of the other.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.x > self.max_x()
            || other.max_x() < self.x
            || other.y > self.max_y()
            || other.max_y() < self.y)
    }

    /// Whether the point lies inside the box or on its boundary.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    /// Smallest box enclosing both boxes.
    ///
    /// `width` is recomputed as `max - min`, so for far-apart inputs `max_x()` of the
    /// result can land an ulp inside the true edge. Use [`Aabb`] where exact
    /// enclosure matters.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_min_max(
            self.x.min(other.x),
            self.y.min(other.y),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Union over any number of boxes; [`BoundingBox::EMPTY`] when there are none.
    pub fn union_all<I: IntoIterator<Item = Self>>(boxes: I) -> Self {
        let mut it = boxes.into_iter();
        let Some(first) = it.next() else {
            return Self::EMPTY;
        };
        it.fold(first, |acc, b| acc.union(&b))
    }

    /// Area this box would gain by growing to also enclose `other`.
    #[inline]
    pub fn enlargement(&self, other: &Self) -> f64 {
        self.union(other).area() - self.area()
    }

    /// All fields finite and the extent non-negative.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

impl From<BoundingBox> for Aabb {
    fn from(b: BoundingBox) -> Self {
        Self::from_box(&b)
    }
}

/// Axis-aligned box stored as its min/max corners.
///
/// Tree nodes keep their bounds in this form. Union and enclosure only ever pick
/// existing edge values, so a node's edges are bit-identical to the outermost edges
/// of its entries and pruning can never skip an entry that touches a query.
/// [`BoundingBox::union`] cannot promise that, since it rebuilds `width` by subtraction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge.
    pub max_y: f64,
}

impl Aabb {
    /// Corners of [`BoundingBox::EMPTY`].
    pub const EMPTY: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create from corners.
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Corners of `b`, with the right and bottom edges as [`BoundingBox::max_x`]
    /// and [`BoundingBox::max_y`] compute them.
    pub const fn from_box(b: &BoundingBox) -> Self {
        Self::new(b.x, b.y, b.max_x(), b.max_y())
    }

    /// Origin-plus-extent form. The far edges may round when converted back.
    pub const fn to_box(&self) -> BoundingBox {
        BoundingBox::from_min_max(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// `width * height`.
    #[inline]
    pub const fn area(&self) -> f64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// Whether the two boxes overlap or touch.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    /// Whether the point lies inside the box or on its boundary.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Whether `other` lies entirely inside `self`, edges included.
    #[inline]
    pub fn encloses(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Smallest box enclosing both boxes. Exact.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Union over any number of boxes; [`Aabb::EMPTY`] when there are none.
    pub fn union_all<I: IntoIterator<Item = Self>>(boxes: I) -> Self {
        let mut it = boxes.into_iter();
        let Some(first) = it.next() else {
            return Self::EMPTY;
        };
        it.fold(first, |acc, b| acc.union(&b))
    }

    /// Area this box would gain by growing to also enclose `other`.
    #[inline]
    pub fn enlargement(&self, other: &Self) -> f64 {
        self.union(other).area() - self.area()
    }
}
