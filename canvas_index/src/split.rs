// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic node split.
//!
//! Seeds are the pair of entries whose combined box wastes the most area,
//! `area(a ∪ b) - area(a) - area(b)`. Every other entry then joins whichever group
//! needs the smaller enlargement to absorb it, in input order. Ties go to the second
//! group. There is no minimum-fill correction, so a lopsided split is possible when
//! many entries coincide.

use alloc::vec;
use alloc::vec::Vec;

use crate::item::SpatialItem;
use crate::types::Aabb;

/// Anything with a bounding box that can take part in a split.
pub(crate) trait Bounded {
    fn bounds(&self) -> Aabb;
}

impl<T> Bounded for SpatialItem<T> {
    fn bounds(&self) -> Aabb {
        Aabb::from_box(&self.bounds)
    }
}

/// The two groups produced by [`quadratic_split`].
pub(crate) struct Halves<E> {
    pub(crate) first: Vec<E>,
    pub(crate) first_bounds: Aabb,
    pub(crate) second: Vec<E>,
    pub(crate) second_bounds: Aabb,
}

fn pick_seeds<E: Bounded>(entries: &[E]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut worst = f64::NEG_INFINITY;
    for (i, a) in entries.iter().enumerate() {
        let a = a.bounds();
        for (j, b) in entries.iter().enumerate().skip(i + 1) {
            let b = b.bounds();
            let waste = a.union(&b).area() - a.area() - b.area();
            if waste > worst {
                worst = waste;
                seeds = (i, j);
            }
        }
    }
    seeds
}

/// Partition `entries` (at least two) into two groups.
pub(crate) fn quadratic_split<E: Bounded>(mut entries: Vec<E>) -> Halves<E> {
    debug_assert!(entries.len() >= 2, "a split needs at least two entries");
    let (i, j) = pick_seeds(&entries);
    // `j > i`, so removing `j` first leaves `i` in place.
    let second_seed = entries.remove(j);
    let first_seed = entries.remove(i);

    let mut first_bounds = first_seed.bounds();
    let mut second_bounds = second_seed.bounds();
    let mut first = vec![first_seed];
    let mut second = vec![second_seed];

    for entry in entries {
        let b = entry.bounds();
        if first_bounds.enlargement(&b) < second_bounds.enlargement(&b) {
            first_bounds = first_bounds.union(&b);
            first.push(entry);
        } else {
            second_bounds = second_bounds.union(&b);
            second.push(entry);
        }
    }

    Halves {
        first,
        first_bounds,
        second,
        second_bounds,
    }
}
