// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The unit stored in the index: an id, its bounds, a payload, and a category.

use alloc::string::String;

use crate::error::InvalidItemError;
use crate::types::BoundingBox;

/// Category of a stored item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A box-like entity on the canvas.
    Component,
    /// A link drawn between two components.
    Connection,
}

bitflags::bitflags! {
    /// Set of item categories accepted by a filtered query.
    ///
    /// See [`RTree::query_filtered`](crate::RTree::query_filtered).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemKinds: u8 {
        /// Accept [`ItemKind::Component`].
        const COMPONENT  = 0b0000_0001;
        /// Accept [`ItemKind::Connection`].
        const CONNECTION = 0b0000_0010;
    }
}

impl Default for ItemKinds {
    fn default() -> Self {
        Self::all()
    }
}

impl From<ItemKind> for ItemKinds {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Component => Self::COMPONENT,
            ItemKind::Connection => Self::CONNECTION,
        }
    }
}

impl ItemKinds {
    /// Whether `kind` is in the set.
    #[inline]
    pub fn accepts(self, kind: ItemKind) -> bool {
        self.contains(kind.into())
    }
}

/// An entry in the index.
///
/// Identity is by `id`: an index never holds two items with the same id.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialItem<T> {
    /// Caller-chosen identifier, unique within one index.
    pub id: String,
    /// Bounds used for every spatial query.
    pub bounds: BoundingBox,
    /// Opaque payload handed back by queries.
    pub data: T,
    /// Category tag.
    pub kind: ItemKind,
}

impl<T> SpatialItem<T> {
    /// Create an item.
    pub fn new(id: impl Into<String>, bounds: BoundingBox, data: T, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            bounds,
            data,
            kind,
        }
    }

    /// Create an [`ItemKind::Component`] item.
    pub fn component(id: impl Into<String>, bounds: BoundingBox, data: T) -> Self {
        Self::new(id, bounds, data, ItemKind::Component)
    }

    /// Create an [`ItemKind::Connection`] item.
    pub fn connection(id: impl Into<String>, bounds: BoundingBox, data: T) -> Self {
        Self::new(id, bounds, data, ItemKind::Connection)
    }

    pub(crate) fn validate(&self) -> Result<(), InvalidItemError> {
        if self.id.is_empty() {
            return Err(InvalidItemError::EmptyId);
        }
        if !self.bounds.is_valid() {
            return Err(InvalidItemError::InvalidBounds {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_filter() {
        assert!(ItemKinds::default().accepts(ItemKind::Component));
        assert!(ItemKinds::default().accepts(ItemKind::Connection));
        assert!(ItemKinds::COMPONENT.accepts(ItemKind::Component));
        assert!(!ItemKinds::COMPONENT.accepts(ItemKind::Connection));
        assert!(!ItemKinds::empty().accepts(ItemKind::Component));
    }

    #[test]
    fn validation() {
        let ok = SpatialItem::component("a", BoundingBox::new(0.0, 0.0, 1.0, 1.0), ());
        assert_eq!(ok.validate(), Ok(()));

        let empty = SpatialItem::component("", BoundingBox::new(0.0, 0.0, 1.0, 1.0), ());
        assert_eq!(empty.validate(), Err(InvalidItemError::EmptyId));

        let negative = SpatialItem::connection("c", BoundingBox::new(0.0, 0.0, -1.0, 1.0), ());
        assert_eq!(
            negative.validate(),
            Err(InvalidItemError::InvalidBounds { id: "c".into() })
        );
    }
}
