// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised when an item is rejected by the index.

use alloc::string::String;

/// An item was rejected by [`RTree::insert`](crate::RTree::insert),
/// [`RTree::replace`](crate::RTree::replace), or
/// [`RTree::bulk_load`](crate::RTree::bulk_load).
///
/// The index is left untouched when this is returned. These errors are caller bugs,
/// so the index makes no attempt to recover from them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidItemError {
    /// The item's id is the empty string.
    #[error("spatial item has an empty id")]
    EmptyId,
    /// The item's bounds are non-finite or have a negative extent.
    #[error("spatial item `{id}` has invalid bounds")]
    InvalidBounds {
        /// Id of the rejected item.
        id: String,
    },
    /// An item with the same id is already indexed (or appears twice in a bulk load).
    #[error("spatial item `{id}` is already indexed")]
    DuplicateId {
        /// Id of the rejected item.
        id: String,
    },
}
