// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-level errors.

use alloc::string::String;
use canvas_index::InvalidItemError;

/// A scene edit was rejected. The scene is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The spatial index rejected the entity (empty or duplicate id, or unusable geometry).
    #[error(transparent)]
    Index(#[from] InvalidItemError),
    /// A connection endpoint does not name an element on the canvas.
    #[error("connection `{connection}` refers to unknown element `{element}`")]
    UnknownElement {
        /// Id of the rejected connection.
        connection: String,
        /// The missing endpoint.
        element: String,
    },
}
