// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagram data supplied by the application: elements, connections, and the
//! payload stored for each of them in the spatial index.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use kurbo::{Point, Rect, Size};

/// Property key holding an element's explicit width.
pub const WIDTH_KEY: &str = "width";
/// Property key holding an element's explicit height.
pub const HEIGHT_KEY: &str = "height";

/// A box-like element placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramElement {
    /// Identifier, also used as the spatial index key.
    pub id: String,
    /// Application-defined type tag (for example `"database"` or `"service"`).
    pub element_type: String,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    /// Free-form string properties. `width`/`height` override the default size.
    pub properties: BTreeMap<String, String>,
}

impl DiagramElement {
    /// Create an element with no properties.
    pub fn new(id: impl Into<String>, element_type: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            element_type: element_type.into(),
            position,
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Builder-style explicit size, stored in the `width`/`height` properties.
    pub fn with_size(mut self, size: Size) -> Self {
        self.set_size(size);
        self
    }

    /// Store an explicit size in the `width`/`height` properties.
    pub fn set_size(&mut self, size: Size) {
        self.properties
            .insert(WIDTH_KEY.into(), format!("{}", size.width));
        self.properties
            .insert(HEIGHT_KEY.into(), format!("{}", size.height));
    }

    /// Size from the `width`/`height` properties.
    ///
    /// Each dimension falls back to `default` independently when the property is
    /// missing, unparsable, negative, or non-finite.
    pub fn size(&self, default: Size) -> Size {
        Size::new(
            self.dimension(WIDTH_KEY).unwrap_or(default.width),
            self.dimension(HEIGHT_KEY).unwrap_or(default.height),
        )
    }

    /// Canvas rectangle covered by the element.
    pub fn rect(&self, default: Size) -> Rect {
        Rect::from_origin_size(self.position, self.size(default))
    }

    fn dimension(&self, key: &str) -> Option<f64> {
        self.properties
            .get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
    }
}

/// A link between two elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    /// Identifier, also used as the spatial index key.
    pub id: String,
    /// Element the connection starts at.
    pub source_id: String,
    /// Element the connection ends at.
    pub target_id: String,
    /// Application-defined type tag (for example `"http"` or `"depends-on"`).
    pub connection_type: String,
}

impl Connection {
    /// Create a connection.
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        connection_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            connection_type: connection_type.into(),
        }
    }

    /// Whether either end is attached to `element_id`.
    pub fn touches(&self, element_id: &str) -> bool {
        self.source_id == element_id || self.target_id == element_id
    }
}

/// Payload stored in the spatial index for every scene entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneEntity {
    /// An element, with its type tag.
    Element {
        /// Copy of [`DiagramElement::element_type`].
        element_type: String,
    },
    /// A connection, with its endpoints.
    Connection {
        /// Copy of [`Connection::source_id`].
        source_id: String,
        /// Copy of [`Connection::target_id`].
        target_id: String,
    },
}

impl From<&DiagramElement> for SceneEntity {
    fn from(element: &DiagramElement) -> Self {
        Self::Element {
            element_type: element.element_type.clone(),
        }
    }
}

impl From<&Connection> for SceneEntity {
    fn from(connection: &Connection) -> Self {
        Self::Connection {
            source_id: connection.source_id.clone(),
            target_id: connection.target_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Size = Size::new(120.0, 80.0);

    #[test]
    fn size_falls_back_per_dimension() {
        let plain = DiagramElement::new("a", "service", Point::new(10.0, 20.0));
        assert_eq!(plain.size(DEFAULT), DEFAULT);
        assert_eq!(plain.rect(DEFAULT), Rect::new(10.0, 20.0, 130.0, 100.0));

        let wide = plain.clone().with_property(WIDTH_KEY, "300");
        assert_eq!(wide.size(DEFAULT), Size::new(300.0, 80.0));

        let junk = plain
            .clone()
            .with_property(WIDTH_KEY, "wide")
            .with_property(HEIGHT_KEY, "-5");
        assert_eq!(junk.size(DEFAULT), DEFAULT);

        let nan = plain.with_property(HEIGHT_KEY, "NaN");
        assert_eq!(nan.size(DEFAULT), DEFAULT);
    }

    #[test]
    fn explicit_size_round_trips_through_properties() {
        let e = DiagramElement::new("a", "db", Point::ZERO).with_size(Size::new(64.5, 32.0));
        assert_eq!(e.properties.get(WIDTH_KEY).map(String::as_str), Some("64.5"));
        assert_eq!(e.size(DEFAULT), Size::new(64.5, 32.0));
    }

    #[test]
    fn connection_touches_either_end() {
        let c = Connection::new("c", "a", "b", "http");
        assert!(c.touches("a"));
        assert!(c.touches("b"));
        assert!(!c.touches("z"));
    }
}
