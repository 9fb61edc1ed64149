// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: diagram data plus the spatial index derived from it.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use canvas_index::{BoundingBox, InvalidItemError, ItemKind, RTree, SpatialItem};
use kurbo::{Point, Rect, Size};

use crate::error::SceneError;
use crate::model::{Connection, DiagramElement, SceneEntity};
use crate::util::{bounds_to_rect, rect_to_bounds};

/// Geometry defaults for a [`SceneIndex`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Size used for elements without explicit `width`/`height` properties.
    pub default_size: Size,
    /// Margin added on every side of a connection's bounds, as hit tolerance.
    pub connection_padding: f64,
}

impl SceneConfig {
    /// Default element size when none is given.
    pub const DEFAULT_SIZE: Size = Size::new(120.0, 80.0);
    /// Default connection hit tolerance.
    pub const DEFAULT_CONNECTION_PADDING: f64 = 4.0;
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            default_size: Self::DEFAULT_SIZE,
            connection_padding: Self::DEFAULT_CONNECTION_PADDING,
        }
    }
}

/// Diagram elements and connections, kept in sync with an [`RTree`].
///
/// Elements and connections share one id namespace in the index. Every edit keeps
/// the index current immediately; there is no separate commit step.
pub struct SceneIndex {
    config: SceneConfig,
    elements: BTreeMap<String, DiagramElement>,
    connections: BTreeMap<String, Connection>,
    index: RTree<SceneEntity>,
}

impl core::fmt::Debug for SceneIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneIndex")
            .field("config", &self.config)
            .field("elements", &self.elements.len())
            .field("connections", &self.connections.len())
            .field("index", &self.index)
            .finish()
    }
}

impl Default for SceneIndex {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneIndex {
    /// Create an empty scene.
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            elements: BTreeMap::new(),
            connections: BTreeMap::new(),
            index: RTree::new(),
        }
    }

    /// Build a scene from a full diagram in one bulk load.
    ///
    /// Duplicate element or connection ids are an error. Connections whose endpoints
    /// are missing are dropped with a warning.
    pub fn from_diagram(
        config: SceneConfig,
        elements: impl IntoIterator<Item = DiagramElement>,
        connections: impl IntoIterator<Item = Connection>,
    ) -> Result<Self, SceneError> {
        let mut scene = Self::new(config);
        for element in elements {
            if scene.elements.contains_key(&element.id) {
                return Err(InvalidItemError::DuplicateId { id: element.id }.into());
            }
            scene.elements.insert(element.id.clone(), element);
        }
        for connection in connections {
            if let Err(missing) = scene.connection_bounds(&connection) {
                log::warn!(
                    "dropping connection `{}`: unknown element `{missing}`",
                    connection.id
                );
                continue;
            }
            if scene.connections.contains_key(&connection.id) {
                return Err(InvalidItemError::DuplicateId { id: connection.id }.into());
            }
            scene.connections.insert(connection.id.clone(), connection);
        }
        scene.rebuild()?;
        Ok(scene)
    }

    /// Rebuild the spatial index from the current elements and connections.
    pub fn rebuild(&mut self) -> Result<(), SceneError> {
        let mut items = Vec::with_capacity(self.elements.len() + self.connections.len());
        for element in self.elements.values() {
            items.push(self.element_item(element));
        }
        for connection in self.connections.values() {
            if let Ok(bounds) = self.connection_bounds(connection) {
                items.push(SpatialItem::connection(
                    connection.id.clone(),
                    bounds,
                    SceneEntity::from(connection),
                ));
            }
        }
        self.index.bulk_load(items)?;
        log::debug!(
            "scene index rebuilt: {} elements, {} connections",
            self.elements.len(),
            self.connections.len()
        );
        Ok(())
    }

    /// Geometry defaults in use.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The underlying spatial index.
    pub fn index(&self) -> &RTree<SceneEntity> {
        &self.index
    }

    /// Look up an element.
    pub fn element(&self, id: &str) -> Option<&DiagramElement> {
        self.elements.get(id)
    }

    /// Look up a connection.
    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// All elements, ordered by id.
    pub fn elements(&self) -> impl Iterator<Item = &DiagramElement> + '_ {
        self.elements.values()
    }

    /// All connections, ordered by id.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.values()
    }

    /// Canvas rectangle of an element.
    pub fn element_rect(&self, id: &str) -> Option<Rect> {
        self.elements
            .get(id)
            .map(|e| e.rect(self.config.default_size))
    }

    /// Add an element.
    pub fn add_element(&mut self, element: DiagramElement) -> Result<(), SceneError> {
        self.index.insert(self.element_item(&element))?;
        self.elements.insert(element.id.clone(), element);
        Ok(())
    }

    /// Add a connection between two existing elements.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), SceneError> {
        let bounds =
            self.connection_bounds(&connection)
                .map_err(|missing| SceneError::UnknownElement {
                    connection: connection.id.clone(),
                    element: missing.into(),
                })?;
        self.index.insert(SpatialItem::connection(
            connection.id.clone(),
            bounds,
            SceneEntity::from(&connection),
        ))?;
        self.connections.insert(connection.id.clone(), connection);
        Ok(())
    }

    /// Remove an element together with every connection attached to it.
    pub fn remove_element(&mut self, id: &str) -> Option<DiagramElement> {
        let element = self.elements.remove(id)?;
        self.index.remove(id);
        let attached: Vec<String> = self
            .connections
            .values()
            .filter(|c| c.touches(id))
            .map(|c| c.id.clone())
            .collect();
        for connection_id in attached {
            self.remove_connection(&connection_id);
        }
        Some(element)
    }

    /// Remove a connection.
    pub fn remove_connection(&mut self, id: &str) -> Option<Connection> {
        let connection = self.connections.remove(id)?;
        self.index.remove(id);
        Some(connection)
    }

    /// Move an element and every connection attached to it.
    ///
    /// Returns the damaged area (old and new bounds of everything that moved). Returns
    /// `None` and changes nothing if the element does not exist, or if the element or
    /// one of its connections would end up with non-finite bounds.
    pub fn move_element(&mut self, id: &str, position: Point) -> Option<Rect> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return None;
        }
        self.edit_element(id, |e| e.position = position)
    }

    /// Give an element an explicit size. Damage is reported as for
    /// [`SceneIndex::move_element`].
    pub fn resize_element(&mut self, id: &str, size: Size) -> Option<Rect> {
        if !(size.width.is_finite() && size.height.is_finite())
            || size.width < 0.0
            || size.height < 0.0
        {
            return None;
        }
        self.edit_element(id, |e| e.set_size(size))
    }

    /// Apply `edit` to a copy of the element and commit it only if the element and
    /// every attached connection still have valid bounds afterwards.
    fn edit_element(&mut self, id: &str, edit: impl FnOnce(&mut DiagramElement)) -> Option<Rect> {
        let default_size = self.config.default_size;
        let current = self.elements.get(id)?;
        let old = current.rect(default_size);
        let mut edited = current.clone();
        edit(&mut edited);
        let new = edited.rect(default_size);
        let bounds = rect_to_bounds(new);
        if !bounds.is_valid() {
            return None;
        }

        let mut links = Vec::new();
        for connection in self.connections.values().filter(|c| c.touches(id)) {
            let endpoint = |end: &str| {
                if end == id {
                    Some(new)
                } else {
                    self.element_rect(end)
                }
            };
            let (Some(source), Some(target)) =
                (endpoint(&connection.source_id), endpoint(&connection.target_id))
            else {
                continue;
            };
            let link = self.span_bounds(source, target);
            if !link.is_valid() {
                return None;
            }
            links.push((connection.id.clone(), link));
        }

        if !self.index.update(id, bounds) {
            return None;
        }
        self.elements.insert(edited.id.clone(), edited);
        let mut damage = old.union(new);
        for (connection_id, link) in links {
            if let Some(previous) = self.index.get(&connection_id).map(|it| it.bounds) {
                damage = damage.union(bounds_to_rect(previous));
            }
            damage = damage.union(bounds_to_rect(link));
            if !self.index.update(&connection_id, link) {
                log::warn!("connection `{connection_id}` is missing from the index");
            }
        }
        Some(damage)
    }

    /// Everything overlapping the viewport, for culling. Unordered.
    pub fn visible(&self, viewport: Rect) -> Vec<&SpatialItem<SceneEntity>> {
        self.index.query(&rect_to_bounds(viewport))
    }

    /// Everything under the point, best pick first.
    ///
    /// Elements come before connections. Within a kind, smaller bounds come first
    /// so nested elements win over their containers; equal areas are ordered by id.
    pub fn hits_at(&self, point: Point) -> Vec<&SpatialItem<SceneEntity>> {
        let mut hits = self.index.query_point(point.x, point.y);
        hits.sort_by(|a, b| pick_order(a, b));
        hits
    }

    /// The best pick under the point, if any.
    pub fn hit_test(&self, point: Point) -> Option<&SpatialItem<SceneEntity>> {
        self.index
            .query_point(point.x, point.y)
            .into_iter()
            .min_by(|a, b| pick_order(a, b))
    }

    fn element_item(&self, element: &DiagramElement) -> SpatialItem<SceneEntity> {
        SpatialItem::component(
            element.id.clone(),
            rect_to_bounds(element.rect(self.config.default_size)),
            SceneEntity::from(element),
        )
    }

    /// Box spanning both endpoint centers, padded by the hit tolerance.
    ///
    /// Fails with the id of the first endpoint that is not on the canvas.
    fn connection_bounds<'c>(&self, connection: &'c Connection) -> Result<BoundingBox, &'c str> {
        let source = self
            .element_rect(&connection.source_id)
            .ok_or(connection.source_id.as_str())?;
        let target = self
            .element_rect(&connection.target_id)
            .ok_or(connection.target_id.as_str())?;
        Ok(self.span_bounds(source, target))
    }

    fn span_bounds(&self, source: Rect, target: Rect) -> BoundingBox {
        let pad = self.config.connection_padding.max(0.0);
        let span = Rect::from_points(source.center(), target.center()).inflate(pad, pad);
        rect_to_bounds(span)
    }
}

fn kind_rank(kind: ItemKind) -> u8 {
    match kind {
        ItemKind::Component => 0,
        ItemKind::Connection => 1,
    }
}

fn pick_order(a: &SpatialItem<SceneEntity>, b: &SpatialItem<SceneEntity>) -> Ordering {
    kind_rank(a.kind)
        .cmp(&kind_rank(b.kind))
        .then_with(|| {
            a.bounds
                .area()
                .partial_cmp(&b.bounds.area())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn diagram() -> SceneIndex {
        SceneIndex::from_diagram(
            SceneConfig::default(),
            vec![
                DiagramElement::new("api", "service", Point::new(0.0, 0.0)),
                DiagramElement::new("db", "database", Point::new(400.0, 0.0)),
                DiagramElement::new("cache", "database", Point::new(0.0, 300.0))
                    .with_size(Size::new(40.0, 40.0)),
            ],
            vec![
                Connection::new("api-db", "api", "db", "sql"),
                Connection::new("api-cache", "api", "cache", "redis"),
            ],
        )
        .unwrap()
    }

    fn ids(items: &[&SpatialItem<SceneEntity>]) -> Vec<String> {
        let mut v: Vec<String> = items.iter().map(|it| it.id.clone()).collect();
        v.sort();
        v
    }

    #[test]
    fn default_size_applies_to_unsized_elements() {
        let scene = diagram();
        assert_eq!(scene.element_rect("api"), Some(Rect::new(0.0, 0.0, 120.0, 80.0)));
        assert_eq!(scene.element_rect("cache"), Some(Rect::new(0.0, 300.0, 40.0, 340.0)));
        assert_eq!(scene.index().len(), 5);
    }

    #[test]
    fn viewport_culling() {
        let scene = diagram();
        // The api-db link starts at api's center, so it reaches into the left column.
        let left = scene.visible(Rect::new(-10.0, -10.0, 100.0, 400.0));
        assert_eq!(ids(&left), ["api", "api-cache", "api-db", "cache"]);
        let right = scene.visible(Rect::new(470.0, 0.0, 600.0, 100.0));
        assert_eq!(ids(&right), ["db"]);
        assert!(scene.visible(Rect::new(1000.0, 1000.0, 1100.0, 1100.0)).is_empty());
    }

    #[test]
    fn hit_test_prefers_elements() {
        let scene = diagram();
        // api's center is also an endpoint of both connections.
        let hit = scene.hit_test(Point::new(60.0, 40.0)).unwrap();
        assert_eq!(hit.id, "api");
        let all = scene.hits_at(Point::new(60.0, 40.0));
        assert_eq!(all[0].id, "api");
        assert_eq!(all.len(), 3);
        // Midway along api-db, away from any element.
        let link = scene.hit_test(Point::new(250.0, 40.0)).unwrap();
        assert_eq!(link.id, "api-db");
        assert!(matches!(link.data, SceneEntity::Connection { .. }));
        assert!(scene.hit_test(Point::new(250.0, 250.0)).is_none());
    }

    #[test]
    fn nested_element_wins_over_container() {
        let mut scene = SceneIndex::default();
        scene
            .add_element(
                DiagramElement::new("group", "group", Point::ZERO).with_size(Size::new(500.0, 500.0)),
            )
            .unwrap();
        scene
            .add_element(DiagramElement::new("inner", "service", Point::new(100.0, 100.0)))
            .unwrap();
        assert_eq!(scene.hit_test(Point::new(150.0, 150.0)).map(|h| h.id.as_str()), Some("inner"));
        assert_eq!(scene.hit_test(Point::new(400.0, 400.0)).map(|h| h.id.as_str()), Some("group"));
    }

    #[test]
    fn moving_an_element_drags_its_connections() {
        let mut scene = diagram();
        let damage = scene.move_element("db", Point::new(400.0, 600.0)).unwrap();
        // Old and new db rects are both damaged.
        assert!(damage.contains(Point::new(450.0, 40.0)));
        assert!(damage.contains(Point::new(450.0, 640.0)));
        assert!(
            scene
                .hits_at(Point::new(450.0, 40.0))
                .iter()
                .all(|h| h.id != "db")
        );
        assert_eq!(scene.hit_test(Point::new(450.0, 640.0)).map(|h| h.id.as_str()), Some("db"));

        let link = scene.index().get("api-db").unwrap().bounds;
        assert_eq!(link, BoundingBox::from_min_max(56.0, 36.0, 464.0, 644.0));
        // The untouched connection keeps its bounds.
        let other = scene.index().get("api-cache").unwrap().bounds;
        assert_eq!(other, BoundingBox::from_min_max(16.0, 36.0, 64.0, 324.0));
    }

    #[test]
    fn resize_updates_bounds() {
        let mut scene = diagram();
        assert!(scene.resize_element("api", Size::new(10.0, 10.0)).is_some());
        assert!(scene.hit_test(Point::new(100.0, 70.0)).is_none_or(|h| h.id != "api"));
        assert_eq!(scene.element_rect("api"), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(scene.resize_element("api", Size::new(-1.0, 10.0)).is_none());
        assert!(scene.resize_element("nope", Size::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn overflowing_edits_leave_the_scene_untouched() {
        let mut scene = SceneIndex::default();
        scene
            .add_element(DiagramElement::new("a", "service", Point::new(8e307, 0.0)))
            .unwrap();
        scene
            .add_element(DiagramElement::new("b", "service", Point::ZERO))
            .unwrap();
        scene
            .add_connection(Connection::new("a-b", "a", "b", "http"))
            .unwrap();
        let element_before = scene.index().get("a").unwrap().bounds;
        let link_before = scene.index().get("a-b").unwrap().bounds;

        // The element's own right edge overflows.
        assert!(scene.resize_element("a", Size::new(1e308, 10.0)).is_none());
        assert!(!scene.element("a").unwrap().properties.contains_key("width"));
        assert_eq!(scene.index().get("a").unwrap().bounds, element_before);

        // The element itself fits, but the connection dragged along would not.
        assert!(scene.move_element("b", Point::new(-1e308, 0.0)).is_none());
        assert_eq!(scene.element("b").unwrap().position, Point::ZERO);
        assert_eq!(scene.index().get("b").unwrap().bounds.x, 0.0);
        assert_eq!(scene.index().get("a-b").unwrap().bounds, link_before);

        // Index and scene still agree.
        for id in ["a", "b"] {
            assert_eq!(
                scene.index().get(id).map(|it| it.bounds),
                scene.element_rect(id).map(rect_to_bounds)
            );
        }
    }

    #[test]
    fn removing_an_element_cascades() {
        let mut scene = diagram();
        assert!(scene.remove_element("api").is_some());
        assert!(scene.connection("api-db").is_none());
        assert!(scene.connection("api-cache").is_none());
        assert_eq!(scene.index().len(), 2);
        assert!(scene.remove_element("api").is_none());
    }

    #[test]
    fn connection_needs_both_endpoints() {
        let mut scene = diagram();
        let err = scene
            .add_connection(Connection::new("x", "api", "ghost", "http"))
            .unwrap_err();
        assert_eq!(
            err,
            SceneError::UnknownElement {
                connection: "x".into(),
                element: "ghost".into()
            }
        );
        assert!(scene.connection("x").is_none());
        scene
            .add_connection(Connection::new("db-cache", "db", "cache", "replication"))
            .unwrap();
        assert!(scene.index().contains("db-cache"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut scene = diagram();
        let err = scene
            .add_element(DiagramElement::new("api-db", "service", Point::ZERO))
            .unwrap_err();
        assert_eq!(
            err,
            SceneError::Index(InvalidItemError::DuplicateId { id: "api-db".into() })
        );
        assert!(scene.element("api-db").is_none());

        let dup = SceneIndex::from_diagram(
            SceneConfig::default(),
            vec![
                DiagramElement::new("a", "service", Point::ZERO),
                DiagramElement::new("a", "service", Point::new(5.0, 5.0)),
            ],
            Vec::new(),
        );
        assert!(matches!(dup, Err(SceneError::Index(InvalidItemError::DuplicateId { .. }))));
    }

    #[test]
    fn stale_connections_are_dropped_on_load() {
        let scene = SceneIndex::from_diagram(
            SceneConfig::default(),
            vec![DiagramElement::new("a", "service", Point::ZERO)],
            vec![Connection::new("a-gone", "a", "gone", "http")],
        )
        .unwrap();
        assert_eq!(scene.connections().count(), 0);
        assert_eq!(scene.index().len(), 1);
    }
}
