//! # drafter-core
//!
//! Document model for the Drafter 2D drawing editor.
//!
//! ## Architecture
//!
//! ```text
//!  Command (drafter-engine)
//!       │  Vec<Change>
//!       ▼
//!  StateLog.commit()        ◀─── history: bounded, cursor-split undo/redo
//!       │  apply + record inverse
//!       ▼
//!  EntityStore              ◀─── ordered, id-addressed entities
//!       │
//!       ▼
//!  SpatialHash              ◀─── pick index rebuilt from store revisions
//! ```
//!
//! ## Crate modules
//!
//! - [`store`] — the authoritative ordered entity collection
//! - [`history`] — reversible changes, states and the bounded state log
//! - [`spatial`] — grid spatial hash used for nearest-entity picking

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod history;
pub mod spatial;
pub mod store;

pub use history::{Change, ChangeKind, State, StateLog, DEFAULT_CAPACITY};
pub use spatial::{Aabb, SpatialHash};
pub use store::{EntityStore, StoreError};

/// Stable identity of an entity. Positions shift on deletion, ids never do.
pub type EntityId = Uuid;

/// Layer every new entity lands on unless told otherwise.
pub const DEFAULT_LAYER: &str = "0";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle in radians of the ray from `self` towards `other`.
    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point at `distance` from `self` along `angle` (radians).
    pub fn polar(&self, angle: f64, distance: f64) -> Point {
        Point {
            x: self.x + distance * angle.cos(),
            y: self.y + distance * angle.sin(),
        }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Distance from `self` to the segment `a`–`b`.
    pub fn distance_to_segment(&self, a: &Point, b: &Point) -> f64 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.distance(&Point::new(a.x + t * dx, a.y + t * dy))
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Line,
    Polyline,
    Circle,
    Arc,
    Point,
    Text,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Line => "LINE",
            EntityKind::Polyline => "POLYLINE",
            EntityKind::Circle => "CIRCLE",
            EntityKind::Arc => "ARC",
            EntityKind::Point => "POINT",
            EntityKind::Text => "TEXT",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity colour: inherit from the layer, or an indexed palette colour.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum Colour {
    #[default]
    ByLayer,
    Index(u8),
}

/// A committed document object.
///
/// The store owns every resident entity; history and selection refer to
/// entities by [`EntityId`] only.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub layer: String,
    pub points: Vec<Point>,
    /// Radius for circles and arcs, zero otherwise.
    pub radius: f64,
    pub colour: Colour,
    pub line_type: String,
}

impl Entity {
    pub fn new(kind: EntityKind, points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            layer: DEFAULT_LAYER.to_string(),
            points,
            radius: 0.0,
            colour: Colour::ByLayer,
            line_type: "ByLayer".to_string(),
        }
    }

    pub fn line(start: Point, end: Point) -> Self {
        Self::new(EntityKind::Line, vec![start, end])
    }

    pub fn polyline(points: Vec<Point>) -> Self {
        Self::new(EntityKind::Polyline, points)
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        let mut entity = Self::new(EntityKind::Circle, vec![center]);
        entity.radius = radius;
        entity
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    /// Write every property `props` sets onto this entity.
    pub fn apply(&mut self, props: &EntityProps) {
        if let Some(layer) = &props.layer {
            self.layer = layer.clone();
        }
        if let Some(points) = &props.points {
            self.points = points.clone();
        }
        if let Some(radius) = props.radius {
            self.radius = radius;
        }
        if let Some(colour) = props.colour {
            self.colour = colour;
        }
        if let Some(line_type) = &props.line_type {
            self.line_type = line_type.clone();
        }
    }

    /// Current values of exactly the fields `props` sets.
    pub fn snapshot(&self, props: &EntityProps) -> EntityProps {
        EntityProps {
            layer: props.layer.as_ref().map(|_| self.layer.clone()),
            points: props.points.as_ref().map(|_| self.points.clone()),
            radius: props.radius.map(|_| self.radius),
            colour: props.colour.map(|_| self.colour),
            line_type: props.line_type.as_ref().map(|_| self.line_type.clone()),
        }
    }

    /// Axis-aligned bounds, `None` for an entity without points.
    pub fn bounds(&self) -> Option<Aabb> {
        let first = self.points.first()?;
        let mut aabb = Aabb::from_point(*first);
        for p in &self.points[1..] {
            aabb = aabb.include(*p);
        }
        if matches!(self.kind, EntityKind::Circle | EntityKind::Arc) {
            aabb = aabb.inflate(self.radius);
        }
        Some(aabb)
    }

    /// Shortest distance from `point` to the entity's outline.
    pub fn distance_to(&self, point: &Point) -> f64 {
        match self.kind {
            EntityKind::Circle | EntityKind::Arc => self
                .points
                .first()
                .map_or(f64::INFINITY, |c| (c.distance(point) - self.radius).abs()),
            EntityKind::Line | EntityKind::Polyline if self.points.len() > 1 => self
                .points
                .windows(2)
                .map(|w| point.distance_to_segment(&w[0], &w[1]))
                .fold(f64::INFINITY, f64::min),
            _ => self
                .points
                .iter()
                .map(|p| p.distance(point))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

/// Partial property set. `None` fields are left untouched.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct EntityProps {
    pub layer: Option<String>,
    pub points: Option<Vec<Point>>,
    pub radius: Option<f64>,
    pub colour: Option<Colour>,
    pub line_type: Option<String>,
}

impl EntityProps {
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = Some(points);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.layer.is_none()
            && self.points.is_none()
            && self.radius.is_none()
            && self.colour.is_none()
            && self.line_type.is_none()
    }
}

/// One drawing: the entity store together with its undo history.
#[derive(Debug)]
pub struct Document {
    pub id: Uuid,
    pub store: EntityStore,
    pub history: StateLog,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: EntityStore::new(),
            history: StateLog::new(capacity),
        }
    }

    /// Commit a batch of changes as one undoable step.
    pub fn commit(&mut self, changes: Vec<Change>) {
        self.history.commit(&mut self.store, changes);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.store)
    }

    /// Committed entities as a JSON array, in store order.
    pub fn entities_json(&self) -> Result<String, serde_json::Error> {
        let entities: Vec<&Entity> = self.store.iter().collect();
        serde_json::to_string_pretty(&entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_polar_and_angle() {
        let origin = Point::ORIGIN;
        let p = origin.polar(0.0, 5.0);
        assert!((p.x - 5.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);

        let up = Point::new(0.0, 3.0);
        assert!((origin.angle_to(&up) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_entity_snapshot_only_captures_set_fields() {
        let line = Entity::line(Point::ORIGIN, Point::new(10.0, 0.0)).with_layer("A");
        let props = EntityProps::default().with_layer("B");
        let snap = line.snapshot(&props);
        assert_eq!(snap.layer.as_deref(), Some("A"));
        assert!(snap.points.is_none());
        assert!(snap.colour.is_none());
    }

    #[test]
    fn test_entity_apply_writes_props() {
        let mut circle = Entity::circle(Point::ORIGIN, 2.0);
        circle.apply(&EntityProps::default().with_radius(4.0).with_colour(Colour::Index(1)));
        assert_eq!(circle.radius, 4.0);
        assert_eq!(circle.colour, Colour::Index(1));
        assert_eq!(circle.layer, DEFAULT_LAYER);
    }

    #[test]
    fn test_entity_bounds_and_distance() {
        let circle = Entity::circle(Point::new(10.0, 10.0), 5.0);
        let b = circle.bounds().unwrap();
        assert_eq!(b.min_x, 5.0);
        assert_eq!(b.max_y, 15.0);
        assert!((circle.distance_to(&Point::new(10.0, 17.0)) - 2.0).abs() < 1e-9);

        let line = Entity::line(Point::ORIGIN, Point::new(10.0, 0.0));
        assert!((line.distance_to(&Point::new(5.0, 3.0)) - 3.0).abs() < 1e-9);
        assert!((line.distance_to(&Point::new(13.0, 4.0)) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_document_commit_and_json() {
        let mut doc = Document::new();
        let line = Entity::line(Point::ORIGIN, Point::new(1.0, 1.0));
        doc.commit(vec![Change::Create(line)]);
        assert_eq!(doc.store.len(), 1);
        let json = doc.entities_json().unwrap();
        assert!(json.contains("\"Line\""));
        assert!(doc.undo());
        assert!(doc.store.is_empty());
    }
}
