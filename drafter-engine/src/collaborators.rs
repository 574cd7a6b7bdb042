//! Seams to the collaborators the orchestrator consults but does not own:
//! picking, snapping, and the diagnostic sink.

use std::collections::VecDeque;

use drafter_core::{Aabb, Document, EntityId, EntityStore, Point, SpatialHash};

/// Nearest-entity lookup for hover and click selection.
pub trait EntityPicker {
    fn nearest(&mut self, store: &EntityStore, point: Point, tolerance: f64) -> Option<EntityId>;
}

/// Active geometric snap for a pointer position.
pub trait SnapProvider {
    fn snap(&self, document: &Document, pointer: Point) -> Option<Point>;
}

/// Receives short, user-visible diagnostics.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl Notifier for Vec<String> {
    fn notify(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

// ───────────────────────────────────────────────────────────────────
// Picking
// ───────────────────────────────────────────────────────────────────

/// Picker backed by a grid spatial hash, rebuilt whenever the store changes.
pub struct SpatialPicker {
    index: SpatialHash,
}

impl SpatialPicker {
    pub fn new(cell_size: f64) -> Self {
        Self {
            index: SpatialHash::new(cell_size),
        }
    }
}

impl EntityPicker for SpatialPicker {
    fn nearest(&mut self, store: &EntityStore, point: Point, tolerance: f64) -> Option<EntityId> {
        self.index.sync(store);
        self.index.nearest(store, point, tolerance)
    }
}

// ───────────────────────────────────────────────────────────────────
// Snapping
// ───────────────────────────────────────────────────────────────────

pub struct NoSnap;

impl SnapProvider for NoSnap {
    fn snap(&self, _document: &Document, _pointer: Point) -> Option<Point> {
        None
    }
}

/// Always snaps to the nearest grid intersection.
pub struct GridSnap {
    pub spacing: f64,
}

impl SnapProvider for GridSnap {
    fn snap(&self, _document: &Document, pointer: Point) -> Option<Point> {
        Some(Point::new(
            (pointer.x / self.spacing).round() * self.spacing,
            (pointer.y / self.spacing).round() * self.spacing,
        ))
    }
}

/// Snaps to the closest entity vertex within `tolerance`.
pub struct EndpointSnap {
    pub tolerance: f64,
}

impl SnapProvider for EndpointSnap {
    fn snap(&self, document: &Document, pointer: Point) -> Option<Point> {
        let window = Aabb::around(pointer, self.tolerance);
        document
            .store
            .iter()
            .flat_map(|e| e.points.iter())
            .filter(|p| window.contains(**p))
            .map(|p| (p.distance(&pointer), *p))
            .filter(|(d, _)| *d <= self.tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }
}

// ───────────────────────────────────────────────────────────────────
// Status line
// ───────────────────────────────────────────────────────────────────

/// Bounded list of recent diagnostics, oldest first.
#[derive(Debug, Clone)]
pub struct StatusLine {
    messages: VecDeque<String>,
    capacity: usize,
}

impl StatusLine {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Take every message, leaving the line empty.
    pub fn drain(&mut self) -> Vec<String> {
        self.messages.drain(..).collect()
    }
}

impl Notifier for StatusLine {
    fn notify(&mut self, message: &str) {
        log::info!("{message}");
        if self.capacity == 0 {
            return;
        }
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message.to_string());
    }
}
