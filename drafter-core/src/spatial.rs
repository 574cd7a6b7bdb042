//! Spatial Hash Grid for nearest-entity picking.
//!
//! Divides 2-D scene space into uniform cells.  Each entity occupies one or
//! more cells based on its axis-aligned bounding box.  A pick query only
//! inspects the cells covered by the pick square (point ± tolerance), then
//! ranks the candidates by exact outline distance.
//!
//! # Design decisions
//!
//! * **Rebuilt from store revisions.**  The index remembers the
//!   [`EntityStore::revision`] it was built from; `sync` is a no-op while the
//!   store is unchanged.
//! * **Separate `bounds` map** allows removal without scanning the grid.
//! * **Oversize list.**  An entity whose bounds would cover more than
//!   [`MAX_CELLS_PER_ENTRY`] cells (or whose cell span does not fit in an
//!   `i64`) is kept in a flat list that every query scans linearly.  Queries
//!   over such a region fall back to scanning `bounds`.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::store::EntityStore;
use crate::{EntityId, Point};

// ───────────────────────────────────────────────────────────────────
// Aabb — Axis-Aligned Bounding Box
// ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    #[inline]
    pub fn from_point(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Square of half-width `radius` centred on `p`.
    #[inline]
    pub fn around(p: Point, radius: f64) -> Self {
        Self::from_point(p).inflate(radius)
    }

    /// Grow to cover `p`.
    #[inline]
    pub fn include(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            min_y: self.min_y.min(p.y),
            max_x: self.max_x.max(p.x),
            max_y: self.max_y.max(p.y),
        }
    }

    #[inline]
    pub fn inflate(self, by: f64) -> Self {
        Self {
            min_x: self.min_x - by,
            min_y: self.min_y - by,
            max_x: self.max_x + by,
            max_y: self.max_y + by,
        }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

// ───────────────────────────────────────────────────────────────────
// Cell key
// ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct CellKey(i64, i64);

/// Most grid cells a single entity or query may span.
pub const MAX_CELLS_PER_ENTRY: f64 = 4096.0;

// ───────────────────────────────────────────────────────────────────
// SpatialHash
// ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SpatialHash {
    inv_cell_size: f64,
    grid: FxHashMap<CellKey, Vec<EntityId>>,
    bounds: FxHashMap<EntityId, Aabb>,
    /// Entities too large for the grid.
    oversize: Vec<EntityId>,
    /// Store revision the index currently reflects.
    revision: Option<u64>,
}

impl SpatialHash {
    /// Create an empty hash with the given cell size (scene units).
    pub fn new(cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            inv_cell_size: 1.0 / cell_size,
            grid: FxHashMap::default(),
            bounds: FxHashMap::default(),
            oversize: Vec::new(),
            revision: None,
        }
    }

    /// Cells covered by `aabb`, or `None` when the span exceeds
    /// [`MAX_CELLS_PER_ENTRY`] or leaves the `i64` range.
    fn cell_range(&self, aabb: &Aabb) -> Option<(CellKey, CellKey)> {
        let min_x = (aabb.min_x * self.inv_cell_size).floor();
        let min_y = (aabb.min_y * self.inv_cell_size).floor();
        let max_x = (aabb.max_x * self.inv_cell_size).floor();
        let max_y = (aabb.max_y * self.inv_cell_size).floor();

        let cells = (max_x - min_x + 1.0) * (max_y - min_y + 1.0);
        let limit = i64::MAX as f64;
        let in_range = [min_x, min_y, max_x, max_y]
            .iter()
            .all(|v| v.abs() < limit);
        // NaN fails both comparisons.
        if !(cells <= MAX_CELLS_PER_ENTRY) || !in_range {
            return None;
        }
        Some((
            CellKey(min_x as i64, min_y as i64),
            CellKey(max_x as i64, max_y as i64),
        ))
    }

    // ───────────────────── mutation ─────────────────────

    /// Insert (or move) an entity.
    pub fn insert(&mut self, id: EntityId, aabb: Aabb) {
        if self.bounds.contains_key(&id) {
            self.remove(id);
        }
        self.bounds.insert(id, aabb);
        let Some((min, max)) = self.cell_range(&aabb) else {
            log::trace!("Entity {id} spans too many cells, indexed as oversize");
            self.oversize.push(id);
            return;
        };
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                self.grid.entry(CellKey(cx, cy)).or_default().push(id);
            }
        }
    }

    /// Remove an entity.  No-op if the id is unknown.
    pub fn remove(&mut self, id: EntityId) {
        let Some(aabb) = self.bounds.remove(&id) else {
            return;
        };
        let Some((min, max)) = self.cell_range(&aabb) else {
            self.oversize.retain(|&x| x != id);
            return;
        };
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                let key = CellKey(cx, cy);
                if let Some(ids) = self.grid.get_mut(&key) {
                    if let Some(pos) = ids.iter().position(|&x| x == id) {
                        ids.swap_remove(pos);
                    }
                    if ids.is_empty() {
                        self.grid.remove(&key);
                    }
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.bounds.clear();
        self.oversize.clear();
        self.revision = None;
    }

    /// Rebuild from `store` unless the index already reflects its revision.
    pub fn sync(&mut self, store: &EntityStore) {
        if self.revision == Some(store.revision()) {
            return;
        }
        self.clear();
        for entity in store.iter() {
            if let Some(aabb) = entity.bounds() {
                self.insert(entity.id, aabb);
            }
        }
        self.revision = Some(store.revision());
        log::trace!("Spatial index rebuilt: {} entities", self.bounds.len());
    }

    // ───────────────────── queries ─────────────────────

    /// Ids whose bounds intersect `region`, unordered and deduplicated.
    pub fn query_region(&self, region: &Aabb) -> Vec<EntityId> {
        let Some((min, max)) = self.cell_range(region) else {
            return self
                .bounds
                .iter()
                .filter(|(_, b)| b.intersects(region))
                .map(|(&id, _)| id)
                .collect();
        };

        let mut result: Vec<EntityId> = self
            .oversize
            .iter()
            .copied()
            .filter(|id| self.bounds.get(id).is_some_and(|b| b.intersects(region)))
            .collect();
        let mut seen: FxHashSet<EntityId> = result.iter().copied().collect();
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                if let Some(ids) = self.grid.get(&CellKey(cx, cy)) {
                    for &id in ids {
                        if seen.insert(id)
                            && self.bounds.get(&id).is_some_and(|b| b.intersects(region))
                        {
                            result.push(id);
                        }
                    }
                }
            }
        }
        result
    }

    /// Entity whose outline lies closest to `p`, within `tolerance`.
    ///
    /// Ties go to the entity that comes later in the store (drawn on top).
    pub fn nearest(&self, store: &EntityStore, p: Point, tolerance: f64) -> Option<EntityId> {
        let mut best: Option<(usize, f64)> = None;
        for id in self.query_region(&Aabb::around(p, tolerance)) {
            let Some(index) = store.index_of(id) else {
                continue;
            };
            let Some(entity) = store.get(index) else {
                continue;
            };
            let d = entity.distance_to(&p);
            if d > tolerance {
                continue;
            }
            let better = match best {
                None => true,
                Some((bi, bd)) => d < bd || (d == bd && index > bi),
            };
            if better {
                best = Some((index, d));
            }
        }
        best.and_then(|(index, _)| store.get(index)).map(|e| e.id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

// ===================================================================
// Tests
// ===================================================================
