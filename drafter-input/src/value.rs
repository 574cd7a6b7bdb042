//! Input categories and the values that satisfy them.

use serde::{Deserialize, Serialize};

use drafter_core::{EntityId, Point};

/// What kind of answer a request will take.
///
/// `Dynamic` is virtual: no value is intrinsically dynamic.  A number becomes
/// dynamic only while the outstanding request accepts `Dynamic`, and is then
/// turned into a point relative to the last input point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCategory {
    Point,
    SelectionSet,
    SingleSelection,
    Number,
    String,
    Dynamic,
}

impl InputCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputCategory::Point => "POINT",
            InputCategory::SelectionSet => "SELECTIONSET",
            InputCategory::SingleSelection => "SINGLESELECTION",
            InputCategory::Number => "NUMBER",
            InputCategory::String => "STRING",
            InputCategory::Dynamic => "DYNAMIC",
        }
    }
}

impl std::fmt::Display for InputCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities gathered for a command, plus whether the user has confirmed them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSet {
    entities: Vec<EntityId>,
    pub accepted: bool,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`. Returns `false` if it was already selected.
    pub fn add(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entities.push(id);
        true
    }

    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.entities.len();
        self.entities.retain(|&e| e != id);
        before != self.entities.len()
    }

    /// Select `id` if unselected, otherwise deselect it. Returns the new membership.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.entities.push(id);
            true
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    pub fn accept(&mut self) {
        self.accepted = true;
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.accepted = false;
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// A candidate answer to a request.
#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    Point(Point),
    SelectionSet(SelectionSet),
    SingleSelection(EntityId),
    Number(f64),
    Text(String),
}

impl InputValue {
    /// The category the value has on its own, ignoring any request.
    pub fn intrinsic_category(&self) -> InputCategory {
        match self {
            InputValue::Point(_) => InputCategory::Point,
            InputValue::SelectionSet(_) => InputCategory::SelectionSet,
            InputValue::SingleSelection(_) => InputCategory::SingleSelection,
            InputValue::Number(_) => InputCategory::Number,
            InputValue::Text(_) => InputCategory::String,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            InputValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            InputValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for InputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputValue::Point(p) => write!(f, "{},{}", p.x, p.y),
            InputValue::SelectionSet(s) => write!(f, "{} selected", s.len()),
            InputValue::SingleSelection(id) => write!(f, "entity {id}"),
            InputValue::Number(n) => write!(f, "{n}"),
            InputValue::Text(t) => f.write_str(t),
        }
    }
}
