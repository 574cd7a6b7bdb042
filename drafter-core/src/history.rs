//! Reversible State Log — bounded, linear undo/redo history.
//!
//! ```text
//!   states:  [ S0 | S1 | S2 | S3 ]
//!                        ▲
//!                      cursor = 2      S0,S1 undoable · S2,S3 redoable
//! ```
//!
//! * `commit` drops everything at/after the cursor (the abandoned redo
//!   branch), appends the new state, evicts the oldest state past capacity,
//!   then applies the state to the store.
//! * Inverses are recorded while changes are applied, never at commit time:
//!   a `Modify` inverse holds the values the entity had just before the write.
//! * `undo` replays the recorded inverses in **forward** order.  Each inverse
//!   finds its own target by id, so the order does not matter for correctness.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::store::EntityStore;
use crate::{Entity, EntityId, EntityProps};

/// Default number of undoable states kept.
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Create,
    Delete,
    Modify,
}

/// One reversible operation on a single entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Change {
    Create(Entity),
    Delete(Entity),
    Modify { id: EntityId, props: EntityProps },
}

impl Change {
    pub fn modify(id: EntityId, props: EntityProps) -> Self {
        Change::Modify { id, props }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Create(_) => ChangeKind::Create,
            Change::Delete(_) => ChangeKind::Delete,
            Change::Modify { .. } => ChangeKind::Modify,
        }
    }

    /// Id of the entity this change targets.
    pub fn target(&self) -> EntityId {
        match self {
            Change::Create(e) | Change::Delete(e) => e.id,
            Change::Modify { id, .. } => *id,
        }
    }

    /// Apply to `store`, returning the change that reverses it.
    ///
    /// `None` when the target is no longer resident; the change is skipped.
    pub fn apply(&self, store: &mut EntityStore) -> Option<Change> {
        match self {
            Change::Create(entity) => {
                store.add(entity.clone());
                Some(Change::Delete(entity.clone()))
            }
            Change::Delete(entity) => {
                let index = store.index_of(entity.id)?;
                let removed = store.remove(index).ok()?;
                Some(Change::Create(removed))
            }
            Change::Modify { id, props } => {
                let index = store.index_of(*id)?;
                let before = store.update(index, props).ok()?;
                Some(Change::Modify { id: *id, props: before })
            }
        }
    }
}

/// One committed, user-visible step: forward changes plus their inverses.
#[derive(Clone, Debug, Default)]
pub struct State {
    changes: Vec<Change>,
    inverse: Vec<Change>,
}

impl State {
    fn new(changes: Vec<Change>) -> Self {
        Self {
            changes,
            inverse: Vec::new(),
        }
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Inverses recorded during the most recent forward application.
    pub fn inverse(&self) -> &[Change] {
        &self.inverse
    }

    fn apply_forward(&mut self, store: &mut EntityStore) {
        let mut inverse = Vec::with_capacity(self.changes.len());
        for change in &self.changes {
            match change.apply(store) {
                Some(inv) => inverse.push(inv),
                None => log::debug!(
                    "Skipping {:?} of missing entity {}",
                    change.kind(),
                    change.target()
                ),
            }
        }
        self.inverse = inverse;
    }

    fn apply_inverse(&self, store: &mut EntityStore) {
        for change in &self.inverse {
            if change.apply(store).is_none() {
                log::debug!(
                    "Skipping inverse {:?} of missing entity {}",
                    change.kind(),
                    change.target()
                );
            }
        }
    }
}

/// Bounded linear history with a cursor between past and future states.
#[derive(Debug)]
pub struct StateLog {
    states: VecDeque<State>,
    cursor: usize,
    capacity: usize,
}

impl Default for StateLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl StateLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            states: VecDeque::with_capacity(capacity + 1),
            cursor: 0,
            capacity,
        }
    }

    /// Record `changes` as one state and apply it to `store`.
    pub fn commit(&mut self, store: &mut EntityStore, changes: Vec<Change>) {
        if self.cursor < self.states.len() {
            log::debug!(
                "Discarding {} redo state(s)",
                self.states.len() - self.cursor
            );
            self.states.truncate(self.cursor);
        }

        let mut state = State::new(changes);
        state.apply_forward(store);

        self.states.push_back(state);
        self.cursor += 1;

        if self.states.len() > self.capacity {
            self.states.pop_front();
            self.cursor -= 1;
            log::debug!("History full; evicted oldest state");
        }

        log::debug!(
            "Committed state (history {}/{}, cursor {})",
            self.states.len(),
            self.capacity,
            self.cursor
        );
    }

    /// Step back one state. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, store: &mut EntityStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.states[self.cursor].apply_inverse(store);
        log::debug!("Undo → cursor {}", self.cursor);
        true
    }

    /// Step forward one state. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, store: &mut EntityStore) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.states[self.cursor].apply_forward(store);
        self.cursor += 1;
        log::debug!("Redo → cursor {}", self.cursor);
        true
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.states.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// States oldest first.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.cursor = 0;
    }
}

// ===================================================================
// Tests
// ===================================================================
