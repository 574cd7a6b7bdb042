//! The command protocol.
//!
//! A command is a small state machine driven by the orchestrator:
//!
//! ```text
//!   execute(cx) ──▸ Flow::Prompt(opts) ── suspended ──┐
//!        ▲                                            │ user answers
//!        └──────── resume(cx, resolution) ◀───────────┘
//!
//!   Flow::Create(entity)  entity goes straight into the store
//!   Flow::Apply           orchestrator calls action(cx), which commits
//!   Flow::Finish          nothing left to do
//! ```
//!
//! Returning a prompt is how a command suspends; the orchestrator keeps the
//! command in its active slot and calls `resume` with whatever resolved the
//! request.  A suspended command gets no notice when it is abandoned, so it
//! must not hold anything that needs explicit release between steps.

use thiserror::Error;

use drafter_core::{Change, Document, Entity, EntityId, Point, StoreError};
use drafter_input::{InputError, PromptOptions, Resolution, SelectionSet};

use crate::collaborators::Notifier;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unexpected input: {0:?}")]
    UnexpectedInput(Resolution),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("{0}")]
    Failed(String),
}

/// What the orchestrator should do after a command step.
#[derive(Debug)]
pub enum Flow {
    /// Suspend until the request is resolved.
    Prompt(PromptOptions),
    /// Finish by inserting a new entity directly into the store.
    Create(Entity),
    /// Finish by running the command's `action`.
    Apply,
    /// Finish with no further effect.
    Finish,
}

pub trait Command {
    /// First step, run once when the command is started.
    fn execute(&mut self, cx: &mut CommandContext<'_>) -> Result<Flow, CommandError>;

    /// Next step, run with the answer to the request the last step made.
    fn resume(
        &mut self,
        cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError>;

    /// Ephemeral geometry to show for the current pointer position.
    fn preview(&self, _cx: &PreviewContext<'_>) -> Vec<Entity> {
        Vec::new()
    }

    /// Commit the command's effect. Called once, after `Flow::Apply`.
    fn action(&mut self, _cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        Ok(())
    }
}

/// Everything a command step may touch.
pub struct CommandContext<'a> {
    document: &'a mut Document,
    selection: &'a SelectionSet,
    notifier: &'a mut dyn Notifier,
    last_point: Option<Point>,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        document: &'a mut Document,
        selection: &'a SelectionSet,
        notifier: &'a mut dyn Notifier,
        last_point: Option<Point>,
    ) -> Self {
        Self {
            document,
            selection,
            notifier,
            last_point,
        }
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.document.store.get_by_id(id)
    }

    /// Commit `changes` through the state log as one undoable step.
    pub fn commit(&mut self, changes: Vec<Change>) {
        if changes.is_empty() {
            return;
        }
        self.document.commit(changes);
    }

    pub fn undo(&mut self) -> bool {
        self.document.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.document.redo()
    }

    /// Entities selected before or during this command.
    pub fn selection(&self) -> &SelectionSet {
        self.selection
    }

    pub fn notify(&mut self, message: &str) {
        self.notifier.notify(message);
    }

    /// Last point any request resolved to.
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Move the reference point for the next relative or dynamic input.
    /// The orchestrator hands it back to the negotiator after the step.
    pub fn set_last_point(&mut self, point: Option<Point>) {
        self.last_point = point;
    }
}

/// Read-only view handed to [`Command::preview`].
pub struct PreviewContext<'a> {
    pub document: &'a Document,
    pub pointer: Point,
    pub last_point: Option<Point>,
}

/// Expect a point (dynamic input has already been converted).
pub fn expect_point(input: Resolution) -> Result<Point, CommandError> {
    match input {
        Resolution::Value(value) => match value.as_point() {
            Some(p) => Ok(p),
            None => Err(CommandError::UnexpectedInput(Resolution::Value(value))),
        },
        other => Err(CommandError::UnexpectedInput(other)),
    }
}
