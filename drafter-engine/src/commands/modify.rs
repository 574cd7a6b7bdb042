//! Tool commands that edit existing entities. They finish with `Flow::Apply`
//! and commit one undoable state from `action`.

use drafter_core::{Change, Entity, EntityId, EntityProps, Point};
use drafter_input::{InputCategory, InputValue, PromptOptions, Resolution};

use super::{expect_selection, preselected, select_objects};
use crate::command::{expect_point, Command, CommandContext, CommandError, Flow, PreviewContext};

// ───────────────────────────────────────────────────────────────────
// ERASE
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Erase {
    targets: Vec<EntityId>,
}

impl Command for Erase {
    fn execute(&mut self, cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        match preselected(cx) {
            Some(ids) => {
                self.targets = ids;
                Ok(Flow::Apply)
            }
            None => Ok(Flow::Prompt(select_objects())),
        }
    }

    fn resume(
        &mut self,
        _cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        self.targets = expect_selection(input)?;
        if self.targets.is_empty() {
            return Ok(Flow::Finish);
        }
        Ok(Flow::Apply)
    }

    fn action(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        let changes: Vec<Change> = self
            .targets
            .iter()
            .filter_map(|id| cx.entity(*id))
            .cloned()
            .map(Change::Delete)
            .collect();
        log::info!("Erasing {} entities", changes.len());
        cx.commit(changes);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────────
// MOVE
// ───────────────────────────────────────────────────────────────────

/// Selection, base point, then second point. The displacement is the
/// difference of the two points.
#[derive(Debug, Default)]
pub struct Move {
    targets: Vec<EntityId>,
    base: Option<Point>,
    displacement: (f64, f64),
}

fn translated(entity: &Entity, dx: f64, dy: f64) -> Vec<Point> {
    entity.points.iter().map(|p| p.offset(dx, dy)).collect()
}

fn base_point() -> PromptOptions {
    PromptOptions::new("Specify base point", &[InputCategory::Point])
}

impl Command for Move {
    fn execute(&mut self, cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        match preselected(cx) {
            Some(ids) => {
                self.targets = ids;
                Ok(Flow::Prompt(base_point()))
            }
            None => Ok(Flow::Prompt(select_objects())),
        }
    }

    fn resume(
        &mut self,
        _cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        if self.targets.is_empty() {
            self.targets = expect_selection(input)?;
            if self.targets.is_empty() {
                return Ok(Flow::Finish);
            }
            return Ok(Flow::Prompt(base_point()));
        }

        let point = expect_point(input)?;
        match self.base {
            None => {
                self.base = Some(point);
                Ok(Flow::Prompt(PromptOptions::new(
                    "Specify second point",
                    &[
                        InputCategory::Point,
                        InputCategory::Number,
                        InputCategory::Dynamic,
                    ],
                )))
            }
            Some(base) => {
                self.displacement = (point.x - base.x, point.y - base.y);
                Ok(Flow::Apply)
            }
        }
    }

    fn preview(&self, cx: &PreviewContext<'_>) -> Vec<Entity> {
        let Some(base) = self.base else {
            return Vec::new();
        };
        let (dx, dy) = (cx.pointer.x - base.x, cx.pointer.y - base.y);
        self.targets
            .iter()
            .filter_map(|id| cx.document.store.get_by_id(*id))
            .map(|e| {
                let mut ghost = e.clone();
                ghost.points = translated(e, dx, dy);
                ghost
            })
            .collect()
    }

    fn action(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        let (dx, dy) = self.displacement;
        let changes: Vec<Change> = self
            .targets
            .iter()
            .filter_map(|id| cx.entity(*id))
            .map(|e| Change::modify(e.id, EntityProps::default().with_points(translated(e, dx, dy))))
            .collect();
        cx.commit(changes);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────────
// CHLAYER
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ChangeLayer {
    targets: Vec<EntityId>,
    layer: String,
}

fn layer_prompt() -> PromptOptions {
    PromptOptions::new("Enter layer name", &[InputCategory::String])
}

impl Command for ChangeLayer {
    fn execute(&mut self, cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        match preselected(cx) {
            Some(ids) => {
                self.targets = ids;
                Ok(Flow::Prompt(layer_prompt()))
            }
            None => Ok(Flow::Prompt(select_objects())),
        }
    }

    fn resume(
        &mut self,
        cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        if self.targets.is_empty() {
            self.targets = expect_selection(input)?;
            if self.targets.is_empty() {
                return Ok(Flow::Finish);
            }
            return Ok(Flow::Prompt(layer_prompt()));
        }

        match input {
            Resolution::Value(InputValue::Text(name)) if !name.trim().is_empty() => {
                self.layer = name.trim().to_string();
                Ok(Flow::Apply)
            }
            Resolution::Value(InputValue::Text(_)) => {
                cx.notify("Layer name cannot be empty");
                Ok(Flow::Prompt(layer_prompt()))
            }
            other => Err(CommandError::UnexpectedInput(other)),
        }
    }

    fn action(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        let changes: Vec<Change> = self
            .targets
            .iter()
            .filter_map(|id| cx.entity(*id))
            .filter(|e| e.layer != self.layer)
            .map(|e| Change::modify(e.id, EntityProps::default().with_layer(self.layer.as_str())))
            .collect();
        cx.commit(changes);
        Ok(())
    }
}
