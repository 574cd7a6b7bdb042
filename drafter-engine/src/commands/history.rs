use drafter_input::Resolution;

use crate::command::{Command, CommandContext, CommandError, Flow};

#[derive(Debug, Default)]
pub struct Undo;

impl Command for Undo {
    fn execute(&mut self, _cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Apply)
    }

    fn resume(
        &mut self,
        _cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        Err(CommandError::UnexpectedInput(input))
    }

    fn action(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        if !cx.undo() {
            cx.notify("Nothing to undo");
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Redo;

impl Command for Redo {
    fn execute(&mut self, _cx: &mut CommandContext<'_>) -> Result<Flow, CommandError> {
        Ok(Flow::Apply)
    }

    fn resume(
        &mut self,
        _cx: &mut CommandContext<'_>,
        input: Resolution,
    ) -> Result<Flow, CommandError> {
        Err(CommandError::UnexpectedInput(input))
    }

    fn action(&mut self, cx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        if !cx.redo() {
            cx.notify("Nothing to redo");
        }
        Ok(())
    }
}
