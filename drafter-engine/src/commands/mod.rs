//! Reference commands.
//!
//! | Name       | Alias | Kind                                   |
//! |------------|-------|----------------------------------------|
//! | `LINE`     | `L`   | entity-creating                        |
//! | `CIRCLE`   | `C`   | entity-creating                        |
//! | `POLYLINE` | `PL`  | entity-creating, `Undo`/`Close`/`Done` |
//! | `ERASE`    | `E`   | tool, selection set                    |
//! | `MOVE`     | `M`   | tool, selection set + two points       |
//! | `CHLAYER`  | `LA`  | tool, selection set + layer name       |
//! | `UNDO`     | `U`   | tool                                   |
//! | `REDO`     | `R`   | tool                                   |

mod draw;
mod history;
mod modify;

pub use draw::{Circle, Line, Polyline};
pub use history::{Redo, Undo};
pub use modify::{ChangeLayer, Erase, Move};

use drafter_core::EntityId;
use drafter_input::{InputCategory, InputValue, PromptOptions, Resolution};

use crate::command::{CommandContext, CommandError};
use crate::registry::{boxed, CommandSpec};

pub fn builtins() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "LINE",
            aliases: &["L"],
            description: "Draw a line between two points",
            factory: boxed::<Line>,
        },
        CommandSpec {
            name: "CIRCLE",
            aliases: &["C"],
            description: "Draw a circle from a center and radius",
            factory: boxed::<Circle>,
        },
        CommandSpec {
            name: "POLYLINE",
            aliases: &["PL"],
            description: "Draw connected segments",
            factory: boxed::<Polyline>,
        },
        CommandSpec {
            name: "ERASE",
            aliases: &["E"],
            description: "Delete selected entities",
            factory: boxed::<Erase>,
        },
        CommandSpec {
            name: "MOVE",
            aliases: &["M"],
            description: "Move selected entities by a displacement",
            factory: boxed::<Move>,
        },
        CommandSpec {
            name: "CHLAYER",
            aliases: &["LA"],
            description: "Put selected entities on another layer",
            factory: boxed::<ChangeLayer>,
        },
        CommandSpec {
            name: "UNDO",
            aliases: &["U"],
            description: "Undo the last change",
            factory: boxed::<Undo>,
        },
        CommandSpec {
            name: "REDO",
            aliases: &["R"],
            description: "Redo the last undone change",
            factory: boxed::<Redo>,
        },
    ]
}

// ───────────────────────────────────────────────────────────────────
// Selection helpers shared by the modify commands
// ───────────────────────────────────────────────────────────────────

fn select_objects() -> PromptOptions {
    PromptOptions::new("Select objects", &[InputCategory::SelectionSet])
}

/// Entities selected before the command started, if any.
fn preselected(cx: &CommandContext<'_>) -> Option<Vec<EntityId>> {
    let selection = cx.selection();
    if selection.is_empty() {
        None
    } else {
        Some(selection.ids().to_vec())
    }
}

fn expect_selection(input: Resolution) -> Result<Vec<EntityId>, CommandError> {
    match input {
        Resolution::Value(InputValue::SelectionSet(set)) => Ok(set.ids().to_vec()),
        Resolution::Value(InputValue::SingleSelection(id)) => Ok(vec![id]),
        other => Err(CommandError::UnexpectedInput(other)),
    }
}
