//! Device events the host shell feeds into the orchestrator.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Backspace,
    Char(char),
}

/// Coarse engine state, as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No active command, no outstanding request.
    Idle,
    /// The active command is waiting on one request.
    AwaitingInput,
}
