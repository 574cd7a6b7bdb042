//! # drafter-engine
//!
//! Interactive command orchestration for the Drafter editor.
//!
//! ```text
//!  keys / pointer / command line
//!       │
//!       ▼
//!  Orchestrator ──▸ CommandRegistry      name or alias → factory
//!       │ ▲
//!       │ └── Negotiator                 one outstanding typed request
//!       ▼
//!  Command::execute / resume            suspends on Flow::Prompt
//!       │
//!       ├── Flow::Create ──▸ EntityStore (no history)
//!       └── Flow::Apply  ──▸ action ──▸ StateLog.commit
//! ```
//!
//! Collaborators the engine consults but does not own (picking, snapping,
//! user diagnostics) sit behind the traits in [`collaborators`].

pub mod collaborators;
pub mod command;
pub mod commands;
pub mod config;
pub mod event;
pub mod orchestrator;
pub mod registry;

pub use collaborators::{
    EndpointSnap, EntityPicker, GridSnap, NoSnap, Notifier, SnapProvider, SpatialPicker,
    StatusLine,
};
pub use command::{expect_point, Command, CommandContext, CommandError, Flow, PreviewContext};
pub use config::{ConfigError, EngineConfig, SnapConfig};
pub use event::{EngineState, Key, PointerButton};
pub use orchestrator::Orchestrator;
pub use registry::{boxed, CommandFactory, CommandRegistry, CommandSpec};
