//! Command orchestrator: owns the single active-command slot.
//!
//! ```text
//!                 name / alias                      Prompt(opts)
//!   ┌──────┐ ───────────────────▸ execute() ─────────────────────▸ ┌────────────────┐
//!   │ IDLE │                                                       │ AWAITING_INPUT │
//!   └──────┘ ◂── reset() ◂── Create / Apply / Finish ◂── resume() ◂└────────────────┘
//!       ▲                                                      value │  ▲ rejected
//!       └────────────── Escape / Enter on nothing ────────────────────┘  └─ notify
//! ```
//!
//! Device events are handled one at a time: a resumed command runs to its
//! next prompt (or completion) before the next event is looked at.
//!
//! Pointer arbitration on left click, highest priority first:
//!
//! 1. active snap, when the outstanding request takes a point
//! 2. the entity under the pointer, when selecting is allowed (idle, or the
//!    request takes a single selection / selection set)
//! 3. the raw scene point

use drafter_core::{Document, Entity, EntityId, Point};
use drafter_input::{
    parse_input, InputCategory, InputError, InputValue, Negotiator, RequestTicket, SelectionSet,
};

use crate::collaborators::{
    EndpointSnap, EntityPicker, GridSnap, NoSnap, Notifier, SnapProvider, SpatialPicker,
    StatusLine,
};
use crate::command::{Command, CommandContext, CommandError, Flow, PreviewContext};
use crate::config::{EngineConfig, SnapConfig};
use crate::event::{EngineState, Key, PointerButton};
use crate::registry::{CommandRegistry, CommandSpec};

/// The command occupying the active slot, and the request it waits on.
struct ActiveCommand {
    name: &'static str,
    command: Box<dyn Command>,
    ticket: Option<RequestTicket>,
}

pub struct Orchestrator {
    config: EngineConfig,
    document: Document,
    registry: CommandRegistry,
    negotiator: Negotiator,
    active: Option<ActiveCommand>,
    selection: SelectionSet,
    picker: Box<dyn EntityPicker>,
    snap: Box<dyn SnapProvider>,
    status: StatusLine,
    pointer: Point,
    /// Entity highlighted under the pointer. Mutually exclusive with `preview`.
    hovered: Option<EntityId>,
    /// Ephemeral geometry from the active command's `preview`.
    preview: Vec<Entity>,
    /// Characters typed since the last submit.
    command_line: String,
    last_command: Option<&'static str>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Orchestrator {
    /// Builds an engine from `config`. Invalid values fall back to their
    /// defaults instead of failing.
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        let snap: Box<dyn SnapProvider> = match &config.snap {
            SnapConfig::None => Box::new(NoSnap),
            SnapConfig::Grid { spacing } => Box::new(GridSnap { spacing: *spacing }),
            SnapConfig::Endpoint => Box::new(EndpointSnap {
                tolerance: config.pick_tolerance,
            }),
        };
        Self {
            document: Document::with_history_capacity(config.history_capacity),
            registry: CommandRegistry::with_builtins(),
            negotiator: Negotiator::new(),
            active: None,
            selection: SelectionSet::new(),
            picker: Box::new(SpatialPicker::new(config.pick_cell_size)),
            snap,
            status: StatusLine::new(config.max_notifications),
            pointer: Point::ORIGIN,
            hovered: None,
            preview: Vec::new(),
            command_line: String::new(),
            last_command: None,
            config,
        }
    }

    pub fn with_picker(mut self, picker: impl EntityPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn with_snap(mut self, snap: impl SnapProvider + 'static) -> Self {
        self.snap = Box::new(snap);
        self
    }

    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    // ---------------------------------------------------------------
    // State accessors
    // ---------------------------------------------------------------

    pub fn state(&self) -> EngineState {
        if self.active.is_some() {
            EngineState::AwaitingInput
        } else {
            EngineState::Idle
        }
    }

    /// Outstanding request's prompt, or the idle prompt.
    pub fn prompt_text(&self) -> String {
        self.negotiator
            .prompt()
            .unwrap_or_else(|| self.config.idle_prompt.clone())
    }

    pub fn active_command(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.name)
    }

    pub fn last_command(&self) -> Option<&'static str> {
        self.last_command
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    pub fn preview(&self) -> &[Entity] {
        &self.preview
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusLine {
        &mut self.status
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Text and keyboard intake
    // ---------------------------------------------------------------

    /// Start a command by name or alias, abandoning any active one.
    ///
    /// Returns `false` (after notifying) when the name is unknown.
    pub fn run(&mut self, name: &str) -> bool {
        let name = name.trim();
        match self.registry.resolve(name) {
            Some(spec) => {
                if self.active.is_some() {
                    self.reset();
                }
                self.start(spec);
                true
            }
            None => {
                let message = match self.registry.suggest(name) {
                    Some(s) => format!("Unknown command '{name}', did you mean '{s}'?"),
                    None => format!("Unknown command '{name}'"),
                };
                log::warn!("{message}");
                self.status.notify(&message);
                false
            }
        }
    }

    /// A complete command-line entry.
    pub fn submit(&mut self, text: &str) {
        let text = text.trim();
        if self.active.is_none() {
            if text.is_empty() {
                self.repeat_last();
            } else {
                self.run(text);
            }
            return;
        }
        if text.is_empty() {
            self.accept_or_cancel();
            return;
        }

        let mut value = parse_input(text, self.negotiator.last_point());
        let category = self.negotiator.classify(&value);
        if !self.negotiator.accepts(category) && self.negotiator.accepts(InputCategory::String) {
            value = InputValue::Text(text.to_string());
        }
        self.deliver(value);
    }

    pub fn key(&mut self, key: Key) {
        match key {
            Key::Escape => self.reset(),
            Key::Enter => self.submit_command_line(),
            Key::Space => {
                if self.active.is_some() && self.negotiator.accepts(InputCategory::String) {
                    self.command_line.push(' ');
                } else {
                    self.submit_command_line();
                }
            }
            Key::Backspace => {
                self.command_line.pop();
            }
            Key::Char(c) => self.command_line.push(c),
        }
    }

    fn submit_command_line(&mut self) {
        let text = std::mem::take(&mut self.command_line);
        self.submit(&text);
    }

    /// Enter on an empty line while a command waits.
    fn accept_or_cancel(&mut self) {
        if self.negotiator.accepts(InputCategory::SelectionSet) && !self.selection.accepted {
            self.selection.accept();
            let value = InputValue::SelectionSet(self.selection.clone());
            self.deliver(value);
        } else {
            self.reset();
        }
    }

    fn repeat_last(&mut self) {
        let Some(spec) = self.last_command.and_then(|name| self.registry.resolve(name)) else {
            log::debug!("Nothing to repeat");
            return;
        };
        self.start(spec);
    }

    // ---------------------------------------------------------------
    // Pointer intake
    // ---------------------------------------------------------------

    pub fn pointer_down(&mut self, button: PointerButton, point: Point) {
        self.set_pointer(point);
        match button {
            PointerButton::Left => self.on_left_click(point),
            other => log::trace!("Ignoring {other:?} press"),
        }
    }

    pub fn pointer_up(&mut self, button: PointerButton, point: Point) {
        self.set_pointer(point);
        log::trace!("{button:?} released at {},{}", point.x, point.y);
    }

    /// Recompute hover and preview. Preview only runs while nothing is hovered.
    pub fn pointer_move(&mut self, point: Point) {
        self.set_pointer(point);
        self.hovered = if self.selection_permitted() {
            self.pick(point)
        } else {
            None
        };
        if self.hovered.is_some() {
            self.preview.clear();
        } else {
            self.refresh_preview();
        }
    }

    fn on_left_click(&mut self, point: Point) {
        if self.active.is_some() && self.negotiator.accepts(InputCategory::Point) {
            if let Some(snapped) = self.snap.snap(&self.document, point) {
                self.deliver(InputValue::Point(snapped));
                return;
            }
        }
        if self.selection_permitted() {
            if let Some(id) = self.pick(point) {
                self.select(id);
                return;
            }
        }
        if self.active.is_some() {
            self.deliver(InputValue::Point(point));
        }
    }

    fn select(&mut self, id: EntityId) {
        if self.active.is_none() {
            let selected = self.selection.toggle(id);
            log::debug!("{} {id}", if selected { "Selected" } else { "Deselected" });
        } else if self.negotiator.accepts(InputCategory::SingleSelection) {
            self.deliver(InputValue::SingleSelection(id));
        } else if self.selection.add(id) {
            log::debug!("Added {id} to selection ({})", self.selection.len());
        }
    }

    fn selection_permitted(&self) -> bool {
        self.active.is_none()
            || self.negotiator.accepts(InputCategory::SingleSelection)
            || self.negotiator.accepts(InputCategory::SelectionSet)
    }

    fn pick(&mut self, point: Point) -> Option<EntityId> {
        self.picker
            .nearest(&self.document.store, point, self.config.pick_tolerance)
    }

    fn set_pointer(&mut self, point: Point) {
        self.pointer = point;
        self.negotiator.set_pointer(point);
    }

    fn refresh_preview(&mut self) {
        self.preview = match &self.active {
            Some(active) => {
                let pointer = if self.negotiator.accepts(InputCategory::Point) {
                    self.snap
                        .snap(&self.document, self.pointer)
                        .unwrap_or(self.pointer)
                } else {
                    self.pointer
                };
                let cx = PreviewContext {
                    document: &self.document,
                    pointer,
                    last_point: self.negotiator.last_point(),
                };
                active.command.preview(&cx)
            }
            None => Vec::new(),
        };
    }

    // ---------------------------------------------------------------
    // Command lifecycle
    // ---------------------------------------------------------------

    /// Back to IDLE: drop the active command and its request without telling
    /// it, and clear selection, hover, preview and the command line.
    pub fn reset(&mut self) {
        if let Some(active) = self.active.take() {
            log::info!("Cancelled {}", active.name);
        }
        self.negotiator.cancel();
        self.selection.clear();
        self.preview.clear();
        self.hovered = None;
        self.command_line.clear();
    }

    /// Run one command step with a fresh context, then hand any moved
    /// reference point back to the negotiator.
    fn step<R>(&mut self, f: impl FnOnce(&mut CommandContext<'_>) -> R) -> R {
        let before = self.negotiator.last_point();
        let (result, after) = {
            let mut cx = CommandContext::new(
                &mut self.document,
                &self.selection,
                &mut self.status,
                before,
            );
            let result = f(&mut cx);
            (result, cx.last_point())
        };
        if after != before {
            self.negotiator.set_last_point(after);
        }
        result
    }

    fn start(&mut self, spec: CommandSpec) {
        log::info!("Starting {}", spec.name);
        let mut command = (spec.factory)();
        let flow = self.step(|cx| command.execute(cx));
        let active = ActiveCommand {
            name: spec.name,
            command,
            ticket: None,
        };
        self.advance(active, flow);
    }

    /// Offer `value` to the outstanding request and resume the command if
    /// it resolves.
    fn deliver(&mut self, value: InputValue) {
        let Some(mut active) = self.active.take() else {
            log::debug!("No active command for {value}");
            return;
        };
        match self.negotiator.respond(value) {
            Ok(resolved) if Some(resolved.ticket) == active.ticket => {
                active.ticket = None;
                self.preview.clear();
                let resolution = resolved.resolution;
                let flow = self.step(|cx| active.command.resume(cx, resolution));
                self.advance(active, flow);
            }
            Ok(resolved) => {
                log::warn!(
                    "{}: dropping answer to stale request {:?}",
                    active.name,
                    resolved.ticket
                );
                self.reset();
            }
            Err(e @ InputError::Rejected { .. }) => {
                self.status.notify(&e.to_string());
                self.active = Some(active);
            }
            Err(e) => {
                log::error!("{}: {e}", active.name);
                self.active = Some(active);
            }
        }
    }

    fn advance(&mut self, mut active: ActiveCommand, flow: Result<Flow, CommandError>) {
        match flow {
            Ok(Flow::Prompt(options)) => match self.negotiator.request(options) {
                Ok(ticket) => {
                    active.ticket = Some(ticket);
                    self.active = Some(active);
                    self.refresh_preview();
                }
                Err(e) => self.fail(active.name, &CommandError::from(e)),
            },
            Ok(Flow::Create(entity)) => {
                self.execute_command(active, entity);
            }
            Ok(Flow::Apply) => self.action_command(active),
            Ok(Flow::Finish) => self.complete(active.name),
            Err(e) => self.fail(active.name, &e),
        }
    }

    /// Entity-creating commands add straight to the store, outside the
    /// state log. Returns the new entity's index.
    fn execute_command(&mut self, active: ActiveCommand, entity: Entity) -> usize {
        let kind = entity.kind;
        let index = self.document.store.add(entity);
        log::debug!("{} created {kind} at index {index}", active.name);
        self.complete(active.name);
        index
    }

    /// Tool commands commit their own changes through the state log.
    fn action_command(&mut self, mut active: ActiveCommand) {
        let result = self.step(|cx| active.command.action(cx));
        match result {
            Ok(()) => self.complete(active.name),
            Err(e) => self.fail(active.name, &e),
        }
    }

    fn complete(&mut self, name: &'static str) {
        log::info!("Finished {name}");
        self.last_command = Some(name);
        self.reset();
    }

    fn fail(&mut self, name: &str, error: &CommandError) {
        log::error!("{name} failed: {error}");
        self.status.notify(&format!("{name}: {error}"));
        self.reset();
    }
}

// ===================================================================
// Tests
// ===================================================================
