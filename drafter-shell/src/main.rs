//! Drafter shell: drives the command engine from a line-based event script.
//!
//! Reads events from stdin (see [`script`]) and prints the prompt plus any
//! new status-line messages after each one. An optional first argument
//! names a JSON engine config.
//!
//! ```text
//! $ printf 'cmd line\nclick 0 0\ncmd @10<90\ndump\n' | drafter-shell
//! ```

mod script;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use log::info;

use drafter_engine::{EngineConfig, Key, Orchestrator, PointerButton};
use script::{parse_line, ShellEvent};

fn dispatch(engine: &mut Orchestrator, event: ShellEvent, out: &mut impl Write) -> io::Result<()> {
    match event {
        ShellEvent::Command(text) => engine.submit(&text),
        ShellEvent::Type(text) => {
            for c in text.chars() {
                engine.key(if c == ' ' { Key::Space } else { Key::Char(c) });
            }
        }
        ShellEvent::Key(key) => engine.key(key),
        ShellEvent::Click(point) => {
            engine.pointer_down(PointerButton::Left, point);
            engine.pointer_up(PointerButton::Left, point);
        }
        ShellEvent::Move(point) => engine.pointer_move(point),
        ShellEvent::Dump => match engine.document().entities_json() {
            Ok(json) => writeln!(out, "{json}")?,
            Err(e) => log::error!("Failed to serialize entities: {e}"),
        },
    }
    Ok(())
}

fn report(engine: &mut Orchestrator, out: &mut impl Write) -> io::Result<()> {
    for message in engine.status_mut().drain() {
        writeln!(out, "! {message}")?;
    }
    if !engine.preview().is_empty() {
        writeln!(out, "~ {} preview entities", engine.preview().len())?;
    }
    writeln!(out, "{} {}", engine.prompt_text(), engine.command_line())?;
    out.flush()
}

fn run(engine: &mut Orchestrator) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Ok(Some(event)) => {
                dispatch(engine, event, &mut out)?;
                report(engine, &mut out)?;
            }
            Ok(None) => {}
            Err(e) => log::warn!("line {}: {e}", number + 1),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    info!("Starting Drafter shell...");
    let mut engine = Orchestrator::new(config);

    if let Err(e) = run(&mut engine) {
        log::error!("I/O error: {e}");
        return ExitCode::FAILURE;
    }
    info!(
        "Shell finished with {} entities, {} undoable states",
        engine.document().store.len(),
        engine.document().history.cursor()
    );
    ExitCode::SUCCESS
}
