//! Command lookup by name or alias, with fuzzy suggestions for typos.

use crate::command::Command;

pub type CommandFactory = fn() -> Box<dyn Command>;

/// Registration record for one command.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    /// Canonical upper-case name, e.g. `LINE`
    pub name: &'static str,
    /// Short forms, e.g. `L`
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub factory: CommandFactory,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// Factory helper for commands that start from their `Default` state.
pub fn boxed<C: Command + Default + 'static>() -> Box<dyn Command> {
    Box::new(C::default())
}

/// Minimum Jaro-Winkler similarity for a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    specs: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the reference commands.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for spec in crate::commands::builtins() {
            registry.register(spec);
        }
        registry
    }

    /// Add a command, replacing any existing one with the same name.
    pub fn register(&mut self, spec: CommandSpec) {
        if let Some(existing) = self
            .specs
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(spec.name))
        {
            log::debug!("Replacing command {}", spec.name);
            *existing = spec;
        } else {
            self.specs.push(spec);
        }
    }

    /// Case-insensitive lookup by name, then by alias.
    pub fn resolve(&self, input: &str) -> Option<CommandSpec> {
        let input = input.trim();
        self.specs
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(input))
            .or_else(|| {
                self.specs
                    .iter()
                    .find(|s| s.aliases.iter().any(|a| a.eq_ignore_ascii_case(input)))
            })
            .copied()
    }

    /// Closest command name to `input`, if any is similar enough.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let input = input.trim().to_uppercase();
        let mut best_match = None;
        let mut best_score = 0.0;

        for spec in &self.specs {
            let score = strsim::jaro_winkler(&input, spec.name);
            if score > best_score {
                best_score = score;
                best_match = Some(spec.name);
            }
        }

        if best_score > SUGGESTION_THRESHOLD {
            best_match
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
