use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::model::Command;
use crate::prefix::PrefixPattern;

/// A command together with its compiled prefix pattern.
#[derive(Debug, Clone)]
pub struct RegisteredCommand {
    pub command: Arc<Command>,
    pub pattern: Option<PrefixPattern>,
}

impl RegisteredCommand {
    pub fn new(command: impl Into<Arc<Command>>) -> Self {
        let command = command.into();
        let pattern = match PrefixPattern::compile(&command.prefixes) {
            Ok(pattern) => pattern,
            Err(error) => {
                warn!(
                    key = %command.key,
                    %error,
                    "prefix pattern failed to compile; prefixes ignored"
                );
                None
            }
        };
        Self { command, pattern }
    }

    pub fn key(&self) -> &str {
        &self.command.key
    }
}

/// Registered commands keyed by `Command::key`, in registration order.
///
/// Re-registering a key replaces the command in place.
#[derive(Debug, Default, Clone)]
pub struct CommandRegistry {
    entries: IndexMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: impl Into<Arc<Command>>) -> Option<Arc<Command>> {
        let entry = RegisteredCommand::new(command);
        let key = entry.key().to_string();
        debug!(key = %key, scope = %entry.command.scope, "command registered");
        self.entries
            .insert(key, entry)
            .map(|previous| previous.command)
    }

    pub fn deregister(&mut self, key: &str) -> Option<Arc<Command>> {
        let removed = self.entries.shift_remove(key).map(|entry| entry.command);
        if removed.is_some() {
            debug!(key, "command deregistered");
        }
        removed
    }

    /// Removes every command whose scope equals `scope`; returns how many went.
    pub fn deregister_scope(&mut self, scope: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.command.scope != scope);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(scope, removed, "scope deregistered");
        }
        removed
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Command>> {
        self.entries.get(key).map(|entry| &entry.command)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.entries.values()
    }

    /// Registered commands with `overlay` replacing the entry of the same key,
    /// or appended when no such key is registered.
    pub fn with_overlay(&self, overlay: RegisteredCommand) -> Vec<RegisteredCommand> {
        let mut out: Vec<RegisteredCommand> = Vec::with_capacity(self.entries.len() + 1);
        let mut overlay = Some(overlay);
        for entry in self.entries.values() {
            match overlay.take() {
                Some(replacement) if replacement.key() == entry.key() => out.push(replacement),
                other => {
                    overlay = other;
                    out.push(entry.clone());
                }
            }
        }
        out.extend(overlay);
        out
    }
}
