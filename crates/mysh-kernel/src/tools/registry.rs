//! Builtin registry and dispatch.

use std::collections::HashMap;

use crate::error::ShellResult;
use crate::parser::ParsedLine;

use super::context::ExecContext;
use super::traits::{Builtin, ExecResult};

/// Builtins by name.
#[derive(Default)]
pub struct BuiltinRegistry {
    builtins: HashMap<String, Box<dyn Builtin>>,
}

impl BuiltinRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::register_builtins(&mut registry);
        registry
    }

    /// Register a builtin, replacing any existing one with the same name.
    pub fn register(&mut self, builtin: impl Builtin + 'static) {
        self.builtins.insert(builtin.name().to_string(), Box::new(builtin));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Builtin> {
        self.builtins.get(name).map(|b| b.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run `line` as a builtin if it names one.
    ///
    /// Returns `None` when the line should go to the launcher instead. A
    /// program given as an absolute path is always external, even when its
    /// bare name matches a builtin.
    pub fn dispatch(
        &self,
        line: &ParsedLine,
        ctx: &mut ExecContext<'_>,
    ) -> Option<ShellResult<ExecResult>> {
        if line.is_path_command() {
            return None;
        }
        let builtin = self.get(line.name())?;

        let schema = builtin.schema();
        if line.args().len() != schema.arity() {
            tracing::debug!(builtin = line.name(), got = line.args().len(), want = schema.arity(), "arity mismatch");
            return Some(Ok(ExecResult::failure(
                1,
                format!("{}: syntax error (usage: {})", schema.name, schema.usage()),
            )));
        }

        Some(builtin.execute(line.args(), ctx))
    }
}
