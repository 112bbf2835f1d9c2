//! cd — Change working directory.

use crate::error::ShellResult;
use crate::tools::{Builtin, BuiltinSchema, ExecContext, ExecResult};

/// Cd builtin: change the shell's working directory.
pub struct Cd;

impl Builtin for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn schema(&self) -> BuiltinSchema {
        BuiltinSchema::new("cd", "Change current working directory").param("dir")
    }

    fn execute(&self, args: &[String], _ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult> {
        let dir = &args[0];
        Ok(match std::env::set_current_dir(dir) {
            Ok(()) => ExecResult::success(""),
            Err(e) => ExecResult::failure(1, format!("cd: {}: {}", dir, e)),
        })
    }
}
