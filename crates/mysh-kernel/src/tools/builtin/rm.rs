//! rm — Remove a directory entry.

use crate::error::ShellResult;
use crate::tools::{Builtin, BuiltinSchema, ExecContext, ExecResult};

/// Rm builtin: unlinks one path. Directories are not removed.
pub struct Rm;

impl Builtin for Rm {
    fn name(&self) -> &str {
        "rm"
    }

    fn schema(&self) -> BuiltinSchema {
        BuiltinSchema::new("rm", "Remove a file").param("path")
    }

    fn execute(&self, args: &[String], _ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult> {
        let path = &args[0];
        Ok(match std::fs::remove_file(path) {
            Ok(()) => ExecResult::success(""),
            Err(e) => ExecResult::failure(1, format!("rm: {}: {}", path, e)),
        })
    }
}
