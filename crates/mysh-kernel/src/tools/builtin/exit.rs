//! exit — Leave the shell.

use crate::error::ShellResult;
use crate::tools::{Builtin, BuiltinSchema, ExecContext, ExecResult};

/// Exit builtin. Outstanding jobs are neither signalled nor waited for.
pub struct Exit;

impl Builtin for Exit {
    fn name(&self) -> &str {
        "exit"
    }

    fn schema(&self) -> BuiltinSchema {
        BuiltinSchema::new("exit", "Release the job table and exit with status 0")
    }

    fn execute(&self, _args: &[String], _ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult> {
        Ok(ExecResult::exit(0))
    }
}
