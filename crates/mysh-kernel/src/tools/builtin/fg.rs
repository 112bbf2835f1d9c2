//! fg — Resume a job in the foreground.

use nix::unistd::Pid;

use crate::error::{ShellError, ShellResult};
use crate::scheduler::{JobId, JobStatus};
use crate::tools::{Builtin, BuiltinSchema, ExecContext, ExecResult};

/// Fg builtin: give a job the terminal, continue it and wait for it.
pub struct Fg;

impl Builtin for Fg {
    fn name(&self) -> &str {
        "fg"
    }

    fn schema(&self) -> BuiltinSchema {
        BuiltinSchema::new("fg", "Resume a job in the foreground").param("%job")
    }

    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult> {
        let Some(id) = JobId::parse_reference(&args[0]) else {
            return Ok(ExecResult::failure(1, "fg: syntax error"));
        };

        let Some(job) = ctx.jobs.find_by_jid(id).cloned() else {
            return Ok(ExecResult::failure(1, "fg: job not found"));
        };
        let pgid = Pid::from_raw(job.pgid);

        // Give terminal to the job's process group
        ctx.terminal.give_terminal_to(pgid).map_err(ShellError::Terminal)?;

        if let Err(e) = super::continue_job(pgid) {
            ctx.terminal.reclaim_terminal()?;
            return Ok(ExecResult::failure(1, format!("fg: failed to continue job: {}", e)));
        }
        ctx.jobs.update_status(pgid, JobStatus::Running);

        let code = ctx.wait_in_foreground(pgid, &job.command)?.exit_code();
        Ok(ExecResult {
            code,
            ..ExecResult::success("")
        })
    }
}
