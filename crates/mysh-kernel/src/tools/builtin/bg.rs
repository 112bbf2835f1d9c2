//! bg — Resume a stopped job in the background.

use nix::unistd::Pid;

use crate::error::ShellResult;
use crate::scheduler::{JobId, JobStatus};
use crate::tools::{Builtin, BuiltinSchema, ExecContext, ExecResult};

/// Bg builtin: continue a job without waiting and without touching the
/// terminal.
pub struct Bg;

impl Builtin for Bg {
    fn name(&self) -> &str {
        "bg"
    }

    fn schema(&self) -> BuiltinSchema {
        BuiltinSchema::new("bg", "Resume a stopped job in the background").param("%job")
    }

    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult> {
        let Some(id) = JobId::parse_reference(&args[0]) else {
            return Ok(ExecResult::failure(1, "bg: syntax error"));
        };

        let Some(pgid) = ctx.jobs.find_by_jid(id).map(|job| Pid::from_raw(job.pgid)) else {
            return Ok(ExecResult::failure(1, "bg: job not found"));
        };

        if let Err(e) = super::continue_job(pgid) {
            return Ok(ExecResult::failure(1, format!("bg: failed to continue job: {}", e)));
        }
        ctx.jobs.update_status(pgid, JobStatus::Running);

        Ok(ExecResult::success(""))
    }
}
