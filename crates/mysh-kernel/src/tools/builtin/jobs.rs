//! jobs — List live jobs.

use crate::error::ShellResult;
use crate::tools::{Builtin, BuiltinSchema, ExecContext, ExecResult};

/// Jobs builtin: one `[jid] (pgid) status command` line per job, oldest id
/// first.
pub struct Jobs;

impl Builtin for Jobs {
    fn name(&self) -> &str {
        "jobs"
    }

    fn schema(&self) -> BuiltinSchema {
        BuiltinSchema::new("jobs", "List background and stopped jobs")
    }

    fn execute(&self, _args: &[String], ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult> {
        let mut out = String::new();
        for job in ctx.jobs.list() {
            out.push_str(&job.to_string());
            out.push('\n');
        }
        Ok(ExecResult::success(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{JobStatus, JobStore};
    use crate::tools::builtin::test_support::Harness;
    use nix::unistd::Pid;

    #[test]
    fn test_jobs_empty() {
        let mut h = Harness::new();
        let result = Jobs.execute(&[], &mut h.ctx()).unwrap();
        assert!(result.ok());
        assert_eq!(result.out, "");
    }

    #[test]
    fn test_jobs_lists_in_id_order() {
        let mut h = Harness::new();
        h.jobs.insert(Pid::from_raw(300), JobStatus::Running, "/bin/sleep").unwrap();
        h.jobs.insert(Pid::from_raw(200), JobStatus::Stopped, "/usr/bin/vi").unwrap();

        let result = Jobs.execute(&[], &mut h.ctx()).unwrap();
        assert_eq!(
            result.out,
            "[1] (300) Running /bin/sleep\n[2] (200) Stopped /usr/bin/vi\n"
        );
    }
}
