//! Job identification and status types.

use std::fmt;

/// Shell-assigned identifier for a tracked job.
///
/// Ids start at 1. Zero never names a live job; reports use it for a
/// foreground process that was never entered in the job table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u32);

impl JobId {
    /// Placeholder id for a process that has no job table entry.
    pub const UNTRACKED: JobId = JobId(0);

    /// Parse a `%N` job reference.
    ///
    /// Returns `None` when the `%` prefix is missing. A non-numeric remainder
    /// parses to [`JobId::UNTRACKED`], which no lookup will ever match.
    pub fn parse_reference(spec: &str) -> Option<JobId> {
        let rest = spec.strip_prefix('%')?;
        Some(rest.parse::<u32>().map(JobId).unwrap_or(JobId::UNTRACKED))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a live job. Terminated jobs leave the table instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Job is currently running.
    Running,
    /// Job was stopped by a signal (e.g., Ctrl-Z / SIGTSTP).
    Stopped,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Information about a job for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    /// Job ID.
    pub id: JobId,
    /// Process group id; equals the leader's pid.
    pub pgid: i32,
    /// Current status.
    pub status: JobStatus,
    /// Command description (the program path as typed).
    pub command: String,
}

impl fmt::Display for JobInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {} {}", self.id, self.pgid, self.status, self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_reference_requires_percent() {
        assert_eq!(JobId::parse_reference("%3"), Some(JobId(3)));
        assert_eq!(JobId::parse_reference("3"), None);
    }

    #[test]
    fn non_numeric_reference_is_untracked() {
        assert_eq!(JobId::parse_reference("%abc"), Some(JobId::UNTRACKED));
        assert_eq!(JobId::parse_reference("%"), Some(JobId::UNTRACKED));
    }

    #[test]
    fn listing_format() {
        let info = JobInfo {
            id: JobId(2),
            pgid: 4242,
            status: JobStatus::Stopped,
            command: "/bin/sleep".into(),
        };
        assert_eq!(info.to_string(), "[2] (4242) Stopped /bin/sleep");
    }
}
