//! Job table for processes launched by the shell.
//!
//! Each job is one process group. Ids are small integers handed out as one
//! more than the highest live id, so an id is never shared by two live jobs
//! but may come back once its job is gone.

use nix::unistd::Pid;
use thiserror::Error;

use mysh_types::{JobId, JobInfo, JobStatus};

/// Job table invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("process group {0} is already tracked")]
    DuplicateProcessGroup(i32),
}

/// Storage operations the job-control core depends on.
///
/// Any implementation with these semantics can back the shell. Lookups are
/// by job id (for `fg`/`bg`) or by process group (for reaped statuses).
pub trait JobStore {
    /// Track a new process group and return its job id.
    fn insert(&mut self, pgid: Pid, status: JobStatus, command: &str) -> Result<JobId, JobError>;

    fn find_by_jid(&self, id: JobId) -> Option<&JobInfo>;

    fn find_by_pgid(&self, pgid: Pid) -> Option<&JobInfo>;

    /// Set the status of the job owning `pgid`. Returns false if untracked.
    fn update_status(&mut self, pgid: Pid, status: JobStatus) -> bool;

    /// Forget the job owning `pgid`, returning it if it was tracked.
    fn remove_by_pgid(&mut self, pgid: Pid) -> Option<JobInfo>;

    /// Live jobs in ascending job id order.
    fn list(&self) -> Vec<JobInfo>;

    /// Release every entry. Safe to call more than once.
    fn teardown(&mut self);
}

/// Vector-backed job table.
///
/// Entries are kept sorted by job id so listing needs no extra work; the
/// table stays small enough that linear lookups are the right trade.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: Vec<JobInfo>,
}

impl JobTable {
    /// Create an empty job table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn next_id(&self) -> JobId {
        JobId(self.jobs.last().map_or(1, |job| job.id.0 + 1))
    }

    fn position_by_pgid(&self, pgid: Pid) -> Option<usize> {
        self.jobs.iter().position(|job| job.pgid == pgid.as_raw())
    }
}

impl JobStore for JobTable {
    fn insert(&mut self, pgid: Pid, status: JobStatus, command: &str) -> Result<JobId, JobError> {
        if self.position_by_pgid(pgid).is_some() {
            return Err(JobError::DuplicateProcessGroup(pgid.as_raw()));
        }

        let id = self.next_id();
        self.jobs.push(JobInfo {
            id,
            pgid: pgid.as_raw(),
            status,
            command: command.to_string(),
        });
        tracing::debug!(job = %id, %pgid, ?status, command, "job added");
        Ok(id)
    }

    fn find_by_jid(&self, id: JobId) -> Option<&JobInfo> {
        self.jobs.iter().find(|job| job.id == id)
    }

    fn find_by_pgid(&self, pgid: Pid) -> Option<&JobInfo> {
        self.jobs.iter().find(|job| job.pgid == pgid.as_raw())
    }

    fn update_status(&mut self, pgid: Pid, status: JobStatus) -> bool {
        match self.jobs.iter_mut().find(|job| job.pgid == pgid.as_raw()) {
            Some(job) => {
                tracing::trace!(job = %job.id, %pgid, from = ?job.status, to = ?status, "job status");
                job.status = status;
                true
            }
            None => false,
        }
    }

    fn remove_by_pgid(&mut self, pgid: Pid) -> Option<JobInfo> {
        let index = self.position_by_pgid(pgid)?;
        let job = self.jobs.remove(index);
        tracing::debug!(job = %job.id, %pgid, "job removed");
        Some(job)
    }

    fn list(&self) -> Vec<JobInfo> {
        self.jobs.clone()
    }

    fn teardown(&mut self) {
        if !self.jobs.is_empty() {
            tracing::debug!(count = self.jobs.len(), "releasing job table");
        }
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: i32) -> Pid {
        Pid::from_raw(n)
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut table = JobTable::new();
        let a = table.insert(pid(100), JobStatus::Running, "/bin/sleep").unwrap();
        let b = table.insert(pid(200), JobStatus::Stopped, "/bin/cat").unwrap();
        assert_eq!(a, JobId(1));
        assert_eq!(b, JobId(2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_by_either_key() {
        let mut table = JobTable::new();
        let id = table.insert(pid(100), JobStatus::Running, "/bin/sleep").unwrap();

        assert_eq!(table.find_by_jid(id).map(|j| j.pgid), Some(100));
        assert_eq!(table.find_by_pgid(pid(100)).map(|j| j.id), Some(id));
        assert!(table.find_by_jid(JobId(9)).is_none());
        assert!(table.find_by_pgid(pid(9)).is_none());
    }

    #[test]
    fn test_duplicate_pgid_rejected() {
        let mut table = JobTable::new();
        table.insert(pid(100), JobStatus::Running, "a").unwrap();
        let err = table.insert(pid(100), JobStatus::Stopped, "b").unwrap_err();
        assert_eq!(err, JobError::DuplicateProcessGroup(100));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_update_status() {
        let mut table = JobTable::new();
        table.insert(pid(100), JobStatus::Running, "a").unwrap();

        assert!(table.update_status(pid(100), JobStatus::Stopped));
        assert_eq!(table.find_by_pgid(pid(100)).unwrap().status, JobStatus::Stopped);
        assert!(!table.update_status(pid(101), JobStatus::Running));
    }

    #[test]
    fn test_ids_reused_only_after_removal() {
        let mut table = JobTable::new();
        table.insert(pid(100), JobStatus::Running, "a").unwrap();
        let second = table.insert(pid(200), JobStatus::Running, "b").unwrap();

        // Removing an older job does not free the highest id.
        table.remove_by_pgid(pid(100));
        assert_eq!(table.insert(pid(300), JobStatus::Running, "c").unwrap(), JobId(3));

        table.remove_by_pgid(pid(300));
        table.remove_by_pgid(pid(200));
        assert!(table.find_by_jid(second).is_none());
        assert_eq!(table.insert(pid(400), JobStatus::Running, "d").unwrap(), JobId(1));
    }

    #[test]
    fn test_uniqueness_under_churn() {
        let mut table = JobTable::new();
        let mut next_pid = 1000;
        for round in 0..50 {
            if round % 3 == 2 {
                let victim = table.list()[round % table.len()].pgid;
                table.remove_by_pgid(pid(victim));
            } else {
                table.insert(pid(next_pid), JobStatus::Running, "x").unwrap();
                next_pid += 1;
            }

            let jobs = table.list();
            for (i, a) in jobs.iter().enumerate() {
                for b in &jobs[i + 1..] {
                    assert_ne!(a.id, b.id);
                    assert_ne!(a.pgid, b.pgid);
                }
            }
        }
    }

    #[test]
    fn test_list_is_ascending() {
        let mut table = JobTable::new();
        for n in 0..4 {
            table.insert(pid(100 + n), JobStatus::Running, "x").unwrap();
        }
        table.remove_by_pgid(pid(101));
        let ids: Vec<u32> = table.list().iter().map(|j| j.id.0).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut table = JobTable::new();
        table.insert(pid(100), JobStatus::Running, "a").unwrap();
        table.teardown();
        table.teardown();
        assert!(table.is_empty());
    }
}
