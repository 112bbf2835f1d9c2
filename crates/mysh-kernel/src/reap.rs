//! Child status reconciliation.
//!
//! Signals never run shell logic. Instead, every pending child state change
//! is collected with non-blocking `waitpid` at the top of each loop iteration
//! ([`drain`]), and foreground waits block on one specific pid
//! ([`wait_foreground`]). Both paths classify the raw status, update the job
//! table and emit one `[jid] (pgid) <action>` line per transition.

use std::fmt;
use std::io::{self, Write};

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::{self, Pid};

use crate::error::{ShellError, ShellResult};
use crate::scheduler::{JobId, JobStatus, JobStore};

/// Upper bound on one report line, newline included. Longer lines are cut.
pub const REPORT_BUFFER_LEN: usize = 64;

/// A classified child state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildEvent {
    Exited { pid: Pid, code: i32 },
    Signaled { pid: Pid, signal: Signal },
    Stopped { pid: Pid, signal: Signal },
    Continued { pid: Pid },
}

impl ChildEvent {
    /// Classify a wait status. Statuses that carry no job transition
    /// (`StillAlive`, ptrace stops) yield `None`.
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(pid, code) => Some(ChildEvent::Exited { pid, code }),
            WaitStatus::Signaled(pid, signal, _core) => Some(ChildEvent::Signaled { pid, signal }),
            WaitStatus::Stopped(pid, signal) => Some(ChildEvent::Stopped { pid, signal }),
            WaitStatus::Continued(pid) => Some(ChildEvent::Continued { pid }),
            _ => None,
        }
    }

    pub fn pid(&self) -> Pid {
        match *self {
            ChildEvent::Exited { pid, .. }
            | ChildEvent::Signaled { pid, .. }
            | ChildEvent::Stopped { pid, .. }
            | ChildEvent::Continued { pid } => pid,
        }
    }
}

/// The transition a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Exited(i32),
    Signaled(Signal),
    Stopped(Signal),
    Resumed,
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            JobAction::Exited(code) => write!(f, "terminated with exit status {code}"),
            JobAction::Signaled(sig) => write!(f, "terminated by signal {}", sig as i32),
            JobAction::Stopped(sig) => write!(f, "suspended by signal {}", sig as i32),
            JobAction::Resumed => write!(f, "resumed"),
        }
    }
}

/// One status line: `[jid] (pgid) <action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub job: JobId,
    pub pgid: Pid,
    pub action: JobAction,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {}", self.job, self.pgid, self.action)
    }
}

impl StatusReport {
    /// Render the line, newline included, into a fixed buffer.
    ///
    /// Returns the buffer and the number of bytes used. Output that does not
    /// fit is truncated.
    pub fn encode(&self) -> ([u8; REPORT_BUFFER_LEN], usize) {
        let mut buf = [0u8; REPORT_BUFFER_LEN];
        let mut cursor = io::Cursor::new(&mut buf[..]);
        // A full buffer surfaces as WriteZero after the bytes that fit.
        let _ = writeln!(cursor, "{self}");
        let len = cursor.position() as usize;
        (buf, len)
    }
}

/// Destination for status reports.
pub trait Reporter {
    fn report(&mut self, report: &StatusReport);
}

/// Writes each report to standard output with a single `write(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&mut self, report: &StatusReport) {
        // Anything already buffered must land before the raw write.
        let _ = io::stdout().flush();
        let (buf, len) = report.encode();
        if let Err(e) = unistd::write(io::stdout(), &buf[..len]) {
            tracing::warn!("failed to write status report: {}", e);
        }
    }
}

/// Collects reports in memory.
impl Reporter for Vec<StatusReport> {
    fn report(&mut self, report: &StatusReport) {
        self.push(*report);
    }
}

/// Apply one event collected by the batch drain to the job table.
///
/// Returns the report to emit, or `None` when the event concerns a process
/// the table has no entry for and there is nothing meaningful to say.
pub fn reconcile(jobs: &mut dyn JobStore, event: ChildEvent) -> ShellResult<Option<StatusReport>> {
    let pgid = event.pid();

    let report = match event {
        ChildEvent::Exited { code, .. } => jobs.remove_by_pgid(pgid).map(|job| StatusReport {
            job: job.id,
            pgid,
            action: JobAction::Exited(code),
        }),
        ChildEvent::Signaled { signal, .. } => jobs.remove_by_pgid(pgid).map(|job| StatusReport {
            job: job.id,
            pgid,
            action: JobAction::Signaled(signal),
        }),
        ChildEvent::Stopped { signal, .. } => {
            let job = match jobs.find_by_pgid(pgid).map(|job| job.id) {
                Some(id) => {
                    jobs.update_status(pgid, JobStatus::Stopped);
                    id
                }
                None => jobs.insert(pgid, JobStatus::Stopped, &format!("pid {pgid}"))?,
            };
            Some(StatusReport {
                job,
                pgid,
                action: JobAction::Stopped(signal),
            })
        }
        ChildEvent::Continued { .. } => {
            let job = jobs.find_by_pgid(pgid).map(|job| job.id);
            job.map(|job| {
                jobs.update_status(pgid, JobStatus::Running);
                StatusReport {
                    job,
                    pgid,
                    action: JobAction::Resumed,
                }
            })
        }
    };

    if report.is_none() {
        tracing::trace!(?event, "state change for untracked child");
    }
    Ok(report)
}

/// Consume every pending child state change without blocking.
///
/// Returns how many reports were emitted.
pub fn drain(jobs: &mut dyn JobStore, reporter: &mut dyn Reporter) -> ShellResult<usize> {
    let flags = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
    let mut emitted = 0;

    loop {
        match wait::waitpid(Pid::from_raw(-1), Some(flags)) {
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => {
                let Some(event) = ChildEvent::from_wait_status(status) else {
                    continue;
                };
                if let Some(report) = reconcile(jobs, event)? {
                    reporter.report(&report);
                    emitted += 1;
                }
            }
            Err(Errno::ECHILD) => break,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(ShellError::Wait(e)),
        }
    }

    Ok(emitted)
}

/// How a foreground wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForegroundOutcome {
    /// The process exited normally.
    Exited(i32),
    /// The process was killed by a signal.
    Signaled(Signal),
    /// The process stopped and is now tracked under this id.
    Stopped(JobId),
    /// The process was already reaped elsewhere; nothing to report.
    Vanished,
}

impl ForegroundOutcome {
    /// Shell-style status code: the exit code, or 128 plus the signal.
    pub fn exit_code(&self) -> i32 {
        match *self {
            ForegroundOutcome::Exited(code) => code,
            ForegroundOutcome::Signaled(sig) => 128 + sig as i32,
            ForegroundOutcome::Stopped(_) => 128 + Signal::SIGTSTP as i32,
            ForegroundOutcome::Vanished => 0,
        }
    }
}

/// Block until `pid` stops or terminates, then apply the result.
///
/// Unlike [`reconcile`], the process may not be tracked yet: a job that
/// started in the foreground is entered in the table on its first stop, and a
/// job that terminates without ever stopping is never entered. Tracked jobs
/// report every transition; untracked ones only report stops and signal
/// deaths, under [`JobId::UNTRACKED`].
pub fn wait_foreground(
    jobs: &mut dyn JobStore,
    reporter: &mut dyn Reporter,
    pid: Pid,
    command: &str,
) -> ShellResult<ForegroundOutcome> {
    loop {
        let status = match wait::waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => status,
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                tracing::warn!(%pid, "foreground process already reaped");
                jobs.remove_by_pgid(pid);
                return Ok(ForegroundOutcome::Vanished);
            }
            Err(e) => return Err(ShellError::Wait(e)),
        };

        match ChildEvent::from_wait_status(status) {
            Some(ChildEvent::Stopped { signal, .. }) => {
                let job = match jobs.find_by_pgid(pid).map(|job| job.id) {
                    Some(id) => {
                        jobs.update_status(pid, JobStatus::Stopped);
                        id
                    }
                    None => jobs.insert(pid, JobStatus::Stopped, command)?,
                };
                reporter.report(&StatusReport {
                    job,
                    pgid: pid,
                    action: JobAction::Stopped(signal),
                });
                return Ok(ForegroundOutcome::Stopped(job));
            }
            Some(ChildEvent::Exited { code, .. }) => {
                if let Some(job) = jobs.remove_by_pgid(pid) {
                    reporter.report(&StatusReport {
                        job: job.id,
                        pgid: pid,
                        action: JobAction::Exited(code),
                    });
                }
                return Ok(ForegroundOutcome::Exited(code));
            }
            Some(ChildEvent::Signaled { signal, .. }) => {
                let job = jobs.remove_by_pgid(pid).map_or(JobId::UNTRACKED, |job| job.id);
                reporter.report(&StatusReport {
                    job,
                    pgid: pid,
                    action: JobAction::Signaled(signal),
                });
                return Ok(ForegroundOutcome::Signaled(signal));
            }
            Some(ChildEvent::Continued { .. }) | None => continue,
        }
    }
}
