//! Terminal ownership and job-control signal disposition.
//!
//! The terminal's foreground process group decides who receives keyboard
//! signals and who may read input. The shell hands it to a foreground job and
//! must take it back when the wait for that job returns, however it returns.
//!
//! The shell itself ignores `SIGINT`, `SIGTSTP` and `SIGTTOU`; children put
//! them back to default before exec, except that a foreground job sharing
//! the shell's group keeps `SIGTSTP` and `SIGTTOU` ignored. No handler ever
//! runs shell logic.

use std::io::{self, IsTerminal};

use nix::errno::Errno;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd::{self, Pid};

use crate::error::{ShellError, ShellResult};

/// Signals whose disposition the shell and its children toggle.
pub const JOB_CONTROL_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGTSTP, Signal::SIGTTOU];

/// Set the disposition of every job-control signal.
///
/// Only `SigIgn` and `SigDfl` are meant to be passed here.
pub fn set_job_control_signals(handler: SigHandler) -> Result<(), Errno> {
    for sig in JOB_CONTROL_SIGNALS {
        // SAFETY: only ignore/default dispositions are installed, no handler
        // function runs in signal context.
        unsafe { signal::signal(sig, handler) }?;
    }
    Ok(())
}

/// How the shell shares its terminal with the jobs it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMode {
    /// Standard input is not a terminal. Every job gets its own process
    /// group and nothing touches terminal ownership.
    Detached,
    /// A terminal without job control. Foreground jobs stay in the shell's
    /// process group, so they can read the terminal and receive `SIGINT`,
    /// but they cannot be suspended from the keyboard. Background jobs still
    /// get their own group.
    Shared,
    /// Full job control. Every job gets its own group and foreground jobs
    /// are handed the terminal.
    JobControl,
}

impl TerminalMode {
    /// Pick the mode for the requested job control setting and whether
    /// standard input is a terminal.
    pub fn select(job_control: bool, is_terminal: bool) -> Self {
        match (job_control, is_terminal) {
            (_, false) => TerminalMode::Detached,
            (false, true) => TerminalMode::Shared,
            (true, true) => TerminalMode::JobControl,
        }
    }
}

/// The shell's view of its controlling terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalState {
    shell_pgid: Pid,
    mode: TerminalMode,
}

impl TerminalState {
    /// Record the shell's process group and decide how jobs share the
    /// terminal.
    pub fn new(job_control: bool) -> ShellResult<Self> {
        let shell_pgid = unistd::getpgrp();
        let mode = TerminalMode::select(job_control, io::stdin().is_terminal());

        match mode {
            TerminalMode::JobControl => {
                // Confirms the terminal answers before any job depends on it.
                let owner = unistd::tcgetpgrp(io::stdin()).map_err(ShellError::ProcessGroup)?;
                tracing::debug!(%shell_pgid, %owner, "terminal job control enabled");
            }
            TerminalMode::Shared => {
                tracing::debug!("job control off, foreground jobs share the shell's process group");
            }
            TerminalMode::Detached if job_control => {
                tracing::debug!("stdin is not a terminal, job control handoff disabled");
            }
            TerminalMode::Detached => {}
        }

        Ok(Self { shell_pgid, mode })
    }

    /// A terminal state that never touches the terminal.
    pub fn detached() -> Self {
        Self {
            shell_pgid: unistd::getpgrp(),
            mode: TerminalMode::Detached,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_mode(mode: TerminalMode) -> Self {
        Self {
            shell_pgid: unistd::getpgrp(),
            mode,
        }
    }

    pub fn shell_pgid(&self) -> Pid {
        self.shell_pgid
    }

    pub fn mode(&self) -> TerminalMode {
        self.mode
    }

    /// Whether foreground jobs are given the terminal.
    pub fn is_enabled(&self) -> bool {
        self.mode == TerminalMode::JobControl
    }

    /// Whether a job started in the given position leads its own process
    /// group.
    pub fn job_owns_group(&self, foreground: bool) -> bool {
        !(foreground && self.mode == TerminalMode::Shared)
    }

    /// Make `pgid` the terminal's foreground process group.
    ///
    /// Callable from a freshly forked child as well as from the shell; the
    /// caller must have `SIGTTOU` ignored.
    pub fn give_terminal_to(&self, pgid: Pid) -> Result<(), Errno> {
        if !self.is_enabled() {
            return Ok(());
        }
        unistd::tcsetpgrp(io::stdin(), pgid)
    }

    /// Take the terminal back for the shell's own process group.
    pub fn reclaim_terminal(&self) -> ShellResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        unistd::tcsetpgrp(io::stdin(), self.shell_pgid).map_err(ShellError::Terminal)?;
        tracing::trace!(pgid = %self.shell_pgid, "terminal reclaimed");
        Ok(())
    }

    /// The terminal's current foreground group, if handoff is enabled.
    pub fn foreground_group(&self) -> Option<Pid> {
        if !self.is_enabled() {
            return None;
        }
        unistd::tcgetpgrp(io::stdin()).ok()
    }
}
