//! Execution context shared by builtins and the launcher.

use nix::unistd::Pid;

use crate::error::ShellResult;
use crate::reap::{self, ForegroundOutcome, Reporter};
use crate::scheduler::JobStore;
use crate::terminal::TerminalState;

/// Borrowed view of the shell state a command may touch.
pub struct ExecContext<'a> {
    /// Job table.
    pub jobs: &'a mut dyn JobStore,
    /// Where status lines go.
    pub reporter: &'a mut dyn Reporter,
    /// Terminal ownership.
    pub terminal: &'a TerminalState,
}

impl<'a> ExecContext<'a> {
    pub fn new(
        jobs: &'a mut dyn JobStore,
        reporter: &'a mut dyn Reporter,
        terminal: &'a TerminalState,
    ) -> Self {
        Self { jobs, reporter, terminal }
    }

    /// Wait for `pid` to stop or terminate, then hand the terminal back to
    /// the shell.
    ///
    /// The terminal is reclaimed whether the wait succeeded or failed, so no
    /// return path leaves the shell unable to read its input.
    pub fn wait_in_foreground(&mut self, pid: Pid, command: &str) -> ShellResult<ForegroundOutcome> {
        let outcome = reap::wait_foreground(&mut *self.jobs, &mut *self.reporter, pid, command);
        self.terminal.reclaim_terminal()?;
        outcome
    }
}
