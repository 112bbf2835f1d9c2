//! The shell: one parsed line at a time, through builtins or the launcher.
//!
//! A [`Shell`] owns the job table, terminal state, builtin registry and
//! status reporter, and lends them to commands through an
//! [`ExecContext`]. The front end drives it:
//!
//! ```text
//! loop {
//!     shell.reap()?;            // report background transitions
//!     read a line               // blocks
//!     shell.execute(&line)?;    // may block on a foreground job
//! }
//! ```

use nix::sys::signal::SigHandler;

use crate::config::ShellConfig;
use crate::error::{ParseError, ShellError, ShellResult};
use crate::launch::{self, LaunchOutcome};
use crate::parser::{self, ParsedLine};
use crate::reap::{self, Reporter, StdoutReporter};
use crate::scheduler::{JobStore, JobTable};
use crate::terminal::{self, TerminalState};
use crate::tools::{BuiltinRegistry, ExecContext, ExecResult};

/// What the front end should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Read the next line.
    Continue,
    /// Stop reading and exit with this status. The job table is already
    /// released.
    Exit(i32),
}

/// A running shell instance.
pub struct Shell {
    config: ShellConfig,
    jobs: JobTable,
    terminal: TerminalState,
    builtins: BuiltinRegistry,
    reporter: Box<dyn Reporter>,
    last_status: i32,
}

impl Shell {
    /// Create a shell that reports to standard output.
    pub fn new(config: ShellConfig) -> ShellResult<Self> {
        Self::with_reporter(config, Box::new(StdoutReporter))
    }

    /// Create a shell with a custom report destination.
    ///
    /// Sets the process-wide disposition of the job-control signals to
    /// ignore; children restore the defaults before exec.
    pub fn with_reporter(config: ShellConfig, reporter: Box<dyn Reporter>) -> ShellResult<Self> {
        terminal::set_job_control_signals(SigHandler::SigIgn).map_err(ShellError::Signal)?;
        let terminal = TerminalState::new(config.job_control)?;

        Ok(Self {
            config,
            jobs: JobTable::new(),
            terminal,
            builtins: BuiltinRegistry::with_builtins(),
            reporter,
            last_status: 0,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    /// Status of the last command that ran.
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    /// Report and apply every pending child state change without blocking.
    pub fn reap(&mut self) -> ShellResult<usize> {
        reap::drain(&mut self.jobs, self.reporter.as_mut()).inspect_err(|_| self.shutdown())
    }

    /// Run one input line.
    ///
    /// Errors that only affect this line are printed to standard error and
    /// the shell continues. A returned error is fatal: the job table has been
    /// released and the caller should exit.
    pub fn execute(&mut self, line: &str) -> ShellResult<LineOutcome> {
        match self.run_line(line) {
            Ok(outcome) => Ok(outcome),
            Err(e) if !e.is_fatal() => {
                match &e {
                    ShellError::Parse(_) => eprintln!("{e}"),
                    _ => eprintln!("mysh: {e}"),
                }
                self.last_status = 1;
                Ok(LineOutcome::Continue)
            }
            Err(e) => {
                tracing::warn!("fatal shell error: {}", e);
                self.shutdown();
                Err(e)
            }
        }
    }

    fn run_line(&mut self, line: &str) -> ShellResult<LineOutcome> {
        let parsed = match parser::parse_with_limit(line, self.config.max_tokens) {
            Ok(parsed) => parsed,
            Err(ParseError::EmptyLine) => return Ok(LineOutcome::Continue),
            Err(e) => return Err(e.into()),
        };

        let mut ctx = ExecContext::new(&mut self.jobs, self.reporter.as_mut(), &self.terminal);

        if let Some(result) = self.builtins.dispatch(&parsed, &mut ctx) {
            let result = result?;
            emit(&result);
            self.last_status = result.code;
            if result.exit {
                self.shutdown();
                return Ok(LineOutcome::Exit(result.code));
            }
            return Ok(LineOutcome::Continue);
        }

        self.last_status = run_external(&parsed, &mut ctx)?;
        Ok(LineOutcome::Continue)
    }

    /// Release the job table. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        self.jobs.teardown();
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_external(parsed: &ParsedLine, ctx: &mut ExecContext<'_>) -> ShellResult<i32> {
    Ok(match launch::launch(parsed, ctx)? {
        LaunchOutcome::Background { .. } => 0,
        LaunchOutcome::Foreground(outcome) => outcome.exit_code(),
    })
}

fn emit(result: &ExecResult) {
    if !result.out.is_empty() {
        print!("{}", result.out);
    }
    if !result.err.is_empty() {
        eprintln!("{}", result.err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Shell {
        Shell::with_reporter(ShellConfig::batch(), Box::new(Vec::new())).unwrap()
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut sh = shell();
        assert_eq!(sh.execute("").unwrap(), LineOutcome::Continue);
        assert_eq!(sh.execute(" \t ").unwrap(), LineOutcome::Continue);
        assert_eq!(sh.last_status(), 0);
    }

    #[test]
    fn test_parse_errors_continue() {
        let mut sh = shell();
        assert_eq!(sh.execute("cat >").unwrap(), LineOutcome::Continue);
        assert_eq!(sh.last_status(), 1);
    }

    #[test]
    fn test_exit_builtin() {
        let mut sh = shell();
        assert_eq!(sh.execute("exit").unwrap(), LineOutcome::Exit(0));
    }

    #[test]
    fn test_exit_with_args_is_an_error() {
        let mut sh = shell();
        assert_eq!(sh.execute("exit 3").unwrap(), LineOutcome::Continue);
        assert_eq!(sh.last_status(), 1);
    }

    #[test]
    fn test_unknown_job_leaves_table_alone() {
        let mut sh = shell();
        assert_eq!(sh.execute("fg %999").unwrap(), LineOutcome::Continue);
        assert!(sh.jobs().is_empty());
        assert_eq!(sh.last_status(), 1);
    }
}
