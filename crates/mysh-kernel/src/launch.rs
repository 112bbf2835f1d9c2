//! External program launcher.
//!
//! An external command normally runs as the leader of its own process group.
//! The child sets that up, takes the terminal if it runs in the foreground,
//! puts the job-control signals back to default, applies redirections and
//! execs. On a terminal without job control a foreground command instead
//! stays in the shell's group, so it keeps terminal access and only `SIGINT`
//! is restored. The parent either records a background job and returns at
//! once, or blocks on the child and reclaims the terminal afterwards.

use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::io::{self, Write};
use std::os::fd::RawFd;

use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{self, ForkResult, Pid};
use thiserror::Error;

use crate::error::{ShellError, ShellResult};
use crate::parser::{ParsedLine, RedirectKind};
use crate::reap::ForegroundOutcome;
use crate::scheduler::{JobId, JobStatus};
use crate::terminal::{self, TerminalState};
use crate::tools::ExecContext;

const STDIN_FD: RawFd = 0;
const STDOUT_FD: RawFd = 1;

/// Exit status of a child whose program could not be executed.
pub const EXEC_FAILURE_STATUS: i32 = 127;

/// What the parent did after forking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Registered as a running background job.
    Background { job: JobId, pgid: Pid },
    /// Waited on in the foreground.
    Foreground(ForegroundOutcome),
}

/// Failures inside the forked child. They end the child, never the shell.
#[derive(Debug, Error)]
enum ChildError {
    #[error("setpgid: {0}")]
    ProcessGroup(Errno),
    #[error("tcsetpgrp: {0}")]
    Terminal(Errno),
    #[error("signal: {0}")]
    Signal(Errno),
    #[error("{path}: {errno}")]
    Redirect { path: String, errno: Errno },
    #[error("{0}")]
    Exec(Errno),
}

impl ChildError {
    fn exit_code(&self) -> i32 {
        match self {
            ChildError::Exec(_) => EXEC_FAILURE_STATUS,
            _ => 1,
        }
    }
}

/// Everything the child needs, converted before the fork so the child does
/// no fallible string work.
#[derive(Debug)]
struct ExecPlan {
    name: String,
    program: CString,
    argv: Vec<CString>,
    search_path: bool,
    input: Option<CString>,
    output: Option<(CString, RedirectKind)>,
    foreground: bool,
    own_group: bool,
}

fn c_string(s: &str) -> ShellResult<CString> {
    CString::new(s).map_err(|_| ShellError::InvalidArgument(s.to_string()))
}

impl ExecPlan {
    fn from_line(line: &ParsedLine, terminal: &TerminalState) -> ShellResult<Self> {
        let program = line.program();
        let foreground = !line.is_background();

        let mut argv = Vec::with_capacity(line.argv.len());
        let arg0 = line.name();
        argv.push(c_string(arg0.strip_prefix('/').unwrap_or(arg0))?);
        for arg in line.args() {
            argv.push(c_string(arg)?);
        }

        Ok(Self {
            name: line.name().to_string(),
            program: c_string(program)?,
            argv,
            search_path: !program.contains('/'),
            input: line.input_file().map(c_string).transpose()?,
            output: line
                .output_file()
                .map(|(path, kind)| c_string(path).map(|p| (p, kind)))
                .transpose()?,
            foreground,
            own_group: terminal.job_owns_group(foreground),
        })
    }
}

/// Start `line` as an external program.
pub fn launch(line: &ParsedLine, ctx: &mut ExecContext<'_>) -> ShellResult<LaunchOutcome> {
    let plan = ExecPlan::from_line(line, ctx.terminal)?;

    // Buffered output would otherwise be flushed twice, once per process.
    let _ = io::stdout().flush();

    // SAFETY: the shell is single-threaded, and the child only adjusts its
    // own process state before exec or _exit.
    match unsafe { unistd::fork() }.map_err(ShellError::Fork)? {
        ForkResult::Child => run_child(&plan, ctx.terminal),
        ForkResult::Parent { child } => {
            // Same call as the child's; whichever runs first creates the group.
            // EACCES once the child has exec'd is expected.
            if plan.own_group
                && let Err(e) = unistd::setpgid(child, child)
            {
                tracing::trace!(%child, "parent setpgid: {}", e);
            }
            tracing::debug!(%child, program = line.program(), background = line.is_background(), "launched");

            if line.is_background() {
                let job = ctx.jobs.insert(child, JobStatus::Running, line.program())?;
                println!("[{job}] ({child})");
                Ok(LaunchOutcome::Background { job, pgid: child })
            } else {
                let outcome = ctx.wait_in_foreground(child, line.program())?;
                Ok(LaunchOutcome::Foreground(outcome))
            }
        }
    }
}

fn run_child(plan: &ExecPlan, terminal: &TerminalState) -> ! {
    let code = match exec_child(plan, terminal) {
        Ok(never) => match never {},
        Err(e) => {
            eprintln!("{}: {}", plan.name, e);
            e.exit_code()
        }
    };
    // SAFETY: _exit skips atexit handlers and stdio buffers owned by the shell.
    unsafe { nix::libc::_exit(code) }
}

fn exec_child(plan: &ExecPlan, terminal: &TerminalState) -> Result<Infallible, ChildError> {
    if plan.own_group {
        let me = unistd::getpid();
        unistd::setpgid(me, me).map_err(ChildError::ProcessGroup)?;

        if plan.foreground {
            terminal.give_terminal_to(me).map_err(ChildError::Terminal)?;
        }

        terminal::set_job_control_signals(SigHandler::SigDfl).map_err(ChildError::Signal)?;
    } else {
        // Keyboard stops stay ignored: a stopped member of the shell's own
        // group could not be resumed as a job.
        // SAFETY: installs the default disposition, no handler function.
        unsafe { signal::signal(Signal::SIGINT, SigHandler::SigDfl) }.map_err(ChildError::Signal)?;
    }

    if let Some(path) = &plan.input {
        redirect(path, OFlag::O_RDONLY, STDIN_FD)?;
    }
    if let Some((path, kind)) = &plan.output {
        let mode = match kind {
            RedirectKind::Append => OFlag::O_APPEND,
            _ => OFlag::O_TRUNC,
        };
        redirect(path, OFlag::O_WRONLY | OFlag::O_CREAT | mode, STDOUT_FD)?;
    }

    let result = if plan.search_path {
        unistd::execvp(&plan.program, &plan.argv)
    } else {
        unistd::execv(&plan.program, &plan.argv)
    };
    result.map_err(ChildError::Exec)
}

/// Close `target` and reopen it on `path`.
fn redirect(path: &CStr, flags: OFlag, target: RawFd) -> Result<(), ChildError> {
    let fail = |errno| ChildError::Redirect {
        path: path.to_string_lossy().into_owned(),
        errno,
    };

    match unistd::close(target) {
        Ok(()) | Err(Errno::EBADF) => {}
        Err(e) => return Err(fail(e)),
    }
    let fd = fcntl::open(path, flags, Mode::S_IRUSR | Mode::S_IWUSR).map_err(fail)?;
    if fd != target {
        unistd::dup2(fd, target).map_err(fail)?;
        unistd::close(fd).map_err(fail)?;
    }
    Ok(())
}
