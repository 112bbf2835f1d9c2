//! Builtin commands.

mod bg;
mod cd;
mod exit;
mod fg;
mod jobs;
mod ln;
mod rm;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use super::registry::BuiltinRegistry;

/// Register every builtin with the registry.
pub fn register_builtins(registry: &mut BuiltinRegistry) {
    registry.register(bg::Bg);
    registry.register(cd::Cd);
    registry.register(exit::Exit);
    registry.register(fg::Fg);
    registry.register(jobs::Jobs);
    registry.register(ln::Ln);
    registry.register(rm::Rm);
}

/// Send `SIGCONT` to a job's process group.
///
/// A foreground job started without job control shares the shell's group,
/// so its recorded id names a process, not a group.
fn continue_job(pgid: Pid) -> Result<(), Errno> {
    match signal::killpg(pgid, Signal::SIGCONT) {
        Err(Errno::ESRCH) => signal::kill(pgid, Signal::SIGCONT),
        other => other,
    }
}
