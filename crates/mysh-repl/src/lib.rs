//! mysh REPL: the read/execute loop around a [`Shell`].
//!
//! Each iteration first reports background job transitions, then reads one
//! line and hands it to the shell. End of input exits with status 0; a read
//! failure or a fatal shell error is returned to the caller.

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use mysh_kernel::{LineOutcome, Shell, ShellConfig};

/// The read/execute loop.
pub struct Repl {
    shell: Shell,
}

impl Repl {
    /// Create a REPL with its own shell.
    pub fn new(config: ShellConfig) -> Result<Self> {
        let shell = Shell::new(config).context("Failed to initialize shell")?;
        Ok(Self { shell })
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Run lines from `input` until `exit`, end of input, or a fatal error.
    ///
    /// Returns the status the process should exit with.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<i32> {
        let mut buf = Vec::new();

        loop {
            self.shell.reap().context("Failed to reap child processes")?;

            #[cfg(feature = "prompt")]
            self.show_prompt();

            buf.clear();
            let read = input.read_until(b'\n', &mut buf).context("Failed to read input")?;
            if read == 0 {
                tracing::debug!("end of input");
                self.shell.shutdown();
                return Ok(0);
            }

            let line = String::from_utf8_lossy(&buf);
            match self.shell.execute(&line).context("Fatal shell error")? {
                LineOutcome::Continue => {}
                LineOutcome::Exit(code) => return Ok(code),
            }
        }
    }

    /// Run a single line, report whatever finished meanwhile, and release
    /// the job table.
    pub fn run_command(&mut self, line: &str) -> Result<i32> {
        let code = match self.shell.execute(line).context("Fatal shell error")? {
            LineOutcome::Exit(code) => return Ok(code),
            LineOutcome::Continue => self.shell.last_status(),
        };
        self.shell.reap().context("Failed to reap child processes")?;
        self.shell.shutdown();
        Ok(code)
    }

    #[cfg(feature = "prompt")]
    fn show_prompt(&self) {
        use std::io::Write;

        if let Some(prompt) = &self.shell.config().prompt {
            print!("{prompt}");
            if let Err(e) = io::stdout().flush() {
                tracing::warn!("Failed to flush prompt: {}", e);
            }
        }
    }
}

/// Run the interactive loop on standard input.
pub fn run(config: ShellConfig) -> Result<i32> {
    let mut repl = Repl::new(config)?;
    repl.run(io::stdin().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repl() -> Repl {
        Repl::new(ShellConfig::batch()).expect("Failed to create REPL")
    }

    #[test]
    fn test_eof_exits_zero() {
        let mut repl = repl();
        assert_eq!(repl.run(&b""[..]).unwrap(), 0);
    }

    #[test]
    fn test_exit_stops_reading() {
        let mut repl = repl();
        let input = b"exit\nthis line is never read\n";
        assert_eq!(repl.run(&input[..]).unwrap(), 0);
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut repl = repl();
        let input = b"cat >\nexit 2\nfg %4\n\n";
        assert_eq!(repl.run(&input[..]).unwrap(), 0);
        assert_eq!(repl.shell().last_status(), 1);
        assert!(repl.shell().jobs().is_empty());
    }

    #[test]
    fn test_run_command_builtin() {
        let mut repl = repl();
        assert_eq!(repl.run_command("jobs").unwrap(), 0);
        assert_eq!(repl.run_command("bg 1").unwrap(), 1);
    }
}
