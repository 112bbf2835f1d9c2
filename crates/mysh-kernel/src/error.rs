//! Error types for the shell core.
//!
//! Errors split along one line: whether the shell can keep running after
//! reporting them. See [`ShellError::is_fatal`].

use nix::errno::Errno;
use thiserror::Error;

use crate::parser::RedirectKind;
use crate::scheduler::JobError;

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but whitespace. Callers read the next line silently.
    #[error("empty line")]
    EmptyLine,
    /// A redirection operator with no file after it, or with another
    /// operator where the file should be.
    #[error("syntax error: no {kind} file")]
    MissingRedirectTarget { kind: RedirectKind },
    /// A second input file, or a second output/append file.
    #[error("syntax error: multiple {kind} files")]
    DuplicateRedirect { kind: RedirectKind },
    /// Redirections were given but no command.
    #[error("error: redirects with no command")]
    NoCommand,
    /// More tokens than the configured bound.
    #[error("error: too many tokens (max {max})")]
    TooManyTokens { max: usize },
}

/// Errors raised by the shell core.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("fork: {0}")]
    Fork(Errno),

    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),

    #[error("wait: {0}")]
    Wait(Errno),

    #[error("terminal control: {0}")]
    Terminal(Errno),

    #[error("process group: {0}")]
    ProcessGroup(Errno),

    #[error("signal disposition: {0}")]
    Signal(Errno),
}

impl ShellError {
    /// Whether the shell must shut down after this error.
    ///
    /// Failures confined to the current command are reported and the loop
    /// continues. Failures that leave the job table or terminal ownership in
    /// an unknown state are not recoverable in-line.
    pub fn is_fatal(&self) -> bool {
        match self {
            ShellError::Parse(_) | ShellError::Fork(_) | ShellError::InvalidArgument(_) => false,
            ShellError::Job(_)
            | ShellError::Wait(_)
            | ShellError::Terminal(_)
            | ShellError::ProcessGroup(_)
            | ShellError::Signal(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_messages_name_the_direction() {
        let input = ParseError::MissingRedirectTarget { kind: RedirectKind::Input };
        let output = ParseError::MissingRedirectTarget { kind: RedirectKind::Append };
        assert_eq!(input.to_string(), "syntax error: no input file");
        assert_eq!(output.to_string(), "syntax error: no output file");
        assert_eq!(
            ParseError::DuplicateRedirect { kind: RedirectKind::Output }.to_string(),
            "syntax error: multiple output files"
        );
    }

    #[test]
    fn command_level_errors_are_not_fatal() {
        assert!(!ShellError::from(ParseError::NoCommand).is_fatal());
        assert!(!ShellError::Fork(Errno::EAGAIN).is_fatal());
        assert!(ShellError::Terminal(Errno::ENOTTY).is_fatal());
        assert!(ShellError::Wait(Errno::EINVAL).is_fatal());
    }
}
