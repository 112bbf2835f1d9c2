//! mysh-kernel: the job-control core of the mysh shell.
//!
//! This crate provides:
//!
//! - **Parser**: splits a line into tokens, argv and a redirection descriptor
//! - **Scheduler**: the job table and the storage contract behind it
//! - **Launch**: forks external programs into their own process groups
//! - **Reap**: reconciles child state changes with the job table
//! - **Terminal**: foreground process group handoff and signal disposition
//! - **Tools**: the builtin trait, registry and builtins
//! - **Kernel**: the [`Shell`] that sequences one input line

pub mod config;
pub mod error;
pub mod kernel;
pub mod launch;
pub mod parser;
pub mod reap;
pub mod scheduler;
pub mod terminal;
pub mod tools;

pub use config::ShellConfig;
pub use error::{ParseError, ShellError, ShellResult};
pub use kernel::{LineOutcome, Shell};
pub use parser::{parse, ParsedLine, RedirectKind, Redirections};
pub use reap::{Reporter, StatusReport, StdoutReporter};
pub use scheduler::{JobId, JobInfo, JobStatus, JobStore, JobTable};
