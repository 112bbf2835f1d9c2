//! Job bookkeeping for mysh.
//!
//! The [`JobStore`] trait is the whole contract the launcher, reconciler and
//! builtins need from job storage. [`JobTable`] is the in-process
//! implementation the shell uses.

mod job;

pub use job::{JobError, JobStore, JobTable};
pub use mysh_types::{JobId, JobInfo, JobStatus};
