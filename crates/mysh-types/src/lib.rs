//! Pure data types for mysh: job identifiers, statuses and listings.
//!
//! This crate is a leaf dependency with no OS bindings and no I/O, so front
//! ends can talk about jobs without pulling in the process machinery.

pub mod job;

pub use job::*;
