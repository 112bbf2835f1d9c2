//! Builtin command system for mysh.
//!
//! Builtins run inside the shell process. Each implements the [`Builtin`]
//! trait and declares its exact argument count in its schema; the registry
//! rejects calls with the wrong count before the builtin runs.
//!
//! # Architecture
//!
//! ```text
//! BuiltinRegistry
//! ├── cd, ln, rm       (filesystem effects)
//! ├── jobs, fg, bg     (job control)
//! └── exit
//! ```

mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::register_builtins;
pub use context::ExecContext;
pub use registry::BuiltinRegistry;
pub use traits::{Builtin, BuiltinSchema, ExecResult};
