//! Core builtin traits and types.

use crate::error::ShellResult;

use super::context::ExecContext;

/// Schema describing a builtin's interface.
#[derive(Debug, Clone)]
pub struct BuiltinSchema {
    /// Builtin name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Names of the required positional parameters, in order.
    pub params: Vec<String>,
}

impl BuiltinSchema {
    /// Create a new builtin schema with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Add a required positional parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    /// Exact number of arguments the builtin takes.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// One-line usage, e.g. `ln <src> <dst>`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for param in &self.params {
            usage.push_str(&format!(" <{param}>"));
        }
        usage
    }
}

/// The result of running a builtin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i32,
    /// Text for standard output.
    pub out: String,
    /// Text for standard error.
    pub err: String,
    /// Set by `exit`: the shell should shut down with `code`.
    pub exit: bool,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
            exit: false,
        }
    }

    /// Create a failed result with an error message.
    pub fn failure(code: i32, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
            exit: false,
        }
    }

    /// Create a result that ends the shell.
    pub fn exit(code: i32) -> Self {
        Self {
            code,
            out: String::new(),
            err: String::new(),
            exit: true,
        }
    }

    /// True if the exit code is 0.
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}

/// A command implemented inside the shell.
pub trait Builtin {
    /// The name argv[0] must match.
    fn name(&self) -> &str;

    /// Description and parameters.
    fn schema(&self) -> BuiltinSchema;

    /// Run with the arguments after the name. The argument count has already
    /// been checked against the schema.
    ///
    /// Usage problems come back as a failed [`ExecResult`]; an `Err` is
    /// reserved for shell-level failures such as losing the terminal.
    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult>;
}
