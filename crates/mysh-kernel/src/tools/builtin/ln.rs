//! ln — Create a hard link.

use crate::error::ShellResult;
use crate::tools::{Builtin, BuiltinSchema, ExecContext, ExecResult};

/// Ln builtin: `ln <src> <dst>` makes `dst` a hard link to `src`.
pub struct Ln;

impl Builtin for Ln {
    fn name(&self) -> &str {
        "ln"
    }

    fn schema(&self) -> BuiltinSchema {
        BuiltinSchema::new("ln", "Create a hard link")
            .param("src")
            .param("dst")
    }

    fn execute(&self, args: &[String], _ctx: &mut ExecContext<'_>) -> ShellResult<ExecResult> {
        let (src, dst) = (&args[0], &args[1]);
        Ok(match std::fs::hard_link(src, dst) {
            Ok(()) => ExecResult::success(""),
            Err(e) => ExecResult::failure(1, format!("ln: {}", e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::{args, Harness};

    #[test]
    fn test_ln_creates_link() {
        let dir = std::env::temp_dir().join(format!("mysh-ln-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let src = dir.join("src.txt");
        let dst = dir.join("dst.txt");
        std::fs::write(&src, "data").unwrap();
        let _ = std::fs::remove_file(&dst);

        let mut h = Harness::new();
        let argv = args(&[src.to_str().unwrap(), dst.to_str().unwrap()]);
        let result = Ln.execute(&argv, &mut h.ctx()).unwrap();
        assert!(result.ok(), "{:?}", result);
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "data");

        // Linking over an existing name fails.
        let again = Ln.execute(&argv, &mut h.ctx()).unwrap();
        assert!(!again.ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
