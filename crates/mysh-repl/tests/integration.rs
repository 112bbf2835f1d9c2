//! Integration tests for the mysh binary.
//!
//! Each test pipes a script into a fresh `mysh` process and checks what it
//! printed. Standard input is a pipe, so terminal handoff stays off.

use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_dir() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = env::temp_dir().join(format!("mysh-repl-test-{}-{}", std::process::id(), id));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Run `script` through mysh's standard input.
fn run_script(script: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn mysh");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("Failed to write script");

    child.wait_with_output().expect("Failed to wait for mysh")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// Loop and exit
// ============================================================================

#[test]
fn test_exit_builtin() {
    let output = run_script("exit\n/bin/echo unreachable\n");
    assert_eq!(output.status.code(), Some(0));
    assert!(!stdout(&output).contains("unreachable"));
}

#[test]
fn test_eof_exits_cleanly() {
    let output = run_script("");
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_last_line_without_newline_runs() {
    let output = run_script("/bin/echo tail");
    assert_eq!(stdout(&output), "tail\n");
}

#[test]
fn test_builtin_arity_error() {
    let output = run_script("exit 1\n");
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("exit: syntax error (usage: exit)"), "stderr: {}", stderr(&output));
}

#[test]
fn test_parse_errors_are_reported_and_skipped() {
    let output = run_script("cat >\ncmd > a > b\n< file\n/bin/echo still here\n");
    let err = stderr(&output);
    assert!(err.contains("syntax error: no output file"), "stderr: {err}");
    assert!(err.contains("syntax error: multiple output files"), "stderr: {err}");
    assert!(err.contains("error: redirects with no command"), "stderr: {err}");
    assert_eq!(stdout(&output), "still here\n");
}

#[test]
fn test_unknown_program_does_not_stop_shell() {
    let output = run_script("/nonexistent/mysh-missing\n/bin/echo after\n");
    assert!(stderr(&output).contains("mysh-missing"), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "after\n");
}

// ============================================================================
// Jobs
// ============================================================================

#[test]
fn test_background_job_listed() {
    let output = run_script("/bin/sleep 1 &\njobs\n");
    let out = stdout(&output);
    assert!(out.starts_with("[1] ("), "stdout: {out}");
    assert!(out.contains("Running /bin/sleep"), "stdout: {out}");
}

#[test]
fn test_background_completion_reported_next_iteration() {
    let output = run_script("/bin/true &\n/bin/sleep 0.3\n/bin/echo done\n");
    let out = stdout(&output);
    let report = out.find("terminated with exit status 0").expect("missing report");
    let done = out.find("done").expect("missing echo output");
    assert!(report < done, "report should precede later output: {out}");
}

#[test]
fn test_fg_unknown_job() {
    let output = run_script("fg %999\n");
    assert!(stderr(&output).contains("fg: job not found"));
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_bg_without_percent() {
    let output = run_script("bg 1\n");
    assert!(stderr(&output).contains("bg: syntax error"));
}

// ============================================================================
// Redirection and file builtins
// ============================================================================

#[test]
fn test_redirect_round_trip() {
    let dir = temp_dir();
    let file = dir.join("greeting.txt");
    let script = format!(
        "/bin/echo hi > {0}\n/bin/echo there >> {0}\n/bin/cat < {0}\n",
        file.display()
    );

    let output = run_script(&script);
    assert_eq!(stdout(&output), "hi\nthere\n");
    assert_eq!(fs::read_to_string(&file).unwrap(), "hi\nthere\n");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_cd_changes_directory_for_children() {
    let dir = temp_dir();
    let output = run_script(&format!("cd {}\n/bin/pwd\n", dir.display()));
    let expected = fs::canonicalize(&dir).unwrap();
    assert_eq!(stdout(&output).trim_end(), expected.to_string_lossy());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_ln_and_rm() {
    let dir = temp_dir();
    let original = dir.join("a");
    let link = dir.join("b");
    fs::write(&original, "data").unwrap();

    let output = run_script(&format!(
        "ln {} {}\nrm {}\n",
        original.display(),
        link.display(),
        original.display()
    ));
    assert!(stderr(&output).is_empty(), "stderr: {}", stderr(&output));
    assert!(!original.exists());
    assert_eq!(fs::read_to_string(&link).unwrap(), "data");

    let _ = fs::remove_dir_all(&dir);
}

// ============================================================================
// Command line
// ============================================================================

#[test]
fn test_dash_c_runs_one_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(["-c", "/bin/echo hello"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run mysh");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "hello\n");
}

#[test]
fn test_dash_c_propagates_status() {
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .args(["-c", "/bin/false"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run mysh");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .arg("--version")
        .output()
        .expect("Failed to run mysh");
    assert!(stdout(&output).starts_with("mysh "));
}

#[test]
fn test_help_lists_builtin_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_mysh"))
        .arg("--help")
        .output()
        .expect("Failed to run mysh");
    let out = stdout(&output);
    assert!(out.contains("ln <src> <dst>"), "stdout: {out}");
    assert!(out.contains("fg <%job>"), "stdout: {out}");
}
