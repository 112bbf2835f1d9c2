//! mysh CLI entry point.
//!
//! Usage:
//!   mysh                       # Read commands from standard input
//!   mysh -c <command>          # Execute one command and exit
//!   mysh --no-job-control      # Never hand the terminal to jobs

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use mysh_kernel::tools::BuiltinRegistry;
use mysh_kernel::ShellConfig;
use mysh_repl::Repl;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var). Standard output carries
    // job reports, so logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut config = ShellConfig::from_env();
    let mut command = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(ExitCode::SUCCESS);
            }

            "--version" | "-V" => {
                println!("mysh {} ({} {})",
                         env!("CARGO_PKG_VERSION"),
                         env!("MYSH_GIT_HASH"),
                         env!("MYSH_BUILD_DATE"));
                return Ok(ExitCode::SUCCESS);
            }

            "--no-job-control" => config = config.with_job_control(false),

            "-c" => {
                let line = args.next().context("-c requires a command argument")?;
                command = Some(line);
            }

            unknown => {
                eprintln!("Unknown option: {unknown}");
                eprintln!("Run 'mysh --help' for usage.");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let code = match command {
        Some(line) => Repl::new(config)?.run_command(&line)?,
        None => mysh_repl::run(config)?,
    };
    Ok(exit_code(code))
}

/// Clamp a shell status into a process exit code.
fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn print_help() {
    println!(r#"mysh v{}

Usage:
  mysh                         Read commands from standard input
  mysh -c <command>            Execute command and exit

Options:
  -c <command>                 Execute one command line and exit
  --no-job-control             Keep foreground jobs in the shell's group
  -h, --help                   Show this help
  -V, --version                Show version

Environment:
  MYSH_PROMPT                  Prompt text (prompt-enabled builds only)
  RUST_LOG                     Log filter, written to stderr

Builtins:"#, env!("CARGO_PKG_VERSION"));

    let registry = BuiltinRegistry::with_builtins();
    for name in registry.names() {
        if let Some(builtin) = registry.get(name) {
            let schema = builtin.schema();
            println!("  {:<28} {}", schema.usage(), schema.description);
        }
    }
}
