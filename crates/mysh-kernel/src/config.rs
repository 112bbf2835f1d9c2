//! Shell configuration.

use crate::parser::DEFAULT_MAX_TOKENS;

/// Prompt used when `MYSH_PROMPT` is unset.
pub const DEFAULT_PROMPT: &str = "mysh> ";

/// Configuration for a [`Shell`](crate::Shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt text. Front ends only show it when built with prompts enabled.
    pub prompt: Option<String>,

    /// Whether foreground jobs get the terminal.
    ///
    /// Even when true, handoff only happens if standard input is a terminal.
    /// When false on a terminal, foreground jobs stay in the shell's process
    /// group instead. See [`TerminalMode`](crate::terminal::TerminalMode).
    pub job_control: bool,

    /// Upper bound on tokens in one line.
    pub max_tokens: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: None,
            job_control: false,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ShellConfig {
    /// Config for a human at a terminal: job control on, default prompt.
    pub fn interactive() -> Self {
        Self {
            prompt: Some(DEFAULT_PROMPT.to_string()),
            job_control: true,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Config that never touches the terminal. Used for `-c` and tests.
    pub fn batch() -> Self {
        Self::default()
    }

    /// [`ShellConfig::interactive`], with the prompt taken from
    /// `MYSH_PROMPT` when set.
    pub fn from_env() -> Self {
        let config = Self::interactive();
        match std::env::var("MYSH_PROMPT") {
            Ok(prompt) => config.with_prompt(prompt),
            Err(_) => config,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_job_control(mut self, enabled: bool) -> Self {
        self.job_control = enabled;
        self
    }

    pub fn with_max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = max;
        self
    }
}
