//! Command-line parser for mysh.
//!
//! A line is split on runs of spaces and tabs. Three redirection operators are
//! recognised (`<`, `>`, `>>`) and a trailing standalone `&` requests
//! background execution. Everything else is a plain argument; there is no
//! quoting, expansion or pipeline syntax.
//!
//! Parsing produces two parallel sequences:
//!
//! - `tokens` keeps redirection operators and their file operands, and the
//!   program exactly as typed (full path included).
//! - `argv` is the exec-ready vector with redirections stripped. When the
//!   program was given as an absolute path, `argv[0]` is the bare name after
//!   the final `/`.
//!
//! The null terminator C expects after `argv` is added by the launcher when it
//! converts the vector for exec.

use std::fmt;

use crate::error::ParseError;

/// Default bound on tokens per line.
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Which stream a redirection operator targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `<`: read standard input from a file.
    Input,
    /// `>`: write standard output to a file, truncating it.
    Output,
    /// `>>`: append standard output to a file.
    Append,
}

impl RedirectKind {
    /// Classify a token as a redirection operator.
    pub fn from_operator(token: &str) -> Option<Self> {
        match token {
            "<" => Some(RedirectKind::Input),
            ">" => Some(RedirectKind::Output),
            ">>" => Some(RedirectKind::Append),
            _ => None,
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectKind::Input => write!(f, "input"),
            RedirectKind::Output | RedirectKind::Append => write!(f, "output"),
        }
    }
}

/// Redirection descriptor: token indices of the redirection files plus the
/// background flag. At most one of `output`/`append` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redirections {
    pub input: Option<usize>,
    pub output: Option<usize>,
    pub append: Option<usize>,
    pub background: bool,
}

impl Redirections {
    /// Position of the program in the token array.
    ///
    /// Every redirection pair ahead of the program occupies two slots, so the
    /// program sits at the first even index that is not an operator whose file
    /// is recorded in one of the slots.
    pub fn program_index(&self) -> usize {
        let files = [self.input, self.output, self.append];
        let mut index = 0;
        while files.iter().flatten().any(|&file| file == index + 1) {
            index += 2;
        }
        index
    }

    fn slot_mut(&mut self, kind: RedirectKind) -> &mut Option<usize> {
        match kind {
            RedirectKind::Input => &mut self.input,
            RedirectKind::Output => &mut self.output,
            RedirectKind::Append => &mut self.append,
        }
    }

    fn is_taken(&self, kind: RedirectKind) -> bool {
        match kind {
            RedirectKind::Input => self.input.is_some(),
            RedirectKind::Output | RedirectKind::Append => {
                self.output.is_some() || self.append.is_some()
            }
        }
    }
}

/// A successfully parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub tokens: Vec<String>,
    pub argv: Vec<String>,
    pub redir: Redirections,
}

impl ParsedLine {
    /// The program as typed, used for exec lookup.
    pub fn program(&self) -> &str {
        &self.tokens[self.redir.program_index()]
    }

    /// The command name, `argv[0]`.
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the command name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Whether the program was given as an absolute path. Such commands are
    /// never dispatched to builtins, even when the bare name matches one.
    pub fn is_path_command(&self) -> bool {
        self.program().starts_with('/')
    }

    /// The file standard input is read from, if redirected.
    pub fn input_file(&self) -> Option<&str> {
        self.redir.input.map(|i| self.tokens[i].as_str())
    }

    /// The file standard output goes to, with the mode to open it in.
    pub fn output_file(&self) -> Option<(&str, RedirectKind)> {
        match (self.redir.output, self.redir.append) {
            (Some(i), _) => Some((self.tokens[i].as_str(), RedirectKind::Output)),
            (None, Some(i)) => Some((self.tokens[i].as_str(), RedirectKind::Append)),
            (None, None) => None,
        }
    }

    pub fn is_background(&self) -> bool {
        self.redir.background
    }
}

/// Parse a line with the default token bound.
pub fn parse(line: &str) -> Result<ParsedLine, ParseError> {
    parse_with_limit(line, DEFAULT_MAX_TOKENS)
}

/// Parse a line, rejecting lines with more than `max_tokens` tokens.
pub fn parse_with_limit(line: &str, max_tokens: usize) -> Result<ParsedLine, ParseError> {
    let mut words: Vec<&str> = line
        .trim_end_matches(['\n', '\r'])
        .split([' ', '\t'])
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return Err(ParseError::EmptyLine);
    }
    if words.len() > max_tokens {
        return Err(ParseError::TooManyTokens { max: max_tokens });
    }

    let mut redir = Redirections::default();

    // A trailing `&` right after an operator is that operator's file.
    let trailing_amp = words.last() == Some(&"&")
        && !(words.len() >= 2 && RedirectKind::from_operator(words[words.len() - 2]).is_some());
    if trailing_amp {
        words.pop();
        redir.background = true;
    }

    let mut tokens = Vec::with_capacity(words.len());
    let mut argv = Vec::with_capacity(words.len());
    let mut iter = words.into_iter();

    while let Some(word) = iter.next() {
        let Some(kind) = RedirectKind::from_operator(word) else {
            tokens.push(word.to_string());
            argv.push(word.to_string());
            continue;
        };

        let target = match iter.next() {
            Some(t) if RedirectKind::from_operator(t).is_none() => t,
            _ => return Err(ParseError::MissingRedirectTarget { kind }),
        };
        if redir.is_taken(kind) {
            return Err(ParseError::DuplicateRedirect { kind });
        }

        tokens.push(word.to_string());
        tokens.push(target.to_string());
        *redir.slot_mut(kind) = Some(tokens.len() - 1);
    }

    if argv.is_empty() {
        return Err(ParseError::NoCommand);
    }

    if argv[0].starts_with('/') {
        let bare = argv[0].rsplit('/').next().unwrap_or_default().to_string();
        argv[0] = bare;
    }

    Ok(ParsedLine { tokens, argv, redir })
}
