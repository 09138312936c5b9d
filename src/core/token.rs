//! Token definitions for the math delimiter scanner.
//!
//! The extractor never looks at raw characters. The lexer chops the
//! input into a stream of tagged tokens, and the scan loop only has to
//! reason about delimiter kinds and brace depth.

use std::fmt;

/// Kind of a token in the delimiter stream.
///
/// Every token keeps its exact source text alongside its kind, so a
/// span commit can rebuild the original math source by concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Ordinary text between delimiters.
    Text,

    /// An inline or display math mark (`$` or `$$` by default).
    Mark,

    /// A `\begin{name}` environment opener. The string is the
    /// environment name, including a trailing `*` if present.
    EnvBegin(String),

    /// A `\end{name}` environment closer.
    EnvEnd(String),

    /// An escaped pair - `\\`, `\{`, `\}` or `\$` - inert for
    /// delimiter and brace tracking.
    Escaped,

    /// A literal `{`.
    OpenBrace,

    /// A literal `}`.
    CloseBrace,

    /// A maximal whitespace run starting with a newline. Two or more
    /// newlines in the run mean a paragraph boundary.
    Newline,

    /// An existing placeholder token `@@<digits>@@`.
    Placeholder,
}

/// A token: a kind plus the exact text it was lexed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    /// Create a token from a kind and its source text.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// Create a literal text token.
    pub fn text(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Text, text)
    }

    /// Returns true if this token is ordinary text.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, TokenKind::Text)
    }

    /// Returns true if this token is an inline/display mark.
    pub fn is_mark(&self) -> bool {
        matches!(self.kind, TokenKind::Mark)
    }

    /// Returns true if this token is an existing placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, TokenKind::Placeholder)
    }

    /// Returns the environment name if this is a `\begin{...}` token.
    pub fn env_begin(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::EnvBegin(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if this token is a whitespace run spanning a blank
    /// line. Math spans may not cross such a run.
    pub fn is_paragraph_break(&self) -> bool {
        matches!(self.kind, TokenKind::Newline) && self.text.matches('\n').count() >= 2
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Join a token stream back into one string.
pub fn join(tokens: &[Token]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
    for token in tokens {
        out.push_str(&token.text);
    }
    out
}
