//! Lexer for the math delimiter stream.
//!
//! Splits input text into literal runs and candidate delimiter tokens:
//! the configured inline/display marks, `\begin{...}`/`\end{...}`
//! environment markers, escaped pairs (`\\`, `\{`, `\}`, `\$`), literal
//! braces, whitespace runs containing a newline, and existing
//! `@@<n>@@` placeholders. Everything else is literal text.
//!
//! The lexer expects its input to be line-ending normalized and
//! code-span shielded already; it never has to reason about backticks
//! or carriage returns.

use super::token::{Token, TokenKind};
use super::MathConfig;

/// The delimiter lexer. Walks the input once, byte-cursor driven.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    config: &'a MathConfig,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input and delimiter pair.
    pub fn new(input: &'a str, config: &'a MathConfig) -> Self {
        Lexer {
            input,
            pos: 0,
            config,
        }
    }

    /// Run the lexer to completion, producing the token stream.
    pub fn run(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut text = String::new();

        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            if let Some((token, len)) = match_delimiter(rest, self.config) {
                if !text.is_empty() {
                    tokens.push(Token::text(std::mem::take(&mut text)));
                }
                tokens.push(token);
                self.pos += len;
            } else {
                // Not a delimiter: accumulate one character of literal text.
                let c = match rest.chars().next() {
                    Some(c) => c,
                    None => break,
                };
                text.push(c);
                self.pos += c.len_utf8();
            }
        }

        if !text.is_empty() {
            tokens.push(Token::text(text));
        }
        tokens
    }
}

/// Tokenize input text into the delimiter stream.
pub fn tokenize(input: &str, config: &MathConfig) -> Vec<Token> {
    Lexer::new(input, config).run()
}

/// Try to match a delimiter token at the start of `rest`.
/// Returns the token and the number of bytes consumed.
fn match_delimiter(rest: &str, config: &MathConfig) -> Option<(Token, usize)> {
    // Configured marks have priority, longest first, so `$$` wins over `$`.
    let (first, second) = if config.display_mark.len() >= config.inline_mark.len() {
        (&config.display_mark, &config.inline_mark)
    } else {
        (&config.inline_mark, &config.display_mark)
    };
    for mark in [first, second] {
        if !mark.is_empty() && rest.starts_with(mark.as_str()) {
            return Some((Token::new(TokenKind::Mark, mark.clone()), mark.len()));
        }
    }

    match rest.as_bytes().first()? {
        b'\\' => try_environment(rest).or_else(|| try_escaped(rest)),
        b'{' => Some((Token::new(TokenKind::OpenBrace, "{"), 1)),
        b'}' => Some((Token::new(TokenKind::CloseBrace, "}"), 1)),
        b'\n' => Some(newline_run(rest)),
        b'@' => try_placeholder(rest),
        _ => None,
    }
}

/// Try to match `\begin{name}` or `\end{name}` where `name` is a run of
/// ASCII letters with an optional trailing `*`. Anything else (digits in
/// the name, missing brace) is not an environment marker and falls back
/// to literal text plus brace tokens.
fn try_environment(rest: &str) -> Option<(Token, usize)> {
    let (tail, begin) = if let Some(tail) = rest.strip_prefix("\\begin{") {
        (tail, true)
    } else if let Some(tail) = rest.strip_prefix("\\end{") {
        (tail, false)
    } else {
        return None;
    };

    let mut name_len = tail.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
    if tail.as_bytes().get(name_len) == Some(&b'*') {
        name_len += 1;
    }
    if tail.as_bytes().get(name_len) != Some(&b'}') {
        return None;
    }

    let name = tail[..name_len].to_string();
    let consumed = (rest.len() - tail.len()) + name_len + 1;
    let kind = if begin {
        TokenKind::EnvBegin(name)
    } else {
        TokenKind::EnvEnd(name)
    };
    Some((Token::new(kind, &rest[..consumed]), consumed))
}

/// Try to match an escaped pair: `\\`, `\{`, `\}` or `\$`.
fn try_escaped(rest: &str) -> Option<(Token, usize)> {
    for escaped in ["\\\\", "\\{", "\\}", "\\$"] {
        if rest.starts_with(escaped) {
            return Some((Token::new(TokenKind::Escaped, escaped), escaped.len()));
        }
    }
    None
}

/// Consume a maximal whitespace run starting at a newline.
fn newline_run(rest: &str) -> (Token, usize) {
    let mut len = 1; // the leading '\n'
    for c in rest[1..].chars() {
        if c.is_whitespace() {
            len += c.len_utf8();
        } else {
            break;
        }
    }
    (Token::new(TokenKind::Newline, &rest[..len]), len)
}

/// Try to match an existing placeholder token `@@<digits>@@`.
fn try_placeholder(rest: &str) -> Option<(Token, usize)> {
    let tail = rest.strip_prefix("@@")?;
    let digits = tail.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || !tail[digits..].starts_with("@@") {
        return None;
    }
    let len = 2 + digits + 2;
    Some((Token::new(TokenKind::Placeholder, &rest[..len]), len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, &MathConfig::default())
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_plain_text_is_one_token() {
        let tokens = tokenize("nothing to see here", &MathConfig::default());
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_text());
    }

    #[test]
    fn test_inline_marks() {
        let tokens = tokenize("a $x$ b", &MathConfig::default());
        assert_eq!(
            tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["a ", "$", "x", "$", " b"]
        );
        assert!(tokens[1].is_mark());
        assert!(tokens[3].is_mark());
    }

    #[test]
    fn test_display_mark_wins_over_inline() {
        let tokens = tokenize("$$$", &MathConfig::default());
        assert_eq!(
            tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["$$", "$"]
        );
    }

    #[test]
    fn test_environment_markers() {
        let tokens = tokenize("\\begin{matrix}x\\end{matrix}", &MathConfig::default());
        assert_eq!(tokens[0].kind, TokenKind::EnvBegin("matrix".into()));
        assert_eq!(tokens[0].text, "\\begin{matrix}");
        assert_eq!(tokens[2].kind, TokenKind::EnvEnd("matrix".into()));
    }

    #[test]
    fn test_starred_environment() {
        let tokens = tokenize("\\begin{align*}", &MathConfig::default());
        assert_eq!(tokens[0].kind, TokenKind::EnvBegin("align*".into()));
    }

    #[test]
    fn test_invalid_environment_name_falls_back() {
        // Digits are not allowed in environment names, so this lexes as
        // literal text plus brace tokens.
        let tokens = tokenize("\\begin{x2}", &MathConfig::default());
        assert_eq!(tokens[0], Token::text("\\begin"));
        assert_eq!(tokens[1].kind, TokenKind::OpenBrace);
        assert_eq!(tokens[2], Token::text("x2"));
        assert_eq!(tokens[3].kind, TokenKind::CloseBrace);
    }

    #[test]
    fn test_escaped_pairs() {
        assert_eq!(
            kinds("\\$\\\\\\{\\}"),
            vec![
                TokenKind::Escaped,
                TokenKind::Escaped,
                TokenKind::Escaped,
                TokenKind::Escaped
            ]
        );
    }

    #[test]
    fn test_other_control_sequences_are_text() {
        let tokens = tokenize("\\alpha + \\beta", &MathConfig::default());
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_text());
    }

    #[test]
    fn test_newline_run_grabs_trailing_whitespace() {
        let tokens = tokenize("a\n  \n  b", &MathConfig::default());
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[1].text, "\n  \n  ");
        assert!(tokens[1].is_paragraph_break());
    }

    #[test]
    fn test_single_newline_is_not_a_paragraph_break() {
        let tokens = tokenize("a\nb", &MathConfig::default());
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert!(!tokens[1].is_paragraph_break());
    }

    #[test]
    fn test_placeholder_token() {
        let tokens = tokenize("@@12@@", &MathConfig::default());
        assert_eq!(tokens[0].kind, TokenKind::Placeholder);
        assert_eq!(tokens[0].text, "@@12@@");
    }

    #[test]
    fn test_incomplete_placeholder_is_text() {
        let tokens = tokenize("@@x@@ @@12@", &MathConfig::default());
        assert!(tokens.iter().all(|t| t.is_text()));
    }

    #[test]
    fn test_custom_marks() {
        let config = MathConfig::with_marks("§", "§§");
        let tokens = tokenize("a §x§ b", &config);
        assert!(tokens[1].is_mark());
        assert_eq!(tokens[1].text, "§");
    }

    #[test]
    fn test_lex_join_roundtrip() {
        let input = "a $x$ \\begin{align}y\\end{align}\n\n\\$ {b}";
        let tokens = tokenize(input, &MathConfig::default());
        assert_eq!(super::super::token::join(&tokens), input);
    }
}
