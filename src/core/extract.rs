//! Math extraction and restoration.
//!
//! `MathExtractor` pulls every math span out of a text, leaving
//! `@@<n>@@` placeholders a Markdown converter cannot damage, and later
//! substitutes the captured (HTML-escaped) math source back into the
//! converted HTML. One instance carries exactly one extract/restore
//! cycle; the math buffer is written during extraction, consumed by
//! restoration, and gone afterwards.

use lazy_static::lazy_static;
use regex::Regex;

use super::lexer::tokenize;
use super::shield::CodeShield;
use super::token::{join, Token, TokenKind};
use super::MathConfig;
use crate::utils::error::{MathError, MathResult};

lazy_static! {
    /// Placeholder tokens left behind by extraction.
    static ref PLACEHOLDER: Regex = Regex::new(r"@@\d+@@").unwrap();
}

/// A pre-processing transform applied to captured math source right
/// before it is buffered.
pub type PreProcess<'a> = &'a dyn Fn(&str) -> String;

/// Scanner state threaded through one extraction pass.
///
/// Keeping this on the stack rather than on the instance means a pass
/// can never leak an open span into the next call.
#[derive(Debug)]
enum ScanState {
    /// Not inside a math span.
    Idle,
    /// Inside an open span, waiting for `end`.
    Open {
        /// Index of the opening delimiter token.
        start: usize,
        /// The closing token this span needs.
        end: EndMark,
        /// Nesting depth of literal braces seen since `start`.
        braces: usize,
        /// Best closing candidate seen while brace depth was nonzero.
        tentative: Option<usize>,
    },
}

/// The closing token an open span expects.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EndMark {
    /// The mirrored inline/display mark.
    Mark(String),
    /// The `\end{...}` matching an opening `\begin{...}`.
    Env(String),
}

impl EndMark {
    fn matches(&self, token: &Token) -> bool {
        match self {
            EndMark::Mark(mark) => token.is_mark() && token.text == *mark,
            EndMark::Env(name) => matches!(&token.kind, TokenKind::EnvEnd(n) if n == name),
        }
    }
}

/// Extracts math spans into placeholders and restores them afterwards.
///
/// ```
/// use mathdown::MathExtractor;
///
/// let mut extractor = MathExtractor::new();
/// let stripped = extractor.remove_math("Euler: $e^{i\\pi} = -1$");
/// assert_eq!(stripped, "Euler: @@0@@");
/// let restored = extractor.replace_math(&stripped).unwrap();
/// assert_eq!(restored, "Euler: $e^{i\\pi} = -1$");
/// ```
#[derive(Debug)]
pub struct MathExtractor {
    config: MathConfig,
    buffer: Option<Vec<String>>,
}

impl MathExtractor {
    /// Create an extractor with the default `$` / `$$` delimiter pair.
    pub fn new() -> Self {
        Self::with_config(MathConfig::default())
    }

    /// Create an extractor with a custom delimiter pair.
    pub fn with_config(config: MathConfig) -> Self {
        MathExtractor {
            config,
            buffer: None,
        }
    }

    /// The math spans captured by the last extraction, in placeholder
    /// order. Empty once restoration has consumed the buffer.
    pub fn captured(&self) -> &[String] {
        self.buffer.as_deref().unwrap_or(&[])
    }

    /// Remove every math span from `text`, replacing each with a
    /// `@@<n>@@` placeholder and buffering its HTML-escaped source.
    pub fn remove_math(&mut self, text: &str) -> String {
        self.remove_math_with(text, None)
    }

    /// Like [`remove_math`](Self::remove_math), with a transform applied
    /// to each captured span before buffering. Used to reformat math for
    /// renderers with special needs, e.g. [`break_comment_lines`].
    pub fn remove_math_with(&mut self, text: &str, pre_process: Option<PreProcess>) -> String {
        let text = normalize_line_endings(text);
        let shield = CodeShield::new(&text);
        let shielded = shield.shield(&text);
        let mut tokens = tokenize(&shielded, &self.config);
        let mut buffer: Vec<String> = Vec::new();

        let mut state = ScanState::Idle;
        for i in 0..tokens.len() {
            if tokens[i].is_text() {
                continue;
            }

            // An existing placeholder is re-registered under a fresh
            // index no matter what the scanner is doing, so math that
            // arrived pre-tokenized survives another pass.
            if tokens[i].is_placeholder() {
                let original = std::mem::take(&mut tokens[i].text);
                tokens[i].text = format!("@@{}@@", buffer.len());
                buffer.push(original);
                continue;
            }

            state = match state {
                ScanState::Open {
                    start,
                    end,
                    braces,
                    tentative,
                } => {
                    if end.matches(&tokens[i]) {
                        if braces > 0 {
                            // Inside unbalanced braces this close is only
                            // tentative; a later candidate supersedes it.
                            ScanState::Open {
                                start,
                                end,
                                braces,
                                tentative: Some(i),
                            }
                        } else {
                            commit_span(&mut tokens, &mut buffer, start, i, &shield, pre_process);
                            ScanState::Idle
                        }
                    } else if tokens[i].is_paragraph_break() {
                        // Math never crosses a paragraph boundary. Fall
                        // back to the tentative close if one was seen,
                        // otherwise the opening mark stays literal.
                        if let Some(close) = tentative {
                            commit_span(
                                &mut tokens,
                                &mut buffer,
                                start,
                                close,
                                &shield,
                                pre_process,
                            );
                        }
                        ScanState::Idle
                    } else {
                        match tokens[i].kind {
                            TokenKind::OpenBrace => ScanState::Open {
                                start,
                                end,
                                braces: braces + 1,
                                tentative,
                            },
                            TokenKind::CloseBrace if braces > 0 => ScanState::Open {
                                start,
                                end,
                                braces: braces - 1,
                                tentative,
                            },
                            _ => ScanState::Open {
                                start,
                                end,
                                braces,
                                tentative,
                            },
                        }
                    }
                }
                ScanState::Idle => match &tokens[i].kind {
                    TokenKind::Mark
                        if tokens[i].text == self.config.inline_mark
                            || tokens[i].text == self.config.display_mark =>
                    {
                        ScanState::Open {
                            start: i,
                            end: EndMark::Mark(tokens[i].text.clone()),
                            braces: 0,
                            tentative: None,
                        }
                    }
                    TokenKind::EnvBegin(name) => ScanState::Open {
                        start: i,
                        end: EndMark::Env(name.clone()),
                        braces: 0,
                        tentative: None,
                    },
                    _ => ScanState::Idle,
                },
            };
        }

        // The stream ended while a braced span was still open: commit up
        // to the best candidate seen.
        if let ScanState::Open {
            start,
            tentative: Some(close),
            ..
        } = state
        {
            commit_span(&mut tokens, &mut buffer, start, close, &shield, pre_process);
        }

        log::debug!("extracted {} math span(s)", buffer.len());
        self.buffer = Some(buffer);
        shield.unshield(&join(&tokens))
    }

    /// Substitute every `@@<n>@@` placeholder in `text` with the
    /// buffered math source, consuming the buffer.
    ///
    /// Calling this without a prior [`remove_math`](Self::remove_math),
    /// or twice in a row, faults as soon as a placeholder has to be
    /// resolved - that is instance misuse, not an input problem.
    pub fn replace_math(&mut self, text: &str) -> MathResult<String> {
        let buffer = self.buffer.take();
        let available = buffer.as_ref().map_or(0, |entries| entries.len());
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for found in PLACEHOLDER.find_iter(text) {
            let entries = match &buffer {
                Some(entries) => entries,
                None => return Err(MathError::buffer_consumed(found.as_str())),
            };
            let source = found
                .as_str()
                .trim_matches('@')
                .parse::<usize>()
                .ok()
                .and_then(|index| entries.get(index))
                .ok_or_else(|| MathError::unknown_placeholder(found.as_str(), available))?;
            out.push_str(&text[cursor..found.start()]);
            out.push_str(source);
            cursor = found.end();
        }

        out.push_str(&text[cursor..]);
        Ok(out)
    }
}

impl Default for MathExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Commit the span covering `tokens[start..=close]`: buffer its escaped
/// source, blank the covered tokens, and leave a placeholder at `start`.
fn commit_span(
    tokens: &mut [Token],
    buffer: &mut Vec<String>,
    start: usize,
    close: usize,
    shield: &CodeShield,
    pre_process: Option<PreProcess>,
) {
    let mut span = String::new();
    for token in &tokens[start..=close] {
        span.push_str(&token.text);
    }
    let mut span = escape_html(&span);
    if let Some(transform) = pre_process {
        span = transform(&span);
    }
    let span = shield.unshield(&span);

    for token in &mut tokens[start + 1..=close] {
        token.kind = TokenKind::Text;
        token.text.clear();
    }
    tokens[start].kind = TokenKind::Placeholder;
    tokens[start].text = format!("@@{}@@", buffer.len());

    log::trace!("captured math span @@{}@@ ({} bytes)", buffer.len(), span.len());
    buffer.push(span);
}

/// Escape the three characters that matter inside embedded math source.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Normalize `\r\n` and bare `\r` line endings to `\n`.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Append `<br/>` to every `%`-comment line of a math span.
///
/// Some renderers collapse the newline that terminates a TeX comment,
/// which would swallow the rest of the line into the comment. Suitable
/// as the pre-process hook of [`MathExtractor::remove_math_with`].
pub fn break_comment_lines(math: &str) -> String {
    let mut out = String::with_capacity(math.len());
    let mut lines = math.split('\n').peekable();
    while let Some(line) = lines.next() {
        out.push_str(line);
        if lines.peek().is_some() {
            if line.contains('%') {
                out.push_str("<br/>");
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_extraction() {
        let mut extractor = MathExtractor::new();
        assert_eq!(extractor.remove_math("a $x$ b"), "a @@0@@ b");
        assert_eq!(extractor.captured(), ["$x$"]);
    }

    #[test]
    fn test_display_extraction() {
        let mut extractor = MathExtractor::new();
        assert_eq!(extractor.remove_math("$$x + y$$"), "@@0@@");
        assert_eq!(extractor.captured(), ["$$x + y$$"]);
    }

    #[test]
    fn test_unterminated_span_stays_literal() {
        let mut extractor = MathExtractor::new();
        assert_eq!(extractor.remove_math("a $x b"), "a $x b");
        assert!(extractor.captured().is_empty());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b < c > d"), "a &amp; b &lt; c &gt; d");
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_break_comment_lines() {
        let math = "x % keep\ny\n% also keep\nz";
        assert_eq!(
            break_comment_lines(math),
            "x % keep<br/>\ny\n% also keep<br/>\nz"
        );
    }

    #[test]
    fn test_break_comment_lines_without_comments() {
        assert_eq!(break_comment_lines("x\ny"), "x\ny");
    }

    #[test]
    fn test_pre_process_runs_before_buffering() {
        let mut extractor = MathExtractor::new();
        let upper = |s: &str| s.to_uppercase();
        extractor.remove_math_with("$abc$", Some(&upper));
        assert_eq!(extractor.captured(), ["$ABC$"]);
    }

    #[test]
    fn test_replace_consumes_buffer() {
        let mut extractor = MathExtractor::new();
        let stripped = extractor.remove_math("$x$");
        assert_eq!(extractor.replace_math(&stripped).unwrap(), "$x$");
        assert!(extractor.captured().is_empty());
        assert!(extractor.replace_math(&stripped).is_err());
    }

    #[test]
    fn test_replace_without_placeholders_never_faults() {
        let mut extractor = MathExtractor::new();
        assert_eq!(extractor.replace_math("no math here").unwrap(), "no math here");
    }
}
