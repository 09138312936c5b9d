//! Mathdown - math-aware preprocessing for Markdown pipelines.
//!
//! Markdown converters and TeX math do not coexist peacefully: the
//! converter sees `$a_i$ and $b_j$` and happily turns the underscores
//! into `<em>` tags. Mathdown runs twice around any converter to keep
//! that from happening:
//!
//! 1. **Before conversion** it removes every math span - inline
//!    `$...$`, display `$$...$$`, and `\begin{env}...\end{env}`
//!    environments - replacing each with a numeric placeholder
//!    `@@<n>@@` that no converter will touch.
//! 2. **After conversion** it substitutes each placeholder back with
//!    the original math source, HTML-escaped and ready for a math
//!    typesetter to pick up.
//!
//! Dollar signs inside backtick code spans are shielded first, so
//! `` `echo $PATH` `` never turns into math. Math spans may not cross a
//! blank line; an unterminated delimiter simply stays literal text.
//!
//! # Quick start
//!
//! ```
//! use mathdown::convert_with_math;
//!
//! // Any Fn(&str) -> String works as the Markdown converter.
//! let html = convert_with_math("priced at $3 or $4", |t: &str| t.to_string()).unwrap();
//! // Well-formed math is captured; these dollars close each other, so
//! // "3 or " is treated as one inline span.
//! assert_eq!(html, "priced at $3 or $4");
//! ```
//!
//! For split extract/restore phases, drive a [`MathExtractor`]
//! directly; to wrap a real converter with hooks, build a
//! [`MathPipeline`].

pub mod core;
pub mod pipeline;
pub mod utils;

#[cfg(feature = "pulldown")]
pub mod adapters;

pub mod wasm;

pub use crate::core::{break_comment_lines, MathConfig, MathExtractor};
pub use crate::pipeline::{convert_with_math, MarkdownConverter, MathPipeline};
pub use crate::utils::error::{MathError, MathResult};

#[cfg(feature = "pulldown")]
pub use crate::adapters::pulldown::PulldownConverter;
