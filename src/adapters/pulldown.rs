//! `pulldown-cmark` adapter.
//!
//! A real Markdown-to-HTML converter for the pipeline, used by the CLI
//! `render` mode and by integration tests. The extraction core never
//! depends on it; it is one possible collaborator behind the
//! [`MarkdownConverter`](crate::pipeline::MarkdownConverter) seam.

use pulldown_cmark::{html, Options as PulldownOptions, Parser};

use crate::pipeline::MarkdownConverter;

/// Markdown converter backed by `pulldown-cmark`.
#[derive(Debug, Clone)]
pub struct PulldownConverter {
    options: PulldownOptions,
}

impl Default for PulldownConverter {
    fn default() -> Self {
        Self {
            options: PulldownOptions::empty(),
        }
    }
}

impl PulldownConverter {
    /// Converter with pulldown's default (CommonMark-only) options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with explicit pulldown extension options.
    pub fn with_options(options: PulldownOptions) -> Self {
        PulldownConverter { options }
    }
}

impl MarkdownConverter for PulldownConverter {
    fn convert(&self, input: &str) -> String {
        let parser = Parser::new_ext(input, self.options);
        let mut out = String::with_capacity(input.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
