//! Markdown conversion pipeline with math extraction hooks.
//!
//! [`MathPipeline`] wraps an injected Markdown converter between the
//! two halves of a [`MathExtractor`] cycle: math comes out before the
//! converter runs and goes back in afterwards, so the converter never
//! sees a dollar sign it could mangle. The converter and the presence
//! of a math runtime are explicit inputs, not detected globals - when
//! no math runtime is around, the pipeline degrades to plain
//! conversion.

use crate::core::{MathConfig, MathExtractor};
use crate::utils::error::MathResult;

/// A Markdown-to-HTML converter, consumed as a black box.
pub trait MarkdownConverter {
    fn convert(&self, input: &str) -> String;
}

/// Any `Fn(&str) -> String` closure is a converter.
impl<F> MarkdownConverter for F
where
    F: Fn(&str) -> String,
{
    fn convert(&self, input: &str) -> String {
        self(input)
    }
}

/// A text transform hook owned by the pipeline.
pub type TextHook = Box<dyn Fn(&str) -> String>;

/// Math-compatible conversion pipeline.
///
/// One pipeline can run any number of conversions; every
/// [`convert`](Self::convert) call gets its own extractor, so no math
/// buffer ever crosses between two conversions.
///
/// ```
/// use mathdown::MathPipeline;
///
/// let pipeline = MathPipeline::new(|text: &str| format!("<p>{}</p>", text));
/// let html = pipeline.convert("see $a < b$").unwrap();
/// assert_eq!(html, "<p>see $a &lt; b$</p>");
/// ```
pub struct MathPipeline<C> {
    converter: C,
    config: MathConfig,
    math_available: bool,
    pre_process: Option<TextHook>,
    post_process: Option<TextHook>,
}

impl<C: MarkdownConverter> MathPipeline<C> {
    /// Wrap a converter with math extraction enabled and default marks.
    pub fn new(converter: C) -> Self {
        MathPipeline {
            converter,
            config: MathConfig::default(),
            math_available: true,
            pre_process: None,
            post_process: None,
        }
    }

    /// Use a custom delimiter configuration.
    pub fn with_config(mut self, config: MathConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare whether a math runtime is present downstream. Without
    /// one, extraction is skipped entirely and text passes through the
    /// converter unchanged.
    pub fn math_available(mut self, available: bool) -> Self {
        self.math_available = available;
        self
    }

    /// Transform each captured math span before it is buffered.
    pub fn with_pre_process(mut self, hook: impl Fn(&str) -> String + 'static) -> Self {
        self.pre_process = Some(Box::new(hook));
        self
    }

    /// Transform the final HTML after restoration.
    pub fn with_post_process(mut self, hook: impl Fn(&str) -> String + 'static) -> Self {
        self.post_process = Some(Box::new(hook));
        self
    }

    /// Run one full conversion cycle: extract, convert, restore,
    /// post-process.
    pub fn convert(&self, text: &str) -> MathResult<String> {
        if !self.math_available {
            log::debug!("math runtime absent, converting without extraction");
            let html = self.converter.convert(text);
            return Ok(self.apply_post(html));
        }

        let mut extractor = MathExtractor::with_config(self.config.clone());
        let stripped = extractor.remove_math_with(text, self.pre_process.as_deref());
        let html = self.converter.convert(&stripped);
        let restored = extractor.replace_math(&html)?;
        Ok(self.apply_post(restored))
    }

    fn apply_post(&self, html: String) -> String {
        match &self.post_process {
            Some(hook) => hook(&html),
            None => html,
        }
    }
}

/// One-shot convenience: extract math from `text`, run `converter`,
/// restore math into its output.
pub fn convert_with_math<C: MarkdownConverter>(text: &str, converter: C) -> MathResult<String> {
    MathPipeline::new(converter).convert(text)
}
