//! WASM bindings for mathdown
//!
//! This module exposes the extract/restore cycle to JavaScript, for use
//! inside browser-hosted Markdown editors.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::core::{MathConfig, MathExtractor};

/// Delimiter options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize, Default)]
pub struct MathOptions {
    /// Mark for inline math. Default: `$`
    #[serde(default)]
    pub inline_mark: Option<String>,
    /// Mark for display math. Default: `$$`
    #[serde(default)]
    pub display_mark: Option<String>,
}

#[cfg(feature = "wasm")]
impl MathOptions {
    fn into_config(self) -> MathConfig {
        let defaults = MathConfig::default();
        MathConfig {
            inline_mark: self.inline_mark.unwrap_or(defaults.inline_mark),
            display_mark: self.display_mark.unwrap_or(defaults.display_mark),
        }
    }
}

/// Restoration result with error metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct RestoreResult {
    /// The restored HTML
    pub output: String,
    /// Whether restoration succeeded
    pub success: bool,
    /// Error message if restoration failed
    pub error: Option<String>,
}

/// Safely serialize a value to JsValue.
///
/// This prevents panics from `unwrap()` when serialization fails.
#[cfg(feature = "wasm")]
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// One extract/restore cycle, driven from JavaScript.
///
/// ```js
/// const processor = new MathProcessor({});
/// const stripped = processor.remove_math(text);
/// const html = markdownConverter(stripped);
/// const result = processor.replace_math(html);
/// if (result.success) preview.innerHTML = result.output;
/// ```
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct MathProcessor {
    inner: MathExtractor,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl MathProcessor {
    /// Create a processor. `options` may be `{}`/`undefined` for the
    /// default `$` / `$$` pair.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> MathProcessor {
        let options: MathOptions =
            serde_wasm_bindgen::from_value(options).unwrap_or_default();
        MathProcessor {
            inner: MathExtractor::with_config(options.into_config()),
        }
    }

    /// Replace every math span with a `@@<n>@@` placeholder.
    pub fn remove_math(&mut self, text: &str) -> String {
        self.inner.remove_math(text)
    }

    /// Substitute placeholders back. Returns `{ output, success, error }`.
    pub fn replace_math(&mut self, text: &str) -> JsValue {
        let result = match self.inner.replace_math(text) {
            Ok(output) => RestoreResult {
                output,
                success: true,
                error: None,
            },
            Err(err) => RestoreResult {
                output: String::new(),
                success: false,
                error: Some(err.to_string()),
            },
        };
        to_js_value(&result)
    }

    /// Number of math spans captured by the last extraction.
    pub fn math_count(&self) -> usize {
        self.inner.captured().len()
    }
}
