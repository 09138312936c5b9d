//! Concrete Markdown converter adapters.

#[cfg(feature = "pulldown")]
pub mod pulldown;
