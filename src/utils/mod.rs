//! Utility modules
//!
//! Error types and result types shared by the library, the CLI, and the
//! WASM bindings.

pub mod error;

// Re-export commonly used items
pub use error::{MathError, MathResult};
