//! Calculadora Engine
//!
//! Pure arithmetic core for the Calculadora web form: the four operations,
//! the operation selector, and locale-free result formatting.

pub mod arithmetic;
pub mod error;
pub mod format;
pub mod operation;

// Re-export commonly used types
pub use arithmetic::{add, divide, evaluate, multiply, subtract};
pub use error::{CalcError, Result};
pub use format::format_number;
pub use operation::Operation;

/// Calculadora version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
