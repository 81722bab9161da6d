//! Error types for the calculation engine

use thiserror::Error;

/// Result type alias using the engine error
pub type Result<T> = std::result::Result<T, CalcError>;

/// Calculation engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("No se puede dividir por cero")]
    DivisionByZero,

    #[error("Operación no válida: {0}")]
    UnknownOperation(String),
}
