//! Form input handling
//!
//! Turns the raw text submitted by the calculator form into operands and an
//! operation, runs the engine, and produces the text shown to the user.

use calculadora_engine::{evaluate, format_number, CalcError, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Raw fields submitted by the calculator form.
///
/// Every field defaults to empty so a partial submission is reported as
/// invalid input instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationForm {
    #[serde(default)]
    pub num1: String,
    #[serde(default)]
    pub num2: String,
    #[serde(default)]
    pub operacion: String,
}

/// Errors surfaced to the user by the presentation layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Introduce números válidos")]
    InvalidInput,

    #[error("No se puede dividir por cero")]
    DivisionByZero,

    #[error("Operación no válida")]
    UnknownOperation(String),
}

impl From<CalcError> for FormError {
    fn from(e: CalcError) -> Self {
        match e {
            CalcError::DivisionByZero => FormError::DivisionByZero,
            CalcError::UnknownOperation(name) => FormError::UnknownOperation(name),
        }
    }
}

impl FormError {
    /// Text rendered into the result heading
    pub fn text(&self) -> String {
        format!("Error: {}", self)
    }
}

/// A successful calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
    pub result: f64,
}

impl Calculation {
    /// Text rendered into the result heading
    pub fn text(&self) -> String {
        format!("Resultado: {}", format_number(self.result))
    }
}

/// Outcome of one form submission
pub type Outcome = Result<Calculation, FormError>;

/// Text for either side of an [`Outcome`]
pub fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Ok(calc) => calc.text(),
        Err(e) => e.text(),
    }
}

/// Parse one operand from user-supplied text.
pub fn parse_operand(raw: &str) -> Result<f64, FormError> {
    raw.trim().parse::<f64>().map_err(|_| FormError::InvalidInput)
}

/// Run a calculation from already-parsed operands.
pub fn calculate(operation: Operation, a: f64, b: f64) -> Outcome {
    let result = evaluate(operation, a, b)?;
    Ok(Calculation { operation, a, b, result })
}

impl CalculationForm {
    pub fn new(num1: impl Into<String>, num2: impl Into<String>, operacion: impl Into<String>) -> Self {
        Self {
            num1: num1.into(),
            num2: num2.into(),
            operacion: operacion.into(),
        }
    }

    /// Validate the submission and run it through the engine.
    ///
    /// Operands are checked before the operation name, and the engine is
    /// never called when either operand fails to parse.
    pub fn calculate(&self) -> Outcome {
        let a = parse_operand(&self.num1)?;
        let b = parse_operand(&self.num2)?;
        let operation: Operation = self.operacion.parse()?;
        let outcome = calculate(operation, a, b);
        debug!(?outcome, "form calculated");
        outcome
    }
}
