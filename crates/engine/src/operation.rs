//! Operation selector

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// One of the four arithmetic operations offered by the form.
///
/// The wire names (`sumar`, `restar`, `multiplicar`, `dividir`) are the
/// values submitted by the `operacion` select and accepted by the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "sumar")]
    Add,
    #[serde(rename = "restar")]
    Subtract,
    #[serde(rename = "multiplicar")]
    Multiply,
    #[serde(rename = "dividir")]
    Divide,
}

impl Operation {
    /// All operations, in the order the form lists them
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "sumar",
            Operation::Subtract => "restar",
            Operation::Multiply => "multiplicar",
            Operation::Divide => "dividir",
        }
    }

    /// Label shown in the form's select
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Add => "Sumar (+)",
            Operation::Subtract => "Restar (-)",
            Operation::Multiply => "Multiplicar (×)",
            Operation::Divide => "Dividir (÷)",
        }
    }

    /// Arithmetic sign of the operation
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CalcError::UnknownOperation(name.to_string()))
    }
}
