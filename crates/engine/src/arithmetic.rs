//! The four arithmetic operations
//!
//! All functions are pure. NaN and infinities propagate per IEEE 754; the
//! only checked condition is a divisor of exactly zero.

use tracing::debug;

use crate::error::{CalcError, Result};
use crate::operation::Operation;

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Divide `a` by `b`.
///
/// Fails with [`CalcError::DivisionByZero`] when `b` compares equal to zero
/// (this includes `-0.0`). No epsilon tolerance is applied.
pub fn divide(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(a / b)
}

/// Apply `op` to the two operands.
pub fn evaluate(op: Operation, a: f64, b: f64) -> Result<f64> {
    debug!(%op, symbol = op.symbol(), a, b, "evaluating");
    match op {
        Operation::Add => Ok(add(a, b)),
        Operation::Subtract => Ok(subtract(a, b)),
        Operation::Multiply => Ok(multiply(a, b)),
        Operation::Divide => divide(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const SAMPLES: [f64; 9] = [0.0, 1.0, -1.0, 2.5, -7.25, 10.0, 1e-9, 3.0e12, -0.1];

    #[test_case(2.0, 3.0, 5.0)]
    #[test_case(-5.0, 3.0, -2.0)]
    #[test_case(0.1, 0.2, 0.1 + 0.2 ; "float rounding preserved")]
    fn test_add(a: f64, b: f64, expected: f64) {
        assert_eq!(add(a, b), expected);
    }

    #[test_case(5.0, 2.0, 3.0)]
    #[test_case(2.0, 5.0, -3.0)]
    fn test_subtract(a: f64, b: f64, expected: f64) {
        assert_eq!(subtract(a, b), expected);
    }

    #[test_case(4.0, 6.0, 24.0)]
    #[test_case(-4.0, 0.5, -2.0)]
    fn test_multiply(a: f64, b: f64, expected: f64) {
        assert_eq!(multiply(a, b), expected);
    }

    #[test_case(10.0, 2.0, 5.0)]
    #[test_case(1.0, 4.0, 0.25)]
    #[test_case(0.0, 3.0, 0.0)]
    fn test_divide(a: f64, b: f64, expected: f64) {
        assert_eq!(divide(a, b).unwrap(), expected);
    }

    #[test]
    fn test_divide_by_zero_fails_for_every_dividend() {
        for a in SAMPLES.iter().copied().chain([f64::INFINITY, f64::NAN]) {
            assert_eq!(divide(a, 0.0), Err(CalcError::DivisionByZero));
            assert_eq!(divide(a, -0.0), Err(CalcError::DivisionByZero));
        }
    }

    #[test]
    fn test_tiny_divisor_is_not_zero() {
        assert!(divide(1.0, f64::MIN_POSITIVE).is_ok());
    }

    #[test]
    fn test_add_and_multiply_commute() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(add(a, b), add(b, a));
                assert_eq!(multiply(a, b), multiply(b, a));
            }
        }
    }

    #[test]
    fn test_subtract_and_divide_do_not_commute() {
        assert_ne!(subtract(5.0, 2.0), subtract(2.0, 5.0));
        assert_ne!(divide(10.0, 2.0).unwrap(), divide(2.0, 10.0).unwrap());
    }

    #[test]
    fn test_divide_then_multiply_recovers_dividend() {
        for a in SAMPLES {
            for b in SAMPLES.iter().copied().filter(|b| *b != 0.0) {
                let back = divide(a, b).unwrap() * b;
                let tolerance = 1e-9 * a.abs().max(1.0);
                assert!(
                    (back - a).abs() <= tolerance,
                    "({a} / {b}) * {b} = {back}, expected {a}"
                );
            }
        }
    }

    #[test]
    fn test_operations_are_repeatable() {
        for op in Operation::ALL {
            assert_eq!(evaluate(op, 7.5, 2.5), evaluate(op, 7.5, 2.5));
        }
    }

    #[test]
    fn test_non_finite_values_propagate() {
        assert!(add(f64::NAN, 1.0).is_nan());
        assert_eq!(multiply(f64::INFINITY, 2.0), f64::INFINITY);
        assert!(subtract(f64::INFINITY, f64::INFINITY).is_nan());
        assert_eq!(divide(1.0, f64::INFINITY).unwrap(), 0.0);
    }

    #[test_case(Operation::Add, 2.0, 3.0, 5.0)]
    #[test_case(Operation::Subtract, 5.0, 2.0, 3.0)]
    #[test_case(Operation::Multiply, 4.0, 6.0, 24.0)]
    #[test_case(Operation::Divide, 10.0, 2.0, 5.0)]
    fn test_evaluate_dispatches(op: Operation, a: f64, b: f64, expected: f64) {
        assert_eq!(evaluate(op, a, b).unwrap(), expected);
    }

    #[test]
    fn test_evaluate_divide_by_zero() {
        assert_eq!(
            evaluate(Operation::Divide, 5.0, 0.0),
            Err(CalcError::DivisionByZero)
        );
    }
}
