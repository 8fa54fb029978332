use std::fmt;

/// Reasons an operation can be rejected by the calculator.
/// A rejected operation never touches the value or the history.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    InvalidOperator(String),
    DivisionByZero,
    InvalidOperand(f64),
    NonFiniteResult,
}

impl std::error::Error for EngineError {}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidOperator(op) => write!(f, "operator '{}' is not supported", op),
            EngineError::DivisionByZero => write!(f, "division by zero"),
            EngineError::InvalidOperand(n) => write!(f, "invalid operand: {}", n),
            EngineError::NonFiniteResult => write!(f, "result is out of range"),
        }
    }
}
