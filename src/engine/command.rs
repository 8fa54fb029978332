use std::fmt;
use std::str::FromStr;

use super::error::EngineError;

/// One of the four arithmetic operators the calculator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// The operator that undoes this one for the same operand
    pub fn inverse(&self) -> Operator {
        match self {
            Operator::Add => Operator::Subtract,
            Operator::Subtract => Operator::Add,
            Operator::Multiply => Operator::Divide,
            Operator::Divide => Operator::Multiply,
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

impl FromStr for Operator {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Operator::from_char(c).ok_or_else(|| EngineError::InvalidOperator(trimmed.to_string()))
            }
            _ => Err(EngineError::InvalidOperator(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A reversible arithmetic step.
///
/// Both directions are pure functions of the value they are handed, so a
/// command can be replayed against whatever the accumulator holds when
/// undo/redo reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub operator: Operator,
    pub operand: f64,
}

impl Command {
    /// Build a command, rejecting operands that would leave the value non-finite
    pub fn new(operator: Operator, operand: f64) -> Result<Self, EngineError> {
        if !operand.is_finite() {
            return Err(EngineError::InvalidOperand(operand));
        }
        if operator == Operator::Divide && operand == 0.0 {
            return Err(EngineError::DivisionByZero);
        }
        Ok(Self { operator, operand })
    }

    pub fn forward(&self, value: f64) -> f64 {
        self.operator.apply(value, self.operand)
    }

    pub fn inverse(&self, value: f64) -> f64 {
        self.operator.inverse().apply(value, self.operand)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.operand)
    }
}
