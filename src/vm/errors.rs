//! Evaluator error types

use crate::lexer::token::Token;
use std::fmt;

#[derive(Debug, Clone)]
pub enum VmError {
    /// A binary operator found fewer than two operands on the stack
    Arity { operator: Token, available: usize },

    /// Integer or float division with a zero divisor
    DivisionByZero { operator: Token },

    /// Integer arithmetic left the `i64` range
    IntegerOverflow { operation: String },

    /// A literal token whose lexeme does not parse as its kind
    InvalidLiteral { token: Token },

    /// A node kind with no evaluation rule (identifiers, keywords, ...)
    UnsupportedToken { token: Token },

    /// The tree produced no value
    EmptyProgram,

    /// More than one value was left on the stack
    UnbalancedStack { remaining: usize },
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::Arity {
                operator,
                available,
            } => {
                write!(
                    f,
                    "Operator '{}' expects 2 operands, found {}",
                    operator.lexeme, available
                )
            }
            VmError::DivisionByZero { operator } => {
                write!(f, "Division by zero in '{}'", operator.lexeme)
            }
            VmError::IntegerOverflow { operation } => {
                write!(f, "Integer overflow in operation: {}", operation)
            }
            VmError::InvalidLiteral { token } => write!(f, "Invalid {}", token),
            VmError::UnsupportedToken { token } => write!(f, "Cannot evaluate {}", token),
            VmError::EmptyProgram => write!(f, "Expression produced no value"),
            VmError::UnbalancedStack { remaining } => {
                write!(f, "Evaluation left {} values on the stack", remaining)
            }
        }
    }
}

impl std::error::Error for VmError {}
