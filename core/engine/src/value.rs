//! FILENAME: core/engine/src/value.rs
//! PURPOSE: Defines the values an evaluation pass produces for a cell.
//! CONTEXT: `EvalResult` is what the host renders. Errors are ordinary
//! values and travel through arithmetic, references and functions like any
//! other result. `List` only exists between a range and the aggregate that
//! consumes it.

use serde::{Deserialize, Serialize};

/// Represents the possible errors a cell can evaluate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum EvalError {
    /// Reference outside the context, or to an empty/unparseable slot.
    #[error("invalid reference")]
    InvalidReference,
    /// Unparseable formula, or an expression shape with no meaning.
    #[error("could not evaluate expression")]
    CouldNotEvaluate,
    /// An integer operator or aggregate saw a non-integer operand.
    #[error("invalid operands for integer operator")]
    InvalidOperands,
    /// Descending range, or a range over something other than A-column references.
    #[error("invalid range")]
    InvalidRange,
    /// A function argument that did not evaluate to a list.
    #[error("invalid function argument")]
    InvalidArgument,
    #[error("unknown function {0}")]
    UnknownFunction(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    /// A cell whose evaluation depends on itself.
    #[error("cyclic reference")]
    CyclicReference,
}

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalResult {
    Int(i64),
    /// Values of a range, in ascending row order.
    List(Vec<EvalResult>),
    Error(EvalError),
}

impl EvalResult {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EvalResult::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns true if this result is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, EvalResult::Error(_))
    }
}

impl From<EvalError> for EvalResult {
    fn from(error: EvalError) -> Self {
        EvalResult::Error(error)
    }
}

/// Display form shown in a cell: `42`, `[1, 2, 3]`, `Error: invalid reference`.
impl std::fmt::Display for EvalResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalResult::Int(n) => write!(f, "{}", n),
            EvalResult::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            EvalResult::Error(e) => write!(f, "Error: {}", e),
        }
    }
}
