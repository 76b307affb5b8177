//! FILENAME: core/engine/src/functions.rs
//! PURPOSE: Builtin aggregate functions applied to range values.
//! CONTEXT: A function call's argument is a range; the evaluator expands it
//! to a list and hands the elements to one of these folds.

use crate::value::{EvalError, EvalResult};

/// Functions callable from a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunction {
    /// Integer sum, starting at 0.
    Sum,
    /// Smallest element, starting at `i64::MAX`.
    Min,
}

impl BuiltinFunction {
    /// Resolves a function name as written in the formula (uppercase).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUM" => Some(BuiltinFunction::Sum),
            "MIN" => Some(BuiltinFunction::Min),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinFunction::Sum => "SUM",
            BuiltinFunction::Min => "MIN",
        }
    }

    /// Folds the elements of a range. The first non-integer element decides
    /// the outcome: an error element is returned as-is, a nested list is
    /// rejected.
    pub fn apply(self, items: &[EvalResult]) -> EvalResult {
        let mut acc: i64 = match self {
            BuiltinFunction::Sum => 0,
            BuiltinFunction::Min => i64::MAX,
        };

        for item in items {
            let value = match item {
                EvalResult::Int(n) => *n,
                EvalResult::Error(e) => return EvalResult::Error(e.clone()),
                EvalResult::List(_) => return EvalResult::Error(EvalError::InvalidOperands),
            };
            acc = match self {
                BuiltinFunction::Sum => match acc.checked_add(value) {
                    Some(sum) => sum,
                    None => return EvalResult::Error(EvalError::Overflow),
                },
                BuiltinFunction::Min => acc.min(value),
            };
        }

        EvalResult::Int(acc)
    }
}
