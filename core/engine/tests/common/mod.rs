//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the engine integration tests.

#![allow(dead_code)]

use formula_engine::{evaluate_all, parse, EvalResult, Expression};

/// Parses every formula; unparseable ones become empty slots.
pub fn context(formulas: &[&str]) -> Vec<Option<Expression>> {
    formulas.iter().map(|source| parse(source).ok()).collect()
}

/// Evaluates `formula` against a column holding `formulas`.
pub fn eval_in(formulas: &[&str], formula: &str) -> EvalResult {
    let mut sources = formulas.to_vec();
    sources.push(formula);
    let mut results = evaluate_all(&context(&sources));
    results.pop().unwrap_or_else(|| panic!("no result for {:?}", formula))
}

/// Evaluates a standalone formula against an empty column.
pub fn eval(formula: &str) -> EvalResult {
    eval_in(&[], formula)
}
