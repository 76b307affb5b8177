//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the formula engine.
//! CONTEXT: Re-exports public types and modules for use by a host.
//!
//! The context is a single column of cells (A0, A1, ...), each holding one
//! formula. `evaluate_all` turns the parsed column into one result per row;
//! `Sheet` wraps that for a host that edits formulas one cell at a time.

pub mod evaluator;
pub mod functions;
pub mod sheet;
pub mod value;

// Re-export commonly used types at the crate root
pub use evaluator::{evaluate_all, evaluate_formulas, Evaluator};
pub use formula_parser::{parse, BinaryOperator, Expression, ParseError};
pub use functions::BuiltinFunction;
pub use sheet::{Sheet, SheetError};
pub use value::{EvalError, EvalResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integration_test_full_evaluation_workflow() {
        // A0 = 10, A1 = 20, A2 = A0 + A1
        let context = vec![
            Some(parse("10").unwrap()),
            Some(parse("20").unwrap()),
            Some(parse("A0 + A1").unwrap()),
        ];

        let evaluator = Evaluator::new(&context);
        let result = evaluator.evaluate(&parse("A2 * 2").unwrap());
        assert_eq!(result, EvalResult::Int(60));
    }

    #[test]
    fn integration_test_sheet_workflow() {
        let mut sheet = Sheet::new(["1", "2", "3", "SUM(A0:A2)"]);
        assert_eq!(sheet.display_value(3).as_deref(), Some("6"));

        sheet.set_formula(1, "A0 - 5").unwrap();
        assert_eq!(sheet.display_value(3).as_deref(), Some("0"));
    }
}
