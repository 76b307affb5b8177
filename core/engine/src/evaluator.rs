//! FILENAME: core/engine/src/evaluator.rs
//! PURPOSE: Evaluates AST expressions to compute cell values.
//! CONTEXT: After a formula is parsed into an AST, this module traverses
//! the tree against the context (every cell's parsed formula, one per row
//! of column A) and computes the final result.
//!
//! SUPPORTED FEATURES:
//! - Integer literals
//! - A-column references, re-evaluating the referenced cell's formula
//! - Ranges (A0:A2) expanded to lists for aggregate functions
//! - Binary operations: +, -, *, / (checked; overflow and division by zero are errors)
//! - Functions: SUM, MIN
//!
//! Errors are values. Both operands of a binary operator are always
//! evaluated; the left-most error wins. References carry the chain of rows
//! currently being evaluated, so a cell that depends on itself becomes a
//! cyclic-reference error instead of unbounded recursion.

use formula_parser::{BinaryOperator, Expression, FormulaParser};
use log::{debug, trace};

use crate::functions::BuiltinFunction;
use crate::value::{EvalError, EvalResult};

/// The only column a reference may name.
pub const COLUMN: char = 'A';

/// The formula evaluator.
/// Holds a reference to the context for cell lookups.
pub struct Evaluator<'a> {
    /// Parsed formula per row; `None` for an empty or unparseable cell.
    context: &'a [Option<Expression>],
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a [Option<Expression>]) -> Self {
        Evaluator { context }
    }

    /// Evaluates an AST expression and returns the result.
    pub fn evaluate(&self, expr: &Expression) -> EvalResult {
        self.eval(expr, &mut Vec::new())
    }

    /// Evaluates the cell at `row` the way the host shows it: an empty or
    /// unparseable slot is "could not evaluate expression".
    pub fn evaluate_row(&self, row: usize) -> EvalResult {
        match self.context.get(row) {
            Some(Some(expr)) => self.eval(expr, &mut vec![row]),
            Some(None) => EvalResult::Error(EvalError::CouldNotEvaluate),
            None => EvalResult::Error(EvalError::InvalidReference),
        }
    }

    /// Evaluates every row of the context, in row order.
    pub fn evaluate_all(&self) -> Vec<EvalResult> {
        (0..self.context.len())
            .map(|row| {
                let result = self.evaluate_row(row);
                trace!("A{} = {}", row, result);
                result
            })
            .collect()
    }

    fn eval(&self, expr: &Expression, visiting: &mut Vec<usize>) -> EvalResult {
        match expr {
            Expression::Number(n) => EvalResult::Int(*n),
            Expression::Reference { column, row } if *column == COLUMN => {
                self.eval_reference(*row, visiting)
            }
            Expression::BinaryOp {
                op: BinaryOperator::Range,
                left,
                right,
            } => self.eval_range(left, right, visiting),
            Expression::BinaryOp { op, left, right } => {
                self.eval_arithmetic(*op, left, right, visiting)
            }
            Expression::FunctionCall { name, argument } => {
                self.eval_function(name, argument, visiting)
            }
            _ => {
                trace!("cannot evaluate {}", expr);
                EvalResult::Error(EvalError::CouldNotEvaluate)
            }
        }
    }

    /// Re-evaluates the formula in `row` against the same context.
    fn eval_reference(&self, row: usize, visiting: &mut Vec<usize>) -> EvalResult {
        if visiting.contains(&row) {
            trace!("cycle through A{}: {:?}", row, visiting);
            return EvalResult::Error(EvalError::CyclicReference);
        }

        let expr = match self.context.get(row) {
            Some(Some(expr)) => expr,
            _ => {
                trace!("A{} is outside the context or holds no formula", row);
                return EvalResult::Error(EvalError::InvalidReference);
            }
        };

        visiting.push(row);
        let result = self.eval(expr, visiting);
        visiting.pop();
        result
    }

    /// Expands `A<start>:A<end>` to the list of those cells' values.
    fn eval_range(
        &self,
        start: &Expression,
        end: &Expression,
        visiting: &mut Vec<usize>,
    ) -> EvalResult {
        let (start_row, end_row) = match (start, end) {
            (
                Expression::Reference { column: c1, row: r1 },
                Expression::Reference { column: c2, row: r2 },
            ) if *c1 == COLUMN && *c2 == COLUMN && r1 <= r2 => (*r1, *r2),
            _ => return EvalResult::Error(EvalError::InvalidRange),
        };

        if end_row >= self.context.len() {
            return EvalResult::Error(EvalError::InvalidReference);
        }

        let values = (start_row..=end_row)
            .map(|row| self.eval_reference(row, visiting))
            .collect();
        EvalResult::List(values)
    }

    fn eval_arithmetic(
        &self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
        visiting: &mut Vec<usize>,
    ) -> EvalResult {
        let left_val = self.eval(left, visiting);
        let right_val = self.eval(right, visiting);

        match (left_val, right_val) {
            (EvalResult::Error(e), _) | (_, EvalResult::Error(e)) => EvalResult::Error(e),
            (EvalResult::Int(l), EvalResult::Int(r)) => match apply_integer(op, l, r) {
                Ok(n) => EvalResult::Int(n),
                Err(e) => EvalResult::Error(e),
            },
            _ => EvalResult::Error(EvalError::InvalidOperands),
        }
    }

    /// Evaluates a function call.
    fn eval_function(
        &self,
        name: &str,
        argument: &Expression,
        visiting: &mut Vec<usize>,
    ) -> EvalResult {
        let items = match self.eval(argument, visiting) {
            EvalResult::List(items) => items,
            EvalResult::Error(e) => return EvalResult::Error(e),
            EvalResult::Int(_) => return EvalResult::Error(EvalError::InvalidArgument),
        };

        match BuiltinFunction::from_name(name) {
            Some(function) => function.apply(&items),
            None => EvalResult::Error(EvalError::UnknownFunction(name.to_string())),
        }
    }
}

/// Integer arithmetic. Division truncates toward zero.
fn apply_integer(op: BinaryOperator, l: i64, r: i64) -> Result<i64, EvalError> {
    let result = match op {
        BinaryOperator::Add => l.checked_add(r),
        BinaryOperator::Subtract => l.checked_sub(r),
        BinaryOperator::Multiply => l.checked_mul(r),
        BinaryOperator::Divide => {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            l.checked_div(r)
        }
        BinaryOperator::Range => return Err(EvalError::InvalidOperands),
    };
    result.ok_or(EvalError::Overflow)
}

/// Evaluates every formula slot against the whole context, in row order.
pub fn evaluate_all(context: &[Option<Expression>]) -> Vec<EvalResult> {
    Evaluator::new(context).evaluate_all()
}

/// Parses each source string and evaluates them as one column.
/// Unparseable formulas become empty slots.
pub fn evaluate_formulas<S: AsRef<str>>(sources: &[S]) -> Vec<EvalResult> {
    let context = parse_column(&FormulaParser::new(), sources);
    evaluate_all(&context)
}

pub(crate) fn parse_column<S: AsRef<str>>(
    parser: &FormulaParser,
    sources: &[S],
) -> Vec<Option<Expression>> {
    sources
        .iter()
        .enumerate()
        .map(|(row, source)| parse_cell(parser, row, source.as_ref()))
        .collect()
}

pub(crate) fn parse_cell(parser: &FormulaParser, row: usize, source: &str) -> Option<Expression> {
    match parser.parse(source) {
        Ok(expr) => Some(expr),
        Err(e) => {
            debug!("A{}: {:?} does not parse: {}", row, source, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: i64) -> Expression {
        Expression::Number(n)
    }

    fn a(row: usize) -> Expression {
        Expression::reference('A', row)
    }

    fn bin(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
        Expression::binary(op, left, right)
    }

    fn make_context() -> Vec<Option<Expression>> {
        // A0 = 10, A1 = 20, A2 = 30, A3 = (empty)
        vec![Some(num(10)), Some(num(20)), Some(num(30)), None]
    }

    #[test]
    fn test_literal_number() {
        let eval = Evaluator::new(&[]);
        assert_eq!(eval.evaluate(&num(42)), EvalResult::Int(42));
    }

    #[test]
    fn test_cell_ref() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        assert_eq!(eval.evaluate(&a(1)), EvalResult::Int(20));
    }

    #[test]
    fn test_cell_ref_chain() {
        // A0 = 5, A1 = A0 * 2, A2 = A1 + A0
        let context = vec![
            Some(num(5)),
            Some(bin(BinaryOperator::Multiply, a(0), num(2))),
            Some(bin(BinaryOperator::Add, a(1), a(0))),
        ];
        let eval = Evaluator::new(&context);
        assert_eq!(eval.evaluate(&a(2)), EvalResult::Int(15));
    }

    #[test]
    fn test_invalid_references() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        assert_eq!(eval.evaluate(&a(9)), EvalResult::Error(EvalError::InvalidReference));
        assert_eq!(eval.evaluate(&a(3)), EvalResult::Error(EvalError::InvalidReference));
    }

    #[test]
    fn test_other_column_is_not_evaluable() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        assert_eq!(
            eval.evaluate(&Expression::reference('B', 0)),
            EvalResult::Error(EvalError::CouldNotEvaluate)
        );
    }

    #[test]
    fn test_arithmetic() {
        let eval = Evaluator::new(&[]);
        let cases = [
            (BinaryOperator::Add, 7, 3, 10),
            (BinaryOperator::Subtract, 7, 3, 4),
            (BinaryOperator::Multiply, 7, 3, 21),
            (BinaryOperator::Divide, 7, 3, 2),
            (BinaryOperator::Divide, -7, 2, -3),
        ];
        for (op, l, r, expected) in cases {
            assert_eq!(eval.evaluate(&bin(op, num(l), num(r))), EvalResult::Int(expected));
        }
    }

    #[test]
    fn test_division_by_zero() {
        let eval = Evaluator::new(&[]);
        let expr = bin(BinaryOperator::Divide, num(10), num(0));
        assert_eq!(eval.evaluate(&expr), EvalResult::Error(EvalError::DivisionByZero));
    }

    #[test]
    fn test_overflow() {
        let eval = Evaluator::new(&[]);
        let expr = bin(BinaryOperator::Multiply, num(i64::MAX), num(2));
        assert_eq!(eval.evaluate(&expr), EvalResult::Error(EvalError::Overflow));
        let expr = bin(BinaryOperator::Divide, num(i64::MIN), num(-1));
        assert_eq!(eval.evaluate(&expr), EvalResult::Error(EvalError::Overflow));
    }

    #[test]
    fn test_left_error_wins() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        let expr = bin(
            BinaryOperator::Add,
            a(9),
            bin(BinaryOperator::Divide, num(1), num(0)),
        );
        assert_eq!(eval.evaluate(&expr), EvalResult::Error(EvalError::InvalidReference));
    }

    #[test]
    fn test_list_operand_is_rejected() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        let expr = bin(
            BinaryOperator::Add,
            num(1),
            bin(BinaryOperator::Range, a(0), a(1)),
        );
        assert_eq!(eval.evaluate(&expr), EvalResult::Error(EvalError::InvalidOperands));
    }

    #[test]
    fn test_range_expands_in_order() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        let expr = bin(BinaryOperator::Range, a(0), a(2));
        assert_eq!(
            eval.evaluate(&expr),
            EvalResult::List(vec![
                EvalResult::Int(10),
                EvalResult::Int(20),
                EvalResult::Int(30)
            ])
        );
    }

    #[test]
    fn test_bad_ranges() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        let descending = bin(BinaryOperator::Range, a(2), a(0));
        assert_eq!(eval.evaluate(&descending), EvalResult::Error(EvalError::InvalidRange));
        let mixed = bin(BinaryOperator::Range, a(0), Expression::reference('B', 2));
        assert_eq!(eval.evaluate(&mixed), EvalResult::Error(EvalError::InvalidRange));
        let literal = bin(BinaryOperator::Range, num(0), a(2));
        assert_eq!(eval.evaluate(&literal), EvalResult::Error(EvalError::InvalidRange));
        let past_end = bin(BinaryOperator::Range, a(0), a(4));
        assert_eq!(eval.evaluate(&past_end), EvalResult::Error(EvalError::InvalidReference));
    }

    #[test]
    fn test_sum_function() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        let expr = Expression::function("SUM", bin(BinaryOperator::Range, a(0), a(2)));
        assert_eq!(eval.evaluate(&expr), EvalResult::Int(60));
    }

    #[test]
    fn test_sum_over_empty_cell_fails() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        let expr = Expression::function("SUM", bin(BinaryOperator::Range, a(0), a(3)));
        assert_eq!(eval.evaluate(&expr), EvalResult::Error(EvalError::InvalidReference));
    }

    #[test]
    fn test_unknown_function() {
        let context = make_context();
        let eval = Evaluator::new(&context);
        let expr = Expression::function("AVG", bin(BinaryOperator::Range, a(0), a(2)));
        assert_eq!(
            eval.evaluate(&expr),
            EvalResult::Error(EvalError::UnknownFunction("AVG".to_string()))
        );
    }

    #[test]
    fn test_non_list_argument() {
        let eval = Evaluator::new(&[]);
        let expr = Expression::function("SUM", num(3));
        assert_eq!(eval.evaluate(&expr), EvalResult::Error(EvalError::InvalidArgument));
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let context = vec![Some(bin(BinaryOperator::Add, a(0), num(1)))];
        assert_eq!(
            evaluate_all(&context),
            vec![EvalResult::Error(EvalError::CyclicReference)]
        );
    }

    #[test]
    fn test_indirect_cycle_through_range() {
        // A0 = SUM(A0:A1) includes itself
        let context = vec![
            Some(Expression::function("SUM", bin(BinaryOperator::Range, a(0), a(1)))),
            Some(num(1)),
        ];
        assert_eq!(
            evaluate_all(&context),
            vec![EvalResult::Error(EvalError::CyclicReference), EvalResult::Int(1)]
        );
    }

    #[test]
    fn test_repeated_reference_is_not_a_cycle() {
        // A1 = A0 + A0 visits A0 twice, but never while it is still open
        let context = vec![Some(num(4)), Some(bin(BinaryOperator::Add, a(0), a(0)))];
        assert_eq!(evaluate_all(&context), vec![EvalResult::Int(4), EvalResult::Int(8)]);
    }

    #[test]
    fn test_evaluate_all_marks_empty_slots() {
        let results = evaluate_all(&make_context());
        assert_eq!(results[0], EvalResult::Int(10));
        assert_eq!(results[3], EvalResult::Error(EvalError::CouldNotEvaluate));
    }

    #[test]
    fn test_evaluate_formulas() {
        let results = evaluate_formulas(&["1", "A0 + 1", "2+", "SUM(A0:A1)"]);
        assert_eq!(
            results,
            vec![
                EvalResult::Int(1),
                EvalResult::Int(2),
                EvalResult::Error(EvalError::CouldNotEvaluate),
                EvalResult::Int(3),
            ]
        );
    }
}
