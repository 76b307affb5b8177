//! FILENAME: core/engine/src/sheet.rs
//! PURPOSE: Manages the single column of formulas a host edits.
//! CONTEXT: `Sheet` keeps each row's formula source, its parsed expression
//! and the latest evaluation result side by side. Any edit re-parses the
//! changed row and re-evaluates the whole column; there is no dependency
//! tracking, so every result is always computed against the current formulas.

use formula_parser::{Expression, FormulaParser};
use log::debug;

use crate::evaluator::{evaluate_all, parse_cell, parse_column};
use crate::value::EvalResult;

/// Errors from misusing the sheet model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    #[error("row {row} is out of bounds (sheet has {rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },
}

/// One column of formulas and their results. Rows are 0-based.
#[derive(Clone)]
pub struct Sheet {
    parser: FormulaParser,
    formulas: Vec<String>,
    /// Parsed formulas; `None` where the source is empty or does not parse.
    expressions: Vec<Option<Expression>>,
    results: Vec<EvalResult>,
}

impl Sheet {
    /// Number of rows in a default sheet.
    pub const DEFAULT_ROWS: usize = 9;

    /// Creates a sheet from formula sources and evaluates it.
    pub fn new<I, S>(formulas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parser = FormulaParser::new();
        let formulas: Vec<String> = formulas.into_iter().map(Into::into).collect();
        let expressions = parse_column(&parser, &formulas);
        let mut sheet = Sheet {
            parser,
            formulas,
            expressions,
            results: Vec::new(),
        };
        sheet.recalculate();
        sheet
    }

    /// Creates a sheet of `rows` empty cells.
    pub fn with_rows(rows: usize) -> Self {
        Sheet::new(vec![String::new(); rows])
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn formula(&self, row: usize) -> Option<&str> {
        self.formulas.get(row).map(String::as_str)
    }

    pub fn expression(&self, row: usize) -> Option<&Expression> {
        self.expressions.get(row).and_then(Option::as_ref)
    }

    pub fn result(&self, row: usize) -> Option<&EvalResult> {
        self.results.get(row)
    }

    pub fn results(&self) -> &[EvalResult] {
        &self.results
    }

    /// Replaces the formula in `row` and re-evaluates every row.
    pub fn set_formula(&mut self, row: usize, source: impl Into<String>) -> Result<(), SheetError> {
        let rows = self.len();
        if row >= rows {
            return Err(SheetError::RowOutOfBounds { row, rows });
        }

        let source = source.into();
        self.expressions[row] = parse_cell(&self.parser, row, &source);
        self.formulas[row] = source;
        self.recalculate();
        Ok(())
    }

    /// Appends a row and re-evaluates every row.
    pub fn push_formula(&mut self, source: impl Into<String>) {
        let source = source.into();
        let row = self.len();
        self.expressions.push(parse_cell(&self.parser, row, &source));
        self.formulas.push(source);
        self.recalculate();
    }

    /// The rendered result of `row`, e.g. `6` or `Error: invalid reference`.
    pub fn display_value(&self, row: usize) -> Option<String> {
        self.result(row).map(ToString::to_string)
    }

    /// Text a host shows for `row`: the formula while it is being edited,
    /// its rendered result otherwise.
    pub fn cell_text(&self, row: usize, editing: bool) -> Option<String> {
        if editing {
            self.formula(row).map(str::to_string)
        } else {
            self.display_value(row)
        }
    }

    fn recalculate(&mut self) {
        debug!("recalculating {} rows", self.len());
        self.results = evaluate_all(&self.expressions);
    }
}

impl Default for Sheet {
    /// Rows `A0`..`A8` holding the formulas `1`..`9`.
    fn default() -> Self {
        Sheet::new((1..=Self::DEFAULT_ROWS).map(|n| n.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::EvalError;

    #[test]
    fn default_sheet_counts_up() {
        let sheet = Sheet::default();
        assert_eq!(sheet.len(), Sheet::DEFAULT_ROWS);
        assert_eq!(sheet.formula(0), Some("1"));
        assert_eq!(sheet.result(8), Some(&EvalResult::Int(9)));
    }

    #[test]
    fn edit_recalculates_dependents() {
        let mut sheet = Sheet::new(["1", "A0 * 10"]);
        assert_eq!(sheet.result(1), Some(&EvalResult::Int(10)));

        sheet.set_formula(0, "7").unwrap();
        assert_eq!(sheet.results(), &[EvalResult::Int(7), EvalResult::Int(70)]);
    }

    #[test]
    fn unparseable_formula_is_kept_but_not_evaluated() {
        let mut sheet = Sheet::default();
        sheet.set_formula(2, "2+").unwrap();
        assert_eq!(sheet.formula(2), Some("2+"));
        assert_eq!(sheet.expression(2), None);
        assert_eq!(
            sheet.result(2),
            Some(&EvalResult::Error(EvalError::CouldNotEvaluate))
        );
    }

    #[test]
    fn set_formula_out_of_bounds() {
        let mut sheet = Sheet::with_rows(2);
        assert_eq!(
            sheet.set_formula(5, "1"),
            Err(SheetError::RowOutOfBounds { row: 5, rows: 2 })
        );
        assert_eq!(
            SheetError::RowOutOfBounds { row: 5, rows: 2 }.to_string(),
            "row 5 is out of bounds (sheet has 2 rows)"
        );
    }

    #[test]
    fn push_formula_extends_the_column() {
        let mut sheet = Sheet::new(["2", "3"]);
        sheet.push_formula("SUM(A0:A1)");
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.display_value(2).as_deref(), Some("5"));
    }

    #[test]
    fn cell_text_switches_while_editing() {
        let sheet = Sheet::new(["4", "A9"]);
        assert_eq!(sheet.cell_text(1, true).as_deref(), Some("A9"));
        assert_eq!(
            sheet.cell_text(1, false).as_deref(),
            Some("Error: invalid reference")
        );
        assert_eq!(sheet.cell_text(7, false), None);
    }

    #[test]
    fn empty_sheet() {
        let sheet = Sheet::with_rows(0);
        assert!(sheet.is_empty());
        assert!(sheet.results().is_empty());
    }
}
