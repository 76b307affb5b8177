//! FILENAME: core/parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for formula expressions.
//! CONTEXT: After the tokenizer produces tokens, the grammar converts them
//! into this tree structure. The evaluator then traverses this tree to
//! compute the final result. Every node owns its children; trees are never
//! shared or cyclic.
//!
//! SUPPORTED EXPRESSIONS:
//! - Integer literals: 42
//! - Cell references: A0, A12
//! - Binary operations: +, -, *, /
//! - Ranges: A0:A2 (only as a function argument)
//! - Function calls: SUM(A0:A2), MIN(A1:A4)

/// Represents a parsed formula expression.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    /// An integer literal.
    Number(i64),

    /// A single cell reference like A3. Rows are 0-based and unbounded here;
    /// the evaluator checks them against the context.
    Reference { column: char, row: usize },

    /// A binary operation: left op right. A `Range` operator joins two references.
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// A function applied to a single argument, e.g. SUM(A0:A2).
    FunctionCall {
        name: String,
        argument: Box<Expression>,
    },
}

/// Binary operators for expressions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Range,    // :
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
            BinaryOperator::Range => ':',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Subtract),
            '*' => Some(BinaryOperator::Multiply),
            '/' => Some(BinaryOperator::Divide),
            ':' => Some(BinaryOperator::Range),
            _ => None,
        }
    }

    /// Binding strength; higher binds tighter.
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
            BinaryOperator::Range => 3,
        }
    }
}

impl Expression {
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn reference(column: char, row: usize) -> Self {
        Expression::Reference { column, row }
    }

    pub fn function(name: impl Into<String>, argument: Expression) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            argument: Box::new(argument),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expression::BinaryOp { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Renders formula source text. Parentheses are only emitted where needed
/// to keep precedence and left-associativity, so the output re-parses to
/// the same tree (for non-negative literals).
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{}", n),
            Expression::Reference { column, row } => write!(f, "{}{}", column, row),
            Expression::BinaryOp { op, left, right } => {
                let strength = op.precedence();
                if left.precedence() < strength {
                    write!(f, "({})", left)?;
                } else {
                    write!(f, "{}", left)?;
                }
                write!(f, "{}", op)?;
                // The right operand of a left-associative operator needs
                // parentheses at equal strength too: 1-(2-3).
                if right.precedence() <= strength {
                    write!(f, "({})", right)
                } else {
                    write!(f, "{}", right)
                }
            }
            Expression::FunctionCall { name, argument } => write!(f, "{}({})", name, argument),
        }
    }
}
