//! FILENAME: core/parser/src/parser.rs
//! PURPOSE: Recursive descent grammar that converts a sequence of Tokens into an AST.
//! CONTEXT: This is the second stage of the parsing pipeline. The grammar is
//! assembled from the combinators in `combinator.rs`, running over the
//! tokens produced by the tokenizer.
//!
//! GRAMMAR:
//!   formula    --> sum EOF
//!   sum        --> product ( ("+" | "-") product )*
//!   product    --> primitive ( ("*" | "/") primitive )*
//!   primitive  --> NUMBER | REFERENCE | funcall | "(" sum ")"
//!   funcall    --> FUNCTION_NAME "(" list ")"
//!   list       --> REFERENCE ":" REFERENCE
//!
//! The order of `primitive`'s alternatives matters: a reference must be
//! tried before a function call, and the parenthesized form refers back to
//! `sum` through `lazy`.

use log::debug;

use crate::ast::{BinaryOperator, Expression};
use crate::combinator::{choice, end_of_input, lazy, literal, select, Parser};
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Reasons a formula string does not produce an expression.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("empty formula")]
    Empty,

    #[error("unrecognized input: {remainder:?}")]
    UnrecognizedInput { remainder: String },

    #[error("tokens do not form a complete expression")]
    Syntax,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Tokenizer plus grammar, built once and reused for many formulas.
#[derive(Clone)]
pub struct FormulaParser {
    tokenizer: Tokenizer,
    formula: Parser<Token, Expression>,
}

impl FormulaParser {
    pub fn new() -> Self {
        FormulaParser {
            tokenizer: Tokenizer::new(),
            formula: formula(),
        }
    }

    /// Parses a formula string. Lexical and syntactic failures both end up here.
    pub fn parse(&self, source: &str) -> ParseResult<Expression> {
        let tokenization = self.tokenizer.tokenize(source);
        if !tokenization.is_complete() {
            debug!(
                "formula {:?} stopped tokenizing at {:?}",
                source, tokenization.remainder
            );
            return Err(ParseError::UnrecognizedInput {
                remainder: tokenization.remainder,
            });
        }
        if tokenization.tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        self.parse_tokens(&tokenization.tokens).ok_or_else(|| {
            debug!("formula {:?} is not a complete expression", source);
            ParseError::Syntax
        })
    }

    /// Parses a token sequence; every token must be consumed.
    pub fn parse_tokens(&self, tokens: &[Token]) -> Option<Expression> {
        self.formula.parse(tokens).map(|(expression, _)| expression)
    }
}

impl Default for FormulaParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to parse a formula string directly.
pub fn parse(source: &str) -> ParseResult<Expression> {
    FormulaParser::new().parse(source)
}

/// Convenience function to parse an already tokenized formula.
pub fn parse_tokens(tokens: &[Token]) -> Option<Expression> {
    formula().parse(tokens).map(|(expression, _)| expression)
}

/// Top-level rule: a full expression followed by end of input.
pub fn formula() -> Parser<Token, Expression> {
    expression().skip(end_of_input())
}

/// An expression without the end-of-input requirement.
pub fn expression() -> Parser<Token, Expression> {
    sum()
}

fn sum() -> Parser<Token, Expression> {
    infix(product(), &[BinaryOperator::Add, BinaryOperator::Subtract])
}

fn product() -> Parser<Token, Expression> {
    infix(primitive(), &[BinaryOperator::Multiply, BinaryOperator::Divide])
}

fn primitive() -> Parser<Token, Expression> {
    choice([
        number(),
        reference(),
        function_call(),
        parenthesized(lazy(expression)),
    ])
}

/// `operand (op operand)*`, folded to the left.
fn infix(operand: Parser<Token, Expression>, operators: &[BinaryOperator]) -> Parser<Token, Expression> {
    let symbol = choice(operators.iter().map(|&op| operator(op)));
    let tail = symbol.followed_by(operand.clone()).many();
    operand
        .followed_by(tail)
        .map(|(first, rest)| combine_operands(first, rest))
}

fn combine_operands(first: Expression, rest: Vec<(BinaryOperator, Expression)>) -> Expression {
    rest.into_iter()
        .fold(first, |left, (op, right)| Expression::binary(op, left, right))
}

fn operator(op: BinaryOperator) -> Parser<Token, BinaryOperator> {
    literal(Token::Operator(op.symbol())).map(move |_| op)
}

fn punctuation(symbol: char) -> Parser<Token, Token> {
    literal(Token::Punctuation(symbol))
}

fn parenthesized<R: 'static>(inner: Parser<Token, R>) -> Parser<Token, R> {
    inner.between(punctuation('('), punctuation(')'))
}

fn number() -> Parser<Token, Expression> {
    select(|token: &Token| match token {
        Token::Number(n) => Some(Expression::Number(*n)),
        _ => None,
    })
}

fn reference() -> Parser<Token, Expression> {
    select(|token: &Token| match token {
        Token::Reference { column, row } => Some(Expression::reference(*column, *row)),
        _ => None,
    })
}

fn function_name() -> Parser<Token, String> {
    select(|token: &Token| match token {
        Token::FunctionName(name) => Some(name.clone()),
        _ => None,
    })
}

/// `REFERENCE ":" REFERENCE`, the only place a range is legal.
fn list() -> Parser<Token, Expression> {
    reference()
        .skip(operator(BinaryOperator::Range))
        .followed_by(reference())
        .map(|(start, end)| Expression::binary(BinaryOperator::Range, start, end))
}

fn function_call() -> Parser<Token, Expression> {
    function_name()
        .followed_by(parenthesized(list()))
        .map(|(name, argument)| Expression::function(name, argument))
}
