//! FILENAME: core/parser/src/token.rs
//! PURPOSE: Token definitions for the formula tokenizer.
//! CONTEXT: Tokens are the atomic units produced by the tokenizer and consumed by the grammar.
//! A token sequence never contains whitespace.

/// Tokens recognized by the formula tokenizer.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Token {
    /// Decimal integer literal: 42
    Number(i64),
    /// One of `* / + - :`
    Operator(char),
    /// One uppercase column letter immediately followed by a row index: A0, A12
    Reference { column: char, row: usize },
    /// `(` or `)`
    Punctuation(char),
    /// One or more uppercase letters: SUM, MIN
    FunctionName(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Reference { column, row } => write!(f, "{}{}", column, row),
            Token::Punctuation(p) => write!(f, "{}", p),
            Token::FunctionName(name) => write!(f, "{}", name),
        }
    }
}
