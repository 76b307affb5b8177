//! FILENAME: core/parser/src/lib.rs
//! PURPOSE: Library root for the formula parser.
//! CONTEXT: This crate exposes the combinator library, tokenizer, grammar and
//! AST needed to convert formula strings into evaluatable expression trees.
//!
//! PIPELINE: Formula String --> Tokenizer --> Tokens --> Grammar --> AST --> Evaluator
//!
//! SUPPORTED FEATURES:
//! - Integer arithmetic: +, -, *, / (multiplicative binds tighter, left-associative)
//! - Cell references: A0, A12
//! - Function calls over a range: SUM(A0:A2), MIN(A1:A4)
//! - Parentheses for grouping

pub mod ast;
pub mod combinator;
pub mod parser;
pub mod token;
pub mod tokenizer;


// Re-export commonly used types for convenience
pub use ast::{BinaryOperator, Expression};
pub use combinator::Parser;
pub use parser::{parse, parse_tokens, FormulaParser, ParseError, ParseResult};
pub use token::Token;
pub use tokenizer::{tokenize, Tokenization, Tokenizer};
