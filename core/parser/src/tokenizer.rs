//! FILENAME: core/parser/src/tokenizer.rs
//! PURPOSE: Scans a raw formula string and produces a sequence of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. Every rule is
//! built from the combinators in `combinator.rs`, running over the formula's
//! characters.
//!
//! RULES (tried in this order at each position, after skipping whitespace):
//! 1. Decimal integer literal:  42
//! 2. Operator:                 * / + - :
//! 3. Cell reference:           A12 (one uppercase letter, then digits)
//! 4. Punctuation:              ( )
//! 5. Function name:            SUM (one or more uppercase letters)
//!
//! Reference comes before function name: "A1" must not lex as the name "A"
//! followed by the number 1. A run of characters that matches no rule stops
//! tokenization; what is left is reported as the remainder.

use crate::combinator::{choice, satisfy, Parser};
use crate::token::Token;

const OPERATORS: &[char] = &['*', '/', '+', '-', ':'];
const PUNCTUATION: &[char] = &['(', ')'];

/// Output of a tokenizer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenization {
    pub tokens: Vec<Token>,
    /// Source text no rule could consume (trailing whitespace excluded).
    pub remainder: String,
}

impl Tokenization {
    /// True when the whole source was turned into tokens.
    pub fn is_complete(&self) -> bool {
        self.remainder.is_empty()
    }
}

/// Character-level grammar producing tokens.
#[derive(Clone)]
pub struct Tokenizer {
    tokens: Parser<char, Vec<Token>>,
}

impl Tokenizer {
    pub fn new() -> Self {
        let token = whitespace().then(token());
        Tokenizer {
            tokens: token.many().skip(whitespace()),
        }
    }

    /// Tokenizes `source`. Never fails; unrecognized input ends up in the remainder.
    pub fn tokenize(&self, source: &str) -> Tokenization {
        let chars: Vec<char> = source.chars().collect();
        // `many` never fails, so the fallback is unreachable in practice.
        let (tokens, rest) = self.tokens.parse(&chars).unwrap_or((Vec::new(), &chars[..]));
        Tokenization {
            tokens,
            remainder: rest.iter().collect(),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function returning only the tokens of `source`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new().tokenize(source).tokens
}

fn whitespace() -> Parser<char, Vec<char>> {
    satisfy(|c: &char| c.is_whitespace()).many()
}

fn digits() -> Parser<char, String> {
    satisfy(|c: &char| c.is_ascii_digit())
        .many1()
        .map(|digits| digits.into_iter().collect())
}

fn uppercase() -> Parser<char, char> {
    satisfy(|c: &char| c.is_ascii_uppercase())
}

fn token() -> Parser<char, Token> {
    choice([number(), operator(), reference(), punctuation(), function_name()])
}

fn number() -> Parser<char, Token> {
    digits().try_map(|text| text.parse::<i64>().ok().map(Token::Number))
}

fn operator() -> Parser<char, Token> {
    satisfy(|c: &char| OPERATORS.contains(c)).map(Token::Operator)
}

fn reference() -> Parser<char, Token> {
    uppercase()
        .followed_by(digits())
        .try_map(|(column, row)| {
            let row = row.parse::<usize>().ok()?;
            Some(Token::Reference { column, row })
        })
}

fn punctuation() -> Parser<char, Token> {
    satisfy(|c: &char| PUNCTUATION.contains(c)).map(Token::Punctuation)
}

fn function_name() -> Parser<char, Token> {
    uppercase()
        .many1()
        .map(|letters| Token::FunctionName(letters.into_iter().collect()))
}
