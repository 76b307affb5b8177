//! FILENAME: core/parser/src/combinator.rs
//! PURPOSE: A small, generic parser-combinator library.
//! CONTEXT: Both the tokenizer (over `char`) and the grammar (over `Token`)
//! are assembled from the primitives in this module. A parser is a function
//! from the remaining input slice to an optional `(result, remainder)` pair.
//! `None` is the ordinary "did not match" outcome, not an error.
//!
//! Because the remainder is a sub-slice of the caller's input, every parser
//! can be re-run from any position without shared state, which is what lets
//! `or` retry the second branch on the original input.
//!
//! PRIMITIVES: pure, fail, satisfy, literal, select, end_of_input, lazy
//! COMBINATORS: sequence/followed_by, alternative/or, choice, map, try_map,
//!              many, many1, optional, then, skip, between

use once_cell::unsync::OnceCell;
use std::rc::Rc;

type ParseFn<T, R> = dyn Fn(&[T]) -> Option<(R, &[T])>;

/// A parser over a slice of `T` producing an `R`.
///
/// Cloning is cheap: composed parsers share their constituents through `Rc`.
pub struct Parser<T, R> {
    run: Rc<ParseFn<T, R>>,
}

impl<T, R> Clone for Parser<T, R> {
    fn clone(&self) -> Self {
        Parser {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T: 'static, R: 'static> Parser<T, R> {
    /// Wraps a parse function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[T]) -> Option<(R, &[T])> + 'static,
    {
        Parser { run: Rc::new(f) }
    }

    /// Runs the parser, returning the result and the unconsumed input.
    pub fn parse<'i>(&self, input: &'i [T]) -> Option<(R, &'i [T])> {
        (self.run)(input)
    }

    pub fn map<S: 'static, F>(self, f: F) -> Parser<T, S>
    where
        F: Fn(R) -> S + 'static,
    {
        Parser::new(move |input| self.parse(input).map(|(value, rest)| (f(value), rest)))
    }

    /// Like `map`, but the projection may reject the value, failing the parse.
    pub fn try_map<S: 'static, F>(self, f: F) -> Parser<T, S>
    where
        F: Fn(R) -> Option<S> + 'static,
    {
        Parser::new(move |input| {
            let (value, rest) = self.parse(input)?;
            Some((f(value)?, rest))
        })
    }

    /// Runs `self`, then `other` on the remainder, pairing both results.
    pub fn followed_by<S: 'static>(self, other: Parser<T, S>) -> Parser<T, (R, S)> {
        Parser::new(move |input| {
            let (first, rest) = self.parse(input)?;
            let (second, rest) = other.parse(rest)?;
            Some(((first, second), rest))
        })
    }

    /// Left-biased choice. `other` always sees the original input.
    pub fn or(self, other: Parser<T, R>) -> Parser<T, R> {
        Parser::new(move |input| self.parse(input).or_else(|| other.parse(input)))
    }

    /// Greedy zero-or-more repetition. Never fails.
    ///
    /// An iteration that succeeds without consuming anything ends the
    /// repetition and its result is dropped.
    pub fn many(self) -> Parser<T, Vec<R>> {
        Parser::new(move |input| {
            let mut items = Vec::new();
            let mut remainder = input;
            while let Some((item, rest)) = self.parse(remainder) {
                if rest.len() == remainder.len() {
                    break;
                }
                items.push(item);
                remainder = rest;
            }
            Some((items, remainder))
        })
    }

    /// Greedy one-or-more repetition.
    pub fn many1(self) -> Parser<T, Vec<R>> {
        let tail = self.clone().many();
        self.followed_by(tail).map(|(head, mut tail)| {
            tail.insert(0, head);
            tail
        })
    }

    /// Succeeds with `None` and consumes nothing when `self` fails.
    pub fn optional(self) -> Parser<T, Option<R>> {
        Parser::new(move |input| match self.parse(input) {
            Some((value, rest)) => Some((Some(value), rest)),
            None => Some((None, input)),
        })
    }

    /// Sequences `self` and `next`, keeping only `next`'s result.
    pub fn then<S: 'static>(self, next: Parser<T, S>) -> Parser<T, S> {
        self.followed_by(next).map(|(_, value)| value)
    }

    /// Sequences `self` and `next`, keeping only `self`'s result.
    pub fn skip<S: 'static>(self, next: Parser<T, S>) -> Parser<T, R> {
        self.followed_by(next).map(|(value, _)| value)
    }

    pub fn between<A: 'static, B: 'static>(
        self,
        open: Parser<T, A>,
        close: Parser<T, B>,
    ) -> Parser<T, R> {
        open.then(self).skip(close)
    }
}

/// Matches no input and always yields `value`.
pub fn pure<T: 'static, R: Clone + 'static>(value: R) -> Parser<T, R> {
    Parser::new(move |input| Some((value.clone(), input)))
}

/// Never matches.
pub fn fail<T: 'static, R: 'static>() -> Parser<T, R> {
    Parser::new(|_| None)
}

/// Consumes one item if `predicate` accepts it.
pub fn satisfy<T, P>(predicate: P) -> Parser<T, T>
where
    T: Clone + 'static,
    P: Fn(&T) -> bool + 'static,
{
    Parser::new(move |input| match input.split_first() {
        Some((head, rest)) if predicate(head) => Some((head.clone(), rest)),
        _ => None,
    })
}

/// Consumes one item equal to `expected`.
pub fn literal<T>(expected: T) -> Parser<T, T>
where
    T: Clone + PartialEq + 'static,
{
    satisfy(move |item| *item == expected)
}

/// Consumes one item if `f` projects it to a value.
pub fn select<T, R, F>(f: F) -> Parser<T, R>
where
    T: 'static,
    R: 'static,
    F: Fn(&T) -> Option<R> + 'static,
{
    Parser::new(move |input| {
        let (head, rest) = input.split_first()?;
        Some((f(head)?, rest))
    })
}

/// Succeeds, consuming nothing, only when no input is left.
pub fn end_of_input<T: 'static>() -> Parser<T, ()> {
    Parser::new(|input| if input.is_empty() { Some(((), input)) } else { None })
}

pub fn sequence<T, A, B>(first: Parser<T, A>, second: Parser<T, B>) -> Parser<T, (A, B)>
where
    T: 'static,
    A: 'static,
    B: 'static,
{
    first.followed_by(second)
}

pub fn alternative<T: 'static, R: 'static>(first: Parser<T, R>, second: Parser<T, R>) -> Parser<T, R> {
    first.or(second)
}

/// Left-biased choice over an ordered list of alternatives.
pub fn choice<T, R, I>(parsers: I) -> Parser<T, R>
where
    T: 'static,
    R: 'static,
    I: IntoIterator<Item = Parser<T, R>>,
{
    parsers.into_iter().fold(fail(), alternative)
}

/// Defers building a parser until it is first run.
///
/// Used to break the construction cycle of recursive grammar rules: the rule
/// body refers to itself through `lazy`, so building it terminates.
pub fn lazy<T, R, F>(thunk: F) -> Parser<T, R>
where
    T: 'static,
    R: 'static,
    F: Fn() -> Parser<T, R> + 'static,
{
    let cell: OnceCell<Parser<T, R>> = OnceCell::new();
    Parser::new(move |input| cell.get_or_init(&thunk).parse(input))
}
