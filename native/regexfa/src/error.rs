//! Errors produced while compiling a regular expression.

use thiserror::Error;

/// Errors returned by the parsing stages of the pipeline.
///
/// Simulation never fails: a string that is not in the language simply
/// yields `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The infix expression can't be rewritten into canonical form, usually
    /// because of unbalanced parentheses or a quantifier without operand.
    #[error("malformed expression at position {position}: {reason}")]
    MalformedExpression {
        /// Index (in chars) of the offending character in the pattern.
        position: usize,
        reason: &'static str,
    },

    /// The postfix token stream doesn't describe exactly one tree.
    #[error("invalid expression: {0}")]
    InvalidExpression(&'static str),

    /// A reserved character was used where a literal symbol was expected.
    #[error("undefined alphabet symbol `{0}`")]
    UndefinedAlphabetSymbol(char),
}

pub type Result<T> = std::result::Result<T, Error>;
