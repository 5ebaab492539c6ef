//! Symbol types for automata transitions.

use std::fmt;

/// A symbol of the input alphabet.
pub type SymbolId = char;

/// Character used in normalized expressions to denote the empty string.
///
/// It is never matched against input: the Thompson construction turns it
/// into an [`Label::Epsilon`] transition.
pub const EPSILON_MARKER: char = 'ε';

/// Characters with a meaning in the infix syntax. None of them can be used
/// as a literal symbol.
pub const OPERATORS: [char; 7] = ['|', '?', '+', '*', '^', '(', ')'];

/// The label of an automaton transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// Empty transition, taken without consuming input.
    Epsilon,
    /// Transition that consumes one occurrence of the symbol.
    Symbol(SymbolId),
}

impl Label {
    /// Returns the consumed symbol, or `None` for epsilon.
    #[inline]
    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(symbol) => Some(*symbol),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => write!(f, "{EPSILON_MARKER}"),
            Label::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}

/// Check if a label is an epsilon transition.
#[inline]
pub fn is_epsilon(label: Label) -> bool {
    label == Label::Epsilon
}

/// Check if a character is one of the reserved operator characters.
#[inline]
pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}
