//! Parsing of infix regular expressions into syntax trees.
//!
//! The input goes through three stages: [`normalize`] rewrites it into the
//! canonical three-operator form, [`infix_to_postfix`] reorders it by
//! operator precedence, and [`SyntaxTree::build`] assembles the tree.

mod normalize;
mod postfix;
mod tree;

pub use normalize::normalize;
pub use postfix::{infix_to_postfix, precedence};
pub use tree::{ExpressionNode, NodeId, SyntaxTree, build_tree};

/// Alternation operator.
pub const ALTERNATION: char = '|';
/// Explicit concatenation operator.
pub const CONCATENATION: char = '^';
/// Kleene star.
pub const STAR: char = '*';
/// One or more repetitions, desugared into `XX*`.
pub const PLUS: char = '+';
/// Optional, desugared into `(X|ε)`.
pub const OPTIONAL: char = '?';
pub const OPEN_GROUP: char = '(';
pub const CLOSE_GROUP: char = ')';
