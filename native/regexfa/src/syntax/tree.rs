use crate::error::{Error, Result};
use crate::formlang::{EPSILON_MARKER, is_operator};
use crate::syntax::{ALTERNATION, CONCATENATION, STAR};
use std::fmt;

/// Index of a node in the arena of its [`SyntaxTree`].
pub type NodeId = usize;

/// A node of the syntax tree.
///
/// Literals have no children, `*` has one and `|`/`^` have two, which the
/// variants enforce by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionNode {
    Literal(char),
    /// The empty string, written `ε`.
    Epsilon,
    Star(NodeId),
    Alternation(NodeId, NodeId),
    Concatenation(NodeId, NodeId),
}

impl ExpressionNode {
    /// The symbol or operator this node was built from.
    pub fn value(&self) -> char {
        match self {
            ExpressionNode::Literal(c) => *c,
            ExpressionNode::Epsilon => EPSILON_MARKER,
            ExpressionNode::Star(_) => STAR,
            ExpressionNode::Alternation(..) => ALTERNATION,
            ExpressionNode::Concatenation(..) => CONCATENATION,
        }
    }

    /// Children in order (left before right).
    pub fn children(&self) -> Vec<NodeId> {
        match *self {
            ExpressionNode::Literal(_) | ExpressionNode::Epsilon => vec![],
            ExpressionNode::Star(child) => vec![child],
            ExpressionNode::Alternation(left, right)
            | ExpressionNode::Concatenation(left, right) => vec![left, right],
        }
    }
}

/// An expression tree.
///
/// Nodes are stored in the order they were created from the postfix
/// sequence, which means that every node comes after its children and the
/// root is the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<ExpressionNode>,
}

impl SyntaxTree {
    /// Builds the tree for a postfix token sequence.
    ///
    /// Literals push a leaf, `*` wraps the top of the stack and `|`/`^` wrap
    /// the two topmost nodes (the top one being the right child). Exactly one
    /// node must be left on the stack at the end.
    pub fn build(postfix: &str) -> Result<Self> {
        let mut nodes = Vec::with_capacity(postfix.len());
        let mut stack: Vec<NodeId> = Vec::new();

        for c in postfix.chars() {
            let node = match c {
                STAR => {
                    let child = stack
                        .pop()
                        .ok_or(Error::InvalidExpression("`*` without operand"))?;
                    ExpressionNode::Star(child)
                }
                ALTERNATION | CONCATENATION => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(Error::InvalidExpression(
                            "binary operator with less than two operands",
                        ));
                    };
                    if c == ALTERNATION {
                        ExpressionNode::Alternation(left, right)
                    } else {
                        ExpressionNode::Concatenation(left, right)
                    }
                }
                EPSILON_MARKER => ExpressionNode::Epsilon,
                _ if is_operator(c) => return Err(Error::UndefinedAlphabetSymbol(c)),
                _ => ExpressionNode::Literal(c),
            };
            stack.push(nodes.len());
            nodes.push(node);
        }

        match stack.len() {
            0 => Err(Error::InvalidExpression("empty expression")),
            1 => Ok(Self { nodes }),
            _ => Err(Error::InvalidExpression("more than one root")),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> Option<&ExpressionNode> {
        self.nodes.get(id)
    }

    /// All nodes, children always before their parents.
    pub fn nodes(&self) -> &[ExpressionNode] {
        &self.nodes
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`, a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Writes the tree as a fully parenthesized infix expression.
impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered: Vec<String> = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let text = match *node {
                ExpressionNode::Literal(c) => c.to_string(),
                ExpressionNode::Epsilon => EPSILON_MARKER.to_string(),
                ExpressionNode::Star(child) => format!("{}{STAR}", rendered[child]),
                ExpressionNode::Alternation(left, right)
                | ExpressionNode::Concatenation(left, right) => format!(
                    "({}{}{})",
                    rendered[left],
                    node.value(),
                    rendered[right]
                ),
            };
            rendered.push(text);
        }

        match rendered.last() {
            Some(root) => write!(f, "{root}"),
            None => Ok(()),
        }
    }
}

/// Builds the syntax tree for a postfix token sequence.
pub fn build_tree(postfix: &str) -> Result<SyntaxTree> {
    SyntaxTree::build(postfix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal() {
        let tree = build_tree("a").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(tree.root()), Some(&ExpressionNode::Literal('a')));
        assert!(tree.node(tree.root()).unwrap().children().is_empty());
    }

    #[test]
    fn test_operand_order() {
        let tree = build_tree("ab^").unwrap();
        assert_eq!(tree.nodes(), &[
            ExpressionNode::Literal('a'),
            ExpressionNode::Literal('b'),
            ExpressionNode::Concatenation(0, 1),
        ]);

        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.value(), '^');
        assert_eq!(root.children(), vec![0, 1]);
    }

    #[test]
    fn test_star_and_epsilon() {
        let tree = build_tree("aε|*").unwrap();
        assert_eq!(tree.nodes(), &[
            ExpressionNode::Literal('a'),
            ExpressionNode::Epsilon,
            ExpressionNode::Alternation(0, 1),
            ExpressionNode::Star(2),
        ]);
        assert_eq!(tree.to_string(), "(a|ε)*");
    }

    #[test]
    fn test_display() {
        let tree = build_tree("ab|*a^b^b^").unwrap();
        assert_eq!(tree.to_string(), "((((a|b)*^a)^b)^b)");
    }

    #[test]
    fn test_children_precede_parents() {
        let tree = build_tree("ab|c*^de^|").unwrap();
        for (id, node) in tree.nodes().iter().enumerate() {
            assert!(node.children().iter().all(|&child| child < id));
        }
    }

    #[test]
    fn test_invalid_expressions() {
        assert_eq!(
            build_tree(""),
            Err(Error::InvalidExpression("empty expression"))
        );
        assert_eq!(
            build_tree("*"),
            Err(Error::InvalidExpression("`*` without operand"))
        );
        assert_eq!(
            build_tree("a|"),
            Err(Error::InvalidExpression(
                "binary operator with less than two operands"
            ))
        );
        assert_eq!(
            build_tree("ab"),
            Err(Error::InvalidExpression("more than one root"))
        );
    }

    #[test]
    fn test_reserved_symbols() {
        assert_eq!(build_tree("ab|("), Err(Error::UndefinedAlphabetSymbol('(')));
        assert_eq!(build_tree("a+"), Err(Error::UndefinedAlphabetSymbol('+')));
    }
}
