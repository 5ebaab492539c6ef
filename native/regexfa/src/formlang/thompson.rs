//! Thompson's construction of an ε-NFA from a syntax tree.

use crate::formlang::epsilon_nfa::EpsilonNFA;
use crate::formlang::state::StateId;
use crate::formlang::symbol::Label;
use crate::syntax::{ExpressionNode, SyntaxTree};
use log::debug;

/// A partial NFA with one entry and one exit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fragment {
    start: StateId,
    end: StateId,
}

/// Compiles a syntax tree into an ε-NFA.
///
/// Every node becomes one fragment, composed from the fragments of its
/// children with epsilon transitions:
///
/// * literal `a`: `start -a-> end`
/// * `ε`: `start -ε-> end`
/// * `X*`: `start -ε-> X.start`, `start -ε-> end`, `X.end -ε-> X.start`,
///   `X.end -ε-> end`
/// * `X|Y`: `start -ε-> X.start`, `start -ε-> Y.start`, `X.end -ε-> end`,
///   `Y.end -ε-> end`
/// * `X^Y`: `X.end -ε-> Y.start`, spanning from `X.start` to `Y.end`
///
/// Only the end state of the root fragment is final. Nodes are visited in
/// arena order, where children precede their parents, so no recursion is
/// involved regardless of how deep the tree is. The epsilon closures of the
/// result are precomputed.
pub fn compile_nfa(tree: &SyntaxTree) -> EpsilonNFA {
    let mut nfa = EpsilonNFA::new();
    let mut fragments: Vec<Fragment> = Vec::with_capacity(tree.len());

    for node in tree.nodes() {
        let fragment = match *node {
            ExpressionNode::Literal(symbol) => {
                let fragment = new_fragment(&mut nfa);
                nfa.add_transition(fragment.start, Label::Symbol(symbol), fragment.end);
                fragment
            }
            ExpressionNode::Epsilon => {
                let fragment = new_fragment(&mut nfa);
                nfa.add_epsilon_transition(fragment.start, fragment.end);
                fragment
            }
            ExpressionNode::Star(inner) => {
                let inner = fragments[inner];
                let fragment = new_fragment(&mut nfa);
                nfa.add_epsilon_transition(fragment.start, inner.start);
                nfa.add_epsilon_transition(fragment.start, fragment.end);
                nfa.add_epsilon_transition(inner.end, inner.start);
                nfa.add_epsilon_transition(inner.end, fragment.end);
                fragment
            }
            ExpressionNode::Alternation(left, right) => {
                let (left, right) = (fragments[left], fragments[right]);
                let fragment = new_fragment(&mut nfa);
                nfa.add_epsilon_transition(fragment.start, left.start);
                nfa.add_epsilon_transition(fragment.start, right.start);
                nfa.add_epsilon_transition(left.end, fragment.end);
                nfa.add_epsilon_transition(right.end, fragment.end);
                fragment
            }
            ExpressionNode::Concatenation(left, right) => {
                let (left, right) = (fragments[left], fragments[right]);
                nfa.add_epsilon_transition(left.end, right.start);
                Fragment {
                    start: left.start,
                    end: right.end,
                }
            }
        };
        fragments.push(fragment);
    }

    if let Some(root) = fragments.last() {
        nfa.set_start_state(root.start);
        nfa.set_final(root.end, true);
    }

    nfa.compute_epsilon_closures();

    debug!(
        "thompson construction: {} nodes -> {} states",
        tree.len(),
        nfa.num_states()
    );

    nfa
}

fn new_fragment(nfa: &mut EpsilonNFA) -> Fragment {
    Fragment {
        start: nfa.add_state(),
        end: nfa.add_state(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build_tree;

    fn nfa_for(postfix: &str) -> EpsilonNFA {
        compile_nfa(&build_tree(postfix).unwrap())
    }

    #[test]
    fn test_literal() {
        let nfa = nfa_for("a");
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.start_state(), Some(0));
        assert_eq!(nfa.final_states().to_vec(), vec![1]);
        assert_eq!(
            nfa.transitions().collect::<Vec<_>>(),
            vec![(0, Label::Symbol('a'), 1)]
        );
    }

    #[test]
    fn test_epsilon_leaf() {
        let nfa = nfa_for("ε");
        assert_eq!(
            nfa.transitions().collect::<Vec<_>>(),
            vec![(0, Label::Epsilon, 1)]
        );
        assert!(nfa.alphabet().is_empty());
        assert!(nfa.accepts(""));
        assert!(!nfa.accepts("ε"));
    }

    #[test]
    fn test_star() {
        let nfa = nfa_for("a*");
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(nfa.start_state(), Some(2));
        assert_eq!(nfa.final_states().to_vec(), vec![3]);
        assert_eq!(nfa.num_epsilon_transitions(), 4);

        let start = nfa.state(2).unwrap();
        assert_eq!(start.targets(Label::Epsilon).map(|s| s.to_vec()), Some(vec![0, 3]));
        let inner_end = nfa.state(1).unwrap();
        assert!(!inner_end.is_final());
        assert_eq!(inner_end.targets(Label::Epsilon).map(|s| s.to_vec()), Some(vec![0, 3]));
    }

    #[test]
    fn test_alternation() {
        let nfa = nfa_for("ab|");
        assert_eq!(nfa.num_states(), 6);
        assert_eq!(nfa.start_state(), Some(4));
        assert_eq!(nfa.final_states().to_vec(), vec![5]);
        assert_eq!(nfa.num_epsilon_transitions(), 4);
    }

    #[test]
    fn test_concatenation() {
        let nfa = nfa_for("ab^");
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(nfa.start_state(), Some(0));
        assert_eq!(nfa.final_states().to_vec(), vec![3]);
        assert_eq!(
            nfa.state(1).unwrap().targets(Label::Epsilon).map(|s| s.to_vec()),
            Some(vec![2])
        );
    }

    #[test]
    fn test_single_final_state() {
        let nfa = nfa_for("ab|*a^b^b^");
        assert_eq!(nfa.final_states().len(), 1);
        let finals = nfa.states().iter().filter(|state| state.is_final()).count();
        assert_eq!(finals, 1);
        assert!(nfa.accepts("abb"));
        assert!(nfa.accepts("babb"));
        assert!(!nfa.accepts("ab"));
    }

    #[test]
    fn test_deep_tree() {
        let postfix = format!("a{}", "*".repeat(1_000));
        let nfa = nfa_for(&postfix);
        assert_eq!(nfa.num_states(), 2_002);
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aaa"));
    }
}
