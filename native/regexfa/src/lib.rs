/*! Regular expressions compiled into finite automata.

A pattern goes through a pipeline of independent stages, each one available
on its own:

1. [`normalize`] rewrites `+`, `?` and implicit concatenation so that only
   alternation (`|`), concatenation (`^`) and Kleene star (`*`) are left.
2. [`infix_to_postfix`] reorders the expression by operator precedence.
3. [`build_tree`] builds the syntax tree from the postfix form.
4. [`compile_nfa`] builds an ε-NFA with Thompson's construction.
5. [`determinize`] turns the NFA into a DFA by subset construction.
6. [`minimize`] merges equivalent DFA states.

[`simulate_nfa`] and [`simulate_dfa`] decide whether a string belongs to
the language of an automaton. [`Regex`] runs the whole pipeline.

Symbols are single characters other than `| ? + * ^ ( )` and `ε`, which
stands for the empty string.

```
use regexfa::{build_tree, compile_nfa, determinize, infix_to_postfix, minimize, normalize};

let postfix = infix_to_postfix(&normalize("a?b").unwrap());
let nfa = compile_nfa(&build_tree(&postfix).unwrap());
let dfa = minimize(&determinize(&nfa));

assert!(regexfa::simulate_nfa(&nfa, "ab"));
assert!(regexfa::simulate_dfa(&dfa, "b"));
assert!(!regexfa::simulate_dfa(&dfa, "aab"));
```
*/

pub mod error;
pub mod formlang;
pub mod regex;
pub mod syntax;

#[cfg(feature = "python")]
mod python_bindings;


pub use error::{Error, Result};
pub use formlang::{DFA, EpsilonNFA, StateId, StateSet, compile_nfa, simulate_dfa, simulate_nfa};
pub use regex::{Regex, RegexBuilder};
pub use syntax::{SyntaxTree, build_tree, infix_to_postfix, normalize};

/// Converts an NFA into an equivalent DFA (subset construction).
pub fn determinize(nfa: &EpsilonNFA) -> DFA {
    formlang::subset_construction(nfa)
}

/// Returns the DFA with the fewest states accepting the same language.
pub fn minimize(dfa: &DFA) -> DFA {
    dfa.minimize()
}
