//! Formal language automata.
//!
//! This module provides epsilon-NFA and DFA implementations with:
//! - Thompson's construction of an epsilon-NFA from a syntax tree
//! - Epsilon closure computation
//! - Subset construction (NFA to DFA conversion)
//! - DFA minimization by partition refinement
//! - Simulation of both kinds of automata

mod dfa;
mod epsilon_nfa;
mod simulation;
mod state;
mod subset_construction;
mod symbol;
mod thompson;

pub use dfa::{DFA, DfaState, GraphEdge};
pub use epsilon_nfa::{EpsilonNFA, NfaState};
pub use simulation::{simulate_dfa, simulate_nfa};
pub use state::{StateId, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{EPSILON_MARKER, Label, OPERATORS, SymbolId, is_epsilon, is_operator};
pub use thompson::compile_nfa;
