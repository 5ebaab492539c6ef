//! Simulation of automata against an input string.

use crate::formlang::dfa::DFA;
use crate::formlang::epsilon_nfa::EpsilonNFA;
use crate::formlang::state::StateSet;

/// Run the NFA on `input`, tracking every state it could be in.
///
/// Undefined transitions contribute nothing, so the set of current states
/// may become empty, which rejects. The string is accepted iff the set
/// left after consuming it contains a final state.
pub fn simulate_nfa(nfa: &EpsilonNFA, input: &str) -> bool {
    let Some(start) = nfa.start_state() else {
        return false;
    };

    let initial = StateSet::singleton(start, nfa.num_states() as usize);
    let mut current = nfa.epsilon_closure(&initial);

    for symbol in input.chars() {
        current = nfa.move_on_symbol(&current, symbol);
        if current.is_empty() {
            return false;
        }
    }

    current.intersects(nfa.final_states())
}

/// Run the DFA on `input`.
///
/// A missing transition rejects immediately; no failure state is ever
/// materialized.
pub fn simulate_dfa(dfa: &DFA, input: &str) -> bool {
    let Some(mut current) = dfa.start_state() else {
        return false;
    };

    for symbol in input.chars() {
        match dfa.transition(current, symbol) {
            Some(next) => current = next,
            None => return false,
        }
    }

    dfa.is_final(current)
}
