//! Subset construction algorithm for converting ε-NFA to DFA.

use crate::formlang::dfa::DFA;
use crate::formlang::epsilon_nfa::EpsilonNFA;
use crate::formlang::state::{StateId, StateSet};
use crate::formlang::symbol::SymbolId;
use indexmap::{IndexMap, IndexSet};
use log::trace;
use std::collections::VecDeque;

/// Symbols (excluding epsilon) on the outgoing transitions of any state in
/// the set, in a deterministic order.
fn outgoing_symbols(nfa: &EpsilonNFA, states: &StateSet) -> IndexSet<SymbolId> {
    states
        .iter()
        .filter_map(|state| nfa.state(state))
        .flat_map(|state| state.transitions().keys())
        .filter_map(|label| label.symbol())
        .collect()
}

/// Convert an epsilon-NFA to a DFA using the powerset construction algorithm.
///
/// Each DFA state corresponds to exactly one set of NFA states. The result
/// records that correspondence (see [`DFA::state_mapping`]). A DFA state is
/// final iff its set contains a final NFA state. DFA states are numbered in
/// the order they are discovered, breadth first from the start state.
pub fn subset_construction(nfa: &EpsilonNFA) -> DFA {
    let mut dfa = DFA::new();

    let Some(start) = nfa.start_state() else {
        // No states - return empty DFA
        return dfa;
    };

    // Sets of NFA states seen so far, keyed to the DFA state standing for them
    let mut state_mapping: IndexMap<StateSet, StateId> = IndexMap::new();
    // Queue of DFA states to process
    let mut worklist: VecDeque<StateId> = VecDeque::new();

    // Initial DFA state is the epsilon closure of the NFA start state
    let initial_set =
        nfa.epsilon_closure(&StateSet::singleton(start, nfa.num_states() as usize));
    let initial_dfa_state = dfa.add_state();
    dfa.set_start_state(initial_dfa_state);

    if initial_set.intersects(nfa.final_states()) {
        dfa.set_final(initial_dfa_state, true);
    }

    state_mapping.insert(initial_set, initial_dfa_state);
    worklist.push_back(initial_dfa_state);

    while let Some(current_dfa_state) = worklist.pop_front() {
        let Some(current_nfa_set) = state_mapping
            .get_index(current_dfa_state as usize)
            .map(|(set, _)| set.clone())
        else {
            continue;
        };

        for symbol in outgoing_symbols(nfa, &current_nfa_set) {
            // Compute the set of NFA states reachable on this symbol
            let next_nfa_set = nfa.move_on_symbol(&current_nfa_set, symbol);

            if next_nfa_set.is_empty() {
                continue;
            }

            // Check if we've seen this DFA state before
            let next_dfa_state = if let Some(&existing) = state_mapping.get(&next_nfa_set) {
                existing
            } else {
                let new_state = dfa.add_state();

                if next_nfa_set.intersects(nfa.final_states()) {
                    dfa.set_final(new_state, true);
                }

                trace!("DFA state {} = NFA states {:?}", new_state, next_nfa_set);
                state_mapping.insert(next_nfa_set, new_state);
                worklist.push_back(new_state);
                new_state
            };

            dfa.add_transition(current_dfa_state, symbol, next_dfa_state);
        }
    }

    // DFA states were allocated in insertion order, so the keys line up
    // with the DFA state ids.
    dfa.set_state_mapping(state_mapping.into_keys().collect());

    dfa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formlang::symbol::Label;

    #[test]
    fn test_subset_construction_basic() {
        // NFA: 0 -a-> 1, 0 -a-> 2, 1 -b-> 3(final), 2 -b-> 3(final)
        let mut nfa = EpsilonNFA::new();
        nfa.add_transition(0, Label::Symbol('a'), 1);
        nfa.add_transition(0, Label::Symbol('a'), 2);
        nfa.add_transition(1, Label::Symbol('b'), 3);
        nfa.add_transition(2, Label::Symbol('b'), 3);
        nfa.set_start_state(0);
        nfa.set_final(3, true);

        let dfa = subset_construction(&nfa);

        assert_eq!(dfa.start_state(), Some(0));
        assert_eq!(dfa.num_states(), 3);
        assert_eq!(dfa.nfa_states(1).map(|s| s.to_vec()), Some(vec![1, 2]));
        assert_eq!(dfa.final_states().to_vec(), vec![2]);
        assert!(dfa.accepts("ab"));
        assert!(!dfa.accepts("a"));
    }

    #[test]
    fn test_subset_construction_with_epsilon() {
        // NFA: 0 -ε-> 1 -a-> 2(final)
        let mut nfa = EpsilonNFA::new();
        nfa.add_epsilon_transition(0, 1);
        nfa.add_transition(1, Label::Symbol('a'), 2);
        nfa.set_start_state(0);
        nfa.set_final(2, true);

        let dfa = subset_construction(&nfa);

        // Initial DFA state is {0, 1}, the epsilon closure of {0}
        assert_eq!(dfa.nfa_states(0).map(|s| s.to_vec()), Some(vec![0, 1]));
        let next = dfa.transition(0, 'a');
        assert_eq!(next, Some(1));
        assert!(dfa.is_final(1));
    }

    #[test]
    fn test_subset_construction_deduplicates_sets() {
        // a loops back to the same set of NFA states
        let mut nfa = EpsilonNFA::new();
        nfa.add_transition(0, Label::Symbol('a'), 1);
        nfa.add_epsilon_transition(1, 0);
        nfa.set_start_state(0);
        nfa.set_final(1, true);

        let dfa = subset_construction(&nfa);
        assert_eq!(dfa.num_states(), 2);
        assert_eq!(dfa.transition(1, 'a'), Some(1));
    }

    #[test]
    fn test_simultaneous_transitions_merge() {
        let mut nfa = EpsilonNFA::new();
        nfa.add_epsilon_transition(0, 1);
        nfa.add_epsilon_transition(0, 2);
        nfa.add_transition(1, Label::Symbol('a'), 3);
        nfa.add_transition(2, Label::Symbol('a'), 4);
        nfa.add_transition(2, Label::Symbol('b'), 4);
        nfa.set_start_state(0);
        nfa.set_final(4, true);

        let dfa = subset_construction(&nfa);
        assert_eq!(dfa.nfa_states(0).map(|s| s.to_vec()), Some(vec![0, 1, 2]));
        assert_eq!(dfa.transition(0, 'a'), Some(1));
        assert_eq!(dfa.nfa_states(1).map(|s| s.to_vec()), Some(vec![3, 4]));
        assert_eq!(dfa.transition(0, 'b'), Some(2));
        assert_eq!(dfa.nfa_states(2).map(|s| s.to_vec()), Some(vec![4]));
        // Both 1 and 2 are final but they are distinct DFA states
        assert_eq!(dfa.final_states().to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_empty_nfa() {
        let nfa = EpsilonNFA::new();
        let dfa = subset_construction(&nfa);
        assert!(dfa.start_state().is_none());
    }
}
