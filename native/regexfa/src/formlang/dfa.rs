//! Deterministic Finite Automaton (DFA) implementation with minimization by
//! partition refinement.

use crate::formlang::simulation::simulate_dfa;
use crate::formlang::state::{StateId, StateSet};
use crate::formlang::symbol::SymbolId;
use indexmap::{IndexMap, IndexSet};
use log::trace;
use std::collections::VecDeque;

/// A labeled edge in the graph representation: (source, destination, label).
pub type GraphEdge = (StateId, StateId, String);

/// Outgoing symbols of a state paired with the partition of their targets.
type Signature = Vec<(SymbolId, usize)>;

/// A state of a [`DFA`]. It has at most one transition per symbol and never
/// an epsilon transition.
#[derive(Debug, Clone, Default)]
pub struct DfaState {
    transitions: IndexMap<SymbolId, StateId>,
    is_final: bool,
}

impl DfaState {
    /// Outgoing transitions of this state.
    pub fn transitions(&self) -> &IndexMap<SymbolId, StateId> {
        &self.transitions
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// A Deterministic Finite Automaton.
#[derive(Debug, Clone, Default)]
pub struct DFA {
    states: Vec<DfaState>,
    /// Start state (None if empty)
    start_state: Option<StateId>,
    /// Final (accepting) states
    final_states: StateSet,
    /// All symbols used, in order of first appearance
    alphabet: IndexSet<SymbolId>,
    /// NFA states represented by each DFA state (if created via subset
    /// construction), indexed by DFA state
    state_mapping: Option<Vec<StateSet>>,
}

impl DFA {
    /// Create a new empty DFA.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new state and return its ID.
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(DfaState::default());
        id
    }

    fn ensure_state(&mut self, state: StateId) {
        while self.states.len() <= state as usize {
            self.add_state();
        }
    }

    /// Set the start state.
    pub fn set_start_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.start_state = Some(state);
    }

    /// Mark or unmark a state as final (accepting).
    pub fn set_final(&mut self, state: StateId, is_final: bool) {
        self.ensure_state(state);
        self.states[state as usize].is_final = is_final;
        if is_final {
            self.final_states.insert(state);
        } else {
            self.final_states = self.final_states.iter().filter(|s| *s != state).collect();
        }
    }

    /// Add a transition. An existing transition from `source` on the same
    /// symbol is replaced, so the automaton stays deterministic.
    pub fn add_transition(&mut self, source: StateId, symbol: SymbolId, destination: StateId) {
        self.ensure_state(source);
        self.ensure_state(destination);
        self.alphabet.insert(symbol);
        self.states[source as usize]
            .transitions
            .insert(symbol, destination);
    }

    /// Get the transition from a state on a symbol.
    pub fn transition(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.states
            .get(source as usize)
            .and_then(|state| state.transitions.get(&symbol))
            .copied()
    }

    /// Get the number of states.
    pub fn num_states(&self) -> StateId {
        self.states.len() as StateId
    }

    /// Get the start state.
    pub fn start_state(&self) -> Option<StateId> {
        self.start_state
    }

    /// Get the final states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.states
            .get(state as usize)
            .is_some_and(|state| state.is_final)
    }

    /// Get a state by index.
    pub fn state(&self, state: StateId) -> Option<&DfaState> {
        self.states.get(state as usize)
    }

    /// All states, indexed by [`StateId`].
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// Get the alphabet.
    pub fn alphabet(&self) -> &IndexSet<SymbolId> {
        &self.alphabet
    }

    /// Set the state mapping from original NFA states.
    pub fn set_state_mapping(&mut self, mapping: Vec<StateSet>) {
        self.state_mapping = Some(mapping);
    }

    /// Get the state mapping.
    pub fn state_mapping(&self) -> Option<&[StateSet]> {
        self.state_mapping.as_deref()
    }

    /// The NFA states a DFA state stands for, if the mapping is known.
    pub fn nfa_states(&self, state: StateId) -> Option<&StateSet> {
        self.state_mapping
            .as_ref()
            .and_then(|mapping| mapping.get(state as usize))
    }

    /// Check if the DFA is empty (accepts no strings).
    pub fn is_empty(&self) -> bool {
        if self.final_states.is_empty() {
            return true;
        }

        !self.reachable_states().intersects(&self.final_states)
    }

    /// Check whether the DFA accepts the given string.
    pub fn accepts(&self, input: &str) -> bool {
        simulate_dfa(self, input)
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.states.iter().enumerate().flat_map(|(src, state)| {
            state
                .transitions
                .iter()
                .map(move |(&sym, &dst)| (src as StateId, sym, dst))
        })
    }

    /// Find all states reachable from the start state.
    pub fn reachable_states(&self) -> StateSet {
        let mut reachable = StateSet::with_capacity(self.states.len());

        let Some(start) = self.start_state else {
            return reachable;
        };

        let mut queue = VecDeque::from([start]);

        while let Some(state) = queue.pop_front() {
            if !reachable.insert(state) {
                continue;
            }

            for &next in self.states[state as usize].transitions.values() {
                if !reachable.contains(next) {
                    queue.push_back(next);
                }
            }
        }

        reachable
    }

    /// Reachable states from which some final state can be reached.
    pub fn live_states(&self) -> StateSet {
        let reachable = self.reachable_states();

        let mut predecessors: Vec<Vec<StateId>> = vec![Vec::new(); self.states.len()];
        for state in reachable.iter() {
            for &next in self.states[state as usize].transitions.values() {
                predecessors[next as usize].push(state);
            }
        }

        let mut live = StateSet::with_capacity(self.states.len());
        let mut queue: VecDeque<StateId> = self
            .final_states
            .iter()
            .filter(|&state| reachable.contains(state))
            .collect();

        while let Some(state) = queue.pop_front() {
            if !live.insert(state) {
                continue;
            }

            for &prev in &predecessors[state as usize] {
                if !live.contains(prev) {
                    queue.push_back(prev);
                }
            }
        }

        live
    }

    /// Outgoing symbols of a state paired with the partition each target
    /// currently belongs to, sorted by symbol. Transitions into states left
    /// out of the partitioning are ignored.
    fn signature(&self, state: StateId, partition_of: &[usize]) -> Signature {
        let mut signature: Signature = self.states[state as usize]
            .transitions
            .iter()
            .map(|(&symbol, &target)| (symbol, partition_of[target as usize]))
            .filter(|&(_, partition)| partition != usize::MAX)
            .collect();
        signature.sort_unstable();
        signature
    }

    /// Minimize the DFA by partition refinement.
    /// Returns a new minimized DFA; `self` is left untouched.
    ///
    /// States not reachable from the start state are dropped, and so are dead
    /// states (those that can't reach a final state) together with the
    /// transitions into them: a missing transition rejects just like a dead
    /// state does. The start state is always kept. The states of the result
    /// are numbered in breadth-first order from the start state, following
    /// symbols in ascending order, so two minimal DFAs for the same language
    /// are identical.
    pub fn minimize(&self) -> DFA {
        let Some(start) = self.start_state else {
            return DFA::new();
        };

        let mut kept = self.live_states();
        kept.insert(start);

        // Initial partition: final states and non-final states
        let (finals, non_finals): (Vec<StateId>, Vec<StateId>) =
            kept.iter().partition(|&state| self.is_final(state));

        let mut partitions: Vec<Vec<StateId>> = [finals, non_finals]
            .into_iter()
            .filter(|partition| !partition.is_empty())
            .collect();

        let mut partition_of = vec![usize::MAX; self.states.len()];
        assign_partitions(&partitions, &mut partition_of);

        let mut round = 0;
        loop {
            round += 1;
            let mut changed = false;
            let mut refined = Vec::with_capacity(partitions.len());

            for partition in &partitions {
                let mut groups: IndexMap<Signature, Vec<StateId>> = IndexMap::new();
                for &state in partition {
                    groups
                        .entry(self.signature(state, &partition_of))
                        .or_default()
                        .push(state);
                }
                if groups.len() > 1 {
                    changed = true;
                }
                refined.extend(groups.into_values());
            }

            trace!(
                "refinement round {}: {} -> {} partitions",
                round,
                partitions.len(),
                refined.len()
            );

            partitions = refined;
            assign_partitions(&partitions, &mut partition_of);

            if !changed {
                break;
            }
        }

        self.build_minimized_dfa(&partitions, &partition_of)
    }

    /// Build a minimized DFA from partitions.
    fn build_minimized_dfa(&self, partitions: &[Vec<StateId>], partition_of: &[usize]) -> DFA {
        let mut minimized = DFA::new();

        let Some(start) = self.start_state else {
            return minimized;
        };

        // Number partitions in BFS order from the start partition.
        let mut new_id: Vec<Option<StateId>> = vec![None; partitions.len()];
        let mut order = Vec::with_capacity(partitions.len());
        let mut queue = VecDeque::from([partition_of[start as usize]]);
        new_id[partition_of[start as usize]] = Some(minimized.add_state());

        while let Some(part_idx) = queue.pop_front() {
            order.push(part_idx);
            // Every member of a partition has the same signature, so any of
            // them can stand for the others.
            let representative = partitions[part_idx][0];
            let mut transitions: Vec<(SymbolId, StateId)> = self.states
                [representative as usize]
                .transitions
                .iter()
                .map(|(&symbol, &target)| (symbol, target))
                .collect();
            transitions.sort_unstable();

            let source = new_id[part_idx].unwrap_or_default();
            for (symbol, target) in transitions {
                let target_part = partition_of[target as usize];
                if target_part == usize::MAX {
                    continue;
                }
                let dest = match new_id[target_part] {
                    Some(dest) => dest,
                    None => {
                        let dest = minimized.add_state();
                        new_id[target_part] = Some(dest);
                        queue.push_back(target_part);
                        dest
                    }
                };
                minimized.add_transition(source, symbol, dest);
            }
        }

        minimized.set_start_state(0);

        for &part_idx in &order {
            let Some(state) = new_id[part_idx] else {
                continue;
            };
            if partitions[part_idx].iter().any(|&s| self.is_final(s)) {
                minimized.set_final(state, true);
            }
        }

        // Build state mapping from minimized states to original NFA states
        if let Some(orig_mapping) = &self.state_mapping {
            let mut new_mapping = vec![StateSet::default(); minimized.states.len()];
            for &part_idx in &order {
                let Some(state) = new_id[part_idx] else {
                    continue;
                };
                for &old_dfa_state in &partitions[part_idx] {
                    if let Some(nfa_states) = orig_mapping.get(old_dfa_state as usize) {
                        new_mapping[state as usize].union_with(nfa_states);
                    }
                }
            }
            minimized.state_mapping = Some(new_mapping);
        }

        minimized
    }

    /// Convert to a graph representation (edges with labels).
    /// Returns: (nodes, edges) where edges are (src, dst, label)
    pub fn to_graph(&self) -> (Vec<StateId>, Vec<GraphEdge>) {
        let nodes = (0..self.num_states()).collect();
        let edges = self
            .transitions()
            .map(|(src, symbol, dst)| (src, dst, symbol.to_string()))
            .collect();

        (nodes, edges)
    }
}

fn assign_partitions(partitions: &[Vec<StateId>], partition_of: &mut [usize]) {
    for (part_idx, partition) in partitions.iter().enumerate() {
        for &state in partition {
            partition_of[state as usize] = part_idx;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dfa_basic() {
        let mut dfa = DFA::new();
        let s0 = dfa.add_state();
        let s1 = dfa.add_state();
        let s2 = dfa.add_state();

        dfa.set_start_state(s0);
        dfa.set_final(s2, true);
        dfa.add_transition(s0, 'a', s1);
        dfa.add_transition(s1, 'b', s2);

        assert_eq!(dfa.num_states(), 3);
        assert_eq!(dfa.start_state(), Some(0));
        assert_eq!(dfa.transition(s0, 'a'), Some(s1));
        assert_eq!(dfa.transition(s0, 'b'), None);
        assert!(!dfa.is_empty());
    }

    #[test]
    fn test_add_transition_replaces() {
        let mut dfa = DFA::new();
        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(0, 'a', 2);
        assert_eq!(dfa.transition(0, 'a'), Some(2));
        assert_eq!(dfa.transitions().count(), 1);
    }

    #[test]
    fn test_dfa_minimization() {
        // 0 -a-> 1 -b-> 3(final)
        // 0 -b-> 2 -b-> 4(final)
        // States 1 and 2 should be merged, as should 3 and 4
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.set_final(3, true);
        dfa.set_final(4, true);

        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(0, 'b', 2);
        dfa.add_transition(1, 'b', 3);
        dfa.add_transition(2, 'b', 4);

        let minimized = dfa.minimize();

        assert_eq!(minimized.num_states(), 3);
        assert_eq!(minimized.start_state(), Some(0));
        for input in ["ab", "bb"] {
            assert!(minimized.accepts(input));
        }
        for input in ["", "a", "b", "abb", "ba"] {
            assert!(!minimized.accepts(input));
        }
        // The input is left untouched.
        assert_eq!(dfa.num_states(), 5);
    }

    #[test]
    fn test_minimization_splits_on_missing_transition() {
        // 0 -a-> 1(final), 0 -b-> 2(final), 1 -a-> 1
        // 1 and 2 are both final but only 1 has a transition on 'a'.
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.set_final(1, true);
        dfa.set_final(2, true);
        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(0, 'b', 2);
        dfa.add_transition(1, 'a', 1);

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 3);
        assert!(minimized.accepts("aaa"));
        assert!(!minimized.accepts("ba"));
    }

    #[test]
    fn test_minimization_drops_unreachable_states() {
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.set_final(1, true);
        dfa.add_transition(0, 'a', 1);
        // Unreachable
        dfa.add_transition(2, 'b', 3);
        dfa.set_final(3, true);

        assert_eq!(dfa.reachable_states().to_vec(), vec![0, 1]);
        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 2);
        assert!(!minimized.alphabet().contains(&'b'));
    }

    #[test]
    fn test_minimization_drops_dead_states() {
        // 0 -a-> 1(final) -a-> 2 -a-> 2, 0 -b-> 3(final)
        // 2 is dead, so 1 and 3 both accept only the empty suffix.
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.set_final(1, true);
        dfa.set_final(3, true);
        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(1, 'a', 2);
        dfa.add_transition(2, 'a', 2);
        dfa.add_transition(0, 'b', 3);

        assert_eq!(dfa.live_states().to_vec(), vec![0, 1, 3]);

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 2);
        assert_eq!(minimized.final_states().to_vec(), vec![1]);
        assert_eq!(minimized.transition(1, 'a'), None);
        for input in ["a", "b"] {
            assert!(minimized.accepts(input));
        }
        for input in ["", "aa", "aaa", "ba", "bb"] {
            assert!(!minimized.accepts(input));
        }
    }

    #[test]
    fn test_minimization_of_dead_start() {
        // Final state 2 is unreachable, every reachable state is dead.
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(1, 'b', 0);
        dfa.add_transition(2, 'a', 2);
        dfa.set_final(2, true);

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 1);
        assert_eq!(minimized.transitions().count(), 0);
        assert!(minimized.is_empty());
        assert!(!minimized.accepts("ab"));
    }

    #[test]
    fn test_minimization_is_idempotent() {
        // Accepts strings over {a, b} with an even number of a's, written
        // with redundant states.
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.set_final(0, true);
        dfa.set_final(2, true);
        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(0, 'b', 2);
        dfa.add_transition(1, 'a', 2);
        dfa.add_transition(1, 'b', 3);
        dfa.add_transition(2, 'a', 3);
        dfa.add_transition(2, 'b', 0);
        dfa.add_transition(3, 'a', 0);
        dfa.add_transition(3, 'b', 1);

        let once = dfa.minimize();
        let twice = once.minimize();

        assert_eq!(once.num_states(), 2);
        assert_eq!(once.to_graph(), twice.to_graph());
        assert_eq!(once.final_states(), twice.final_states());
    }

    #[test]
    fn test_minimization_without_final_states() {
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(1, 'a', 0);

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 1);
        assert!(minimized.is_empty());
    }

    #[test]
    fn test_minimization_merges_state_mapping() {
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.set_final(1, true);
        dfa.set_final(2, true);
        dfa.add_transition(0, 'a', 1);
        dfa.add_transition(0, 'b', 2);
        dfa.set_state_mapping(vec![
            [0].into_iter().collect(),
            [1, 3].into_iter().collect(),
            [2, 3].into_iter().collect(),
        ]);

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 2);
        assert_eq!(minimized.nfa_states(1).map(|s| s.to_vec()), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_empty_dfa() {
        let dfa = DFA::new();
        assert!(dfa.is_empty());
        assert_eq!(dfa.minimize().num_states(), 0);

        let mut dfa2 = DFA::new();
        dfa2.add_state();
        dfa2.set_start_state(0);
        // No final states - should be empty
        assert!(dfa2.is_empty());
    }

    #[test]
    fn test_to_graph() {
        let mut dfa = DFA::new();
        dfa.set_start_state(0);
        dfa.add_transition(0, 'x', 1);
        dfa.add_transition(1, 'y', 0);

        assert_eq!(
            dfa.to_graph(),
            (
                vec![0, 1],
                vec![(0, 1, "x".to_string()), (1, 0, "y".to_string())]
            )
        );
    }
}
