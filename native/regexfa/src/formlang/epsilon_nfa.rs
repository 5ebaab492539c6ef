//! Epsilon Non-deterministic Finite Automaton (ε-NFA) implementation.

use crate::formlang::dfa::GraphEdge;
use crate::formlang::simulation::simulate_nfa;
use crate::formlang::state::{StateId, StateSet};
use crate::formlang::symbol::{Label, SymbolId, is_epsilon};
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

/// A state of an [`EpsilonNFA`].
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    /// Outgoing transitions, grouped by label in insertion order.
    transitions: IndexMap<Label, StateSet>,
    is_final: bool,
}

impl NfaState {
    /// Outgoing transitions of this state.
    pub fn transitions(&self) -> &IndexMap<Label, StateSet> {
        &self.transitions
    }

    /// Targets reachable from this state through a single transition with
    /// the given label.
    pub fn targets(&self, label: Label) -> Option<&StateSet> {
        self.transitions.get(&label)
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// An Epsilon Non-deterministic Finite Automaton.
///
/// States live in an arena and are referenced by their index; transitions
/// never hold anything but indices into the same arena.
#[derive(Debug, Clone, Default)]
pub struct EpsilonNFA {
    states: Vec<NfaState>,
    /// Start state (None if the automaton has no states yet)
    start_state: Option<StateId>,
    /// Final (accepting) states
    final_states: StateSet,
    /// All symbols used (excluding epsilon), in order of first appearance
    alphabet: IndexSet<SymbolId>,
    /// Cached epsilon closures for each state
    epsilon_closures: Option<Vec<StateSet>>,
}

impl EpsilonNFA {
    /// Create a new empty epsilon-NFA.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh non-final state to the arena and return its index.
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(NfaState::default());
        self.epsilon_closures = None;
        id
    }

    /// Ensure a state exists, growing the arena if needed.
    fn ensure_state(&mut self, state: StateId) {
        while self.states.len() <= state as usize {
            self.add_state();
        }
    }

    /// Add a transition from source to destination on the given label.
    pub fn add_transition(&mut self, source: StateId, label: Label, destination: StateId) {
        self.ensure_state(source);
        self.ensure_state(destination);

        if let Label::Symbol(symbol) = label {
            self.alphabet.insert(symbol);
        }

        // Target sets only grow as far as their largest member.
        self.states[source as usize]
            .transitions
            .entry(label)
            .or_insert_with(|| StateSet::with_capacity(destination as usize + 1))
            .insert(destination);

        // Invalidate cached epsilon closures
        self.epsilon_closures = None;
    }

    /// Add an epsilon transition from source to destination.
    pub fn add_epsilon_transition(&mut self, source: StateId, destination: StateId) {
        self.add_transition(source, Label::Epsilon, destination);
    }

    /// Set the start state. There is exactly one.
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

    /// Get the alphabet (all symbols except epsilon).
    pub fn alphabet(&self) -> &IndexSet<SymbolId> {
        &self.alphabet
    }

    /// Get a state by index.
    pub fn state(&self, state: StateId) -> Option<&NfaState> {
        self.states.get(state as usize)
    }

    /// All states, indexed by [`StateId`].
    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    /// Follow epsilon transitions from every state on the stack until no
    /// new state shows up, adding everything visited to `closure`.
    fn close_over_epsilon(&self, closure: &mut StateSet, mut stack: Vec<StateId>) {
        while let Some(s) = stack.pop() {
            if !closure.insert(s) {
                continue;
            }

            let Some(state) = self.states.get(s as usize) else {
                continue;
            };

            if let Some(destinations) = state.targets(Label::Epsilon) {
                for dest in destinations.iter() {
                    if !closure.contains(dest) {
                        stack.push(dest);
                    }
                }
            }
        }
    }

    /// Compute epsilon closures for all states (cached).
    pub fn compute_epsilon_closures(&mut self) {
        if self.epsilon_closures.is_some() {
            return;
        }

        let closures = (0..self.num_states())
            .map(|state| {
                let mut closure = StateSet::with_capacity(state as usize + 1);
                self.close_over_epsilon(&mut closure, vec![state]);
                closure
            })
            .collect();

        self.epsilon_closures = Some(closures);
    }

    /// Get the epsilon closure of a set of states: the smallest superset of
    /// `states` closed under epsilon transitions.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.states.len());

        if let Some(cached) = &self.epsilon_closures {
            for state in states.iter() {
                if let Some(state_closure) = cached.get(state as usize) {
                    closure.union_with(state_closure);
                }
            }
        } else {
            self.close_over_epsilon(&mut closure, states.iter().collect());
        }

        closure
    }

    /// Get the states directly reachable from a set of states on a given
    /// symbol, without following epsilon transitions afterwards.
    pub fn step(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        let mut reached = StateSet::with_capacity(self.states.len());

        for state in states.iter() {
            if let Some(destinations) = self
                .state(state)
                .and_then(|s| s.targets(Label::Symbol(symbol)))
            {
                reached.union_with(destinations);
            }
        }

        reached
    }

    /// Get the states reachable from a set of states on a given symbol.
    /// Returns the epsilon closure of the reached states.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        self.epsilon_closure(&self.step(states, symbol))
    }

    /// Check if the NFA accepts no string at all.
    /// Uses BFS from the start state following all transitions.
    pub fn is_empty(&self) -> bool {
        let Some(start) = self.start_state else {
            return true;
        };

        let mut visited = StateSet::with_capacity(self.states.len());
        let mut queue = VecDeque::from([start]);

        while let Some(state) = queue.pop_front() {
            if !visited.insert(state) {
                continue;
            }

            if self.final_states.contains(state) {
                return false;
            }

            for destinations in self.states[state as usize].transitions.values() {
                for dest in destinations.iter() {
                    if !visited.contains(dest) {
                        queue.push_back(dest);
                    }
                }
            }
        }

        true
    }

    /// Check whether the NFA accepts the given string.
    pub fn accepts(&self, input: &str) -> bool {
        simulate_nfa(self, input)
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Label, StateId)> + '_ {
        self.states.iter().enumerate().flat_map(|(src, state)| {
            state.transitions.iter().flat_map(move |(&label, dests)| {
                dests.iter().map(move |dst| (src as StateId, label, dst))
            })
        })
    }

    /// Convert to a graph representation (edges with labels).
    /// Returns: (nodes, edges) where edges are (src, dst, label)
    pub fn to_graph(&self) -> (Vec<StateId>, Vec<GraphEdge>) {
        let nodes = (0..self.num_states()).collect();
        let edges = self
            .transitions()
            .map(|(src, label, dst)| (src, dst, label.to_string()))
            .collect();

        (nodes, edges)
    }

    /// Number of transitions labelled with epsilon.
    pub fn num_epsilon_transitions(&self) -> usize {
        self.transitions()
            .filter(|(_, label, _)| is_epsilon(*label))
            .count()
    }
}
