//! NFA (Nondeterministic Finite Automaton) value type
//!
//! An [`Nfa`] owns its state set, initial state, final states and a two-level
//! transition map (`source -> symbol -> destinations`). Destinations for one
//! `(source, symbol)` pair accumulate in insertion order. A reverse index of
//! incoming edges lets a state be renamed without scanning the whole map.
//!
//! `Nfa` deliberately does not implement `Clone`: two live automata sharing
//! state IDs would corrupt each other when composed. Use
//! [`Nfa::deep_copy`], which relabels every state onto fresh IDs.

use crate::state::{StateAllocator, StateId};
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet};

/// The reserved symbol used for epsilon transitions
///
/// This is the blank character, so a pattern containing a literal blank
/// cannot be told apart from one containing an epsilon marker.
pub const EPSILON: char = ' ';

/// Destination states for one `(source, symbol)` pair, in insertion order
pub type Destinations = IndexSet<StateId>;

type TransitionMap = BTreeMap<StateId, BTreeMap<char, Destinations>>;

/// `destination -> {(source, symbol)}`, kept in step with the transition map
type IncomingMap = BTreeMap<StateId, BTreeSet<(StateId, char)>>;

/// An NFA (Nondeterministic Finite Automaton)
#[derive(Debug)]
pub struct Nfa {
    states: BTreeSet<StateId>,
    initial: StateId,
    finals: BTreeSet<StateId>,
    transitions: TransitionMap,
    incoming: IncomingMap,
}

impl Nfa {
    /// Build the two-state automaton `initial --symbol--> final`
    pub fn symbol(alloc: &StateAllocator, symbol: char) -> Self {
        let initial = alloc.fresh();
        let accept = alloc.fresh();
        let mut nfa = Nfa {
            states: BTreeSet::from([initial, accept]),
            initial,
            finals: BTreeSet::from([accept]),
            transitions: TransitionMap::new(),
            incoming: IncomingMap::new(),
        };
        nfa.add_transition(initial, symbol, accept);
        nfa
    }

    /// Build the two-state automaton whose only transition is epsilon
    pub fn epsilon(alloc: &StateAllocator) -> Self {
        Self::symbol(alloc, EPSILON)
    }

    /// All states, in ascending ID order
    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    /// Number of states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The start state
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// The accepting states
    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    /// The accepting state, if there is exactly one
    pub fn sole_final(&self) -> Option<StateId> {
        match self.finals.len() {
            1 => self.finals.first().copied(),
            _ => None,
        }
    }

    /// Symbols used as transition labels, in ascending order
    ///
    /// Includes [`EPSILON`] when any epsilon transition is present.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .values()
            .flat_map(|by_symbol| by_symbol.keys().copied())
            .collect()
    }

    /// Iterate `(source, symbol, destinations)`, ordered by source then symbol
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, char, &Destinations)> + '_ {
        self.transitions.iter().flat_map(|(&from, by_symbol)| {
            by_symbol
                .iter()
                .map(move |(&symbol, dests)| (from, symbol, dests))
        })
    }

    /// Destinations reachable from `from` on `symbol`
    pub fn destinations(&self, from: StateId, symbol: char) -> Option<&Destinations> {
        self.transitions.get(&from)?.get(&symbol)
    }

    /// Whether the edge `from --symbol--> to` exists
    pub fn has_transition(&self, from: StateId, symbol: char, to: StateId) -> bool {
        self.destinations(from, symbol)
            .is_some_and(|dests| dests.contains(&to))
    }

    /// Total number of edges (one per destination)
    pub fn transition_count(&self) -> usize {
        self.transitions().map(|(_, _, dests)| dests.len()).sum()
    }

    /// Copy this automaton onto freshly allocated state IDs
    ///
    /// The relabelling is a bijection, so the copy has the same shape and
    /// shares no state with `self` or with any other copy.
    pub fn deep_copy(&self, alloc: &StateAllocator) -> Nfa {
        let mapping: BTreeMap<StateId, StateId> =
            self.states.iter().map(|&s| (s, alloc.fresh())).collect();

        let mut copy = Nfa {
            states: mapping.values().copied().collect(),
            initial: mapping[&self.initial],
            finals: self.finals.iter().map(|s| mapping[s]).collect(),
            transitions: TransitionMap::new(),
            incoming: IncomingMap::new(),
        };
        for (from, symbol, dests) in self.transitions() {
            for dest in dests {
                copy.add_transition(mapping[&from], symbol, mapping[dest]);
            }
        }
        copy
    }

    /// Add a state to the state set
    pub(crate) fn add_state(&mut self, state: StateId) {
        self.states.insert(state);
    }

    /// Add a transition between states
    pub(crate) fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.transitions
            .entry(from)
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(to);
        self.incoming.entry(to).or_default().insert((from, symbol));
    }

    pub(crate) fn set_initial(&mut self, initial: StateId) {
        self.initial = initial;
    }

    pub(crate) fn set_finals(&mut self, finals: BTreeSet<StateId>) {
        self.finals = finals;
    }

    /// Remove a state from the state set, leaving transitions untouched
    pub(crate) fn remove_state(&mut self, state: StateId) {
        self.states.remove(&state);
        self.finals.remove(&state);
    }

    /// Rewrite every occurrence of `from` (as source or destination) to `to`
    ///
    /// Touches only the edges leaving or entering `from`. A rewritten
    /// destination keeps its position in its destination set.
    pub(crate) fn redirect(&mut self, from: StateId, to: StateId) {
        if from == to {
            return;
        }

        if let Some(outgoing) = self.transitions.remove(&from) {
            for (symbol, dests) in outgoing {
                for dest in dests {
                    if let Some(sources) = self.incoming.get_mut(&dest) {
                        sources.remove(&(from, symbol));
                    }
                    self.add_transition(to, symbol, dest);
                }
            }
        }

        for (source, symbol) in self.incoming.remove(&from).unwrap_or_default() {
            let Some(dests) = self
                .transitions
                .get_mut(&source)
                .and_then(|by_symbol| by_symbol.get_mut(&symbol))
            else {
                continue;
            };
            let Some(index) = dests.get_index_of(&from) else {
                continue;
            };
            dests.shift_remove_index(index);
            if !dests.contains(&to) {
                dests.shift_insert(index, to);
            }
            self.incoming.entry(to).or_default().insert((source, symbol));
        }

        if self.initial == from {
            self.initial = to;
        }
    }

    /// Merge the states and transitions of `other` into `self`
    ///
    /// `self` keeps its initial and final states; those of `other` are
    /// dropped.
    pub(crate) fn absorb(&mut self, other: Nfa) {
        self.states.extend(other.states);
        for (from, by_symbol) in other.transitions {
            for (symbol, dests) in by_symbol {
                for dest in dests {
                    self.add_transition(from, symbol, dest);
                }
            }
        }
    }
}
