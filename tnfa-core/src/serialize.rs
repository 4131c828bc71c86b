//! Canonical text form of an automaton
//!
//! Five lines, in order: states, alphabet, initial state, final states,
//! transitions. States are listed in ascending order, the alphabet by code
//! point, and transition tuples by source then symbol with destinations in
//! insertion order. The epsilon sentinel is printed as a literal blank.

use crate::nfa::Nfa;
use std::fmt;

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "states: {}", join(self.states()))?;
        writeln!(f, "alphabet: {}", join(self.alphabet()))?;
        writeln!(f, "initial: {}", self.initial())?;
        writeln!(f, "finals: {}", join(self.finals()))?;

        write!(f, "transitions: ")?;
        for (i, (from, symbol, dests)) in self.transitions().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {}, [{}])", from, symbol, join(dests))?;
        }
        Ok(())
    }
}

/// Serialize an automaton to its canonical text form
pub fn serialize(nfa: &Nfa) -> String {
    nfa.to_string()
}
