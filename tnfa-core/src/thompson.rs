//! Thompson's construction over a postfix token stream
//!
//! Each operator maps to one composition primitive. Primitives take their
//! operands by value and return a new automaton, so a consumed operand can
//! never be observed again. Reusing an operand requires an explicit
//! [`Nfa::deep_copy`] first, which is what [`one_or_more`] does.
//!
//! Every automaton the engine produces has exactly one final state.

use crate::error::Malformed;
use crate::nfa::{EPSILON, Nfa};
use crate::postfix::is_unary;
use crate::preprocess::CONCAT;
use crate::state::StateAllocator;
use log::trace;
use std::collections::BTreeSet;

/// How the `?` operator is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionalStrategy {
    /// `union(a, epsilon)`: alternation with an epsilon-only branch
    #[default]
    Alternation,
    /// `zero_or_one(a)`: a bypass edge around `a`
    Bypass,
}

/// Join `a` and `b` so that `b` starts where `a` ends
///
/// The final state of `a` is merged into the initial state of `b`, giving
/// `|a| + |b| - 1` states. If `a` has more than one final state, each one is
/// linked to `b`'s initial state with an epsilon edge instead.
pub fn concat(mut a: Nfa, b: Nfa) -> Nfa {
    let join = b.initial();
    let finals = b.finals().clone();

    match a.sole_final() {
        Some(f) => {
            a.redirect(f, join);
            a.remove_state(f);
        }
        None => {
            for f in a.finals().clone() {
                a.add_transition(f, EPSILON, join);
            }
        }
    }

    a.absorb(b);
    a.set_finals(finals);
    a
}

/// Alternation: accept whatever `a` or `b` accepts
///
/// Adds a fresh initial state that branches into both operands and a fresh
/// final state both operands lead into, giving `|a| + |b| + 2` states.
pub fn union(alloc: &StateAllocator, a: Nfa, b: Nfa) -> Nfa {
    let new_initial = alloc.fresh();
    let new_final = alloc.fresh();

    let mut exits: Vec<_> = a.finals().iter().copied().collect();
    exits.extend(b.finals().iter().copied());
    let b_initial = b.initial();
    let a_initial = a.initial();

    let mut nfa = a;
    nfa.absorb(b);
    nfa.add_state(new_initial);
    nfa.add_state(new_final);

    nfa.add_transition(new_initial, EPSILON, a_initial);
    nfa.add_transition(new_initial, EPSILON, b_initial);
    for exit in exits {
        nfa.add_transition(exit, EPSILON, new_final);
    }

    nfa.set_initial(new_initial);
    nfa.set_finals(BTreeSet::from([new_final]));
    nfa
}

/// Kleene star: zero or more repetitions of `a`
pub fn zero_or_more(alloc: &StateAllocator, a: Nfa) -> Nfa {
    wrap_optional(alloc, a, true)
}

/// Zero or one occurrence of `a`, built with a bypass edge
pub fn zero_or_one(alloc: &StateAllocator, a: Nfa) -> Nfa {
    wrap_optional(alloc, a, false)
}

/// One or more repetitions of `a`: `a` followed by `a*`
///
/// The repeated half is a deep copy, so the mandatory occurrence and the
/// optional repetitions share no state other than the join point.
pub fn one_or_more(alloc: &StateAllocator, a: Nfa) -> Nfa {
    let repeat = zero_or_more(alloc, a.deep_copy(alloc));
    concat(a, repeat)
}

/// `?` as alternation with an epsilon-only automaton
fn optional_by_alternation(alloc: &StateAllocator, a: Nfa) -> Nfa {
    let empty = Nfa::epsilon(alloc);
    union(alloc, a, empty)
}

fn wrap_optional(alloc: &StateAllocator, mut a: Nfa, repeat: bool) -> Nfa {
    let old_initial = a.initial();
    let old_finals = a.finals().clone();

    if repeat {
        for &f in &old_finals {
            a.add_transition(f, EPSILON, old_initial);
        }
    }

    let new_initial = alloc.fresh();
    a.add_state(new_initial);
    a.add_transition(new_initial, EPSILON, old_initial);
    a.set_initial(new_initial);

    let new_final = alloc.fresh();
    a.add_state(new_final);
    for &f in &old_finals {
        a.add_transition(f, EPSILON, new_final);
    }

    a.add_transition(new_initial, EPSILON, new_final);
    a.set_finals(BTreeSet::from([new_final]));
    a
}

/// Number of operands an operator token pops, zero for literals
fn arity(token: char) -> usize {
    match token {
        CONCAT | '|' => 2,
        c if is_unary(c) => 1,
        _ => 0,
    }
}

/// Check that `postfix` leaves exactly one operand on the stack
///
/// Runs before construction so a malformed stream never allocates states.
pub fn check_arity(postfix: &str) -> Result<(), Malformed> {
    let mut depth = 0usize;
    for (position, token) in postfix.chars().enumerate() {
        let needed = arity(token);
        if depth < needed {
            return Err(Malformed::StackUnderflow {
                operator: token,
                position,
                needed,
                found: depth,
            });
        }
        // every token pushes exactly one automaton
        depth = depth - needed + 1;
    }

    match depth {
        0 => Err(Malformed::Empty),
        1 => Ok(()),
        count => Err(Malformed::LeftoverOperands { count }),
    }
}

/// Builds automata from postfix streams
#[derive(Debug, Clone, Copy)]
pub struct Thompson<'a> {
    alloc: &'a StateAllocator,
    optional: OptionalStrategy,
}

impl<'a> Thompson<'a> {
    /// Create a builder drawing state IDs from `alloc`
    pub fn new(alloc: &'a StateAllocator) -> Self {
        Thompson {
            alloc,
            optional: OptionalStrategy::default(),
        }
    }

    /// Choose how `?` is built
    pub fn with_optional(mut self, optional: OptionalStrategy) -> Self {
        self.optional = optional;
        self
    }

    /// Evaluate `postfix` and return the resulting automaton
    ///
    /// The stream is run through [`check_arity`] first, so a malformed one
    /// is rejected before any state is allocated. Callers do not need to
    /// check it themselves.
    pub fn build(&self, postfix: &str) -> Result<Nfa, Malformed> {
        check_arity(postfix)?;

        let mut stack: Vec<Nfa> = Vec::new();
        for (position, token) in postfix.chars().enumerate() {
            let nfa = match arity(token) {
                0 => Nfa::symbol(self.alloc, token),
                1 => {
                    let a = pop(&mut stack, token, position, 1)?;
                    self.apply_unary(token, a)
                }
                _ => {
                    let b = pop(&mut stack, token, position, 2)?;
                    let a = pop(&mut stack, token, position, 2)?;
                    self.apply_binary(token, a, b)
                }
            };
            trace!("token '{}' -> {} states", token, nfa.state_count());
            stack.push(nfa);
        }

        let result = stack.pop().ok_or(Malformed::Empty)?;
        if !stack.is_empty() {
            return Err(Malformed::LeftoverOperands {
                count: stack.len() + 1,
            });
        }
        Ok(result)
    }

    fn apply_unary(&self, token: char, a: Nfa) -> Nfa {
        match (token, self.optional) {
            ('*', _) => zero_or_more(self.alloc, a),
            ('+', _) => one_or_more(self.alloc, a),
            (_, OptionalStrategy::Alternation) => optional_by_alternation(self.alloc, a),
            (_, OptionalStrategy::Bypass) => zero_or_one(self.alloc, a),
        }
    }

    fn apply_binary(&self, token: char, a: Nfa, b: Nfa) -> Nfa {
        match token {
            CONCAT => concat(a, b),
            _ => union(self.alloc, a, b),
        }
    }
}

fn pop(
    stack: &mut Vec<Nfa>,
    operator: char,
    position: usize,
    needed: usize,
) -> Result<Nfa, Malformed> {
    let found = stack.len();
    stack.pop().ok_or(Malformed::StackUnderflow {
        operator,
        position,
        needed,
        found,
    })
}
