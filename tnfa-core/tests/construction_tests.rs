//! Construction test suite
//!
//! End-to-end checks of the automata built for small patterns, plus the
//! allocator guarantees that hold across patterns.

use std::collections::BTreeSet;
use tnfa_core::{
    CompileOptions, Compiler, EPSILON, Malformed, Nfa, OptionalStrategy, StateAllocator, concat,
    one_or_more, union,
};

fn epsilon_targets(nfa: &Nfa, from: tnfa_core::StateId) -> BTreeSet<tnfa_core::StateId> {
    nfa.destinations(from, EPSILON)
        .map(|d| d.iter().copied().collect())
        .unwrap_or_default()
}

mod literals {
    use super::*;

    #[test]
    fn test_single_literal() {
        let alloc = StateAllocator::new();
        let nfa = Compiler::new(&alloc).compile("a").unwrap();

        assert_eq!(nfa.state_count(), 2);
        assert_eq!(nfa.transition_count(), 1);
        let accept = nfa.sole_final().unwrap();
        assert_ne!(nfa.initial(), accept);
        assert!(nfa.has_transition(nfa.initial(), 'a', accept));
    }

    #[test]
    fn test_sequence() {
        let alloc = StateAllocator::new();
        let nfa = Compiler::new(&alloc).compile("abc").unwrap();
        // each join merges two states
        assert_eq!(nfa.state_count(), 4);
        assert_eq!(nfa.alphabet(), BTreeSet::from(['a', 'b', 'c']));
    }
}

mod alternation {
    use super::*;

    #[test]
    fn test_a_or_b() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        assert_eq!(compiler.postfix("a|b").unwrap(), "ab|");
        let nfa = compiler.compile("a|b").unwrap();

        assert_eq!(nfa.state_count(), 6);
        assert_eq!(nfa.alphabet(), BTreeSet::from(['a', 'b', EPSILON]));

        let starts = epsilon_targets(&nfa, nfa.initial());
        assert_eq!(starts.len(), 2);
        let mut labels = BTreeSet::new();
        for &start in &starts {
            for symbol in ['a', 'b'] {
                if nfa.destinations(start, symbol).is_some() {
                    labels.insert(symbol);
                }
            }
        }
        assert_eq!(labels, BTreeSet::from(['a', 'b']));

        let accept = nfa.sole_final().unwrap();
        for &start in &starts {
            let symbol = if nfa.destinations(start, 'a').is_some() { 'a' } else { 'b' };
            let end = nfa.destinations(start, symbol).unwrap()[0];
            assert!(nfa.has_transition(end, EPSILON, accept));
        }
    }

    #[test]
    fn test_union_primitive_counts() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        let a = compiler.compile("ab").unwrap();
        let b = compiler.compile("c*").unwrap();
        let (a_len, b_len) = (a.state_count(), b.state_count());
        let before: BTreeSet<_> = a.states().union(b.states()).copied().collect();

        let nfa = union(&alloc, a, b);
        assert_eq!(nfa.state_count(), a_len + b_len + 2);
        let added: Vec<_> = nfa.states().difference(&before).collect();
        assert_eq!(added.len(), 2);
    }
}

mod concatenation {
    use super::*;

    #[test]
    fn test_concat_primitive_counts() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        let a = compiler.compile("a|b").unwrap();
        let b = compiler.compile("c").unwrap();
        let (a_len, b_len) = (a.state_count(), b.state_count());
        let a_initial = a.initial();
        let b_finals = b.finals().clone();

        let nfa = concat(a, b);
        assert_eq!(nfa.state_count(), a_len + b_len - 1);
        assert_eq!(nfa.initial(), a_initial);
        assert_eq!(nfa.finals(), &b_finals);
    }

    #[test]
    fn test_group_followed_by_literal() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        assert_eq!(compiler.postfix("(a|b)c").unwrap(), "ab|c.");
        assert_eq!(compiler.compile("(a|b)c").unwrap().state_count(), 7);
    }

    #[test]
    fn test_long_literal_sequence() {
        let alloc = StateAllocator::new();
        let pattern = "ab".repeat(3000);
        let nfa = Compiler::new(&alloc).compile(&pattern).unwrap();
        assert_eq!(nfa.state_count(), 6001);
        assert_eq!(nfa.transition_count(), 6000);

        // walk the chain from the start
        let mut current = nfa.initial();
        for symbol in pattern.chars() {
            let dests = nfa.destinations(current, symbol).unwrap();
            assert_eq!(dests.len(), 1);
            current = dests[0];
        }
        assert_eq!(nfa.sole_final(), Some(current));
    }
}

mod repetition {
    use super::*;

    #[test]
    fn test_star() {
        let alloc = StateAllocator::new();
        let nfa = Compiler::new(&alloc).compile("a*").unwrap();
        assert_eq!(nfa.state_count(), 4);

        let accept = nfa.sole_final().unwrap();
        // zero-repetition bypass
        assert!(nfa.has_transition(nfa.initial(), EPSILON, accept));

        // back edge from the literal's end to its start
        let (inner_start, inner_end) = nfa
            .transitions()
            .find(|&(_, symbol, _)| symbol == 'a')
            .map(|(from, _, dests)| (from, dests[0]))
            .unwrap();
        assert!(nfa.has_transition(inner_end, EPSILON, inner_start));
    }

    #[test]
    fn test_plus_halves_share_only_the_join() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        let a = compiler.compile("a|b").unwrap();
        let mandatory = a.states().clone();
        let first_fresh = alloc.peek();

        let nfa = one_or_more(&alloc, a);
        let repeat: BTreeSet<_> = nfa
            .states()
            .iter()
            .copied()
            .filter(|&s| s >= first_fresh)
            .collect();
        assert!(repeat.is_disjoint(&mandatory));

        let kept: BTreeSet<_> = nfa.states().intersection(&mandatory).copied().collect();
        // the mandatory half loses only its final state to the join
        assert_eq!(kept.len(), mandatory.len() - 1);
        assert_eq!(nfa.state_count(), kept.len() + repeat.len());
        assert_eq!(repeat.len(), mandatory.len() + 2);
    }

    #[test]
    fn test_plus_through_compiler() {
        let alloc = StateAllocator::new();
        let nfa = Compiler::new(&alloc).compile("a+").unwrap();
        assert_eq!(nfa.state_count(), 5);
        assert_eq!(nfa.finals().len(), 1);
    }

    #[test]
    fn test_optional_strategies() {
        let alloc = StateAllocator::new();
        let alternation = Compiler::new(&alloc).compile("a?").unwrap();
        assert_eq!(alternation.state_count(), 6);
        let accept = alternation.sole_final().unwrap();
        let branches = epsilon_targets(&alternation, alternation.initial());
        assert_eq!(branches.len(), 2);
        // the epsilon-only branch reaches accept without consuming 'a'
        let empty_branch = branches
            .iter()
            .copied()
            .find(|&s| alternation.destinations(s, 'a').is_none())
            .unwrap();
        let branch_end = epsilon_targets(&alternation, empty_branch);
        assert_eq!(branch_end.len(), 1);
        let branch_end = branch_end.first().copied().unwrap();
        assert!(alternation.has_transition(branch_end, EPSILON, accept));

        let options = CompileOptions {
            optional: OptionalStrategy::Bypass,
            ..CompileOptions::default()
        };
        let bypass = Compiler::with_options(&alloc, options).compile("a?").unwrap();
        assert_eq!(bypass.state_count(), 4);
        assert!(bypass.has_transition(bypass.initial(), EPSILON, bypass.sole_final().unwrap()));
    }

    #[test]
    fn test_epsilon_marker_in_pattern() {
        let alloc = StateAllocator::new();
        let nfa = Compiler::new(&alloc).compile("a|ε").unwrap();
        assert_eq!(nfa.state_count(), 6);
        assert_eq!(nfa.alphabet(), BTreeSet::from(['a', EPSILON]));
    }
}

mod allocator {
    use super::*;

    #[test]
    fn test_patterns_get_disjoint_ranges() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        let first = compiler.compile("a|b").unwrap();
        let second = compiler.compile("c*").unwrap();

        let first_max = first.states().last().copied().unwrap();
        let second_min = second.states().first().copied().unwrap();
        assert!(first_max < second_min);
        assert!(first.states().is_disjoint(second.states()));
    }

    #[test]
    fn test_malformed_leaves_allocator_untouched() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        let valid = compiler.compile("a").unwrap();
        let before = alloc.peek();

        let err = compiler.compile("*").unwrap_err();
        assert_eq!(
            err.kind(),
            &Malformed::StackUnderflow {
                operator: '*',
                position: 0,
                needed: 1,
                found: 0,
            }
        );
        assert_eq!(alloc.peek(), before);

        let next = compiler.compile("b").unwrap();
        assert_eq!(next.initial(), before);
        assert!(valid.states().is_disjoint(next.states()));
    }

    #[test]
    fn test_malformed_variants() {
        let alloc = StateAllocator::new();
        let compiler = Compiler::new(&alloc);
        assert!(matches!(
            compiler.compile("a)").unwrap_err().kind(),
            Malformed::Grouping(_)
        ));
        assert!(matches!(
            compiler.compile("|a").unwrap_err().kind(),
            Malformed::StackUnderflow { operator: '|', .. }
        ));
        assert!(matches!(
            compiler.compile("a_b").unwrap_err().kind(),
            Malformed::StackUnderflow { .. } | Malformed::LeftoverOperands { .. }
        ));
        assert_eq!(alloc.peek().as_u64(), 0);
    }
}
